//! NDEx request and response types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account used to talk to an NDEx server
#[derive(Clone, PartialEq, Eq)]
pub struct NdexCredentials {
    pub server: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for NdexCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdexCredentials")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NdexUser {
    pub external_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSummary {
    pub external_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// What happened to a published network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Created { uuid: String },
    Updated { uuid: String },
}

impl PublishOutcome {
    pub fn uuid(&self) -> &str {
        match self {
            PublishOutcome::Created { uuid } | PublishOutcome::Updated { uuid } => uuid,
        }
    }
}
