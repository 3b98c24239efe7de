//! Publishing networks to NDEx
//!
//! A network is updated in place when the caller names a target UUID or when
//! the account already owns a network of the same name (compared
//! case-insensitively); otherwise it is created.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::NdexClient;
pub use types::{NdexCredentials, NetworkSummary, PublishOutcome};

use crate::error::{IngestError, Result};
use std::collections::HashMap;
use tracing::{debug, info};

/// Upper-cased network name → UUID for the account's networks
#[derive(Debug, Clone, Default)]
pub struct NetworkIndex {
    by_name: HashMap<String, String>,
}

impl NetworkIndex {
    /// Index summaries; the first network listed under a name wins
    pub fn from_summaries(summaries: &[NetworkSummary]) -> Self {
        let mut index = Self::default();
        for summary in summaries {
            if let Some(name) = &summary.name {
                index
                    .by_name
                    .entry(name.to_uppercase())
                    .or_insert_with(|| summary.external_id.clone());
            }
        }
        index
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.by_name.get(&name.to_uppercase()).map(String::as_str)
    }

    pub fn insert(&mut self, name: &str, uuid: &str) {
        self.by_name.insert(name.to_uppercase(), uuid.to_string());
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Uploads networks, fetching the name index at most once
pub struct Publisher {
    client: NdexClient,
    index: Option<NetworkIndex>,
}

impl Publisher {
    pub fn new(client: NdexClient) -> Self {
        Self { client, index: None }
    }

    pub fn client(&self) -> &NdexClient {
        &self.client
    }

    async fn index(&mut self) -> Result<&mut NetworkIndex> {
        if self.index.is_none() {
            let user = self.client.current_user().await?;
            let summaries = self.client.network_summaries(&user.external_id).await?;
            let index = NetworkIndex::from_summaries(&summaries);
            debug!(networks = index.len(), "Fetched network index");
            self.index = Some(index);
        }
        Ok(self.index.get_or_insert_with(NetworkIndex::default))
    }

    /// Create or update the network called `name`
    pub async fn publish(
        &mut self,
        name: &str,
        cx: Vec<u8>,
        update_uuid: Option<&str>,
    ) -> Result<PublishOutcome> {
        let target = match update_uuid {
            Some(uuid) => Some(uuid.to_string()),
            None => self
                .index()
                .await
                .map_err(|e| publish_error(name, e))?
                .lookup(name)
                .map(str::to_string),
        };

        let server = self.client.base_url().to_string();
        let user = self.client.username().to_string();

        let outcome = match target {
            Some(uuid) => {
                info!(network = name, %server, %user, %uuid, "Updating network");
                self.client
                    .update_network(&uuid, cx)
                    .await
                    .map_err(|e| publish_error(name, e))?;
                PublishOutcome::Updated { uuid }
            },
            None => {
                info!(network = name, %server, %user, "Uploading new network");
                let uuid = self
                    .client
                    .create_network(cx)
                    .await
                    .map_err(|e| publish_error(name, e))?;
                PublishOutcome::Created { uuid }
            },
        };

        if let Some(index) = self.index.as_mut() {
            index.insert(name, outcome.uuid());
        }
        info!(network = name, uuid = outcome.uuid(), "Published network");
        Ok(outcome)
    }
}

fn publish_error(name: &str, source: IngestError) -> IngestError {
    IngestError::Publish(format!("'{}': {}", name, source))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn summary(uuid: &str, name: &str) -> NetworkSummary {
        NetworkSummary {
            external_id: uuid.to_string(),
            name: Some(name.to_string()),
        }
    }

    #[test]
    fn test_index_is_case_insensitive() {
        let index = NetworkIndex::from_summaries(&[
            summary("a", "GeneHancer_v4.4"),
            summary("b", "genehancer_V4.4"),
            NetworkSummary {
                external_id: "c".to_string(),
                name: None,
            },
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("GENEHANCER_V4.4"), Some("a"));
        assert_eq!(index.lookup("other"), None);
    }

    async fn mount_index(server: &MockServer, networks: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/v2/user"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"externalId": "user-1"})),
            )
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/user/user-1/networksummary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(networks))
            .expect(1)
            .mount(server)
            .await;
    }

    fn publisher(server: &MockServer) -> Publisher {
        Publisher::new(
            NdexClient::new(&NdexCredentials {
                server: server.uri(),
                username: "loader".to_string(),
                password: "secret".to_string(),
            })
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_name_match_updates_and_new_name_creates() {
        let server = MockServer::start().await;
        mount_index(&server, serde_json::json!([{"externalId": "existing", "name": "GeneHancer"}])).await;
        Mock::given(method("PUT"))
            .and(path("/v2/network/existing"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/network"))
            .respond_with(ResponseTemplate::new(201).set_body_string("/v2/network/fresh"))
            .expect(1)
            .mount(&server)
            .await;

        let mut publisher = publisher(&server);
        let updated = publisher.publish("genehancer", b"[]".to_vec(), None).await.unwrap();
        assert_eq!(updated, PublishOutcome::Updated { uuid: "existing".to_string() });

        let created = publisher.publish("GeneHancer_v5", b"[]".to_vec(), None).await.unwrap();
        assert_eq!(created, PublishOutcome::Created { uuid: "fresh".to_string() });
    }

    #[tokio::test]
    async fn test_explicit_uuid_skips_index() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v2/network/target"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut publisher = publisher(&server);
        let outcome = publisher
            .publish("anything", b"[]".to_vec(), Some("target"))
            .await
            .unwrap();
        assert_eq!(outcome.uuid(), "target");
    }

    #[tokio::test]
    async fn test_failed_upload_is_a_publish_error() {
        let server = MockServer::start().await;
        mount_index(&server, serde_json::json!([])).await;
        Mock::given(method("POST"))
            .and(path("/v2/network"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = publisher(&server)
            .publish("GeneHancer", b"[]".to_vec(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Publish(ref m) if m.contains("GeneHancer")));
    }
}
