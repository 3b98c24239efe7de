//! NDEx credentials profiles
//!
//! The credentials file is the INI file shared with the other NDEx loaders,
//! one section per profile. Values are taken verbatim, without quotes or
//! escapes:
//!
//! ```ini
//! [ndexgenehancerloader]
//! user = me
//! password = secret
//! server = public.ndexbio.org
//!
//! [genehancerstyle]
//! user = me
//! password = secret
//! server = public.ndexbio.org
//! uuid = template-network-uuid
//! ```

use crate::error::{CliError, Result};
use ghl_ingest::loader::StyleTemplate;
use ghl_ingest::publish::NdexCredentials;
use ini::{Ini, ParseOption, Properties};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Credentials file name under the home directory
pub const CONFIG_FILE: &str = ".ndexutils.conf";

/// Profile read when `--profile` is not given
pub const DEFAULT_PROFILE: &str = "ndexgenehancerloader";

/// A profile section; every key is optional so partial style profiles parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub user: Option<String>,
    pub password: Option<String>,
    pub server: Option<String>,
    /// Template network carrying the style
    pub uuid: Option<String>,
}

impl Profile {
    /// Keys are matched case-insensitively; unknown keys are ignored
    fn from_properties(properties: &Properties) -> Self {
        let mut profile = Profile::default();
        for (key, value) in properties.iter() {
            let value = Some(value.to_string());
            match key.to_ascii_lowercase().as_str() {
                "user" => profile.user = value,
                "password" => profile.password = value,
                "server" => profile.server = value,
                "uuid" => profile.uuid = value,
                _ => {},
            }
        }
        profile
    }
}

#[derive(Debug, Clone, Default)]
pub struct CredentialsFile {
    profiles: BTreeMap<String, Profile>,
}

impl CredentialsFile {
    pub fn from_ini_str(text: &str) -> Result<Self> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, options)?;

        let profiles = ini
            .iter()
            .filter_map(|(section, properties)| {
                section.map(|name| (name.to_string(), Profile::from_properties(properties)))
            })
            .collect();
        Ok(Self { profiles })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        let file = Self::from_ini_str(&text)?;
        debug!(path = %path.display(), profiles = file.profiles.len(), "Loaded credentials file");
        Ok(file)
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Credentials of `profile`, with `GHL_NDEX_*` variables taking precedence
    pub fn credentials(&self, profile: &str, path: &Path) -> Result<NdexCredentials> {
        let entry = self.profile(profile).cloned().unwrap_or_default();
        let from_env = |var: &str| std::env::var(var).ok().filter(|v| !v.is_empty());

        let user = from_env("GHL_NDEX_USER").or(entry.user);
        let password = from_env("GHL_NDEX_PASSWORD").or(entry.password);
        let server = from_env("GHL_NDEX_SERVER").or(entry.server);

        if self.profile(profile).is_none() && (user.is_none() || password.is_none() || server.is_none()) {
            return Err(CliError::ProfileNotFound {
                profile: profile.to_string(),
                path: path.display().to_string(),
            });
        }

        Ok(NdexCredentials {
            username: user.ok_or_else(|| CliError::missing_key(profile, "user"))?,
            password: password.ok_or_else(|| CliError::missing_key(profile, "password"))?,
            server: server.ok_or_else(|| CliError::missing_key(profile, "server"))?,
        })
    }

    /// Style template from `profile`.
    ///
    /// Missing `server`, `user` or `password` entries are taken from `main`.
    /// Returns `None` with a warning when the profile or its `uuid` is absent.
    pub fn style_template(&self, profile: &str, main: &NdexCredentials) -> Option<StyleTemplate> {
        let Some(entry) = self.profile(profile) else {
            warn!(profile, "Style profile not found, using default style");
            return None;
        };
        let Some(uuid) = entry.uuid.clone() else {
            warn!(profile, "Style profile has no uuid, using default style");
            return None;
        };

        Some(StyleTemplate {
            credentials: NdexCredentials {
                server: entry.server.clone().unwrap_or_else(|| main.server.clone()),
                username: entry.user.clone().unwrap_or_else(|| main.username.clone()),
                password: entry.password.clone().unwrap_or_else(|| main.password.clone()),
            },
            uuid,
        })
    }
}

/// `~/.ndexutils.conf`, or the bare file name when there is no home directory
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}
