//! Gene symbol → category caches

use crate::error::Result;
use ghl_common::types::GeneCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Mapping from gene symbol (exact, case-sensitive) to category.
///
/// Serialized as a flat JSON object, e.g. `{"A1BG": "Protein coding gene"}`.
/// Keys are kept sorted so saved files diff cleanly between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneTypeCache {
    entries: BTreeMap<String, GeneCategory>,
}

impl GeneTypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<GeneCategory> {
        self.entries.get(symbol).copied()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, category: GeneCategory) {
        self.entries.insert(symbol.into(), category);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, GeneCategory)> {
        self.entries.iter().map(|(symbol, category)| (symbol.as_str(), *category))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a cache file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cache = Self::from_json_str(&text)?;
        debug!(path = %path.display(), entries = cache.len(), "Loaded gene types");
        Ok(cache)
    }

    /// Write the cache as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), entries = self.len(), "Saved gene types");
        Ok(())
    }
}

/// The two caches of a run and the rule deciding which one learns new genes.
///
/// The persistent cache is a knowledge base carried across runs; the session
/// cache lives only as long as the run. When `persist_updates` is set, newly
/// resolved genes go into the persistent cache (and the session cache is never
/// consulted); otherwise they go into the session cache and the persistent
/// cache is left exactly as loaded.
#[derive(Debug, Clone, Default)]
pub struct GeneTypeStore {
    persistent: GeneTypeCache,
    session: GeneTypeCache,
    persist_updates: bool,
}

impl GeneTypeStore {
    pub fn new(persistent: GeneTypeCache, persist_updates: bool) -> Self {
        Self {
            persistent,
            session: GeneTypeCache::new(),
            persist_updates,
        }
    }

    /// Build a store from a cache file, falling back to an empty cache when
    /// the file cannot be read or parsed
    pub fn load_or_empty(path: &Path, persist_updates: bool) -> Self {
        let persistent = match GeneTypeCache::load(path) {
            Ok(cache) => cache,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not load gene types, starting empty");
                GeneTypeCache::new()
            },
        };
        Self::new(persistent, persist_updates)
    }

    pub fn persist_updates(&self) -> bool {
        self.persist_updates
    }

    pub fn persistent(&self) -> &GeneTypeCache {
        &self.persistent
    }

    pub fn session(&self) -> &GeneTypeCache {
        &self.session
    }

    pub fn lookup_persistent(&self, symbol: &str) -> Option<GeneCategory> {
        self.persistent.get(symbol)
    }

    /// Session lookups only apply while the persistent cache is read-only
    pub fn lookup_session(&self, symbol: &str) -> Option<GeneCategory> {
        if self.persist_updates {
            None
        } else {
            self.session.get(symbol)
        }
    }

    /// Remember a freshly resolved gene in exactly one of the two caches
    pub fn record(&mut self, symbol: &str, category: GeneCategory) {
        if self.persist_updates {
            self.persistent.insert(symbol, category);
        } else {
            self.session.insert(symbol, category);
        }
    }
}
