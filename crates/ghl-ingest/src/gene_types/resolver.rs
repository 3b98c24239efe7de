//! Tiered gene category resolution

use crate::error::Result;
use crate::gene_types::cache::GeneTypeStore;
use crate::gene_types::mygene::GeneInfoLookup;
use crate::gene_types::patterns::GenePatterns;
use ghl_common::types::GeneCategory;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace, warn};

/// Where a category came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResolutionTier {
    PersistentCache,
    SessionCache,
    KnownPattern,
    GeneInfo,
    FallbackPattern,
    Default,
}

impl ResolutionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionTier::PersistentCache => "persistent cache",
            ResolutionTier::SessionCache => "session cache",
            ResolutionTier::KnownPattern => "known pattern",
            ResolutionTier::GeneInfo => "gene info",
            ResolutionTier::FallbackPattern => "fallback pattern",
            ResolutionTier::Default => "default",
        }
    }

    /// Cache hits are answered without writing anything back
    pub fn is_cache(&self) -> bool {
        matches!(self, ResolutionTier::PersistentCache | ResolutionTier::SessionCache)
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tiers tried in order before falling back to [`ResolutionTier::Default`]
const CASCADE: [ResolutionTier; 5] = [
    ResolutionTier::PersistentCache,
    ResolutionTier::SessionCache,
    ResolutionTier::KnownPattern,
    ResolutionTier::GeneInfo,
    ResolutionTier::FallbackPattern,
];

/// Resolutions per tier over the lifetime of a resolver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverStats {
    by_tier: BTreeMap<ResolutionTier, usize>,
}

impl ResolverStats {
    fn record(&mut self, tier: ResolutionTier) {
        *self.by_tier.entry(tier).or_insert(0) += 1;
    }

    pub fn count(&self, tier: ResolutionTier) -> usize {
        self.by_tier.get(&tier).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.by_tier.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResolutionTier, usize)> + '_ {
        self.by_tier.iter().map(|(tier, count)| (*tier, *count))
    }
}

/// Resolves gene symbols to categories through caches, naming patterns and
/// an external annotation lookup.
///
/// Newly resolved symbols are recorded in the store, so a symbol reaches the
/// lookup at most once per resolver.
pub struct GeneTypeResolver<L> {
    store: GeneTypeStore,
    patterns: GenePatterns,
    lookup: L,
    stats: ResolverStats,
}

impl<L: GeneInfoLookup> GeneTypeResolver<L> {
    pub fn new(store: GeneTypeStore, lookup: L) -> Result<Self> {
        Ok(Self {
            store,
            patterns: GenePatterns::new()?,
            lookup,
            stats: ResolverStats::default(),
        })
    }

    pub async fn resolve(&mut self, symbol: &str) -> GeneCategory {
        self.resolve_with_tier(symbol).await.0
    }

    /// Resolve `symbol` and report which tier answered
    pub async fn resolve_with_tier(&mut self, symbol: &str) -> (GeneCategory, ResolutionTier) {
        let mut resolved = None;
        for tier in CASCADE {
            if let Some(category) = self.try_tier(tier, symbol).await {
                resolved = Some((category, tier));
                break;
            }
        }
        let (category, tier) = resolved.unwrap_or((GeneCategory::Other, ResolutionTier::Default));

        if !tier.is_cache() {
            self.store.record(symbol, category);
        }
        self.stats.record(tier);
        trace!(symbol, %category, %tier, "Resolved gene type");

        (category, tier)
    }

    async fn try_tier(&self, tier: ResolutionTier, symbol: &str) -> Option<GeneCategory> {
        match tier {
            ResolutionTier::PersistentCache => self.store.lookup_persistent(symbol),
            ResolutionTier::SessionCache => self.store.lookup_session(symbol),
            ResolutionTier::KnownPattern => self.patterns.known_ncrna(symbol),
            ResolutionTier::GeneInfo => self.query_gene_info(symbol).await,
            ResolutionTier::FallbackPattern => self.patterns.fallback_ncrna(symbol),
            ResolutionTier::Default => None,
        }
    }

    /// Primary `type_of_gene` of every hit first, then the Ensembl ones
    async fn query_gene_info(&self, symbol: &str) -> Option<GeneCategory> {
        let hits = match self.lookup.query(symbol).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(symbol, error = %e, "Gene info lookup failed");
                return None;
            },
        };

        let category = hits
            .iter()
            .filter_map(|hit| hit.primary_type())
            .find_map(|t| self.patterns.map_type_of_gene(t))
            .or_else(|| {
                hits.iter()
                    .flat_map(|hit| hit.secondary_types())
                    .find_map(|t| self.patterns.map_type_of_gene(t))
            });

        if category.is_none() {
            debug!(symbol, hits = hits.len(), "No usable type_of_gene in lookup hits");
        }
        category
    }

    pub fn store(&self) -> &GeneTypeStore {
        &self.store
    }

    pub fn into_store(self) -> GeneTypeStore {
        self.store
    }

    pub fn stats(&self) -> &ResolverStats {
        &self.stats
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use crate::gene_types::cache::GeneTypeCache;
    use crate::gene_types::mygene::{EnsemblInfo, GeneHit, OneOrMany};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Canned lookup that counts every query
    #[derive(Default)]
    struct FakeLookup {
        answers: HashMap<String, Vec<GeneHit>>,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl FakeLookup {
        fn with(mut self, symbol: &str, hits: Vec<GeneHit>) -> Self {
            self.answers.insert(symbol.to_string(), hits);
            self
        }
    }

    #[async_trait]
    impl GeneInfoLookup for FakeLookup {
        async fn query(&self, symbol: &str) -> Result<Vec<GeneHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(IngestError::Publish("lookup unavailable".to_string()));
            }
            Ok(self.answers.get(symbol).cloned().unwrap_or_default())
        }
    }

    fn primary(type_of_gene: &str) -> GeneHit {
        GeneHit {
            type_of_gene: Some(type_of_gene.to_string()),
            ensembl: None,
        }
    }

    fn ensembl(types: &[&str]) -> GeneHit {
        GeneHit {
            type_of_gene: None,
            ensembl: Some(OneOrMany::Many(
                types
                    .iter()
                    .map(|t| EnsemblInfo {
                        type_of_gene: Some(t.to_string()),
                    })
                    .collect(),
            )),
        }
    }

    fn resolver(
        cache: GeneTypeCache,
        persist_updates: bool,
        lookup: FakeLookup,
    ) -> (GeneTypeResolver<FakeLookup>, Arc<AtomicUsize>) {
        let calls = lookup.calls.clone();
        let resolver =
            GeneTypeResolver::new(GeneTypeStore::new(cache, persist_updates), lookup).unwrap();
        (resolver, calls)
    }

    #[tokio::test]
    async fn test_cached_symbol_skips_lookup() {
        let mut cache = GeneTypeCache::new();
        cache.insert("TP53", GeneCategory::ProteinCoding);
        let (mut resolver, calls) = resolver(cache, true, FakeLookup::default());

        let (category, tier) = resolver.resolve_with_tier("TP53").await;
        assert_eq!(category, GeneCategory::ProteinCoding);
        assert_eq!(tier, ResolutionTier::PersistentCache);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_session_cache_serves_repeat_lookups() {
        let lookup = FakeLookup::default().with("A1BG", vec![primary("protein-coding")]);
        let (mut resolver, calls) = resolver(GeneTypeCache::new(), false, lookup);

        assert_eq!(
            resolver.resolve_with_tier("A1BG").await,
            (GeneCategory::ProteinCoding, ResolutionTier::GeneInfo)
        );
        assert_eq!(resolver.store().session().get("A1BG"), Some(GeneCategory::ProteinCoding));
        assert!(resolver.store().persistent().is_empty());

        assert_eq!(
            resolver.resolve_with_tier("A1BG").await,
            (GeneCategory::ProteinCoding, ResolutionTier::SessionCache)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_persist_updates_writes_persistent_cache() {
        let lookup = FakeLookup::default().with("A1BG", vec![primary("protein-coding")]);
        let (mut resolver, calls) = resolver(GeneTypeCache::new(), true, lookup);

        resolver.resolve("A1BG").await;
        assert_eq!(resolver.resolve_with_tier("A1BG").await.1, ResolutionTier::PersistentCache);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let store = resolver.into_store();
        assert_eq!(store.persistent().get("A1BG"), Some(GeneCategory::ProteinCoding));
        assert!(store.session().is_empty());
    }

    #[tokio::test]
    async fn test_known_pattern_skips_lookup() {
        let (mut resolver, calls) = resolver(GeneTypeCache::new(), true, FakeLookup::default());

        let (category, tier) = resolver.resolve_with_tier("LINC00649").await;
        assert_eq!(category, GeneCategory::NcRna);
        assert_eq!(tier, ResolutionTier::KnownPattern);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(resolver.store().persistent().get("LINC00649"), Some(GeneCategory::NcRna));
    }

    #[tokio::test]
    async fn test_primary_types_win_over_ensembl_types() {
        let lookup = FakeLookup::default().with(
            "MIXED",
            vec![ensembl(&["lncRNA"]), primary("biological-region"), primary("pseudo")],
        );
        let (mut resolver, _) = resolver(GeneTypeCache::new(), false, lookup);
        assert_eq!(resolver.resolve("MIXED").await, GeneCategory::Other);
    }

    #[tokio::test]
    async fn test_ensembl_types_used_when_primary_unmapped() {
        let lookup = FakeLookup::default().with(
            "ENSONLY",
            vec![primary("biological-region"), ensembl(&["weird", "snoRNA"])],
        );
        let (mut resolver, _) = resolver(GeneTypeCache::new(), false, lookup);
        assert_eq!(resolver.resolve("ENSONLY").await, GeneCategory::NcRna);
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_through() {
        let lookup = FakeLookup {
            fail: true,
            ..FakeLookup::default()
        };
        let (mut resolver, calls) = resolver(GeneTypeCache::new(), false, lookup);

        assert_eq!(
            resolver.resolve_with_tier("SNORD3A").await,
            (GeneCategory::NcRna, ResolutionTier::FallbackPattern)
        );
        assert_eq!(
            resolver.resolve_with_tier("BRCA1").await,
            (GeneCategory::Other, ResolutionTier::Default)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(resolver.store().session().get("BRCA1"), Some(GeneCategory::Other));
    }

    #[tokio::test]
    async fn test_stats_count_each_tier() {
        let lookup = FakeLookup::default().with("A1BG", vec![primary("protein_coding")]);
        let (mut resolver, _) = resolver(GeneTypeCache::new(), false, lookup);

        for symbol in ["A1BG", "A1BG", "LOC105378948", "BRCA1"] {
            resolver.resolve(symbol).await;
        }

        let stats = resolver.stats();
        assert_eq!(stats.total(), 4);
        assert_eq!(stats.count(ResolutionTier::GeneInfo), 1);
        assert_eq!(stats.count(ResolutionTier::SessionCache), 1);
        assert_eq!(stats.count(ResolutionTier::KnownPattern), 1);
        assert_eq!(stats.count(ResolutionTier::Default), 1);
        assert_eq!(stats.count(ResolutionTier::PersistentCache), 0);
    }
}
