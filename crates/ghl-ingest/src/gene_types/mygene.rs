//! MyGene.info gene annotation client

use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Default MyGene.info API root
pub const DEFAULT_MYGENE_URL: &str = "https://mygene.info/v3";

/// Default timeout for a single lookup in seconds.
/// Can be overridden via GHL_HTTP_TIMEOUT_SECS environment variable.
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 30;

/// Fields requested from the query endpoint
const QUERY_FIELDS: &str = "type_of_gene,ensembl.type_of_gene";

/// Source of `type_of_gene` annotations for a gene symbol
#[async_trait]
pub trait GeneInfoLookup: Send + Sync {
    /// All hits for `symbol`, in service order
    async fn query(&self, symbol: &str) -> Result<Vec<GeneHit>>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneQueryResponse {
    #[serde(default)]
    pub hits: Vec<GeneHit>,
}

/// One hit of a gene query
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeneHit {
    #[serde(default)]
    pub type_of_gene: Option<String>,
    #[serde(default)]
    pub ensembl: Option<OneOrMany<EnsemblInfo>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnsemblInfo {
    #[serde(default)]
    pub type_of_gene: Option<String>,
}

/// MyGene returns a bare object for a single Ensembl record and a list otherwise
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item).iter(),
            OneOrMany::Many(items) => items.iter(),
        }
    }
}

impl GeneHit {
    /// The hit's own `type_of_gene`
    pub fn primary_type(&self) -> Option<&str> {
        self.type_of_gene.as_deref()
    }

    /// `ensembl.type_of_gene` values of the hit
    pub fn secondary_types(&self) -> impl Iterator<Item = &str> {
        self.ensembl
            .iter()
            .flat_map(|ensembl| ensembl.iter())
            .filter_map(|info| info.type_of_gene.as_deref())
    }
}

/// Build the gene query URL
pub fn query_url(base_url: &str) -> String {
    format!("{}/query", base_url.trim_end_matches('/'))
}

/// HTTP client for the MyGene.info query endpoint
pub struct MyGeneClient {
    client: Client,
    base_url: String,
}

impl MyGeneClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let timeout_secs = std::env::var("GHL_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECS);

        Self::with_timeout(base_url, Duration::from_secs(timeout_secs))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl GeneInfoLookup for MyGeneClient {
    async fn query(&self, symbol: &str) -> Result<Vec<GeneHit>> {
        let url = query_url(&self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", symbol), ("fields", QUERY_FIELDS)])
            .send()
            .await?
            .error_for_status()?;

        let body: GeneQueryResponse = response.json().await?;
        Ok(body.hits)
    }
}
