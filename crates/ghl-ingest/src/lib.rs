//! GeneHancer ingestion library
//!
//! Turns GeneHancer enhancer–gene annotation files into CX networks and
//! publishes them to NDEx.
//!
//! # Pipeline
//!
//! - [`attributes`]: parses the `genehancer_id=…;connected_gene=…;score=…` cell
//! - [`identifiers`]: qualifies enhancer and gene ids with their namespace
//! - [`gene_types`]: resolves gene categories through caches, curated
//!   patterns and MyGene.info
//! - [`reformat`]: streams input rows into the canonical enhancer/gene table
//! - [`spreadsheet`]: converts Excel workbooks (`.xls`, `.xlsx`) to CSV
//! - [`network`]: builds, decorates and serializes CX networks
//! - [`publish`]: creates or updates networks on NDEx
//! - [`loader`]: runs the whole pipeline over a data directory
//!
//! # Example
//!
//! ```no_run
//! use ghl_ingest::loader::{self, LoaderConfig};
//! use ghl_ingest::publish::NdexCredentials;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let credentials = NdexCredentials {
//!         server: "public.ndexbio.org".to_string(),
//!         username: "me".to_string(),
//!         password: "secret".to_string(),
//!     };
//!     let summary = loader::run(LoaderConfig::new("genehancer_data", credentials)).await?;
//!     std::process::exit(summary.exit_code());
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod attributes;
pub mod error;
pub mod gene_types;
pub mod identifiers;
pub mod loader;
pub mod network;
pub mod publish;
pub mod reformat;
pub mod resources;
pub mod spreadsheet;

pub use error::{IngestError, Result};
