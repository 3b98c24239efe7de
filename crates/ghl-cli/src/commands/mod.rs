//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod gene_type;
pub mod load;
pub mod reformat;

use crate::error::Result;
use crate::GeneTypeOptions;
use ghl_ingest::gene_types::{GeneTypeResolver, MyGeneClient};
use ghl_ingest::loader::open_gene_types;
use ghl_ingest::resources::default_gene_types_path;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Resolver for commands that work outside a full load, plus the cache file
/// to save on exit
pub(crate) fn open_resolver(
    options: &GeneTypeOptions,
    data_dir: &Path,
) -> Result<(GeneTypeResolver<MyGeneClient>, PathBuf)> {
    let (store, cache_path) = open_gene_types(options.genetypes.as_deref(), &default_gene_types_path(data_dir))?;
    let lookup = MyGeneClient::new(options.mygene_url.as_str())?;
    Ok((GeneTypeResolver::new(store, lookup)?, cache_path))
}

/// Save the persistent cache when this run was allowed to grow it
pub(crate) fn save_resolver(resolver: &GeneTypeResolver<MyGeneClient>, cache_path: &Path) {
    let store = resolver.store();
    if store.persist_updates() {
        if let Err(e) = store.persistent().save(cache_path) {
            warn!(path = %cache_path.display(), error = %e, "Could not save gene types");
        }
    }
}
