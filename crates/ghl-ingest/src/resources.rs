//! Resources compiled into the loader
//!
//! Each default is used when the matching command-line file is absent or
//! unreadable.

use crate::error::Result;
use crate::gene_types::GeneTypeCache;
use crate::network::{CxNetwork, LoadPlan, NetworkAttributes};
use std::path::{Path, PathBuf};
use tracing::info;

const LOAD_PLAN_JSON: &str = include_str!("../resources/loadplan.json");
const STYLE_CX: &str = include_str!("../resources/style.cx");
const NETWORK_ATTRIBUTES_JSON: &str = include_str!("../resources/networkattributes.json");
const GENE_TYPES_JSON: &str = include_str!("../resources/genetypes.json");

/// Directory under the user data dir holding the growing gene types cache
const APP_DIR: &str = "ghl";
const GENE_TYPES_FILE: &str = "genetypes.json";
/// Used inside the data directory when the platform has no user data dir
const LOCAL_GENE_TYPES_FILE: &str = "_genetypes_default.json";

pub fn default_load_plan() -> Result<LoadPlan> {
    LoadPlan::from_json_str(LOAD_PLAN_JSON)
}

pub fn default_style() -> Result<CxNetwork> {
    CxNetwork::from_json_str(STYLE_CX)
}

pub fn default_network_attributes() -> Result<NetworkAttributes> {
    NetworkAttributes::from_json_str(NETWORK_ATTRIBUTES_JSON)
}

pub fn default_gene_types() -> Result<GeneTypeCache> {
    GeneTypeCache::from_json_str(GENE_TYPES_JSON)
}

/// Location of the default gene types cache
pub fn default_gene_types_path(data_dir: &Path) -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR).join(GENE_TYPES_FILE))
        .unwrap_or_else(|| data_dir.join(LOCAL_GENE_TYPES_FILE))
}

/// Write the bundled gene types to `path` unless a file already exists there
pub fn seed_default_gene_types(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    default_gene_types()?.save(path)?;
    info!(path = %path.display(), "Seeded default gene types");
    Ok(())
}
