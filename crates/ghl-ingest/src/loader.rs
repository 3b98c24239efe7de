//! Run orchestration: data directory → styled networks on NDEx
//!
//! A run resolves its load plan, network attributes, style template and gene
//! type caches once, then walks the data directory in sorted order. Every file
//! goes through the same pipeline:
//!
//! ```text
//! [spreadsheet → _intermediary_<name>.csv]
//!     → reformat       → _result_<name>.csv
//!     → assemble       → attributes + style
//!     → serialize      → _result_<name>.cx
//!     → publish        → create or update on NDEx
//! ```
//!
//! A failing file is recorded and the run moves on to the next one.

use crate::error::{IngestError, Result};
use crate::gene_types::{
    GeneInfoLookup, GeneTypeCache, GeneTypeResolver, GeneTypeStore, MyGeneClient, ResolverStats,
    DEFAULT_MYGENE_URL,
};
use crate::network::{CxNetwork, LoadPlan, NetworkAssembler, NetworkAttributes};
use crate::publish::{NdexClient, NdexCredentials, PublishOutcome, Publisher};
use crate::reformat::{delimiter_for, ReformatOptions, RowReformatter};
use crate::resources;
use crate::spreadsheet;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

// ============================================================================
// File Naming
// ============================================================================

pub const RESULT_PREFIX: &str = "_result_";
pub const INTERMEDIARY_PREFIX: &str = "_intermediary_";
pub const GENE_TYPES_PREFIX: &str = "_genetypes_";

/// Session cache dump written with `no_cleanup` when the persistent cache is read-only
pub const SESSION_GENE_TYPES_FILE: &str = "_genetypes_session.json";

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "genehancer_data";

/// Template network whose style is copied onto every generated network
#[derive(Debug, Clone)]
pub struct StyleTemplate {
    pub credentials: NdexCredentials,
    pub uuid: String,
}

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub data_dir: PathBuf,
    pub credentials: NdexCredentials,
    /// Update this network instead of creating or matching by name
    pub update_uuid: Option<String>,
    /// Value of the `version` network attribute
    pub version: Option<String>,
    pub load_plan: Option<PathBuf>,
    pub style_file: Option<PathBuf>,
    pub style_template: Option<StyleTemplate>,
    /// Read-only gene types file; new genes then go to the session cache
    pub gene_types: Option<PathBuf>,
    /// Gene types cache that grows across runs
    pub default_gene_types: PathBuf,
    pub network_attributes: Option<PathBuf>,
    /// Overrides the per-file delimiter
    pub delimiter: Option<u8>,
    pub no_header: bool,
    pub no_cleanup: bool,
    pub mygene_url: String,
    /// Substituted into `prov:wasGeneratedBy`
    pub loader_version: String,
}

impl LoaderConfig {
    pub fn new(data_dir: impl Into<PathBuf>, credentials: NdexCredentials) -> Self {
        let data_dir = data_dir.into();
        let default_gene_types = resources::default_gene_types_path(&data_dir);
        Self {
            data_dir,
            credentials,
            update_uuid: None,
            version: None,
            load_plan: None,
            style_file: None,
            style_template: None,
            gene_types: None,
            default_gene_types,
            network_attributes: None,
            delimiter: None,
            no_header: false,
            no_cleanup: false,
            mygene_url: DEFAULT_MYGENE_URL.to_string(),
            loader_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn path_for(&self, prefix: &str, name: &str, extension: &str) -> PathBuf {
        self.data_dir.join(format!("{}{}.{}", prefix, name, extension))
    }
}

/// A file that made it onto NDEx
#[derive(Debug, Clone)]
pub struct FileReport {
    pub file: String,
    pub network: String,
    pub outcome: PublishOutcome,
    pub edges: usize,
}

/// A file that did not
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub processed: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
    pub stats: ResolverStats,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// 0 when every file was published, 2 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            2
        }
    }
}

/// Run the loader against MyGene.info
pub async fn run(config: LoaderConfig) -> Result<RunSummary> {
    let lookup = MyGeneClient::new(config.mygene_url.as_str())?;
    run_with_lookup(config, lookup).await
}

/// Run the loader with a caller-supplied gene annotation source
pub async fn run_with_lookup<L: GeneInfoLookup>(config: LoaderConfig, lookup: L) -> Result<RunSummary> {
    if !config.data_dir.is_dir() {
        return Err(IngestError::DataDirNotFound(config.data_dir.clone()));
    }
    let files = candidate_files(&config.data_dir)?;
    if files.is_empty() {
        return Err(IngestError::NoInputFiles(config.data_dir.clone()));
    }
    info!(data_dir = %config.data_dir.display(), files = files.len(), "Starting GeneHancer load");

    let client = NdexClient::new(&config.credentials)?;
    let load_plan = resolve_load_plan(&config)?;
    let attributes = resolve_network_attributes(&config, &client).await?;
    let style = resolve_style(&config, &client).await?;
    let (store, cache_path) =
        open_gene_types(config.gene_types.as_deref(), &config.default_gene_types)?;
    let resolver = GeneTypeResolver::new(store, lookup)?;

    let mut run = Run {
        config: &config,
        assembler: NetworkAssembler::new(load_plan),
        attributes,
        style,
        resolver,
        publisher: Publisher::new(client),
    };

    let mut summary = RunSummary::default();
    for path in &files {
        let file = display_name(path);
        info!(file = %file, "Processing file");
        match run.process_file(path, &file).await {
            Ok(report) => summary.processed.push(report),
            Err(e) => {
                error!(file = %file, error = %e, "Failed to load file");
                summary.failures.push(FileFailure {
                    file,
                    error: e.to_string(),
                });
            },
        }
    }

    let store = run.resolver.store();
    if store.persist_updates() {
        if let Err(e) = store.persistent().save(&cache_path) {
            warn!(path = %cache_path.display(), error = %e, "Could not save gene types");
        }
    } else if config.no_cleanup {
        let session_path = config.data_dir.join(SESSION_GENE_TYPES_FILE);
        if let Err(e) = store.session().save(&session_path) {
            warn!(path = %session_path.display(), error = %e, "Could not save session gene types");
        }
    }

    summary.stats = run.resolver.stats().clone();
    log_summary(&summary);
    Ok(summary)
}

struct Run<'c, L> {
    config: &'c LoaderConfig,
    assembler: NetworkAssembler,
    attributes: NetworkAttributes,
    style: CxNetwork,
    resolver: GeneTypeResolver<L>,
    publisher: Publisher,
}

impl<L: GeneInfoLookup> Run<'_, L> {
    async fn process_file(&mut self, path: &Path, file: &str) -> Result<FileReport> {
        let config = self.config;
        let name = base_name(file);

        let (input, intermediary, delimiter) = if spreadsheet::is_spreadsheet(path) {
            let csv_path = config.path_for(INTERMEDIARY_PREFIX, &name, "csv");
            spreadsheet::convert_to_csv(path, &csv_path)?;
            (csv_path.clone(), Some(csv_path), b',')
        } else {
            let delimiter = config.delimiter.unwrap_or_else(|| delimiter_for(path));
            (path.to_path_buf(), None, delimiter)
        };

        let result_csv = config.path_for(RESULT_PREFIX, &name, "csv");
        let reformatter = RowReformatter::new(ReformatOptions {
            delimiter,
            no_header: config.no_header,
        })?;
        let reformatted = reformatter
            .reformat_file(&input, &result_csv, &mut self.resolver)
            .await?;

        info!(file, "Generating network");
        let mut network = self.assembler.assemble_file(&result_csv)?;
        let network_name = self
            .attributes
            .apply_to(&mut network, &name, &config.loader_version);
        if !network.apply_style_from(&self.style) {
            warn!(file, "Style template has no visual properties");
        }

        let cx_path = config.path_for(RESULT_PREFIX, &name, "cx");
        network.save(&cx_path)?;
        let cx = std::fs::read(&cx_path)?;

        let outcome = self
            .publisher
            .publish(&network_name, cx, config.update_uuid.as_deref())
            .await?;

        if !config.no_cleanup {
            let outputs = intermediary.iter().chain([&result_csv, &cx_path]);
            for output in outputs {
                if let Err(e) = std::fs::remove_file(output) {
                    warn!(path = %output.display(), error = %e, "Could not remove intermediate file");
                }
            }
        }

        Ok(FileReport {
            file: file.to_string(),
            network: network_name,
            outcome,
            edges: reformatted.edges,
        })
    }
}

/// Input files of a data directory in sorted order, skipping loader outputs
/// and hidden files. Symlinks to files count as files.
pub fn candidate_files(data_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(data_dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_loader_output(&name) {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}

fn is_loader_output(file_name: &str) -> bool {
    [RESULT_PREFIX, INTERMEDIARY_PREFIX, GENE_TYPES_PREFIX, "."]
        .iter()
        .any(|prefix| file_name.starts_with(prefix))
}

/// File name without its last extension (`a.b.csv` → `a.b`)
pub fn base_name(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file_name.to_string(),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn resolve_load_plan(config: &LoaderConfig) -> Result<LoadPlan> {
    if let Some(path) = &config.load_plan {
        match LoadPlan::load(path) {
            Ok(plan) => return Ok(plan),
            Err(e) => warn!(path = %path.display(), error = %e, "Could not load load plan, using default"),
        }
    }
    resources::default_load_plan()
}

/// Attributes file, else the attributes of the network being updated, else
/// the bundled set; `version` is applied last
async fn resolve_network_attributes(
    config: &LoaderConfig,
    client: &NdexClient,
) -> Result<NetworkAttributes> {
    let loaded = if let Some(path) = &config.network_attributes {
        NetworkAttributes::load(path)
            .map_err(|e| warn!(path = %path.display(), error = %e, "Could not load network attributes, using default"))
            .ok()
    } else if let Some(uuid) = &config.update_uuid {
        client
            .get_network(uuid)
            .await
            .map(|network| NetworkAttributes::from_network(&network))
            .map_err(|e| warn!(%uuid, error = %e, "Could not fetch network attributes, using default"))
            .ok()
    } else {
        None
    };

    let mut attributes = match loaded {
        Some(attributes) => attributes,
        None => resources::default_network_attributes()?,
    };
    if let Some(version) = &config.version {
        attributes.set_version(version);
    }
    Ok(attributes)
}

/// Style file, else the configured template network, else the network being
/// updated, else the bundled style
async fn resolve_style(config: &LoaderConfig, client: &NdexClient) -> Result<CxNetwork> {
    let loaded = if let Some(path) = &config.style_file {
        CxNetwork::load(path)
            .map_err(|e| warn!(path = %path.display(), error = %e, "Could not load style file, using default"))
            .ok()
    } else if let Some(template) = &config.style_template {
        let fetched = match NdexClient::new(&template.credentials) {
            Ok(style_client) => style_client.get_network(&template.uuid).await,
            Err(e) => Err(e),
        };
        fetched
            .map_err(|e| warn!(uuid = %template.uuid, error = %e, "Could not fetch style network, using default"))
            .ok()
    } else if let Some(uuid) = &config.update_uuid {
        client
            .get_network(uuid)
            .await
            .map_err(|e| warn!(%uuid, error = %e, "Could not fetch style network, using default"))
            .ok()
    } else {
        None
    };

    match loaded {
        Some(style) => Ok(style),
        None => resources::default_style(),
    }
}

/// Caches for a run and the file the persistent cache is saved to.
///
/// A readable `explicit` file is used read-only; otherwise the default cache
/// is seeded if needed, loaded, and grows with the run.
pub fn open_gene_types(explicit: Option<&Path>, default_path: &Path) -> Result<(GeneTypeStore, PathBuf)> {
    if let Some(path) = explicit {
        match GeneTypeCache::load(path) {
            Ok(cache) => return Ok((GeneTypeStore::new(cache, false), path.to_path_buf())),
            Err(e) => warn!(path = %path.display(), error = %e, "Could not load gene types, using default"),
        }
    }

    if let Err(e) = resources::seed_default_gene_types(default_path) {
        warn!(path = %default_path.display(), error = %e, "Could not seed default gene types");
    }
    let cache = match GeneTypeCache::load(default_path) {
        Ok(cache) => cache,
        Err(e) => {
            warn!(path = %default_path.display(), error = %e, "Could not load default gene types, using bundled copy");
            resources::default_gene_types()?
        },
    };
    Ok((GeneTypeStore::new(cache, true), default_path.to_path_buf()))
}

fn log_summary(summary: &RunSummary) {
    for report in &summary.processed {
        info!(
            file = %report.file,
            network = %report.network,
            uuid = report.outcome.uuid(),
            edges = report.edges,
            "Loaded"
        );
    }
    for failure in &summary.failures {
        error!(file = %failure.file, error = %failure.error, "Not loaded");
    }
    for (tier, count) in summary.stats.iter() {
        info!(%tier, count, "Gene types resolved");
    }
    info!(
        processed = summary.processed.len(),
        failed = summary.failures.len(),
        "GeneHancer load finished"
    );
}
