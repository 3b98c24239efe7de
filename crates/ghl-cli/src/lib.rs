//! GHL CLI Library
//!
//! Command-line interface for loading GeneHancer data into NDEx.
//!
//! - **Load**: reformat, assemble and publish every file of a data directory (`ghl load`)
//! - **Reformat**: produce the canonical enhancer/gene table for one file (`ghl reformat`)
//! - **Gene types**: show how gene symbols are categorized (`ghl gene-type`)

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod commands;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use error::{CliError, Result};

use clap::{Args, Parser, Subcommand};
use ghl_ingest::gene_types::DEFAULT_MYGENE_URL;
use ghl_ingest::loader::DEFAULT_DATA_DIR;
use std::path::PathBuf;

/// GHL - GeneHancer to NDEx loader
#[derive(Parser, Debug)]
#[command(name = "ghl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase log verbosity (-v ERROR, -vv WARN, -vvv INFO, -vvvv DEBUG, -vvvvv TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Credentials file (default ~/.ndexutils.conf)
    #[arg(long, env = "GHL_CONF", global = true)]
    pub conf: Option<PathBuf>,

    /// Profile in the credentials file holding NDEx credentials
    #[arg(long, default_value = config::DEFAULT_PROFILE, global = true)]
    pub profile: String,

    /// Print the CLI reference as markdown and exit
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load every GeneHancer file of a data directory into NDEx
    Load(LoadArgs),

    /// Reformat one GeneHancer file into the canonical enhancer/gene table
    Reformat(ReformatArgs),

    /// Show the category of gene symbols
    GeneType(GeneTypeArgs),
}

/// Gene categorization options shared by every command
#[derive(Args, Debug, Clone)]
pub struct GeneTypeOptions {
    /// JSON file of known gene types, used read-only (default: a cache that grows across runs)
    #[arg(long)]
    pub genetypes: Option<PathBuf>,

    /// MyGene.info API base URL
    #[arg(long, env = "GHL_MYGENE_URL", default_value = DEFAULT_MYGENE_URL)]
    pub mygene_url: String,
}

/// Input table options shared by `load` and `reformat`
#[derive(Args, Debug, Clone)]
pub struct InputOptions {
    /// Delimiter of the data files (default: tab for .tsv, comma otherwise). Accepts '\t' or 'tab'
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Data files have no header; use the default GeneHancer header
    #[arg(long)]
    pub noheader: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Directory holding the GeneHancer files; outputs are written here too
    #[arg(long, env = "GHL_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub datadir: PathBuf,

    /// UUID of the network to update instead of creating one
    #[arg(long, visible_alias = "update")]
    pub updateuuid: Option<String>,

    /// Value of the network's version attribute
    #[arg(long, visible_alias = "version")]
    pub versionnumber: Option<String>,

    /// Load plan JSON (default: bundled plan)
    #[arg(long)]
    pub loadplan: Option<PathBuf>,

    /// CX file whose style is copied onto the networks (takes precedence over --styleprofile)
    #[arg(long)]
    pub stylefile: Option<PathBuf>,

    /// Profile in the credentials file naming a style template network (uuid, optional user/password/server)
    #[arg(long)]
    pub styleprofile: Option<String>,

    /// Network attributes JSON (default: bundled attributes)
    #[arg(long)]
    pub networkattributes: Option<PathBuf>,

    /// Keep intermediate files in the data directory
    #[arg(long)]
    pub nocleanup: bool,

    #[command(flatten)]
    pub input: InputOptions,

    #[command(flatten)]
    pub gene_types: GeneTypeOptions,
}

#[derive(Args, Debug, Clone)]
pub struct ReformatArgs {
    /// GeneHancer file (.csv, .tsv, .xls or .xlsx)
    pub file: PathBuf,

    /// Output table (default: _result_<name>.csv next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub input: InputOptions,

    #[command(flatten)]
    pub gene_types: GeneTypeOptions,
}

#[derive(Args, Debug, Clone)]
pub struct GeneTypeArgs {
    /// Gene symbols to categorize
    #[arg(required = true)]
    pub symbols: Vec<String>,

    #[command(flatten)]
    pub gene_types: GeneTypeOptions,
}

/// Parse a delimiter argument into a single byte
pub fn parse_delimiter(value: &str) -> std::result::Result<u8, String> {
    match value {
        "\\t" | "tab" | "\t" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!("delimiter must be a single ASCII character, got '{}'", value)),
        },
    }
}
