//! `ghl load` command implementation
//!
//! Loads every GeneHancer file of the data directory into NDEx.

use crate::config::{default_config_path, CredentialsFile};
use crate::error::Result;
use crate::LoadArgs;
use colored::Colorize;
use ghl_ingest::loader::{self, LoaderConfig, RunSummary};
use ghl_ingest::publish::PublishOutcome;
use std::path::Path;
use tracing::debug;

/// Run a load and return its summary; per-file failures are in the summary
pub async fn run(conf: Option<&Path>, profile: &str, args: &LoadArgs) -> Result<RunSummary> {
    let conf_path = conf.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    let credentials_file = CredentialsFile::load(&conf_path)?;
    let credentials = credentials_file.credentials(profile, &conf_path)?;
    debug!(?credentials, "Using NDEx credentials");

    let style_template = match (&args.stylefile, &args.styleprofile) {
        (None, Some(style_profile)) => credentials_file.style_template(style_profile, &credentials),
        _ => None,
    };

    let mut config = LoaderConfig::new(&args.datadir, credentials);
    config.update_uuid = args.updateuuid.clone();
    config.version = args.versionnumber.clone();
    config.load_plan = args.loadplan.clone();
    config.style_file = args.stylefile.clone();
    config.style_template = style_template;
    config.gene_types = args.gene_types.genetypes.clone();
    config.network_attributes = args.networkattributes.clone();
    config.delimiter = args.input.delimiter;
    config.no_header = args.input.noheader;
    config.no_cleanup = args.nocleanup;
    config.mygene_url = args.gene_types.mygene_url.clone();

    let summary = loader::run(config).await?;
    print_summary(&summary);
    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    for report in &summary.processed {
        let action = match report.outcome {
            PublishOutcome::Created { .. } => "created",
            PublishOutcome::Updated { .. } => "updated",
        };
        println!(
            "{} {} → \"{}\" {} ({})",
            "✓".green(),
            report.file,
            report.network,
            action,
            report.outcome.uuid()
        );
    }
    for failure in &summary.failures {
        println!("{} {}: {}", "✗".red(), failure.file, failure.error);
    }
}
