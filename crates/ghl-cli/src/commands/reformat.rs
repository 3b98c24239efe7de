//! `ghl reformat` command implementation
//!
//! Writes the canonical enhancer/gene table for a single file without
//! building or publishing a network.

use crate::commands::{open_resolver, save_resolver};
use crate::error::{CliError, Result};
use crate::ReformatArgs;
use colored::Colorize;
use ghl_ingest::loader::{base_name, INTERMEDIARY_PREFIX, RESULT_PREFIX};
use ghl_ingest::reformat::{delimiter_for, ReformatOptions, RowReformatter};
use ghl_ingest::spreadsheet;
use std::path::Path;

pub async fn run(args: &ReformatArgs) -> Result<()> {
    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::invalid_argument(format!("'{}' is not a file", args.file.display())))?;
    let dir = args.file.parent().unwrap_or(Path::new("."));
    let name = base_name(&file_name);

    let (input, delimiter) = if spreadsheet::is_spreadsheet(&args.file) {
        let csv_path = dir.join(format!("{}{}.csv", INTERMEDIARY_PREFIX, name));
        spreadsheet::convert_to_csv(&args.file, &csv_path)?;
        (csv_path, b',')
    } else {
        let delimiter = args.input.delimiter.unwrap_or_else(|| delimiter_for(&args.file));
        (args.file.clone(), delimiter)
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| dir.join(format!("{}{}.csv", RESULT_PREFIX, name)));

    let (mut resolver, cache_path) = open_resolver(&args.gene_types, dir)?;
    let reformatter = RowReformatter::new(ReformatOptions {
        delimiter,
        no_header: args.input.noheader,
    })?;
    let summary = reformatter.reformat_file(&input, &output, &mut resolver).await;
    save_resolver(&resolver, &cache_path);
    let summary = summary?;

    println!(
        "{} {} rows → {} gene associations in {}",
        "✓".green(),
        summary.rows,
        summary.edges,
        output.display()
    );
    Ok(())
}
