//! `ghl gene-type` command implementation
//!
//! Resolves gene symbols the way a load would and prints the category and
//! the tier that decided it.

use crate::commands::{open_resolver, save_resolver};
use crate::error::Result;
use crate::GeneTypeArgs;
use colored::Colorize;
use std::path::Path;

pub async fn run(args: &GeneTypeArgs) -> Result<()> {
    let (mut resolver, cache_path) = open_resolver(&args.gene_types, Path::new("."))?;

    for symbol in &args.symbols {
        let (category, tier) = resolver.resolve_with_tier(symbol).await;
        println!("{}\t{}\t{}", symbol.green(), category, tier.to_string().dimmed());
    }

    save_resolver(&resolver, &cache_path);
    Ok(())
}
