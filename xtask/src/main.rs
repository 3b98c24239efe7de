//! Build automation tasks for GHL
//!
//! - Generating the CLI reference from the clap definitions

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for GHL", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    // Generate markdown from clap definitions
    let markdown = clap_markdown::help_markdown::<ghl_cli::Cli>();

    let content = format!(
        r#"# GHL CLI Reference

Generated from the CLI source code on {}.

## Overview

`ghl` loads GeneHancer enhancer–gene annotation files into NDEx. Each file of
the data directory is reformatted into an enhancer/gene table, turned into a
CX network carrying the configured attributes and style, and uploaded as a new
network or as an update of an existing one.

## Quick Start

```bash
# Credentials
cat > ~/.ndexutils.conf <<'CONF'
[ndexgenehancerloader]
user = "me"
password = "secret"
server = "public.ndexbio.org"
CONF

# Load every file in ./genehancer_data
ghl -vvv load --version 5.0

# Update an existing network
ghl load --updateuuid 0000-1111 --datadir ./release

# Inspect a single file without uploading
ghl reformat genehancer.tsv --output table.csv

# Check gene categories
ghl gene-type A1BG LINC00649
```

## Commands

{}

## Environment Variables

- `GHL_CONF` - Credentials file (default: `~/.ndexutils.conf`)
- `GHL_DATA_DIR` - Data directory for `ghl load` (default: `genehancer_data`)
- `GHL_MYGENE_URL` - MyGene.info API base URL
- `GHL_NDEX_USER`, `GHL_NDEX_PASSWORD`, `GHL_NDEX_SERVER` - Override profile credentials
- `GHL_HTTP_TIMEOUT_SECS` - HTTP timeout for MyGene.info and NDEx
- `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT`, `LOG_DIR`, `LOG_FILTER` - Logging overrides

## Exit Status

`0` when every file was loaded, `2` when any file failed or the run could not start.

---

*To update, run `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
