//! GHL CLI - Main entry point

use clap::Parser;
use ghl_cli::{Cli, Commands};
use ghl_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

/// Exit status of a failed run, matching the per-file failure status
const FAILURE_EXIT_CODE: i32 = 2;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Handle markdown help generation
    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    let Some(ref command) = cli.command else {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(FAILURE_EXIT_CODE);
    };

    let log_config = LogConfig::builder()
        .level(LogLevel::from_verbosity(cli.verbose))
        .output(LogOutput::Console)
        .log_file_prefix("ghl")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().with_env_overrides().unwrap_or(log_config);

    // The guard flushes file logs on drop; logging is optional
    let guard = init_logging(&log_config).ok().flatten();

    let code = match execute_command(&cli, command).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            FAILURE_EXIT_CODE
        },
    };

    if code != 0 {
        drop(guard);
        process::exit(code);
    }
}

/// Execute the CLI command and return the process exit status
async fn execute_command(cli: &Cli, command: &Commands) -> ghl_cli::Result<i32> {
    match command {
        Commands::Load(args) => {
            let summary =
                ghl_cli::commands::load::run(cli.conf.as_deref(), &cli.profile, args).await?;
            Ok(summary.exit_code())
        },
        Commands::Reformat(args) => {
            ghl_cli::commands::reformat::run(args).await?;
            Ok(0)
        },
        Commands::GeneType(args) => {
            ghl_cli::commands::gene_type::run(args).await?;
            Ok(0)
        },
    }
}
