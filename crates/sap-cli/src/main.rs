use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sap_cli::load::load_config;
use sap_cli::tracing_init::init_tracing;
use sap_cli::{cmd_check, cmd_order};
use sap_config::ReportFormat;

#[derive(Parser)]
#[command(name = "sapc", about = "Semantic checker for Statistical Analysis Plan programs")]
struct Cli {
    /// Path to sap.toml (defaults to ./sap.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a parsed program and print the report
    Check {
        /// Program document (JSON)
        file: PathBuf,
        /// Report format: text, json or markdown
        #[arg(short, long)]
        format: Option<ReportFormat>,
        /// Maximum number of issues to list
        #[arg(long)]
        max_issues: Option<usize>,
    },
    /// Print the execution order of a pipeline's stages
    Order {
        /// Program document (JSON)
        file: PathBuf,
        /// Pipeline name
        pipeline: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let _guard = init_tracing(&config.logging)?;

    match cli.command {
        Commands::Check {
            file,
            format,
            max_issues,
        } => {
            tracing::debug!(domain = "cli", file = %file.display(), "check");
            if !cmd_check::run(&file, config, format, max_issues)? {
                process::exit(1);
            }
        }
        Commands::Order { file, pipeline } => {
            tracing::debug!(domain = "cli", file = %file.display(), pipeline = %pipeline, "order");
            cmd_order::run(&file, &pipeline)?;
        }
    }

    Ok(())
}
