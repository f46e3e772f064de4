//! ferrum R5 command-line tools
//!
//! Validates resource files and inspects the model metadata.

mod commands;
mod config;
mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ferrum_r5::ModelConfig;
use std::path::PathBuf;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "ferrum-r5-cli")]
#[command(author, version, about = "Validate and inspect FHIR R5 resources", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "FERRUM_R5_CONFIG")]
    config: Option<PathBuf>,

    /// Skip reference target checks
    #[arg(long, global = true)]
    no_reference_checks: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate resource files, listing every issue
    Validate {
        /// JSON resource files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the path of every element in a resource
    Paths {
        file: PathBuf,
    },
    /// Print the literal references a resource makes
    References {
        file: PathBuf,
        /// Include `#id` references to contained resources
        #[arg(long)]
        include_contained: bool,
    },
    /// Show the elements, bindings and constraints of a type (e.g. `Specimen.collection`)
    Describe {
        type_name: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if cli.no_reference_checks {
        config.model.check_reference_types = false;
    }

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;
    ModelConfig::set(config.model);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Validate { files } => commands::validate(&files, &mut out),
        Commands::Paths { file } => commands::paths(&file, &mut out),
        Commands::References {
            file,
            include_contained,
        } => commands::references(&file, include_contained, &mut out),
        Commands::Describe { type_name } => commands::describe(&type_name, &mut out),
    }
}
