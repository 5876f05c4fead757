//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::generate::{self, GenerateArgs};
use super::output::{Output, OutputFormat};
use super::{catalog_cmd, show};
use crate::storage::Project;

#[derive(Parser)]
#[command(name = "tickets")]
#[command(author, version, about = "Generate exam tickets from a pool of tasks")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project config file (defaults to tickets.toml in this or a parent directory)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a tickets.toml with default settings
    Init {
        /// Project directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Generate tickets from the task catalog
    Generate(GenerateArgs),

    /// Print the generated tickets
    Show {
        /// Ticket file (defaults to the configured one)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Summarize the task catalog by theme and type
    Catalog {
        /// Task catalog (defaults to the configured one)
        #[arg(long)]
        tasks: Option<PathBuf>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { path } = &cli.command {
        let output = Output::new(cli.format.unwrap_or_default(), cli.verbose);
        output.verbose_ctx("init", &format!("Initializing project at: {}", path));
        let project = Project::init(path)?;
        if let Some(config_path) = project.config_path() {
            output.verbose_ctx("init", &format!("Config file: {}", config_path.display()));
        }
        output.success(&format!("Initialized ticket project at {}", project.root().display()))?;
        return Ok(());
    }

    let project = Project::discover(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(project.config().global.default_format);
    let output = Output::new(format, cli.verbose);

    output.verbose(&format!("Project root: {}", project.root().display()));
    match project.config_path() {
        Some(path) => output.verbose(&format!("Config file: {}", path.display())),
        None => output.verbose("No tickets.toml found, using defaults"),
    }

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Generate(args) => generate::run(&output, project, args)?,
        Commands::Show { output: path } => show::run(&output, &project, path)?,
        Commands::Catalog { tasks } => catalog_cmd::run(&output, &project, tasks)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
