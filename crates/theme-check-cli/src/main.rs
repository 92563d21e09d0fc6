//! theme-check CLI tool.
//!
//! Usage:
//! ```bash
//! theme-check check [OPTIONS] [PATH]
//! theme-check list-checks
//! theme-check init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use theme_check_core::{Category, Severity};
use tracing_subscriber::EnvFilter;

mod commands;

/// Linter for Liquid themes
#[derive(Parser)]
#[command(name = "theme-check")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a settings file (skips .theme-check.yml discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a theme
    Check {
        /// Theme directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run checks of this category (can be specified multiple times)
        #[arg(long = "category")]
        categories: Vec<Category>,

        /// Skip checks of this category (can be specified multiple times)
        #[arg(long = "exclude-category")]
        exclude_categories: Vec<Category>,

        /// Fix correctable offenses in place
        #[arg(short, long)]
        auto_correct: bool,

        /// Minimum severity that makes the command fail
        #[arg(long, default_value = "error")]
        fail_level: Severity,
    },

    /// List available checks
    ListChecks {
        /// Theme directory whose settings are shown
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Create a .theme-check.yml
    Init {
        /// Directory to write the settings file to
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-offense compact format.
    Compact,
    /// Annotated source snippets.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            categories,
            exclude_categories,
            auto_correct,
            fail_level,
        } => commands::check::run(&commands::check::CheckOptions {
            path,
            config: cli.config,
            format,
            categories,
            exclude_categories,
            auto_correct,
            fail_level,
        }),
        Commands::ListChecks { path } => commands::list_checks::run(&path, cli.config.as_deref()),
        Commands::Init { path, force } => commands::init::run(&path, force),
    }
}
