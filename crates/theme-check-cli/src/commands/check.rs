//! Check command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use theme_check_checks::builtin_registry;
use theme_check_core::config::resolver;
use theme_check_core::{Analyzer, Category, Config, Severity};

use crate::OutputFormat;

/// Options of the check command.
pub struct CheckOptions {
    /// Theme directory or file to start settings discovery from.
    pub path: PathBuf,
    /// Explicit settings file.
    pub config: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Only run checks of these categories.
    pub categories: Vec<Category>,
    /// Skip checks of these categories.
    pub exclude_categories: Vec<Category>,
    /// Fix correctable offenses in place.
    pub auto_correct: bool,
    /// Minimum severity that fails the run.
    pub fail_level: Severity,
}

/// Runs the check command.
pub fn run(options: &CheckOptions) -> Result<()> {
    let config = load_config(options)?;

    let mut analyzer = Analyzer::builder()
        .config(config)
        .auto_correct(options.auto_correct)
        .build()
        .context("Failed to load theme")?;

    tracing::info!(
        "Checking {} with {} checks",
        analyzer.theme().root().display(),
        analyzer.checks().len()
    );

    analyzer.analyze_theme();

    if options.auto_correct {
        let summary = analyzer
            .correct_offenses()
            .context("Failed to write corrections")?;
        if summary.skipped > 0 {
            tracing::warn!(
                "{} overlapping corrections were skipped; run again to apply them",
                summary.skipped
            );
        }
        eprintln!(
            "Corrected {} offense(s) in {} file(s)",
            summary.applied, summary.files_written
        );

        // Report what is left after the fixes.
        analyzer = Analyzer::builder()
            .config(load_config(options)?)
            .build()
            .context("Failed to reload theme")?;
        analyzer.analyze_theme();
    }

    let report = analyzer.report();
    super::output::print(&report, analyzer.theme(), options.format, options.fail_level)?;

    if report.has_offenses_at(options.fail_level) {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(options: &CheckOptions) -> Result<Config> {
    let source = resolver::resolve(&options.path, options.config.as_deref());
    let registry = builtin_registry().context("Failed to load built-in checks")?;
    let mut config = Config::from_source(&options.path, source, registry)
        .with_context(|| format!("Failed to load settings for {}", options.path.display()))?;

    if let Some(path) = config.source().path() {
        tracing::info!("Using settings file: {}", path.display());
    }
    config.set_only_categories(options.categories.clone());
    config.set_exclude_categories(options.exclude_categories.clone());
    Ok(config)
}
