//! List checks command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use theme_check_checks::builtin_registry;
use theme_check_core::config::resolver;
use theme_check_core::Config;

/// Runs the list-checks command.
///
/// Custom checks required by the theme's settings file are listed too.
pub fn run(path: &Path, config_path: Option<&Path>) -> Result<()> {
    let source = resolver::resolve(path, config_path);
    let registry = builtin_registry().context("Failed to load built-in checks")?;
    let config = Config::from_source(path, source, registry)
        .with_context(|| format!("Failed to load settings for {}", path.display()))?;

    println!("Available checks:\n");
    println!(
        "{:<25} {:<12} {:<11} {:<8} Description",
        "Name", "Category", "Severity", "Enabled"
    );
    println!("{}", "-".repeat(90));

    for check in config.registry().all_checks() {
        let name = check.name();
        let category = config.category(name).unwrap_or_else(|| check.category());
        let severity = config
            .severity_override(name)
            .unwrap_or_else(|| check.default_severity());
        let enabled = if config.is_enabled(name) { "yes" } else { "no" };
        let fixable = if check.can_correct() { " (correctable)" } else { "" };

        println!(
            "{:<25} {:<12} {:<11} {:<8} {}{}",
            name,
            category,
            severity,
            enabled,
            check.description(),
            fixable
        );
    }

    println!("\nConfigure checks in .theme-check.yml, e.g.:");
    println!("  TemplateLength:");
    println!("    max_length: 300");
    Ok(())
}
