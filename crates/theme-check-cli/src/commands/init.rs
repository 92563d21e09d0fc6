//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;
use theme_check_core::SETTINGS_FILE_NAME;

const DEFAULT_CONFIG: &str = r"# theme-check settings
# Every check is enabled by default; entries here override the built-in
# defaults key by key.

# Directory of the theme, relative to this file
# root: dist

# Files of custom checks to load
# require:
#   - checks/no_todo.yml

# Glob patterns of files to skip
ignore:
  - node_modules/**

TemplateLength:
  enabled: true
  max_length: 200

# SpaceInsideBraces:
#   severity: suggestion

# UnknownFilter:
#   ignore_filters: [my_app_filter]

# MatchingTranslations:
#   enabled: false
";

/// Runs the init command.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(SETTINGS_FILE_NAME);

    if config_path.exists() && !force {
        bail!(
            "Settings file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {SETTINGS_FILE_NAME} to configure checks");
    println!("  2. Run: theme-check check");

    Ok(())
}
