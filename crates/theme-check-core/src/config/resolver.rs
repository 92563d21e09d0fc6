//! Settings file discovery.
//!
//! Resolves the settings file using a deterministic priority order:
//!
//! 1. An explicit path (e.g. the `--config` flag)
//! 2. The nearest `.theme-check.yml`, walking up from the start path
//! 3. No settings file found → built-in defaults only

use std::path::{Path, PathBuf};

/// Recognised settings file name.
pub const SETTINGS_FILE_NAME: &str = ".theme-check.yml";

/// Where the settings were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified by the caller.
    Explicit(PathBuf),
    /// Found in the start directory or one of its ancestors.
    Discovered(PathBuf),
    /// No settings file found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Discovered(p) => Some(p),
            Self::Default => None,
        }
    }
}

/// Resolves the settings file for `start` (a file or a directory).
#[must_use]
pub fn resolve(start: &Path, explicit: Option<&Path>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    match find_settings_file(start) {
        Some(found) => ConfigSource::Discovered(found),
        None => ConfigSource::Default,
    }
}

/// Walks from `start` towards the filesystem root and returns the first
/// settings file found.
#[must_use]
pub fn find_settings_file(start: &Path) -> Option<PathBuf> {
    let start = if start.is_file() {
        start.parent().unwrap_or(start)
    } else {
        start
    };

    for dir in start.ancestors() {
        let candidate = if dir.as_os_str().is_empty() {
            PathBuf::from(SETTINGS_FILE_NAME)
        } else {
            dir.join(SETTINGS_FILE_NAME)
        };
        if candidate.is_file() {
            tracing::debug!("Found settings file: {}", candidate.display());
            return Some(candidate);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_takes_priority_over_discovered() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(SETTINGS_FILE_NAME), "").unwrap();
        let explicit = tmp.path().join("custom.yml");

        let result = resolve(tmp.path(), Some(&explicit));
        assert_eq!(result, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn explicit_does_not_check_existence() {
        let result = resolve(Path::new("/tmp"), Some(Path::new("/nonexistent.yml")));
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.yml"))
        );
    }

    #[test]
    fn finds_file_in_start_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(SETTINGS_FILE_NAME), "").unwrap();

        let result = resolve(tmp.path(), None);
        assert_eq!(
            result,
            ConfigSource::Discovered(tmp.path().join(SETTINGS_FILE_NAME))
        );
    }

    #[test]
    fn walks_up_to_parent_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(SETTINGS_FILE_NAME), "").unwrap();
        let nested = tmp.path().join("dist/templates");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            find_settings_file(&nested),
            Some(tmp.path().join(SETTINGS_FILE_NAME))
        );
    }

    #[test]
    fn nearest_file_wins() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(SETTINGS_FILE_NAME), "").unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join(SETTINGS_FILE_NAME), "").unwrap();

        assert_eq!(
            find_settings_file(&src),
            Some(src.join(SETTINGS_FILE_NAME))
        );
    }

    #[test]
    fn file_start_path_searches_its_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(SETTINGS_FILE_NAME), "").unwrap();
        let template = tmp.path().join("index.liquid");
        fs::write(&template, "").unwrap();

        assert_eq!(
            find_settings_file(&template),
            Some(tmp.path().join(SETTINGS_FILE_NAME))
        );
    }

    #[test]
    fn config_source_path() {
        assert!(ConfigSource::Default.path().is_none());
        let p = PathBuf::from("/tmp/.theme-check.yml");
        assert_eq!(ConfigSource::Explicit(p.clone()).path(), Some(p.as_path()));
        assert_eq!(ConfigSource::Discovered(p.clone()).path(), Some(p.as_path()));
    }
}
