//! Effective configuration for one analysis run.
//!
//! ```text
//! start path
//!   ↓ resolver::resolve()        nearest .theme-check.yml
//! Settings (user overrides)
//!   ↓ require                     custom checks → CheckRegistry
//!   ↓ merge over registry defaults (shallow, per check)
//! Config
//!   ↓ enabled_checks()            enabled flag + category filters
//! Vec<CheckBox>
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::check::CheckBox;
use crate::declarative;
use crate::registry::CheckRegistry;
use crate::types::{Category, Severity};

pub mod resolver;
pub mod settings;

pub use resolver::{ConfigSource, SETTINGS_FILE_NAME};
pub use settings::{CheckSettings, Settings};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading a settings or check definition file.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not valid YAML.
    #[error("Failed to parse {origin}: {message}")]
    Parse {
        /// File (or `<settings>` for in-memory input).
        origin: String,
        /// Parse error message.
        message: String,
    },

    /// A key holds a value of the wrong shape.
    #[error("Invalid value for `{key}`: {message}")]
    InvalidValue {
        /// Offending key.
        key: String,
        /// What was expected.
        message: String,
    },

    /// A custom check definition could not be loaded.
    #[error("Failed to load custom check from {path}: {message}")]
    LoadCheck {
        /// Definition file.
        path: PathBuf,
        /// Reason.
        message: String,
    },

    /// Two checks were registered under the same name.
    #[error("Check `{name}` is already registered")]
    DuplicateCheck {
        /// Conflicting name.
        name: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Resolved settings: analysis root, merged per-check slices, the check
/// registry and the category filters.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    source: ConfigSource,
    user: Settings,
    merged: BTreeMap<String, CheckSettings>,
    registry: CheckRegistry,
    only_categories: Vec<Category>,
    exclude_categories: Vec<Category>,
}

impl Config {
    /// Discovers the nearest settings file from `start` and resolves it.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file is malformed or a custom check
    /// cannot be loaded.
    pub fn from_path(start: &Path, registry: CheckRegistry) -> Result<Self, ConfigError> {
        let source = resolver::resolve(start, None);
        Self::from_source(start, source, registry)
    }

    /// Resolves an already located settings file (or none).
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read, is malformed,
    /// or a custom check cannot be loaded.
    pub fn from_source(
        start: &Path,
        source: ConfigSource,
        registry: CheckRegistry,
    ) -> Result<Self, ConfigError> {
        let mut config = match source.path() {
            Some(path) => {
                debug!("Using settings file {}", path.display());
                let settings = Settings::from_file(path)?;
                let base_dir = path
                    .parent()
                    .filter(|d| !d.as_os_str().is_empty())
                    .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
                Self::new(&base_dir, settings, registry)?
            }
            None => {
                debug!("No {SETTINGS_FILE_NAME} found, using defaults");
                Self::new(start, Settings::default(), registry)?
            }
        };
        config.source = source;
        Ok(config)
    }

    /// Builds a config from parsed settings. Relative `root` and `require`
    /// paths resolve against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom check cannot be loaded or registered.
    pub fn new(
        base_dir: &Path,
        settings: Settings,
        mut registry: CheckRegistry,
    ) -> Result<Self, ConfigError> {
        let root = settings
            .root
            .as_ref()
            .map_or_else(|| base_dir.to_path_buf(), |r| base_dir.join(r));

        for path in &settings.require {
            declarative::register_file(&mut registry, &base_dir.join(path))?;
        }

        let mut merged = BTreeMap::new();
        for name in registry.names() {
            let mut slice = registry
                .default_settings(name)
                .cloned()
                .unwrap_or_default();
            if let Some(user) = settings.checks.get(name) {
                slice.merge(user);
            }
            merged.insert(name.to_string(), slice);
        }
        for name in settings.checks.keys() {
            if !registry.contains(name) {
                warn!("Unknown check in settings: {name}");
            }
        }

        Ok(Self {
            root,
            source: ConfigSource::Default,
            user: settings,
            merged,
            registry,
            only_categories: Vec::new(),
            exclude_categories: Vec::new(),
        })
    }

    /// Effective analysis root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the settings came from.
    #[must_use]
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Glob patterns of theme files to skip.
    #[must_use]
    pub fn ignore_patterns(&self) -> &[String] {
        &self.user.ignore
    }

    /// The registry the checks are built from.
    #[must_use]
    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Merged slice of a check (defaults overridden by user settings).
    #[must_use]
    pub fn check_settings(&self, name: &str) -> Option<&CheckSettings> {
        self.merged.get(name)
    }

    /// Restricts enabled checks to these categories. Empty means no restriction.
    pub fn set_only_categories(&mut self, categories: Vec<Category>) {
        self.only_categories = categories;
    }

    /// Excludes checks in these categories.
    pub fn set_exclude_categories(&mut self, categories: Vec<Category>) {
        self.exclude_categories = categories;
    }

    /// Current include-list.
    #[must_use]
    pub fn only_categories(&self) -> &[Category] {
        &self.only_categories
    }

    /// Current exclude-list.
    #[must_use]
    pub fn exclude_categories(&self) -> &[Category] {
        &self.exclude_categories
    }

    /// Category of a check: the merged `category` key, else the one it
    /// registered with.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<Category> {
        self.merged
            .get(name)
            .and_then(CheckSettings::category)
            .or_else(|| self.registry.category(name))
    }

    /// Whether a check passes its `enabled` flag and the category filters.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        let Some(slice) = self.merged.get(name) else {
            return false;
        };
        if !slice.enabled().unwrap_or(true) {
            return false;
        }
        let Some(category) = self.category(name) else {
            return false;
        };
        (self.only_categories.is_empty() || self.only_categories.contains(&category))
            && !self.exclude_categories.contains(&category)
    }

    /// Names of the enabled checks, in registration order.
    #[must_use]
    pub fn enabled_check_names(&self) -> Vec<&str> {
        self.registry
            .names()
            .filter(|name| self.is_enabled(name))
            .collect()
    }

    /// Instantiates every enabled check with its merged slice.
    ///
    /// Filters are evaluated on each call, so changing the categories and
    /// calling again yields a different set.
    #[must_use]
    pub fn enabled_checks(&self) -> Vec<CheckBox> {
        self.enabled_check_names()
            .into_iter()
            .filter_map(|name| {
                let slice = self.merged.get(name)?;
                self.registry.instantiate(name, slice)
            })
            .collect()
    }

    /// The `severity` override for a check, if the merged slice sets one.
    #[must_use]
    pub fn severity_override(&self, name: &str) -> Option<Severity> {
        self.merged.get(name).and_then(CheckSettings::severity)
    }
}
