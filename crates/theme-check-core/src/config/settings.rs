//! Settings file contents: reserved keys plus per-check option slices.

use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::ConfigError;
use crate::types::{Category, Severity};

/// Options for a single check (`enabled`, `severity`, `category`, plus
/// check-specific keys).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckSettings {
    values: Mapping,
}

impl CheckSettings {
    /// Creates an empty slice.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a key, returning the updated slice.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a key.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(Value::from(key), value.into());
    }

    /// Raw value of a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Keys present in this slice.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().filter_map(Value::as_str)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no keys are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The `enabled` flag, if set.
    #[must_use]
    pub fn enabled(&self) -> Option<bool> {
        self.get("enabled").and_then(Value::as_bool)
    }

    /// The `severity` override, if set to a known severity.
    #[must_use]
    pub fn severity(&self) -> Option<Severity> {
        self.get("severity")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// The `category` tag, if set to a known category.
    #[must_use]
    pub fn category(&self) -> Option<Category> {
        self.get("category")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// Gets an option value as a specific type.
    #[must_use]
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|v| serde_yaml::from_value(v.clone()).ok())
    }

    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(Value::as_i64).unwrap_or(default)
    }

    /// Gets a string option with a default value.
    #[must_use]
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Gets a string array option.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_sequence)
            .map(|seq| {
                seq.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Checks the reserved keys hold usable values, so a typo never
    /// silently falls back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error naming `<check>.<key>` when `enabled` is not a
    /// boolean or `severity`/`category` is not a known name.
    pub fn validate(&self, check: &str) -> Result<(), ConfigError> {
        if let Some(value) = self.get("enabled") {
            if !value.is_bool() {
                return Err(ConfigError::invalid(
                    format!("{check}.enabled"),
                    "expected true or false",
                ));
            }
        }
        if let Some(value) = self.get("severity") {
            value
                .as_str()
                .and_then(|s| s.parse::<Severity>().ok())
                .ok_or_else(|| {
                    ConfigError::invalid(
                        format!("{check}.severity"),
                        "expected one of error, suggestion, style",
                    )
                })?;
        }
        if let Some(value) = self.get("category") {
            value
                .as_str()
                .and_then(|s| s.parse::<Category>().ok())
                .ok_or_else(|| {
                    ConfigError::invalid(
                        format!("{check}.category"),
                        "expected one of liquid, json, translation",
                    )
                })?;
        }
        Ok(())
    }

    /// Overwrites keys present in `overrides`; other keys are kept.
    ///
    /// The merge is shallow: a nested mapping in `overrides` replaces the
    /// whole value.
    pub fn merge(&mut self, overrides: &Self) {
        for (key, value) in &overrides.values {
            self.values.insert(key.clone(), value.clone());
        }
    }
}

/// Parsed contents of a settings file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// `root`: analysis root, relative to the settings file.
    pub root: Option<PathBuf>,
    /// `require`: custom check definition files, relative to the settings file.
    pub require: Vec<PathBuf>,
    /// `ignore`: glob patterns of theme files to skip.
    pub ignore: Vec<String>,
    /// Per-check slices keyed by check name.
    pub checks: BTreeMap<String, CheckSettings>,
}

impl Settings {
    /// Reads and parses a settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// settings mapping.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse_with_origin(&content, &path.display().to_string())
    }

    /// Parses settings from a YAML string. Empty input yields empty settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or has the wrong shape.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::parse_with_origin(content, "<settings>")
    }

    fn parse_with_origin(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(mapping) => Self::from_mapping(mapping),
            _ => Err(ConfigError::Parse {
                origin: origin.to_string(),
                message: "expected a mapping at the top level".to_string(),
            }),
        }
    }

    /// Builds settings from an already-parsed mapping.
    ///
    /// # Errors
    ///
    /// Returns an error when a reserved key or a check slice has the
    /// wrong shape.
    pub fn from_mapping(mapping: Mapping) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        for (key, value) in mapping {
            let Some(key) = key.as_str().map(str::to_string) else {
                return Err(ConfigError::invalid(
                    format!("{key:?}"),
                    "keys must be strings",
                ));
            };
            match key.as_str() {
                "root" => {
                    let root = value
                        .as_str()
                        .ok_or_else(|| ConfigError::invalid("root", "expected a path"))?;
                    settings.root = Some(PathBuf::from(root));
                }
                "require" => {
                    settings.require = string_list("require", &value)?
                        .into_iter()
                        .map(PathBuf::from)
                        .collect();
                }
                "ignore" => settings.ignore = string_list("ignore", &value)?,
                _ => {
                    let slice = match value {
                        Value::Null => CheckSettings::default(),
                        Value::Mapping(values) => CheckSettings { values },
                        _ => {
                            return Err(ConfigError::invalid(
                                key,
                                "expected a mapping of check options",
                            ))
                        }
                    };
                    slice.validate(&key)?;
                    settings.checks.insert(key, slice);
                }
            }
        }

        Ok(settings)
    }

    /// Returns true when the file set nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn string_list(key: &str, value: &Value) -> Result<Vec<String>, ConfigError> {
    let seq = match value {
        Value::Null => return Ok(Vec::new()),
        Value::String(single) => return Ok(vec![single.clone()]),
        Value::Sequence(seq) => seq,
        _ => return Err(ConfigError::invalid(key, "expected a list of strings")),
    };
    seq.iter()
        .map(|v| {
            v.as_str()
                .map(String::from)
                .ok_or_else(|| ConfigError::invalid(key, "expected a list of strings"))
        })
        .collect()
}
