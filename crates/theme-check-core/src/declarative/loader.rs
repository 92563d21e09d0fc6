//! DTO → Domain model conversion with validation.

use regex::Regex;
use serde_yaml::Value;

use crate::types::{Category, Severity};

use super::config_dto::{CheckListDto, CustomCheckDto};
use super::model::PatternCheckDef;

/// Errors during YAML → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// YAML deserialization failed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file defines no checks.
    #[error("no check definitions found")]
    Empty,

    /// A check name is empty or not alphanumeric.
    #[error("invalid check name `{0}`, expected PascalCase letters and digits")]
    InvalidName(String),

    /// Unknown category string.
    #[error("{check}: unknown category `{value}`, expected: liquid, json, translation")]
    UnknownCategory {
        /// Check being loaded.
        check: String,
        /// The invalid value.
        value: String,
    },

    /// Unknown severity string.
    #[error("{check}: unknown severity `{value}`, expected: error, suggestion, style")]
    UnknownSeverity {
        /// Check being loaded.
        check: String,
        /// The invalid value.
        value: String,
    },

    /// The pattern is not a valid regular expression.
    #[error("{check}: invalid pattern: {source}")]
    InvalidPattern {
        /// Check being loaded.
        check: String,
        /// Regex compilation error.
        source: regex::Error,
    },

    /// `node_types` was set to an empty list.
    #[error("{check}: node_types must not be empty")]
    NoNodeTypes {
        /// Check being loaded.
        check: String,
    },
}

/// Parses a definition file holding either one check or a `checks` list.
///
/// # Errors
///
/// Returns the first error encountered during parsing or validation.
pub fn load_str(content: &str) -> Result<Vec<PatternCheckDef>, LoadError> {
    let value: Value = serde_yaml::from_str(content)?;
    let dtos = if value.get("checks").is_some() {
        serde_yaml::from_value::<CheckListDto>(value)?.checks
    } else if value.is_null() {
        Vec::new()
    } else {
        vec![serde_yaml::from_value::<CustomCheckDto>(value)?]
    };

    if dtos.is_empty() {
        return Err(LoadError::Empty);
    }
    dtos.into_iter().map(convert).collect()
}

fn convert(dto: CustomCheckDto) -> Result<PatternCheckDef, LoadError> {
    if dto.name.is_empty() || !dto.name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(LoadError::InvalidName(dto.name));
    }

    let category: Category = dto
        .category
        .parse()
        .map_err(|_| LoadError::UnknownCategory {
            check: dto.name.clone(),
            value: dto.category.clone(),
        })?;

    let severity: Severity = dto
        .severity
        .parse()
        .map_err(|_| LoadError::UnknownSeverity {
            check: dto.name.clone(),
            value: dto.severity.clone(),
        })?;

    let pattern = Regex::new(&dto.pattern).map_err(|e| LoadError::InvalidPattern {
        check: dto.name.clone(),
        source: e,
    })?;

    if dto.node_types.is_empty() {
        return Err(LoadError::NoNodeTypes { check: dto.name });
    }

    Ok(PatternCheckDef::new(
        dto.name,
        category,
        dto.description.unwrap_or_default(),
        severity,
        dto.message,
        pattern,
        dto.node_types,
    ))
}
