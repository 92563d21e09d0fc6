//! YAML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;

/// Raw YAML representation of a custom check definition.
///
/// ```yaml
/// name: NoInlineStyles
/// category: liquid
/// severity: style
/// message: Move inline styles to a stylesheet
/// pattern: 'style="[^"]*"'
/// node_types: [text]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomCheckDto {
    /// Check name, used as the settings key.
    pub name: String,
    /// Category string (`liquid`, `json`, `translation`).
    pub category: String,
    /// One-line description for `list-checks`.
    #[serde(default)]
    pub description: Option<String>,
    /// Severity (default: "suggestion").
    #[serde(default = "default_severity_str")]
    pub severity: String,
    /// Offense message.
    pub message: String,
    /// Regular expression matched against node source.
    pub pattern: String,
    /// Node type names to scan (default: `[text]`).
    #[serde(default = "default_node_types")]
    pub node_types: Vec<String>,
}

/// A definition file holding several checks under a `checks` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckListDto {
    /// The definitions.
    pub checks: Vec<CustomCheckDto>,
}

fn default_severity_str() -> String {
    "suggestion".to_string()
}

fn default_node_types() -> Vec<String> {
    vec!["text".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_optional_fields() {
        let dto: CustomCheckDto =
            serde_yaml::from_str("name: A\ncategory: liquid\nmessage: m\npattern: x\n").unwrap();
        assert_eq!(dto.severity, "suggestion");
        assert_eq!(dto.node_types, vec!["text"]);
        assert!(dto.description.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<CustomCheckDto, _> = serde_yaml::from_str(
            "name: A\ncategory: liquid\nmessage: m\npattern: x\npatern: y\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn check_list_parses() {
        let dto: CheckListDto = serde_yaml::from_str(
            "checks:\n  - name: A\n    category: liquid\n    message: m\n    pattern: x\n",
        )
        .unwrap();
        assert_eq!(dto.checks.len(), 1);
    }
}
