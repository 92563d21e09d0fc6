//! Check that limits the number of lines in a template.
//!
//! # Rationale
//!
//! Long templates are hard to review. Splitting them into snippets and
//! sections keeps each file focused.
//!
//! # Configuration
//!
//! - `max_length`: Maximum number of lines (default: 200)

use theme_check_core::{Category, Check, CheckSettings, HookContext, Node};

/// Check name for `TemplateLength`.
pub const NAME: &str = "TemplateLength";

/// Default line limit.
pub const DEFAULT_MAX_LENGTH: usize = 200;

/// Reports templates longer than `max_length` lines.
#[derive(Debug, Clone)]
pub struct TemplateLength {
    /// Maximum number of lines.
    pub max_length: usize,
}

impl Default for TemplateLength {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateLength {
    /// Creates the check with the default limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Creates the check from its settings slice.
    #[must_use]
    pub fn from_settings(settings: &CheckSettings) -> Self {
        let max = settings.get_int("max_length", 0);
        let max_length = usize::try_from(max)
            .ok()
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_MAX_LENGTH);
        Self { max_length }
    }

    /// Sets the line limit.
    #[must_use]
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}

impl Check for TemplateLength {
    fn name(&self) -> &str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Liquid
    }

    fn description(&self) -> &str {
        "Reports templates with too many lines"
    }

    fn after_type(&mut self, node: &Node, cx: &mut HookContext<'_>) {
        if node.type_name() != "document" {
            return;
        }
        let Some(file) = cx.file() else {
            return;
        };
        let lines = file.source().lines().count();
        if lines > self.max_length {
            cx.add_offense_at_line(
                format!("Template has too many lines [{lines}/{}]", self.max_length),
                1,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{analyze_theme, lines};

    #[test]
    fn test_reports_long_template() {
        let source = "line\n".repeat(5);
        let offenses = analyze_theme(
            vec![Box::new(TemplateLength::new().max_length(3))],
            &[("templates/index.liquid", source.as_str())],
        );
        assert_eq!(
            lines(&offenses),
            vec!["templates/index.liquid:1:1: suggestion [TemplateLength] Template has too many lines [5/3]"]
        );
    }

    #[test]
    fn test_allows_template_at_limit() {
        let source = "line\n".repeat(3);
        let offenses = analyze_theme(
            vec![Box::new(TemplateLength::new().max_length(3))],
            &[("templates/index.liquid", source.as_str())],
        );
        assert!(offenses.is_empty());
    }

    #[test]
    fn test_from_settings() {
        let settings = CheckSettings::new().with("max_length", 10);
        assert_eq!(TemplateLength::from_settings(&settings).max_length, 10);
        assert_eq!(
            TemplateLength::from_settings(&CheckSettings::new()).max_length,
            DEFAULT_MAX_LENGTH
        );
    }
}
