//! Check that reports JSON files that fail to parse.

use theme_check_core::{Category, Check, HookContext, JsonFile, Severity};

/// Check name for `ValidJson`.
pub const NAME: &str = "ValidJson";

/// Reports invalid JSON in locale, config and template files.
#[derive(Debug, Clone, Default)]
pub struct ValidJson;

impl ValidJson {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for ValidJson {
    fn name(&self) -> &str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Json
    }

    fn description(&self) -> &str {
        "Reports JSON files with syntax errors"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn on_json(&mut self, file: &JsonFile, cx: &mut HookContext<'_>) {
        if let Err(error) = file.content() {
            cx.add_offense_at_line(error.message.clone(), error.line);
        }
    }
}
