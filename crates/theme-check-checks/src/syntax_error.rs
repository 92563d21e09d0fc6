//! Check that reports templates Liquid cannot parse.
//!
//! # Detected Patterns
//!
//! - Unterminated `{{`/`{%`
//! - Unknown tags and misplaced `end*`, `else`, `when` tags
//! - Blocks that are never closed
//!
//! The offense points at the line the parser stopped on. Inline disable
//! comments cannot silence this check.

use theme_check_core::{Category, Check, HookContext, ParseError, Severity};

/// Check name for `SyntaxError`.
pub const NAME: &str = "SyntaxError";

/// Reports Liquid syntax errors.
#[derive(Debug, Clone, Default)]
pub struct SyntaxError;

impl SyntaxError {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for SyntaxError {
    fn name(&self) -> &str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Liquid
    }

    fn description(&self) -> &str {
        "Reports Liquid syntax errors"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn can_disable(&self) -> bool {
        false
    }

    fn on_error(&mut self, error: &ParseError, cx: &mut HookContext<'_>) {
        cx.add_offense_at_line(error.message.clone(), error.line);
    }
}
