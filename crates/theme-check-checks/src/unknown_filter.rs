//! Check that reports filters Liquid does not define.
//!
//! # Detected Patterns
//!
//! - `{{ x | not_a_filter }}`
//! - `{% assign y = x | not_a_filter %}`, `{% echo x | not_a_filter %}`
//!
//! # Configuration
//!
//! - `ignore_filters`: Additional filter names to accept

use theme_check_core::{Category, Check, CheckSettings, HookContext, Node, Severity, Span};

use crate::{filters, markup};

/// Check name for `UnknownFilter`.
pub const NAME: &str = "UnknownFilter";

/// Reports unknown filter names.
#[derive(Debug, Clone, Default)]
pub struct UnknownFilter {
    /// Filter names accepted on top of the reference data.
    pub ignore_filters: Vec<String>,
}

impl UnknownFilter {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the check from its settings slice.
    #[must_use]
    pub fn from_settings(settings: &CheckSettings) -> Self {
        Self {
            ignore_filters: settings.get_str_array("ignore_filters"),
        }
    }

    /// Accepts additional filter names.
    #[must_use]
    pub fn ignore_filters(mut self, names: &[&str]) -> Self {
        self.ignore_filters
            .extend(names.iter().map(|s| (*s).to_string()));
        self
    }

    fn is_known(&self, name: &str) -> bool {
        filters::is_known(name) || self.ignore_filters.iter().any(|f| f == name)
    }
}

impl Check for UnknownFilter {
    fn name(&self) -> &str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Liquid
    }

    fn description(&self) -> &str {
        "Reports use of filters that do not exist"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn on_type(&mut self, node: &Node, cx: &mut HookContext<'_>) {
        if !matches!(node.type_name(), "variable" | "assign" | "echo") {
            return;
        }
        let markup = node.markup_span();
        let Some(raw) = cx.source().get(markup.start..markup.end) else {
            return;
        };
        for (offset, name) in markup::filters(raw) {
            if !self.is_known(name) {
                let start = markup.start + offset;
                cx.add_offense_at(
                    format!("Undefined filter `{name}`"),
                    Span::new(start, start + name.len()),
                );
            }
        }
    }
}
