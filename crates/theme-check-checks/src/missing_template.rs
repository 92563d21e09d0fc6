//! Check that reports `render`, `include` and `section` tags pointing at
//! files the theme does not have.
//!
//! Tags whose first argument is not a string literal are skipped.

use std::collections::BTreeSet;

use theme_check_core::{Category, Check, HookContext, Node, Severity, Theme};

use crate::markup;

/// Check name for `MissingTemplate`.
pub const NAME: &str = "MissingTemplate";

/// Reports references to templates that do not exist.
#[derive(Debug, Clone, Default)]
pub struct MissingTemplate {
    known: BTreeSet<String>,
}

impl MissingTemplate {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Template name a tag refers to, e.g. `snippets/card` for `render 'card'`.
fn referenced_template(node: &Node, source: &str) -> Option<String> {
    let dir = match node.type_name() {
        "render" | "include" => "snippets",
        "section" => "sections",
        _ => return None,
    };
    markup::string_argument(node.markup(source)).map(|name| format!("{dir}/{name}"))
}

impl Check for MissingTemplate {
    fn name(&self) -> &str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Liquid
    }

    fn description(&self) -> &str {
        "Reports references to missing snippets and sections"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn on_theme(&mut self, theme: &Theme, _cx: &mut HookContext<'_>) {
        self.known = theme
            .templates()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
    }

    fn on_tag(&mut self, node: &Node, cx: &mut HookContext<'_>) {
        let Some(name) = referenced_template(node, cx.source()) else {
            return;
        };
        if !self.known.contains(&name) {
            cx.add_offense(format!("'{name}.liquid' is not found"));
        }
    }
}
