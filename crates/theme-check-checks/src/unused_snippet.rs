//! Check that reports snippets no template renders or includes.
//!
//! A `render`/`include` with a non-literal name could reach any snippet,
//! so the check reports nothing for a theme that has one.

use std::collections::BTreeSet;

use theme_check_core::{Category, Check, HookContext, Node, Span, Theme};

use crate::markup;

/// Check name for `UnusedSnippet`.
pub const NAME: &str = "UnusedSnippet";

/// Reports snippets that are never used.
#[derive(Debug, Clone, Default)]
pub struct UnusedSnippet {
    used: BTreeSet<String>,
    has_dynamic_reference: bool,
}

impl UnusedSnippet {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Check for UnusedSnippet {
    fn name(&self) -> &str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Liquid
    }

    fn description(&self) -> &str {
        "Reports snippets that are never rendered"
    }

    fn on_theme(&mut self, _theme: &Theme, _cx: &mut HookContext<'_>) {
        self.used.clear();
        self.has_dynamic_reference = false;
    }

    fn on_tag(&mut self, node: &Node, cx: &mut HookContext<'_>) {
        if !matches!(node.type_name(), "render" | "include") {
            return;
        }
        match markup::string_argument(node.markup(cx.source())) {
            Some(name) => {
                self.used.insert(format!("snippets/{name}"));
            }
            None => self.has_dynamic_reference = true,
        }
    }

    fn on_end(&mut self, theme: &Theme, cx: &mut HookContext<'_>) {
        if self.has_dynamic_reference {
            return;
        }
        for snippet in theme.templates().iter().filter(|t| t.is_snippet()) {
            if !self.used.contains(snippet.name()) {
                cx.add_offense_in(snippet, Span::default(), "This template is not used");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{analyze_theme, lines};

    #[test]
    fn test_reports_unused_snippet() {
        let offenses = analyze_theme(
            vec![Box::new(UnusedSnippet::new())],
            &[
                ("templates/index.liquid", "{% render 'used' %}"),
                ("snippets/used.liquid", "{% include 'nested' %}"),
                ("snippets/nested.liquid", ""),
                ("snippets/unused.liquid", "hi"),
            ],
        );
        assert_eq!(
            lines(&offenses),
            vec!["snippets/unused.liquid:1:1: suggestion [UnusedSnippet] This template is not used"]
        );
    }

    #[test]
    fn test_dynamic_reference_disables_reporting() {
        let offenses = analyze_theme(
            vec![Box::new(UnusedSnippet::new())],
            &[
                ("templates/index.liquid", "{% include snippet_name %}"),
                ("snippets/maybe.liquid", ""),
            ],
        );
        assert!(offenses.is_empty());
    }
}
