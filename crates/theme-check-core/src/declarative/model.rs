//! Validated custom check definitions and the check they produce.

use regex::Regex;

use crate::check::{Check, HookContext};
use crate::node::{Node, Span};
use crate::types::{Category, Severity};

/// A custom check definition after validation.
///
/// The regex is compiled once at load time and shared by every instance.
#[derive(Debug, Clone)]
pub struct PatternCheckDef {
    name: String,
    category: Category,
    description: String,
    severity: Severity,
    message: String,
    pattern: Regex,
    node_types: Vec<String>,
}

impl PatternCheckDef {
    /// Creates a definition from already validated parts.
    #[must_use]
    pub fn new(
        name: String,
        category: Category,
        description: String,
        severity: Severity,
        message: String,
        pattern: Regex,
        node_types: Vec<String>,
    ) -> Self {
        Self {
            name,
            category,
            description,
            severity,
            message,
            pattern,
            node_types,
        }
    }

    /// Check name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check category.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Default severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Node types scanned by the check.
    #[must_use]
    pub fn node_types(&self) -> &[String] {
        &self.node_types
    }
}

/// Reports one offense per regex match in the nodes of the listed types.
///
/// Text nodes are scanned in full; tags and variables only within the
/// markup of their opening delimiter, so a block's body is never scanned
/// twice.
#[derive(Debug, Clone)]
pub struct PatternCheck {
    def: PatternCheckDef,
}

impl PatternCheck {
    /// Creates a check from its definition.
    #[must_use]
    pub fn new(def: PatternCheckDef) -> Self {
        Self { def }
    }
}

impl Check for PatternCheck {
    fn name(&self) -> &str {
        &self.def.name
    }

    fn category(&self) -> Category {
        self.def.category
    }

    fn description(&self) -> &str {
        &self.def.description
    }

    fn default_severity(&self) -> Severity {
        self.def.severity
    }

    fn on_node(&mut self, node: &Node, cx: &mut HookContext<'_>) {
        if !self.def.node_types.iter().any(|t| t == node.type_name()) {
            return;
        }
        let scanned = if node.is_literal() {
            node.span()
        } else {
            node.markup_span()
        };
        let Some(text) = cx.source().get(scanned.start..scanned.end) else {
            return;
        };
        for found in self.def.pattern.find_iter(text) {
            let span = Span::new(scanned.start + found.start(), scanned.start + found.end());
            cx.add_offense_at(self.def.message.clone(), span);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Checks;
    use crate::theme::Template;
    use crate::visitor::Visitor;
    use std::path::PathBuf;

    fn def(pattern: &str, node_types: &[&str]) -> PatternCheckDef {
        PatternCheckDef::new(
            "NoTodo".into(),
            Category::Liquid,
            String::new(),
            Severity::Style,
            "Remove TODO".into(),
            Regex::new(pattern).unwrap(),
            node_types.iter().map(ToString::to_string).collect(),
        )
    }

    fn run(def: PatternCheckDef, source: &str) -> Vec<(usize, usize)> {
        let mut checks = Checks::new(vec![Box::new(PatternCheck::new(def))]);
        let template = Template::new(
            PathBuf::from("t.liquid"),
            PathBuf::from("t.liquid"),
            source.into(),
        );
        Visitor::new(&mut checks).visit_template(&template);
        checks
            .offenses()
            .map(|o| (o.location.start, o.location.end))
            .collect()
    }

    #[test]
    fn reports_each_match_in_text() {
        assert_eq!(
            run(def("TODO", &["text"]), "TODO a {{ x }} TODO"),
            vec![(0, 4), (15, 19)]
        );
    }

    #[test]
    fn scans_only_opening_markup_of_tags() {
        let found = run(def("TODO", &["if"]), "{% if TODO %}TODO{% endif %}");
        assert_eq!(found, vec![(6, 10)]);
    }

    #[test]
    fn ignores_unlisted_types() {
        assert!(run(def("x", &["variable"]), "x x x").is_empty());
    }
}
