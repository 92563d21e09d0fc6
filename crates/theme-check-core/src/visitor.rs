//! Depth-first traversal that fires check hooks at every node.

use tracing::debug;

use crate::check::{Checks, NodeHook};
use crate::node::Node;
use crate::theme::Template;

/// Walks a template's syntax tree and dispatches hooks to a set of checks.
pub struct Visitor<'c> {
    checks: &'c mut Checks,
}

impl<'c> Visitor<'c> {
    /// Creates a visitor over `checks`.
    pub fn new(checks: &'c mut Checks) -> Self {
        Self { checks }
    }

    /// Visits every node of `template`.
    ///
    /// When the template does not parse, the error is tagged with the
    /// template name and handed to `on_error` instead; no node hooks fire.
    pub fn visit_template(&mut self, template: &Template) {
        match template.root() {
            Ok(root) => self.visit(root, template),
            Err(error) => {
                debug!("Failed to parse {}: {}", template.name(), error);
                let error = error.clone().with_template_name(template.name());
                self.checks.call_error(&error, template);
            }
        }
    }

    fn visit(&mut self, node: &Node, template: &Template) {
        self.checks.call_node(NodeHook::OnNode, node, template);
        if node.is_tag() {
            self.checks.call_node(NodeHook::OnTag, node, template);
        }
        self.checks.call_node(NodeHook::OnType, node, template);

        for child in node.children() {
            self.visit(child, template);
        }

        if !node.is_literal() {
            self.checks.call_node(NodeHook::AfterType, node, template);
            if node.is_tag() {
                self.checks.call_node(NodeHook::AfterTag, node, template);
            }
            self.checks.call_node(NodeHook::AfterNode, node, template);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Check, HookContext};
    use crate::parser::ParseError;
    use crate::types::Category;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Records every hook as `hook:type_name`.
    struct Recorder {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn record(&self, hook: &str, node: &Node) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{hook}:{}", node.type_name()));
        }
    }

    impl Check for Recorder {
        fn name(&self) -> &str {
            "Recorder"
        }
        fn category(&self) -> Category {
            Category::Liquid
        }
        fn on_node(&mut self, node: &Node, _cx: &mut HookContext<'_>) {
            self.record("on_node", node);
        }
        fn on_tag(&mut self, node: &Node, _cx: &mut HookContext<'_>) {
            self.record("on_tag", node);
        }
        fn on_type(&mut self, node: &Node, _cx: &mut HookContext<'_>) {
            self.record("on_type", node);
        }
        fn after_type(&mut self, node: &Node, _cx: &mut HookContext<'_>) {
            self.record("after_type", node);
        }
        fn after_tag(&mut self, node: &Node, _cx: &mut HookContext<'_>) {
            self.record("after_tag", node);
        }
        fn after_node(&mut self, node: &Node, _cx: &mut HookContext<'_>) {
            self.record("after_node", node);
        }
        fn on_error(&mut self, error: &ParseError, _cx: &mut HookContext<'_>) {
            self.log.lock().unwrap().push(format!("on_error:{error}"));
        }
    }

    fn run(source: &str) -> Vec<String> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut checks = Checks::new(vec![Box::new(Recorder {
            log: Arc::clone(&log),
        })]);
        let template = Template::new(
            PathBuf::from("templates/index.liquid"),
            PathBuf::from("templates/index.liquid"),
            source.into(),
        );
        Visitor::new(&mut checks).visit_template(&template);
        let entries = log.lock().unwrap().clone();
        entries
    }

    #[test]
    fn fires_hooks_in_protocol_order() {
        assert_eq!(
            run("{% if a %}x{% endif %}"),
            vec![
                "on_node:document",
                "on_type:document",
                "on_node:if",
                "on_tag:if",
                "on_type:if",
                "on_node:text",
                "on_type:text",
                "after_type:if",
                "after_tag:if",
                "after_node:if",
                "after_type:document",
                "after_node:document",
            ]
        );
    }

    #[test]
    fn one_after_node_per_non_literal_node() {
        let log = run("a{{ b }}{% for x in y %}c{% assign z = 1 %}{% endfor %}d");
        let count = |prefix: &str| log.iter().filter(|l| l.starts_with(prefix)).count();

        // document, text a, variable, for, text c, assign, text d
        assert_eq!(count("on_node:"), 7);
        // document, variable, for, assign
        assert_eq!(count("after_node:"), 4);
        assert!(!log.iter().any(|l| l == "after_node:text"));
        assert!(!log.iter().any(|l| l == "after_type:text"));
    }

    #[test]
    fn parse_error_routes_to_on_error_only() {
        let log = run("{% if a %}never closed");
        assert_eq!(log.len(), 1);
        assert!(log[0].starts_with("on_error:"));
        assert!(log[0].contains("in 'templates/index'"));
    }
}
