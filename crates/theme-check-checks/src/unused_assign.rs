//! Check that reports `assign` tags whose variable is never read.
//!
//! # Rationale
//!
//! An unused assignment is dead code and usually a leftover from a
//! refactoring.
//!
//! Templates containing an `include` tag are skipped, since the included
//! snippet shares their variables. Offenses are corrected by removing the
//! `assign` tag.

use std::collections::BTreeSet;

use theme_check_core::{Category, Check, Correction, HookContext, Node, Span};

use crate::markup;

/// Check name for `UnusedAssign`.
pub const NAME: &str = "UnusedAssign";

/// Reports assigned variables that are never used.
#[derive(Debug, Clone, Default)]
pub struct UnusedAssign {
    assigns: Vec<(String, Span)>,
    used: BTreeSet<String>,
    has_include: bool,
}

impl UnusedAssign {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record_usages(&mut self, markup: &str) {
        self.used
            .extend(markup::variable_names(markup).into_iter().map(String::from));
    }
}

impl Check for UnusedAssign {
    fn name(&self) -> &str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Liquid
    }

    fn description(&self) -> &str {
        "Reports variables that are assigned but never used"
    }

    fn can_correct(&self) -> bool {
        true
    }

    fn on_type(&mut self, node: &Node, cx: &mut HookContext<'_>) {
        let source = cx.source();
        match node.type_name() {
            "document" => {
                self.assigns.clear();
                self.used.clear();
                self.has_include = false;
            }
            "assign" => {
                let markup = node.markup(source);
                let Some((target, value)) = markup.split_once('=') else {
                    return;
                };
                let target = target.trim();
                if !target.is_empty() {
                    self.assigns.push((target.to_string(), node.span()));
                }
                self.record_usages(value);
            }
            "include" => {
                self.has_include = true;
                self.record_usages(node.markup(source));
            }
            "text" => {}
            _ => self.record_usages(node.markup(source)),
        }
    }

    fn after_type(&mut self, node: &Node, cx: &mut HookContext<'_>) {
        if node.type_name() != "document" || self.has_include {
            return;
        }
        for (name, span) in &self.assigns {
            if !self.used.contains(name) {
                cx.add_offense_at(format!("`{name}` is never used"), *span)
                    .set_correction(Correction::delete(*span));
            }
        }
    }
}
