//! The check contract and the per-run registry of check instances.

use crate::node::{Node, Span};
use crate::parser::ParseError;
use crate::theme::{JsonFile, SourceFile, Template, Theme};
use crate::types::{Category, Correction, Location, Offense, Severity};

/// A rule that inspects theme files and reports offenses.
///
/// Every hook has an empty default body, so a check implements exactly the
/// hooks its rule needs. For each node the [`Visitor`] calls, in order:
/// `on_node`, `on_tag` (tags only), `on_type`, then the children, then
/// `after_type`, `after_tag` (tags only) and `after_node`. Text nodes only
/// receive the first three.
///
/// One instance is shared by every template of a run, so checks that keep
/// per-run state should reset it in [`Check::on_theme`].
///
/// # Example
///
/// ```ignore
/// use theme_check_core::{Category, Check, HookContext, Node};
///
/// pub struct NoBreak;
///
/// impl Check for NoBreak {
///     fn name(&self) -> &str { "NoBreak" }
///     fn category(&self) -> Category { Category::Liquid }
///
///     fn on_tag(&mut self, node: &Node, cx: &mut HookContext<'_>) {
///         if node.type_name() == "break" {
///             cx.add_offense("Avoid {% break %}");
///         }
///     }
/// }
/// ```
///
/// [`Visitor`]: crate::visitor::Visitor
#[allow(unused_variables)]
pub trait Check: Send {
    /// Returns the `PascalCase` name of this check (e.g., "`TemplateLength`").
    fn name(&self) -> &str;

    /// Returns the category this check belongs to.
    fn category(&self) -> Category;

    /// Returns a brief description of what this check looks for.
    fn description(&self) -> &str {
        ""
    }

    /// Returns the default severity for offenses from this check.
    fn default_severity(&self) -> Severity {
        Severity::Suggestion
    }

    /// Whether offenses from this check can carry corrections.
    fn can_correct(&self) -> bool {
        false
    }

    /// Whether `theme-check-disable` comments can silence this check.
    fn can_disable(&self) -> bool {
        true
    }

    /// Called once before any file of the theme is visited.
    fn on_theme(&mut self, theme: &Theme, cx: &mut HookContext<'_>) {}

    /// Pre-order hook for every node.
    fn on_node(&mut self, node: &Node, cx: &mut HookContext<'_>) {}

    /// Pre-order hook for tag nodes.
    fn on_tag(&mut self, node: &Node, cx: &mut HookContext<'_>) {}

    /// Type-specific pre-order hook; dispatch on [`Node::type_name`].
    fn on_type(&mut self, node: &Node, cx: &mut HookContext<'_>) {}

    /// Type-specific closing hook, after all children were visited.
    /// Never called for literal nodes.
    fn after_type(&mut self, node: &Node, cx: &mut HookContext<'_>) {}

    /// Closing hook for tag nodes.
    fn after_tag(&mut self, node: &Node, cx: &mut HookContext<'_>) {}

    /// Closing hook for every non-literal node.
    fn after_node(&mut self, node: &Node, cx: &mut HookContext<'_>) {}

    /// Called instead of the node hooks when a template fails to parse.
    fn on_error(&mut self, error: &ParseError, cx: &mut HookContext<'_>) {}

    /// Called after each template, whether or not it parsed.
    fn after_template(&mut self, template: &Template, cx: &mut HookContext<'_>) {}

    /// Called once per JSON file.
    fn on_json(&mut self, file: &JsonFile, cx: &mut HookContext<'_>) {}

    /// Called once after every file of the theme was visited.
    fn on_end(&mut self, theme: &Theme, cx: &mut HookContext<'_>) {}

    /// Returns the edit that fixes an offense this check reported.
    ///
    /// Only consulted when [`Check::can_correct`] is true. The default
    /// returns the correction attached when the offense was recorded.
    fn correct(&self, offense: &Offense) -> Option<Correction> {
        offense.correction.clone()
    }
}

/// Type alias for boxed Check trait objects.
pub type CheckBox = Box<dyn Check>;

/// Handle passed to every hook for recording offenses.
///
/// Offenses default to the location of the node being visited; the
/// `*_at` variants override it.
pub struct HookContext<'a> {
    check: &'a str,
    severity: Severity,
    offenses: &'a mut Vec<Offense>,
    file: Option<&'a dyn SourceFile>,
    node: Option<Span>,
}

impl<'a> HookContext<'a> {
    /// Creates a context recording into `offenses` on behalf of `check`.
    pub fn new(
        check: &'a str,
        severity: Severity,
        offenses: &'a mut Vec<Offense>,
        file: Option<&'a dyn SourceFile>,
        node: Option<Span>,
    ) -> Self {
        Self {
            check,
            severity,
            offenses,
            file,
            node,
        }
    }

    /// The file being visited, if any.
    #[must_use]
    pub fn file(&self) -> Option<&'a dyn SourceFile> {
        self.file
    }

    /// Source of the file being visited, or `""` outside a file.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.file.map_or("", |f| f.source())
    }

    /// Records an offense at the current node (or the start of the current
    /// file, or the theme when there is neither).
    pub fn add_offense(&mut self, message: impl Into<String>) -> &mut Offense {
        let span = self.node.unwrap_or_default();
        match self.file {
            Some(file) => self.add_offense_in(file, span, message),
            None => self.push(Location::theme(), message),
        }
    }

    /// Records an offense at `span` in the current file.
    pub fn add_offense_at(&mut self, message: impl Into<String>, span: Span) -> &mut Offense {
        match self.file {
            Some(file) => self.add_offense_in(file, span, message),
            None => self.push(Location::theme(), message),
        }
    }

    /// Records an offense covering a whole line of the current file.
    pub fn add_offense_at_line(&mut self, message: impl Into<String>, line: usize) -> &mut Offense {
        let span = self.file.map(|f| f.line_span(line)).unwrap_or_default();
        self.add_offense_at(message, span)
    }

    /// Records an offense at `span` in an explicit file, for checks that
    /// report from theme-wide hooks.
    pub fn add_offense_in(
        &mut self,
        file: &dyn SourceFile,
        span: Span,
        message: impl Into<String>,
    ) -> &mut Offense {
        let (line, column) = file.position(span.start);
        let location = Location::new(file.relative_path(), line, column).with_span(span);
        self.push(location, message)
    }

    fn push(&mut self, location: Location, message: impl Into<String>) -> &mut Offense {
        self.offenses
            .push(Offense::new(self.check, self.severity, location, message));
        let last = self.offenses.len() - 1;
        &mut self.offenses[last]
    }
}

/// A check instance together with the offenses it has recorded.
pub struct CheckInstance {
    name: String,
    severity: Severity,
    check: CheckBox,
    offenses: Vec<Offense>,
}

impl CheckInstance {
    /// Wraps a check, using its default severity.
    #[must_use]
    pub fn new(check: CheckBox) -> Self {
        Self {
            name: check.name().to_string(),
            severity: check.default_severity(),
            check,
            offenses: Vec::new(),
        }
    }

    /// Check name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Severity applied to recorded offenses.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The wrapped check.
    #[must_use]
    pub fn check(&self) -> &dyn Check {
        self.check.as_ref()
    }

    /// Offenses recorded so far.
    #[must_use]
    pub fn offenses(&self) -> &[Offense] {
        &self.offenses
    }

    fn call(
        &mut self,
        file: Option<&dyn SourceFile>,
        node: Option<Span>,
        hook: impl FnOnce(&mut CheckBox, &mut HookContext<'_>),
    ) {
        let mut cx = HookContext::new(&self.name, self.severity, &mut self.offenses, file, node);
        hook(&mut self.check, &mut cx);
    }
}

/// Node-level hooks, in the order the visitor fires them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeHook {
    /// `on_node`
    OnNode,
    /// `on_tag`
    OnTag,
    /// `on_<type_name>`
    OnType,
    /// `after_<type_name>`
    AfterType,
    /// `after_tag`
    AfterTag,
    /// `after_node`
    AfterNode,
}

/// The checks taking part in one analysis run.
#[derive(Default)]
pub struct Checks {
    instances: Vec<CheckInstance>,
}

impl Checks {
    /// Wraps the given checks.
    #[must_use]
    pub fn new(checks: Vec<CheckBox>) -> Self {
        Self {
            instances: checks.into_iter().map(CheckInstance::new).collect(),
        }
    }

    /// Number of checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true when no checks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Check names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instances.iter().map(CheckInstance::name)
    }

    /// Looks up a check instance by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CheckInstance> {
        self.instances.iter().find(|i| i.name == name)
    }

    /// Overrides the severity of a check's future offenses.
    pub fn set_severity(&mut self, name: &str, severity: Severity) {
        if let Some(instance) = self.instances.iter_mut().find(|i| i.name == name) {
            instance.severity = severity;
        }
    }

    /// Every offense recorded by every check, in check order.
    pub fn offenses(&self) -> impl Iterator<Item = &Offense> {
        self.instances.iter().flat_map(|i| i.offenses.iter())
    }

    /// Drops recorded offenses so the checks can run again.
    pub fn clear_offenses(&mut self) {
        for instance in &mut self.instances {
            instance.offenses.clear();
        }
    }

    /// Fires a node-level hook on every check.
    pub fn call_node(&mut self, hook: NodeHook, node: &Node, template: &Template) {
        for instance in &mut self.instances {
            instance.call(Some(template), Some(node.span()), |check, cx| match hook {
                NodeHook::OnNode => check.on_node(node, cx),
                NodeHook::OnTag => check.on_tag(node, cx),
                NodeHook::OnType => check.on_type(node, cx),
                NodeHook::AfterType => check.after_type(node, cx),
                NodeHook::AfterTag => check.after_tag(node, cx),
                NodeHook::AfterNode => check.after_node(node, cx),
            });
        }
    }

    /// Fires `on_error` on every check.
    pub fn call_error(&mut self, error: &ParseError, template: &Template) {
        for instance in &mut self.instances {
            instance.call(Some(template), None, |check, cx| check.on_error(error, cx));
        }
    }

    /// Fires `on_theme` on every check.
    pub fn call_theme(&mut self, theme: &Theme) {
        for instance in &mut self.instances {
            instance.call(None, None, |check, cx| check.on_theme(theme, cx));
        }
    }

    /// Fires `after_template` on every check.
    pub fn call_after_template(&mut self, template: &Template) {
        for instance in &mut self.instances {
            instance.call(Some(template), None, |check, cx| {
                check.after_template(template, cx);
            });
        }
    }

    /// Fires `on_json` on every check.
    pub fn call_json(&mut self, file: &JsonFile) {
        for instance in &mut self.instances {
            instance.call(Some(file), None, |check, cx| check.on_json(file, cx));
        }
    }

    /// Fires `on_end` on every check.
    pub fn call_end(&mut self, theme: &Theme) {
        for instance in &mut self.instances {
            instance.call(None, None, |check, cx| check.on_end(theme, cx));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct TestCheck;

    impl Check for TestCheck {
        fn name(&self) -> &str {
            "TestCheck"
        }
        fn category(&self) -> Category {
            Category::Liquid
        }
        fn description(&self) -> &str {
            "A test check"
        }

        fn on_type(&mut self, node: &Node, cx: &mut HookContext<'_>) {
            if node.type_name() == "variable" {
                cx.add_offense("variable found");
            }
        }
    }

    fn template(source: &str) -> Template {
        Template::new(
            PathBuf::from("t.liquid"),
            PathBuf::from("t.liquid"),
            source.into(),
        )
    }

    #[test]
    fn check_trait_defaults() {
        let check = TestCheck;
        assert_eq!(check.name(), "TestCheck");
        assert_eq!(check.default_severity(), Severity::Suggestion);
        assert!(!check.can_correct());
        assert!(check.can_disable());
    }

    #[test]
    fn add_offense_uses_current_node_location() {
        let t = template("ab\n{{ x }}");
        let root = t.root().unwrap();
        let variable = &root.children()[1];

        let mut checks = Checks::new(vec![Box::new(TestCheck)]);
        checks.call_node(NodeHook::OnType, variable, &t);

        let offense = checks.offenses().next().unwrap();
        assert_eq!(offense.check, "TestCheck");
        assert_eq!(offense.location.path, PathBuf::from("t.liquid"));
        assert_eq!((offense.location.line, offense.location.column), (2, 1));
        assert_eq!(offense.location.span(), Span::new(3, 10));
    }

    #[test]
    fn severity_override_applies_to_new_offenses() {
        let t = template("{{ x }}");
        let variable = &t.root().unwrap().children()[0];

        let mut checks = Checks::new(vec![Box::new(TestCheck)]);
        checks.set_severity("TestCheck", Severity::Error);
        checks.call_node(NodeHook::OnType, variable, &t);
        assert_eq!(checks.offenses().next().unwrap().severity, Severity::Error);

        checks.clear_offenses();
        assert_eq!(checks.offenses().count(), 0);
    }

    #[test]
    fn theme_level_offense_has_empty_location() {
        let mut offenses = Vec::new();
        let mut cx = HookContext::new("X", Severity::Style, &mut offenses, None, None);
        cx.add_offense("theme wide");
        assert_eq!(offenses[0].location, Location::theme());
    }

    #[test]
    fn offense_can_be_made_correctable_after_recording() {
        let t = template("{{x}}");
        let mut offenses = Vec::new();
        let mut cx = HookContext::new(
            "X",
            Severity::Style,
            &mut offenses,
            Some(&t),
            Some(Span::new(0, 5)),
        );
        cx.add_offense("tight braces")
            .set_correction(Correction::insert(2, " "));
        assert!(offenses[0].is_correctable());
    }
}
