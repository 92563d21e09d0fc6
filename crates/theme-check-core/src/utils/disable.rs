//! Comment-based disable directives.
//!
//! Supports directives like:
//! ```text
//! {% comment %}theme-check-disable UnusedAssign, TemplateLength{% endcomment %}
//! ...
//! {% comment %}theme-check-enable UnusedAssign{% endcomment %}
//! ```
//!
//! A directive without check names applies to every check. A range left
//! open runs to the end of the template.

use std::collections::BTreeMap;

use crate::node::{Node, Span};

const DISABLE_PREFIX: &str = "theme-check-disable";
const ENABLE_PREFIX: &str = "theme-check-enable";

/// Parsed disable/enable directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Checks to disable; empty means all.
    Disable(Vec<String>),
    /// Checks to re-enable; empty means all.
    Enable(Vec<String>),
}

/// Parses the body of a `comment` tag into a directive.
#[must_use]
pub fn parse_directive(body: &str) -> Option<Directive> {
    let body = body.trim();
    let (rest, disable) = if let Some(rest) = body.strip_prefix(DISABLE_PREFIX) {
        (rest, true)
    } else if let Some(rest) = body.strip_prefix(ENABLE_PREFIX) {
        (rest, false)
    } else {
        return None;
    };

    // `theme-check-disabled` is not a directive
    if rest.chars().next().is_some_and(|c| !c.is_whitespace() && c != ',') {
        return None;
    }

    let names: Vec<String> = rest
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    Some(if disable {
        Directive::Disable(names)
    } else {
        Directive::Enable(names)
    })
}

/// Source ranges in which checks are disabled, keyed by check name
/// (`None` for all checks).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisabledRanges {
    ranges: Vec<(Option<String>, Span)>,
}

impl DisabledRanges {
    /// Collects the ranges declared by `comment` tags in a parsed template.
    #[must_use]
    pub fn from_template(root: &Node, source: &str) -> Self {
        let mut open: BTreeMap<Option<String>, usize> = BTreeMap::new();
        let mut ranges = Vec::new();

        for node in root.descendants().filter(|n| n.type_name() == "comment") {
            let body: String = node
                .children()
                .iter()
                .map(|child| child.source(source))
                .collect();
            let Some(directive) = parse_directive(&body) else {
                continue;
            };
            let at = node.span().start;

            match directive {
                Directive::Disable(names) if names.is_empty() => {
                    open.entry(None).or_insert(at);
                }
                Directive::Disable(names) => {
                    for name in names {
                        open.entry(Some(name)).or_insert(at);
                    }
                }
                Directive::Enable(names) if names.is_empty() => {
                    for (check, start) in std::mem::take(&mut open) {
                        ranges.push((check, Span::new(start, at)));
                    }
                }
                Directive::Enable(names) => {
                    for name in names {
                        if let Some(start) = open.remove(&Some(name.clone())) {
                            ranges.push((Some(name), Span::new(start, at)));
                        }
                    }
                }
            }
        }

        for (check, start) in open {
            ranges.push((check, Span::new(start, source.len())));
        }

        Self { ranges }
    }

    /// Returns true when `check` is disabled at byte `offset`.
    #[must_use]
    pub fn is_disabled(&self, check: &str, offset: usize) -> bool {
        self.ranges.iter().any(|(name, span)| {
            name.as_deref().map_or(true, |n| n == check)
                && span.start <= offset
                && offset <= span.end
        })
    }

    /// Returns true when no ranges were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn ranges(source: &str) -> DisabledRanges {
        DisabledRanges::from_template(&parse(source).unwrap(), source)
    }

    #[test]
    fn test_parse_directive() {
        assert_eq!(
            parse_directive(" theme-check-disable A, B "),
            Some(Directive::Disable(vec!["A".into(), "B".into()]))
        );
        assert_eq!(
            parse_directive("theme-check-enable"),
            Some(Directive::Enable(vec![]))
        );
        assert_eq!(parse_directive("theme-check-disabled"), None);
        assert_eq!(parse_directive("just a comment"), None);
    }

    #[test]
    fn named_range_ends_at_enable() {
        let source = "{% comment %}theme-check-disable A{% endcomment %}x\
                      {% comment %}theme-check-enable A{% endcomment %}y";
        let r = ranges(source);
        let x = source.find('x').unwrap();
        let y = source.find('y').unwrap();
        assert!(r.is_disabled("A", x));
        assert!(!r.is_disabled("B", x));
        assert!(!r.is_disabled("A", y));
    }

    #[test]
    fn unnamed_disable_runs_to_end() {
        let source = "a{% comment %}theme-check-disable{% endcomment %}b";
        let r = ranges(source);
        assert!(!r.is_disabled("A", 0));
        assert!(r.is_disabled("A", source.len() - 1));
        assert!(r.is_disabled("B", source.len() - 1));
    }

    #[test]
    fn ordinary_comments_declare_nothing() {
        assert!(ranges("{% comment %}hello{% endcomment %}").is_empty());
    }
}
