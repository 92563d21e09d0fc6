//! Check that enforces single spaces inside Liquid delimiters.
//!
//! # Detected Patterns
//!
//! - `{{x}}`, `{%if x%}`: space missing after `{{`/`{%` or before `}}`/`%}`
//! - `{{  x  }}`: more than one space next to a delimiter
//! - `a,b` and `key:value` outside strings: space missing after `,`/`:`
//! - `a,  b`: more than one space after `,`/`:`
//!
//! Closing `end<name>` tags get the delimiter checks too.
//!
//! Every offense carries a correction that inserts or collapses spaces.

use theme_check_core::{Category, Check, Correction, HookContext, Node, Severity, Span};

use crate::markup::unquoted_ranges;

/// Check name for `SpaceInsideBraces`.
pub const NAME: &str = "SpaceInsideBraces";

/// Reports missing or repeated spaces inside `{{ }}` and `{% %}`.
#[derive(Debug, Clone, Default)]
pub struct SpaceInsideBraces;

impl SpaceInsideBraces {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Range between the delimiters of a block's `end<name>` tag, which the
    /// parser folds into the block node's span.
    fn end_tag_markup(node: &Node, source: &str) -> Option<Span> {
        let span = node.span();
        let text = node.source(source);
        let body = text.strip_suffix("%}")?;
        let open = body.rfind("{%")?;
        let markup = Span::new(span.start + open + 2, span.end - 2);
        let inner = source.get(markup.start..markup.end)?;
        let name = inner.trim_matches(|c: char| c == '-' || c.is_whitespace());
        (markup.start > node.markup_span().end && name.starts_with("end")).then_some(markup)
    }

    fn check_delimiters(markup: Span, is_tag: bool, cx: &mut HookContext<'_>) {
        let source = cx.source();
        let Some(raw) = source.get(markup.start..markup.end) else {
            return;
        };

        let lead_dash = raw.starts_with('-');
        let trail_dash = raw.len() > 1 && raw.ends_with('-');
        let start = markup.start + usize::from(lead_dash);
        let end = markup.end - usize::from(trail_dash);
        let Some(inner) = source.get(start..end) else {
            return;
        };
        if inner.trim().is_empty() {
            return;
        }

        let (open, close) = if is_tag { ("{%", "%}") } else { ("{{", "}}") };
        let opening = if lead_dash { format!("{open}-") } else { open.to_string() };
        let closing = if trail_dash { format!("-{close}") } else { close.to_string() };

        let leading = inner.len() - inner.trim_start().len();
        if leading == 0 {
            cx.add_offense_at(format!("Space missing after '{opening}'"), Span::new(start, start))
                .set_correction(Correction::insert(start, " "));
        } else if is_repeated_spaces(&inner[..leading]) {
            let span = Span::new(start, start + leading);
            cx.add_offense_at(format!("Too many spaces after '{opening}'"), span)
                .set_correction(Correction::replace(span, " "));
        }

        let trailing = inner.len() - inner.trim_end().len();
        if trailing == 0 {
            cx.add_offense_at(format!("Space missing before '{closing}'"), Span::new(end, end))
                .set_correction(Correction::insert(end, " "));
        } else if is_repeated_spaces(&inner[inner.len() - trailing..]) {
            let span = Span::new(end - trailing, end);
            cx.add_offense_at(format!("Too many spaces before '{closing}'"), span)
                .set_correction(Correction::replace(span, " "));
        }
    }

    fn check_separators(node: &Node, cx: &mut HookContext<'_>) {
        let source = cx.source();
        let markup = node.markup_span();
        let Some(raw) = source.get(markup.start..markup.end) else {
            return;
        };

        for (range_start, range_end) in unquoted_ranges(raw) {
            let chunk = &raw[range_start..range_end];
            for (i, c) in chunk.char_indices().filter(|(_, c)| *c == ',' || *c == ':') {
                let after = &chunk[i + 1..];
                let at = markup.start + range_start + i + 1;
                match after.chars().next() {
                    None => {}
                    Some(next) if !next.is_whitespace() => {
                        cx.add_offense_at(format!("Space missing after '{c}'"), Span::new(at, at))
                            .set_correction(Correction::insert(at, " "));
                    }
                    Some(_) => {
                        let spaces = after.len() - after.trim_start_matches(' ').len();
                        let rest = &after[spaces..];
                        if spaces > 1 && !rest.is_empty() && !rest.starts_with('\n') {
                            let span = Span::new(at, at + spaces);
                            cx.add_offense_at(format!("Too many spaces after '{c}'"), span)
                                .set_correction(Correction::replace(span, " "));
                        }
                    }
                }
            }
        }
    }
}

fn is_repeated_spaces(whitespace: &str) -> bool {
    whitespace.len() > 1 && whitespace.chars().all(|c| c == ' ')
}

impl Check for SpaceInsideBraces {
    fn name(&self) -> &str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Liquid
    }

    fn description(&self) -> &str {
        "Ensures consistent spacing inside Liquid delimiters"
    }

    fn default_severity(&self) -> Severity {
        Severity::Style
    }

    fn can_correct(&self) -> bool {
        true
    }

    fn on_node(&mut self, node: &Node, cx: &mut HookContext<'_>) {
        let checked = match node.type_name() {
            "variable" => true,
            "liquid" => false,
            _ => node.is_tag(),
        };
        if checked {
            Self::check_delimiters(node.markup_span(), node.is_tag(), cx);
            Self::check_separators(node, cx);
        }
        if checked && node.is_block() {
            if let Some(markup) = Self::end_tag_markup(node, cx.source()) {
                Self::check_delimiters(markup, true, cx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{analyze_theme, fix_theme, lines};

    fn check(source: &str) -> Vec<String> {
        lines(&analyze_theme(
            vec![Box::new(SpaceInsideBraces::new())],
            &[("templates/index.liquid", source)],
        ))
    }

    fn fix(source: &str) -> String {
        let fixed = fix_theme(
            vec![Box::new(SpaceInsideBraces::new())],
            &[("templates/index.liquid", source)],
        );
        fixed["templates/index.liquid"].clone()
    }

    #[test]
    fn test_reports_missing_spaces() {
        assert_eq!(
            check("{{x}}"),
            vec![
                "templates/index.liquid:1:3: style [SpaceInsideBraces] Space missing after '{{'",
                "templates/index.liquid:1:4: style [SpaceInsideBraces] Space missing before '}}'",
            ]
        );
    }

    #[test]
    fn test_allows_single_spaces_and_newlines() {
        assert!(check("{{ x }}{%- if a -%}\n{%\n  render 'b'\n%}{% endif %}").is_empty());
    }

    #[test]
    fn test_reports_closing_tags() {
        assert_eq!(
            check("{% if a %}x{%-endif  %}"),
            vec![
                "templates/index.liquid:1:15: style [SpaceInsideBraces] Space missing after '{%-'",
                "templates/index.liquid:1:20: style [SpaceInsideBraces] Too many spaces before '%}'",
            ]
        );
        assert!(check("{% comment %}{{x}}{% endcomment %}").is_empty());
    }

    #[test]
    fn test_ignores_separators_in_strings() {
        assert!(check("{{ 'a,b:c' | append: 'd' }}").is_empty());
    }

    #[test]
    fn test_fixes_delimiters() {
        assert_eq!(fix("{{x}} {%if a%}{%endif%}"), "{{ x }} {% if a %}{% endif %}");
        assert_eq!(fix("{{-  x  -}}"), "{{- x -}}");
    }

    #[test]
    fn test_fixes_separators() {
        assert_eq!(
            fix("{% render 'card',product:p %}"),
            "{% render 'card', product: p %}"
        );
        assert_eq!(fix("{{ x | t:  a,   b }}"), "{{ x | t: a, b }}");
    }
}
