//! Check that reports the deprecated `include` tag.
//!
//! `render` isolates the snippet's variables, which makes templates easier
//! to follow. The correction only swaps the tag name, so a snippet that
//! relied on the caller's variables needs them passed explicitly afterwards.

use theme_check_core::{Category, Check, Correction, HookContext, Node, Span};

/// Check name for `ConvertIncludeToRender`.
pub const NAME: &str = "ConvertIncludeToRender";

/// Reports `include` tags that should be `render` tags.
#[derive(Debug, Clone, Default)]
pub struct ConvertIncludeToRender;

impl ConvertIncludeToRender {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Range of the `include` keyword inside a tag's opening delimiters.
fn keyword_span(node: &Node, source: &str) -> Option<Span> {
    let markup = node.markup_span();
    let raw = source.get(markup.start..markup.end)?;
    let leading = raw.len() - raw.trim_start_matches(|c: char| c == '-' || c.is_whitespace()).len();
    raw[leading..]
        .starts_with("include")
        .then(|| Span::new(markup.start + leading, markup.start + leading + "include".len()))
}

impl Check for ConvertIncludeToRender {
    fn name(&self) -> &str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Liquid
    }

    fn description(&self) -> &str {
        "Reports deprecated include tags"
    }

    fn can_correct(&self) -> bool {
        true
    }

    fn on_type(&mut self, node: &Node, cx: &mut HookContext<'_>) {
        if node.type_name() != "include" {
            return;
        }
        let keyword = keyword_span(node, cx.source());
        let offense = cx.add_offense("`include` is deprecated - convert it to `render`");
        if let Some(span) = keyword {
            offense.set_correction(Correction::replace(span, "render"));
        }
    }
}
