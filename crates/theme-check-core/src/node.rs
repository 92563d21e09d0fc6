//! Syntax tree produced by the Liquid parser.
//!
//! Nodes are immutable once parsed and are owned by their [`Template`]:
//! every reference to a node borrows from the template that produced it.
//! Checks never edit nodes; corrections operate on the template source
//! through byte [`Span`]s.
//!
//! [`Template`]: crate::theme::Template

use serde::{Deserialize, Serialize};

/// Half-open byte range `start..end` into a template source.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Span {
    /// First byte of the range.
    pub start: usize,
    /// One past the last byte of the range.
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true for zero-width spans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `offset` lies inside this span.
    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// The construct a [`Node`] wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of a template.
    Document,
    /// Plain text between Liquid delimiters.
    Text,
    /// `{{ ... }}` output.
    Variable,
    /// `{% name ... %}`, with its body for block tags.
    Tag {
        /// Tag name (`if`, `assign`, `render`, ...).
        name: String,
        /// Whether the tag owns a body closed by `end<name>`.
        block: bool,
    },
}

/// A node in a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    span: Span,
    markup: Span,
    children: Vec<Node>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, span: Span, markup: Span, children: Vec<Node>) -> Self {
        Self {
            kind,
            span,
            markup,
            children,
        }
    }

    /// What this node wraps.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// String tag identifying the construct: `document`, `text`,
    /// `variable`, or the tag name for tags.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match &self.kind {
            NodeKind::Document => "document",
            NodeKind::Text => "text",
            NodeKind::Variable => "variable",
            NodeKind::Tag { name, .. } => name,
        }
    }

    /// Returns the tag name for tag nodes.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Tag { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns true for `{% ... %}` nodes.
    #[must_use]
    pub fn is_tag(&self) -> bool {
        matches!(self.kind, NodeKind::Tag { .. })
    }

    /// Returns true for tags that own a body.
    #[must_use]
    pub fn is_block(&self) -> bool {
        matches!(self.kind, NodeKind::Tag { block: true, .. })
    }

    /// Returns true for leaf text content. Literal nodes never have children.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Text)
    }

    /// Child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Full source range of this node, including a block's body and end tag.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Range of the text between the delimiters of the opening
    /// `{{ }}`/`{% %}`, whitespace-control dashes included.
    /// Equal to [`Node::span`] for text and document nodes.
    #[must_use]
    pub fn markup_span(&self) -> Span {
        self.markup
    }

    /// The full source text of this node.
    #[must_use]
    pub fn source<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.span.start..self.span.end).unwrap_or("")
    }

    /// The markup of this node, without dashes or surrounding whitespace.
    ///
    /// For tags the tag name is stripped, so `{% render 'card' %}` yields
    /// `'card'`.
    #[must_use]
    pub fn markup<'a>(&self, source: &'a str) -> &'a str {
        let raw = source.get(self.markup.start..self.markup.end).unwrap_or("");
        match &self.kind {
            NodeKind::Variable => trim_markup(raw),
            NodeKind::Tag { name, .. } => trim_markup(raw)
                .strip_prefix(name.as_str())
                .map_or("", str::trim_start),
            NodeKind::Document | NodeKind::Text => raw,
        }
    }

    /// Iterates over this node and all descendants in pre-order.
    pub fn descendants(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Strips whitespace-control dashes and surrounding whitespace.
pub(crate) fn trim_markup(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);
    trimmed.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_containment() {
        let a = Span::new(2, 6);
        assert!(a.contains(2));
        assert!(!a.contains(6));
        assert_eq!(a.len(), 4);
        assert!(Span::new(3, 3).is_empty());
    }

    #[test]
    fn tag_markup_drops_name_and_dashes() {
        let source = "{%- render 'card', product: p -%}";
        let node = Node::new(
            NodeKind::Tag {
                name: "render".into(),
                block: false,
            },
            Span::new(0, source.len()),
            Span::new(2, source.len() - 2),
            Vec::new(),
        );
        assert_eq!(node.markup(source), "'card', product: p");
        assert_eq!(node.type_name(), "render");
        assert!(node.is_tag());
        assert!(!node.is_literal());
    }

    #[test]
    fn trim_markup_handles_bare_dashes() {
        assert_eq!(trim_markup(" - x - "), "x");
        assert_eq!(trim_markup("-"), "");
    }
}
