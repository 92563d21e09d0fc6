//! Liquid template parser.
//!
//! Turns template source into a [`Node`] tree rooted at a `document` node.
//! The parser is structural: it recognises delimiters, tag
//! names and block nesting, and leaves tag markup unparsed.

use regex::Regex;

use crate::node::{trim_markup, Node, NodeKind, Span};

/// Tags that own a parsed body closed by `end<name>`.
const BLOCK_TAGS: &[&str] = &[
    "if", "unless", "case", "for", "tablerow", "capture", "form", "paginate",
];

/// Tags whose body is kept verbatim as a single text node.
const RAW_TAGS: &[&str] = &[
    "comment",
    "raw",
    "schema",
    "style",
    "stylesheet",
    "javascript",
];

/// Tags without a body.
const INLINE_TAGS: &[&str] = &[
    "#",
    "assign",
    "break",
    "continue",
    "cycle",
    "decrement",
    "echo",
    "include",
    "increment",
    "layout",
    "liquid",
    "render",
    "section",
    "sections",
];

/// A structural error in a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Liquid syntax error (line {line}): {message}{}", in_template(.template_name.as_deref()))]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Line where the problem was detected (1-indexed).
    pub line: usize,
    /// Name of the template, attached by the visitor.
    pub template_name: Option<String>,
}

fn in_template(name: Option<&str>) -> String {
    name.map(|n| format!(" in '{n}'")).unwrap_or_default()
}

impl ParseError {
    fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
            template_name: None,
        }
    }

    /// Attaches the name of the template that failed to parse.
    #[must_use]
    pub fn with_template_name(mut self, name: impl Into<String>) -> Self {
        self.template_name = Some(name.into());
        self
    }
}

/// Parses Liquid source into a `document` node.
///
/// # Errors
///
/// Returns a [`ParseError`] for unterminated delimiters, unknown or
/// misplaced tags, and blocks that are never closed.
pub fn parse(source: &str) -> Result<Node, ParseError> {
    Parser::new(source).parse()
}

struct Frame {
    name: String,
    start: usize,
    markup: Span,
    line: usize,
    children: Vec<Node>,
}

struct Parser<'s> {
    source: &'s str,
    pos: usize,
    stack: Vec<Frame>,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            pos: 0,
            stack: vec![Frame {
                name: String::new(),
                start: 0,
                markup: Span::new(0, source.len()),
                line: 1,
                children: Vec::new(),
            }],
        }
    }

    fn parse(mut self) -> Result<Node, ParseError> {
        let len = self.source.len();

        while self.pos < len {
            let Some((open, is_variable)) = find_delimiter(self.source, self.pos) else {
                self.push_text(self.pos, len);
                break;
            };
            if open > self.pos {
                self.push_text(self.pos, open);
            }
            if is_variable {
                self.variable(open)?;
            } else {
                self.tag(open)?;
            }
        }

        if self.stack.len() > 1 {
            if let Some(unclosed) = self.stack.last() {
                return Err(ParseError::new(
                    format!("'{}' tag was never closed", unclosed.name),
                    unclosed.line,
                ));
            }
        }

        let children = self
            .stack
            .pop()
            .map(|frame| frame.children)
            .unwrap_or_default();
        Ok(Node::new(
            NodeKind::Document,
            Span::new(0, len),
            Span::new(0, len),
            children,
        ))
    }

    fn line_at(&self, offset: usize) -> usize {
        self.source[..offset].matches('\n').count() + 1
    }

    fn push(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        }
    }

    fn push_text(&mut self, start: usize, end: usize) {
        let span = Span::new(start, end);
        self.push(Node::new(NodeKind::Text, span, span, Vec::new()));
        self.pos = end;
    }

    fn variable(&mut self, open: usize) -> Result<(), ParseError> {
        let inner_start = open + 2;
        let Some(rel) = self.source[inner_start..].find("}}") else {
            return Err(ParseError::new(
                r"Variable '{{' was not properly terminated with regexp: /\}\}/",
                self.line_at(open),
            ));
        };
        let inner_end = inner_start + rel;
        let end = inner_end + 2;
        self.push(Node::new(
            NodeKind::Variable,
            Span::new(open, end),
            Span::new(inner_start, inner_end),
            Vec::new(),
        ));
        self.pos = end;
        Ok(())
    }

    fn tag(&mut self, open: usize) -> Result<(), ParseError> {
        let source = self.source;
        let line = self.line_at(open);
        let inner_start = open + 2;
        let Some(rel) = source[inner_start..].find("%}") else {
            return Err(ParseError::new(
                r"Tag '{%' was not properly terminated with regexp: /\%\}/",
                line,
            ));
        };
        let inner_end = inner_start + rel;
        let end = inner_end + 2;
        let markup = Span::new(inner_start, inner_end);

        let name = tag_name(trim_markup(&source[inner_start..inner_end]));
        if name.is_empty() {
            return Err(ParseError::new("Empty tag", line));
        }
        self.pos = end;

        if RAW_TAGS.contains(&name) {
            return self.raw_tag(name, open, markup, end, line);
        }
        if BLOCK_TAGS.contains(&name) {
            self.stack.push(Frame {
                name: name.to_string(),
                start: open,
                markup,
                line,
                children: Vec::new(),
            });
            return Ok(());
        }
        if let Some(target) = name.strip_prefix("end") {
            return self.close_block(name, target, end, line);
        }
        if let Some(parents) = intermediate_parents(name) {
            let parent = self.stack.last().map_or("", |f| f.name.as_str());
            if self.stack.len() == 1 || !parents.contains(&parent) {
                return Err(ParseError::new(
                    format!("Unexpected tag '{name}' outside of a matching block"),
                    line,
                ));
            }
        } else if !INLINE_TAGS.contains(&name) {
            return Err(ParseError::new(format!("Unknown tag '{name}'"), line));
        }

        self.push(Node::new(
            NodeKind::Tag {
                name: name.to_string(),
                block: false,
            },
            Span::new(open, end),
            markup,
            Vec::new(),
        ));
        Ok(())
    }

    fn raw_tag(
        &mut self,
        name: &str,
        open: usize,
        markup: Span,
        body_start: usize,
        line: usize,
    ) -> Result<(), ParseError> {
        let pattern = format!(r"\{{%-?\s*end{}\s*-?%\}}", regex::escape(name));
        let end_tag = Regex::new(&pattern).map_err(|e| ParseError::new(e.to_string(), line))?;
        let Some(close) = end_tag.find_at(self.source, body_start) else {
            return Err(ParseError::new(format!("'{name}' tag was never closed"), line));
        };

        let body = Span::new(body_start, close.start());
        let children = if body.is_empty() {
            Vec::new()
        } else {
            vec![Node::new(NodeKind::Text, body, body, Vec::new())]
        };
        self.push(Node::new(
            NodeKind::Tag {
                name: name.to_string(),
                block: true,
            },
            Span::new(open, close.end()),
            markup,
            children,
        ));
        self.pos = close.end();
        Ok(())
    }

    fn close_block(
        &mut self,
        name: &str,
        target: &str,
        end: usize,
        line: usize,
    ) -> Result<(), ParseError> {
        if self.stack.len() == 1 {
            return Err(ParseError::new(format!("Unknown tag '{name}'"), line));
        }
        let open_name = self.stack.last().map(|f| f.name.clone()).unwrap_or_default();
        if open_name != target {
            return Err(ParseError::new(
                format!(
                    "'{name}' is not a valid delimiter for {open_name} tags. use end{open_name}"
                ),
                line,
            ));
        }
        if let Some(frame) = self.stack.pop() {
            self.push(Node::new(
                NodeKind::Tag {
                    name: frame.name,
                    block: true,
                },
                Span::new(frame.start, end),
                frame.markup,
                frame.children,
            ));
        }
        Ok(())
    }
}

/// Finds the next `{{` or `{%` at or after `from`.
fn find_delimiter(source: &str, from: usize) -> Option<(usize, bool)> {
    let bytes = source.as_bytes();
    let mut cursor = from;
    while let Some(rel) = source[cursor..].find('{') {
        let at = cursor + rel;
        match bytes.get(at + 1) {
            Some(b'{') => return Some((at, true)),
            Some(b'%') => return Some((at, false)),
            _ => cursor = at + 1,
        }
    }
    None
}

fn tag_name(markup: &str) -> &str {
    if markup.starts_with('#') {
        return "#";
    }
    markup.split_whitespace().next().unwrap_or("")
}

fn intermediate_parents(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "else" => Some(&["if", "unless", "case", "for"]),
        "elsif" => Some(&["if", "unless"]),
        "when" => Some(&["case"]),
        _ => None,
    }
}
