//! Core types for offenses, corrections and analysis reports.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::node::Span;

/// Severity level for offenses.
///
/// Ordered from least to most severe, so `severity >= Severity::Suggestion`
/// selects suggestions and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Formatting or stylistic issue.
    Style,
    /// Something that should probably change.
    Suggestion,
    /// Something that is broken.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Style => write!(f, "style"),
            Self::Suggestion => write!(f, "suggestion"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "style" => Ok(Self::Style),
            "suggestion" => Ok(Self::Suggestion),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown severity `{other}`, expected: error, suggestion, style"
            )),
        }
    }
}

/// Coarse classification used to enable or disable groups of checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Checks over Liquid templates.
    Liquid,
    /// Checks over JSON files.
    Json,
    /// Checks over locale files.
    Translation,
}

impl Category {
    /// All known categories.
    pub const ALL: [Self; 3] = [Self::Liquid, Self::Json, Self::Translation];

    /// Returns the lowercase tag for this category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Liquid => "liquid",
            Self::Json => "json",
            Self::Translation => "translation",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category `{s}`, expected: liquid, json, translation"))
    }
}

/// Location of an offense inside a theme file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the theme root. Empty for theme-wide offenses.
    pub path: PathBuf,
    /// Line number (1-indexed, 0 for theme-wide offenses).
    pub line: usize,
    /// Column number (1-indexed, 0 for theme-wide offenses).
    pub column: usize,
    /// Byte offset where the offending source starts.
    pub start: usize,
    /// Byte offset where the offending source ends.
    pub end: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            path: path.into(),
            line,
            column,
            start: 0,
            end: 0,
        }
    }

    /// Location for offenses that are not tied to any file.
    #[must_use]
    pub fn theme() -> Self {
        Self::new(PathBuf::new(), 0, 0)
    }

    /// Sets the byte span for this location.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.start = span.start;
        self.end = span.end;
        self
    }

    /// Returns the byte span of this location.
    #[must_use]
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.path
            .cmp(&other.path)
            .then(self.start.cmp(&other.start))
            .then(self.end.cmp(&other.end))
            .then(self.line.cmp(&other.line))
            .then(self.column.cmp(&other.column))
    }
}

/// A text edit that resolves an offense.
///
/// Offsets are byte offsets into the template source the offense was
/// reported against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Correction {
    /// Replace `span` with `text`.
    Replace {
        /// Range to replace.
        span: Span,
        /// Replacement text.
        text: String,
    },
    /// Insert `text` at `offset`.
    Insert {
        /// Insertion point.
        offset: usize,
        /// Text to insert.
        text: String,
    },
    /// Remove `span`.
    Delete {
        /// Range to remove.
        span: Span,
    },
}

impl Correction {
    /// Creates a replacement edit.
    #[must_use]
    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self::Replace {
            span,
            text: text.into(),
        }
    }

    /// Creates an insertion edit.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::Insert {
            offset,
            text: text.into(),
        }
    }

    /// Creates a deletion edit.
    #[must_use]
    pub fn delete(span: Span) -> Self {
        Self::Delete { span }
    }

    /// The source range this edit covers.
    #[must_use]
    pub fn range(&self) -> Span {
        match self {
            Self::Replace { span, .. } | Self::Delete { span } => *span,
            Self::Insert { offset, .. } => Span::new(*offset, *offset),
        }
    }

    /// The text written in place of [`Correction::range`].
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Replace { text, .. } | Self::Insert { text, .. } => text,
            Self::Delete { .. } => "",
        }
    }
}

/// A single finding reported by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offense {
    /// Name of the check that reported this offense (e.g., "`TemplateLength`").
    pub check: String,
    /// Severity of this offense.
    pub severity: Severity,
    /// Where the offense was found.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional edit that fixes the offense.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<Correction>,
}

impl Offense {
    /// Creates a new offense.
    #[must_use]
    pub fn new(
        check: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check: check.into(),
            severity,
            location,
            message: message.into(),
            correction: None,
        }
    }

    /// Adds a correction to this offense.
    #[must_use]
    pub fn with_correction(mut self, correction: Correction) -> Self {
        self.correction = Some(correction);
        self
    }

    /// Attaches a correction to an offense that was already recorded.
    pub fn set_correction(&mut self, correction: Correction) -> &mut Self {
        self.correction = Some(correction);
        self
    }

    /// Returns true if this offense carries a correction.
    #[must_use]
    pub fn is_correctable(&self) -> bool {
        self.correction.is_some()
    }
}

impl std::fmt::Display for Offense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.path.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.check,
            self.message
        )
    }
}

/// Converts an Offense to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct OffenseDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Offense> for OffenseDiagnostic {
    fn from(o: &Offense) -> Self {
        Self {
            message: format!("[{}] {}", o.check, o.message),
            help: o
                .is_correctable()
                .then(|| "run with --auto-correct to fix".to_string()),
            span: SourceSpan::from((
                o.location.start,
                o.location.end.saturating_sub(o.location.start),
            )),
            label_message: o.severity.to_string(),
        }
    }
}

/// Result of running a theme analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Report {
    /// All offenses found, ordered by location.
    pub offenses: Vec<Offense>,
    /// Number of templates visited.
    pub templates_checked: usize,
}

impl Report {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.offenses.iter().any(|o| o.severity == Severity::Error)
    }

    /// Counts offenses by severity as `(errors, suggestions, style)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| {
            self.offenses
                .iter()
                .filter(|o| o.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Suggestion),
            count(Severity::Style),
        )
    }

    /// Checks if any offenses meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_offenses_at(&self, severity: Severity) -> bool {
        self.offenses.iter().any(|o| o.severity >= severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_offense(severity: Severity) -> Offense {
        Offense::new(
            "TemplateLength",
            severity,
            Location::new("templates/index.liquid", 3, 5).with_span(Span::new(20, 24)),
            "Template has too many lines",
        )
    }

    #[test]
    fn severity_orders_style_below_error() {
        assert!(Severity::Style < Severity::Suggestion);
        assert!(Severity::Suggestion < Severity::Error);
        assert_eq!("suggestion".parse::<Severity>(), Ok(Severity::Suggestion));
        assert!("warning".parse::<Severity>().is_err());
    }

    #[test]
    fn category_parses_lowercase_tags() {
        assert_eq!("translation".parse::<Category>(), Ok(Category::Translation));
        assert!("css".parse::<Category>().is_err());
        assert_eq!(Category::Json.to_string(), "json");
    }

    #[test]
    fn offense_display_is_compact() {
        let o = make_offense(Severity::Error);
        assert_eq!(
            o.to_string(),
            "templates/index.liquid:3:5: error [TemplateLength] Template has too many lines"
        );
    }

    #[test]
    fn offense_is_correctable_once_a_correction_is_attached() {
        let plain = make_offense(Severity::Style);
        assert!(!plain.is_correctable());

        let fixable = plain.with_correction(Correction::insert(22, " "));
        assert!(fixable.is_correctable());
    }

    #[test]
    fn locations_sort_by_path_then_offset() {
        let a = Location::new("a.liquid", 9, 1).with_span(Span::new(80, 81));
        let b = Location::new("b.liquid", 1, 1).with_span(Span::new(0, 1));
        let c = Location::new("a.liquid", 1, 4).with_span(Span::new(3, 4));
        let mut all = vec![a.clone(), b.clone(), c.clone()];
        all.sort();
        assert_eq!(all, vec![c, a, b]);
    }

    #[test]
    fn correction_ranges() {
        assert_eq!(Correction::insert(4, "x").range(), Span::new(4, 4));
        assert_eq!(Correction::delete(Span::new(1, 3)).text(), "");
        assert_eq!(Correction::replace(Span::new(1, 3), "ab").text(), "ab");
    }

    #[test]
    fn report_counts_and_thresholds() {
        let mut report = Report::new();
        report.templates_checked = 2;
        report.offenses.push(make_offense(Severity::Style));
        report.offenses.push(make_offense(Severity::Error));

        assert_eq!(report.count_by_severity(), (1, 0, 1));
        assert!(report.has_errors());
        assert!(report.has_offenses_at(Severity::Suggestion));
        assert!(!Report::new().has_offenses_at(Severity::Style));
    }
}
