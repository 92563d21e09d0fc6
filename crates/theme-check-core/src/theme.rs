//! Theme files: Liquid templates and JSON files under a theme root.

use once_cell::unsync::OnceCell;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::node::{Node, Span};
use crate::parser::{self, ParseError};

/// A file inside a theme that offenses can point into.
pub trait SourceFile {
    /// Path relative to the theme root.
    fn relative_path(&self) -> &Path;

    /// Current source text.
    fn source(&self) -> &str;

    /// Converts a byte offset into a 1-indexed `(line, column)` pair.
    ///
    /// Offsets past the end of the source clamp to the last position.
    fn position(&self, offset: usize) -> (usize, usize) {
        let source = self.source();
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }

    /// Byte span of a 1-indexed line, without its trailing newline.
    fn line_span(&self, line: usize) -> Span {
        let source = self.source();
        let mut start = 0;
        for (index, content) in source.split('\n').enumerate() {
            if index + 1 == line {
                return Span::new(start, start + content.len());
            }
            start += content.len() + 1;
        }
        Span::new(source.len(), source.len())
    }
}

/// Name of a theme file: its relative path, `/`-separated, without extension.
fn file_name(relative_path: &Path) -> String {
    relative_path
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// One Liquid template and its lazily parsed syntax tree.
#[derive(Debug)]
pub struct Template {
    path: PathBuf,
    relative_path: PathBuf,
    name: String,
    source: String,
    root: OnceCell<Result<Node, ParseError>>,
}

impl Template {
    /// Creates a template from in-memory source.
    #[must_use]
    pub fn new(path: PathBuf, relative_path: PathBuf, source: String) -> Self {
        let name = file_name(&relative_path);
        Self {
            path,
            relative_path,
            name,
            source,
            root: OnceCell::new(),
        }
    }

    /// Reads a template from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(root: &Path, path: &Path) -> Result<Self, ThemeError> {
        let source = std::fs::read_to_string(path).map_err(|e| ThemeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let relative = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        Ok(Self::new(path.to_path_buf(), relative, source))
    }

    /// Template name, e.g. `snippets/product-card`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true for templates under `snippets/`.
    #[must_use]
    pub fn is_snippet(&self) -> bool {
        self.name.starts_with("snippets/")
    }

    /// Parses the template on first access and returns the cached tree.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the source is not valid Liquid.
    pub fn root(&self) -> Result<&Node, &ParseError> {
        self.root.get_or_init(|| parser::parse(&self.source)).as_ref()
    }

    /// Replaces the source and drops the cached tree.
    pub fn set_source(&mut self, source: String) {
        self.source = source;
        self.root = OnceCell::new();
    }

    /// Writes the current source back to the backing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self) -> Result<(), ThemeError> {
        debug!("Writing {}", self.path.display());
        std::fs::write(&self.path, &self.source).map_err(|e| ThemeError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl SourceFile for Template {
    fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// Failure to parse a JSON file, with 1-indexed position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct JsonError {
    /// Parser message.
    pub message: String,
    /// Line of the failure.
    pub line: usize,
    /// Column of the failure.
    pub column: usize,
}

/// A JSON file in the theme (settings, locales, JSON templates).
#[derive(Debug)]
pub struct JsonFile {
    relative_path: PathBuf,
    name: String,
    source: String,
    content: OnceCell<Result<serde_json::Value, JsonError>>,
}

impl JsonFile {
    /// Creates a JSON file from in-memory source.
    #[must_use]
    pub fn new(relative_path: PathBuf, source: String) -> Self {
        let name = file_name(&relative_path);
        Self {
            relative_path,
            name,
            source,
            content: OnceCell::new(),
        }
    }

    /// File name, e.g. `locales/en.default`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parsed content, cached after the first call.
    ///
    /// # Errors
    ///
    /// Returns the parse failure when the file is not valid JSON.
    pub fn content(&self) -> Result<&serde_json::Value, &JsonError> {
        self.content
            .get_or_init(|| {
                serde_json::from_str(&self.source).map_err(|e| JsonError {
                    message: e.to_string(),
                    line: e.line(),
                    column: e.column(),
                })
            })
            .as_ref()
    }
}

impl SourceFile for JsonFile {
    fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// Directories whose JSON files belong to the theme.
const JSON_DIRS: &[&str] = &["config", "locales", "sections", "templates"];

/// Errors while loading or writing theme files.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// IO error on a theme file.
    #[error("Failed to access {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

/// The set of templates and JSON files analysed as one unit.
#[derive(Debug, Default)]
pub struct Theme {
    root: PathBuf,
    templates: Vec<Template>,
    json_files: Vec<JsonFile>,
}

impl Theme {
    /// Loads every `*.liquid` file and the theme's JSON files under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if files cannot be listed or read.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, ThemeError> {
        Self::load_with_ignore(root, &[])
    }

    /// Like [`Theme::load`], skipping files whose relative path matches one
    /// of the `ignore` glob patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid or files cannot be read.
    pub fn load_with_ignore(
        root: impl Into<PathBuf>,
        ignore: &[String],
    ) -> Result<Self, ThemeError> {
        let root = root.into();
        let ignore = ignore
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let ignored = |path: &Path| {
            let relative = path.strip_prefix(&root).unwrap_or(path);
            ignore.iter().any(|p| p.matches_path(relative))
        };

        let mut templates = Vec::new();
        for path in list(&root, "**/*.liquid")? {
            if ignored(&path) {
                debug!("Ignoring {}", path.display());
                continue;
            }
            templates.push(Template::read(&root, &path)?);
        }

        let mut json_files = Vec::new();
        for dir in JSON_DIRS {
            for path in list(&root, &format!("{dir}/**/*.json"))? {
                if ignored(&path) {
                    continue;
                }
                let source = std::fs::read_to_string(&path).map_err(|e| ThemeError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                let relative = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
                json_files.push(JsonFile::new(relative, source));
            }
        }
        json_files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        debug!(
            "Loaded {} templates and {} JSON files from {}",
            templates.len(),
            json_files.len(),
            root.display()
        );

        Ok(Self {
            root,
            templates,
            json_files,
        })
    }

    /// Builds a theme from files already in memory.
    #[must_use]
    pub fn from_files(
        root: impl Into<PathBuf>,
        mut templates: Vec<Template>,
        json_files: Vec<JsonFile>,
    ) -> Self {
        templates.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Self {
            root: root.into(),
            templates,
            json_files,
        }
    }

    /// Theme root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Templates ordered by relative path.
    #[must_use]
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// JSON files ordered by relative path.
    #[must_use]
    pub fn json_files(&self) -> &[JsonFile] {
        &self.json_files
    }

    /// Looks up a template by name (`snippets/card`).
    #[must_use]
    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub(crate) fn template_by_path_mut(&mut self, relative_path: &Path) -> Option<&mut Template> {
        self.templates
            .iter_mut()
            .find(|t| t.relative_path == relative_path)
    }

    /// Looks up a template or JSON file by relative path.
    #[must_use]
    pub fn file(&self, relative_path: &Path) -> Option<&dyn SourceFile> {
        self.templates
            .iter()
            .find(|t| t.relative_path == relative_path)
            .map(|t| t as &dyn SourceFile)
            .or_else(|| {
                self.json_files
                    .iter()
                    .find(|j| j.relative_path == relative_path)
                    .map(|j| j as &dyn SourceFile)
            })
    }
}

/// Lists files under `root` matching `pattern`, sorted.
fn list(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, ThemeError> {
    let escaped = glob::Pattern::escape(&root.to_string_lossy());
    let mut files = Vec::new();
    for entry in glob::glob(&format!("{escaped}/{pattern}"))? {
        let path = entry.map_err(|e| ThemeError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
