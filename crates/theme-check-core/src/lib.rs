//! # theme-check-core
//!
//! Core framework for linting Liquid themes.
//!
//! This crate provides the foundational traits and types for building
//! theme checks. It includes:
//!
//! - [`parse`] turning Liquid source into a [`Node`] tree
//! - [`Check`] trait with one no-op hook per traversal point
//! - [`Visitor`] driving the checks over each template
//! - [`Config`] resolving the nearest `.theme-check.yml` over built-in defaults
//! - [`Analyzer`] for orchestrating a run and applying corrections
//! - [`Offense`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use theme_check_core::{Analyzer, Config};
//!
//! let config = Config::from_path(Path::new("."), registry)?;
//! let mut analyzer = Analyzer::builder().config(config).build()?;
//!
//! for offense in analyzer.analyze_theme() {
//!     println!("{offense}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod check;
pub mod config;
pub mod declarative;
mod node;
pub mod parser;
mod registry;
mod theme;
mod types;
mod visitor;

/// Utility modules for the analyzer and checks.
pub mod utils;

pub use analyzer::{apply_corrections, Analyzer, AnalyzerBuilder, AnalyzerError, CorrectionSummary};
pub use check::{Check, CheckBox, CheckInstance, Checks, HookContext, NodeHook};
pub use config::{CheckSettings, Config, ConfigError, ConfigSource, Settings, SETTINGS_FILE_NAME};
pub use node::{Node, NodeKind, Span};
pub use parser::{parse, ParseError};
pub use registry::{CheckFactory, CheckRegistry};
pub use theme::{JsonError, JsonFile, SourceFile, Template, Theme, ThemeError};
pub use types::{
    Category, Correction, Location, Offense, OffenseDiagnostic, Report, Severity,
};
pub use visitor::Visitor;
