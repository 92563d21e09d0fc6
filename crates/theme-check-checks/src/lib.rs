//! # theme-check-checks
//!
//! Built-in checks for theme-check.
//!
//! ## Available Checks
//!
//! | Name | Category | Severity | Correctable | Description |
//! |------|----------|----------|-------------|-------------|
//! | `SyntaxError` | liquid | error | no | Templates Liquid cannot parse |
//! | `TemplateLength` | liquid | suggestion | no | Templates longer than `max_length` lines |
//! | `SpaceInsideBraces` | liquid | style | yes | Spacing inside `{{ }}`/`{% %}` and after `,`/`:` |
//! | `UnknownFilter` | liquid | error | no | Filters Liquid does not define |
//! | `MissingTemplate` | liquid | error | no | `render`/`include`/`section` of missing files |
//! | `UnusedSnippet` | liquid | suggestion | no | Snippets nothing renders |
//! | `UnusedAssign` | liquid | suggestion | yes | Variables assigned but never read |
//! | `ConvertIncludeToRender` | liquid | suggestion | yes | Deprecated `include` tags |
//! | `ValidJson` | json | error | no | JSON files that fail to parse |
//! | `MatchingTranslations` | translation | suggestion | no | Locale keys that differ from the default locale |
//!
//! ## Usage
//!
//! ```ignore
//! use theme_check_core::Config;
//! use theme_check_checks::builtin_registry;
//!
//! let config = Config::from_path(Path::new("."), builtin_registry()?)?;
//! let mut analyzer = Analyzer::builder().config(config).build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod convert_include_to_render;
pub mod filters;
mod markup;
mod matching_translations;
mod missing_template;
mod registry;
mod space_inside_braces;
mod syntax_error;
mod template_length;
mod unknown_filter;
mod unused_assign;
mod unused_snippet;
mod valid_json;

#[cfg(test)]
mod test_helper;

pub use convert_include_to_render::ConvertIncludeToRender;
pub use matching_translations::MatchingTranslations;
pub use missing_template::MissingTemplate;
pub use registry::{builtin_registry, DEFAULT_SETTINGS};
pub use space_inside_braces::SpaceInsideBraces;
pub use syntax_error::SyntaxError;
pub use template_length::{TemplateLength, DEFAULT_MAX_LENGTH};
pub use unknown_filter::UnknownFilter;
pub use unused_assign::UnusedAssign;
pub use unused_snippet::UnusedSnippet;
pub use valid_json::ValidJson;

/// Re-export core types for convenience.
pub use theme_check_core::{Check, Offense, Severity};
