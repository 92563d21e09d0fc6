//! The built-in check registry.

use theme_check_core::{Category, CheckRegistry, ConfigError};

use crate::{
    ConvertIncludeToRender, MatchingTranslations, MissingTemplate, SpaceInsideBraces,
    SyntaxError, TemplateLength, UnknownFilter, UnusedAssign, UnusedSnippet, ValidJson,
};

/// Built-in default settings, shaped like a `.theme-check.yml`.
pub const DEFAULT_SETTINGS: &str = include_str!("../config/default.yml");

/// Returns a registry with every built-in check and its default settings.
///
/// # Errors
///
/// Returns an error if the embedded defaults fail to parse.
pub fn builtin_registry() -> Result<CheckRegistry, ConfigError> {
    let mut registry = CheckRegistry::with_default_settings(DEFAULT_SETTINGS)?;

    registry.register(crate::syntax_error::NAME, Category::Liquid, |_| {
        Box::new(SyntaxError::new())
    })?;
    registry.register(crate::template_length::NAME, Category::Liquid, |settings| {
        Box::new(TemplateLength::from_settings(settings))
    })?;
    registry.register(crate::space_inside_braces::NAME, Category::Liquid, |_| {
        Box::new(SpaceInsideBraces::new())
    })?;
    registry.register(crate::unknown_filter::NAME, Category::Liquid, |settings| {
        Box::new(UnknownFilter::from_settings(settings))
    })?;
    registry.register(crate::missing_template::NAME, Category::Liquid, |_| {
        Box::new(MissingTemplate::new())
    })?;
    registry.register(crate::unused_snippet::NAME, Category::Liquid, |_| {
        Box::new(UnusedSnippet::new())
    })?;
    registry.register(crate::unused_assign::NAME, Category::Liquid, |_| {
        Box::new(UnusedAssign::new())
    })?;
    registry.register(crate::convert_include_to_render::NAME, Category::Liquid, |_| {
        Box::new(ConvertIncludeToRender::new())
    })?;
    registry.register(crate::valid_json::NAME, Category::Json, |_| {
        Box::new(ValidJson::new())
    })?;
    registry.register(crate::matching_translations::NAME, Category::Translation, |_| {
        Box::new(MatchingTranslations::new())
    })?;

    Ok(registry)
}
