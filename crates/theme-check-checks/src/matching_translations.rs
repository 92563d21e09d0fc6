//! Check that compares every locale file with the default locale.
//!
//! Keys are compared as dotted paths of leaf values. Plural forms (`one`,
//! `other`, ...) count as one key, since languages pluralize differently.
//! Files that fail to parse are left to `ValidJson`.

use std::collections::BTreeSet;

use serde_json::Value;
use theme_check_core::{Category, Check, HookContext, JsonFile, Span, Theme};

/// Check name for `MatchingTranslations`.
pub const NAME: &str = "MatchingTranslations";

const PLURAL_KEYS: &[&str] = &["zero", "one", "two", "few", "many", "other"];

/// Reports locale keys missing from, or absent in, the default locale.
#[derive(Debug, Clone, Default)]
pub struct MatchingTranslations;

impl MatchingTranslations {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_locale(file: &JsonFile) -> bool {
    file.name().starts_with("locales/") && !file.name().ends_with(".schema")
}

fn is_default_locale(file: &JsonFile) -> bool {
    file.name().ends_with(".default")
}

fn is_plural_group(map: &serde_json::Map<String, Value>) -> bool {
    !map.is_empty() && map.keys().all(|k| PLURAL_KEYS.contains(&k.as_str()))
}

fn key_paths(value: &Value) -> BTreeSet<String> {
    fn walk(value: &Value, prefix: &str, out: &mut BTreeSet<String>) {
        match value {
            Value::Object(map) if !is_plural_group(map) => {
                for (key, child) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    walk(child, &path, out);
                }
            }
            _ if !prefix.is_empty() => {
                out.insert(prefix.to_string());
            }
            _ => {}
        }
    }

    let mut out = BTreeSet::new();
    walk(value, "", &mut out);
    out
}

fn joined<'a>(keys: impl Iterator<Item = &'a String>) -> String {
    keys.map(String::as_str).collect::<Vec<_>>().join(", ")
}

impl Check for MatchingTranslations {
    fn name(&self) -> &str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Translation
    }

    fn description(&self) -> &str {
        "Reports translation keys that differ from the default locale"
    }

    fn on_end(&mut self, theme: &Theme, cx: &mut HookContext<'_>) {
        let locales: Vec<&JsonFile> = theme.json_files().iter().filter(|f| is_locale(f)).collect();
        let Some(default) = locales.iter().find(|f| is_default_locale(f)) else {
            return;
        };
        let Ok(default_content) = default.content() else {
            return;
        };
        let expected = key_paths(default_content);

        for file in locales.iter().filter(|f| !is_default_locale(f)) {
            let Ok(content) = file.content() else {
                continue;
            };
            let actual = key_paths(content);
            let missing = joined(expected.difference(&actual));
            let extra = joined(actual.difference(&expected));

            if !missing.is_empty() {
                cx.add_offense_in(*file, Span::default(), format!("Missing translation keys: {missing}"));
            }
            if !extra.is_empty() {
                cx.add_offense_in(*file, Span::default(), format!("Extra translation keys: {extra}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{analyze_theme, lines};

    #[test]
    fn test_reports_missing_and_extra_keys() {
        let offenses = analyze_theme(
            vec![Box::new(MatchingTranslations::new())],
            &[
                (
                    "locales/en.default.json",
                    r#"{"hello": {"world": "Hello", "you": "You"}, "items": {"one": "1 item", "other": "{{ count }} items"}}"#,
                ),
                (
                    "locales/fr.json",
                    r#"{"hello": {"world": "Bonjour", "extra": "!"}, "items": {"one": "1", "many": "n", "other": "n"}}"#,
                ),
                ("locales/de.json", r#"{"hello": {"world": "Hallo", "you": "Du"}, "items": {"one": "1", "other": "n"}}"#),
                ("locales/en.default.schema.json", r#"{"schema_only": "x"}"#),
            ],
        );
        assert_eq!(
            lines(&offenses),
            vec![
                "locales/fr.json:1:1: suggestion [MatchingTranslations] Missing translation keys: hello.you",
                "locales/fr.json:1:1: suggestion [MatchingTranslations] Extra translation keys: hello.extra",
            ]
        );
    }

    #[test]
    fn test_no_default_locale_reports_nothing() {
        let offenses = analyze_theme(
            vec![Box::new(MatchingTranslations::new())],
            &[("locales/fr.json", r#"{"a": "b"}"#)],
        );
        assert!(offenses.is_empty());
    }

    #[test]
    fn test_key_paths_flatten_nested_objects() {
        let value: Value = serde_json::json!({"a": {"b": "x", "c": {"d": 1}}, "e": []});
        let paths: Vec<String> = key_paths(&value).into_iter().collect();
        assert_eq!(paths, vec!["a.b", "a.c.d", "e"]);
    }
}
