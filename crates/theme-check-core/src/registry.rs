//! Named check factories plus their built-in default settings.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::check::CheckBox;
use crate::config::{CheckSettings, ConfigError, Settings};
use crate::types::Category;

/// Builds a check instance from its merged settings slice.
pub type CheckFactory = Arc<dyn Fn(&CheckSettings) -> CheckBox + Send + Sync>;

#[derive(Clone)]
struct Registered {
    name: String,
    category: Category,
    factory: CheckFactory,
}

/// Every check known to a run, in registration order.
///
/// Built-in checks register here at startup; custom checks named by a
/// settings file's `require` key are added during config resolution.
#[derive(Clone, Default)]
pub struct CheckRegistry {
    entries: Vec<Registered>,
    defaults: BTreeMap<String, CheckSettings>,
}

impl CheckRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry whose defaults come from a YAML document
    /// shaped like a settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn with_default_settings(yaml: &str) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.set_default_settings(Settings::parse(yaml)?);
        Ok(registry)
    }

    /// Replaces the default slices with the check entries of `settings`.
    pub fn set_default_settings(&mut self, settings: Settings) {
        self.defaults = settings.checks;
    }

    /// Registers a check factory under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if a check with the same name is already registered.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        category: Category,
        factory: F,
    ) -> Result<(), ConfigError>
    where
        F: Fn(&CheckSettings) -> CheckBox + Send + Sync + 'static,
    {
        let name = name.into();
        if self.contains(&name) {
            return Err(ConfigError::DuplicateCheck { name });
        }
        tracing::debug!("Registered check {name} ({category})");
        self.entries.push(Registered {
            name,
            category,
            factory: Arc::new(factory),
        });
        Ok(())
    }

    /// Returns true when a check named `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Registered category of a check.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<Category> {
        self.find(name).map(|e| e.category)
    }

    /// Check names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Built-in default slice of a check, if the defaults mention it.
    #[must_use]
    pub fn default_settings(&self, name: &str) -> Option<&CheckSettings> {
        self.defaults.get(name)
    }

    /// Builds a check from its factory.
    #[must_use]
    pub fn instantiate(&self, name: &str, settings: &CheckSettings) -> Option<CheckBox> {
        self.find(name).map(|e| (e.factory)(settings))
    }

    /// Builds every registered check with its default slice, regardless of
    /// whether it is enabled. Used for listing.
    #[must_use]
    pub fn all_checks(&self) -> Vec<CheckBox> {
        let empty = CheckSettings::default();
        self.entries
            .iter()
            .map(|e| (e.factory)(self.defaults.get(&e.name).unwrap_or(&empty)))
            .collect()
    }

    fn find(&self, name: &str) -> Option<&Registered> {
        self.entries.iter().find(|e| e.name == name)
    }
}

impl fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("checks", &self.names().collect::<Vec<_>>())
            .field("defaults", &self.defaults.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Check;

    struct Named(String);

    impl Check for Named {
        fn name(&self) -> &str {
            &self.0
        }
        fn category(&self) -> Category {
            Category::Liquid
        }
    }

    #[test]
    fn register_and_instantiate() {
        let mut registry = CheckRegistry::new();
        registry
            .register("A", Category::Liquid, |_| Box::new(Named("A".into())))
            .unwrap();
        registry
            .register("B", Category::Json, |_| Box::new(Named("B".into())))
            .unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(registry.category("B"), Some(Category::Json));
        let check = registry.instantiate("A", &CheckSettings::new()).unwrap();
        assert_eq!(check.name(), "A");
        assert!(registry.instantiate("C", &CheckSettings::new()).is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = CheckRegistry::new();
        registry
            .register("A", Category::Liquid, |_| Box::new(Named("A".into())))
            .unwrap();
        let err = registry
            .register("A", Category::Json, |_| Box::new(Named("A".into())))
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateCheck { name } if name == "A"));
    }

    #[test]
    fn factory_receives_settings() {
        let mut registry = CheckRegistry::with_default_settings("A:\n  label: from-defaults\n")
            .unwrap();
        registry
            .register("A", Category::Liquid, |settings| {
                Box::new(Named(settings.get_str("label", "none").to_string()))
            })
            .unwrap();

        let checks = registry.all_checks();
        assert_eq!(checks[0].name(), "from-defaults");
        assert_eq!(
            registry
                .default_settings("A")
                .map(|s| s.get_str("label", "")),
            Some("from-defaults")
        );
    }
}
