//! Custom checks declared in YAML and loaded through a settings file's
//! `require` key.
//!
//! # Architecture
//!
//! ```text
//! YAML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! PatternCheckDef (compiled regex)
//!   ↓ register_file()
//! CheckRegistry factory
//! ```

use std::path::Path;

use tracing::info;

use crate::config::ConfigError;
use crate::registry::CheckRegistry;

pub mod config_dto;
pub mod loader;
pub mod model;

pub use model::{PatternCheck, PatternCheckDef};

/// Reads and validates a check definition file.
///
/// # Errors
///
/// Returns [`ConfigError::LoadCheck`] if the file is missing, is not valid
/// YAML, or a definition fails validation.
pub fn load_file(path: &Path) -> Result<Vec<PatternCheckDef>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadCheck {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    loader::load_str(&content).map_err(|e| ConfigError::LoadCheck {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Loads a definition file and registers a factory for each check in it.
///
/// # Errors
///
/// Returns an error if loading fails or a name is already registered.
pub fn register_file(registry: &mut CheckRegistry, path: &Path) -> Result<(), ConfigError> {
    for def in load_file(path)? {
        info!("Loaded custom check {} from {}", def.name(), path.display());
        let name = def.name().to_string();
        let category = def.category();
        registry.register(name, category, move |_| {
            Box::new(PatternCheck::new(def.clone()))
        })?;
    }
    Ok(())
}
