//! Environment variable settings.

use super::SettingsStore;
use crate::error::{AdminError, Result};

/// Read-only [`SettingsStore`] over process environment variables.
///
/// Variables set for this process only last until it exits, so writes are
/// refused. [`LayeredSettings`](super::LayeredSettings) puts the environment
/// over a [`FileSettings`](super::FileSettings) that takes the writes.
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    prefix: String,
}

impl EnvSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `prefix` to every key, e.g. to isolate test runs.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn variable(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

/// Whether `name` can be used as an environment variable name.
pub fn is_valid_variable_name(name: &str) -> bool {
    !name.chars().any(|c| c == '=' || c == '\0' || c.is_whitespace())
}

impl SettingsStore for EnvSettings {
    fn get_value(&self, key: &str) -> Result<Option<String>> {
        let variable = self.variable(key);
        if !is_valid_variable_name(&variable) {
            return Err(AdminError::Settings {
                key: key.to_string(),
                message: format!("'{}' is not a valid environment variable name", variable),
            });
        }
        match std::env::var(variable) {
            Ok(value) if !value.trim().is_empty() => Ok(Some(value)),
            Ok(_) | Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(AdminError::Settings {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn set_value(&self, key: &str, _value: &str) -> Result<()> {
        Err(AdminError::Settings {
            key: key.to_string(),
            message: "environment settings are read-only; set 'settings.backend: file' to store connections"
                .to_string(),
        })
    }
}
