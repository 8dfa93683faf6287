//! Environment over file settings.

use super::{EnvSettings, FileSettings, SettingsStore};
use crate::error::Result;

/// Reads the environment first and falls back to a settings file.
/// Writes always go to the file.
#[derive(Debug)]
pub struct LayeredSettings {
    overlay: EnvSettings,
    file: FileSettings,
}

impl LayeredSettings {
    pub fn new(overlay: EnvSettings, file: FileSettings) -> Self {
        Self { overlay, file }
    }

    pub fn file(&self) -> &FileSettings {
        &self.file
    }
}

impl SettingsStore for LayeredSettings {
    fn get_value(&self, key: &str) -> Result<Option<String>> {
        match self.overlay.get_value(key)? {
            Some(value) => Ok(Some(value)),
            None => self.file.get_value(key),
        }
    }

    fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.file.set_value(key, value)?;
        if self.overlay.get_value(key)?.is_some() {
            tracing::warn!(
                "{} is set in the environment and overrides the value stored in {}",
                key,
                self.file.path().display()
            );
        }
        Ok(())
    }
}
