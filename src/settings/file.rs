//! YAML file settings.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::SettingsStore;
use crate::error::{AdminError, Result};

/// [`SettingsStore`] persisted as a flat YAML map.
///
/// The file is read on every access and rewritten on every change, so
/// several processes see each other's updates. A missing file reads as
/// empty and is created on first write.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_yaml::from_str(&content).map_err(|e| AdminError::ConfigParseError {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

impl SettingsStore for FileSettings {
    fn get_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .load()?
            .remove(key)
            .filter(|value| !value.trim().is_empty()))
    }

    fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(&values).map_err(|e| AdminError::Settings {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, content)?;
        tracing::debug!("Stored setting {} in {}", key, self.path.display());
        Ok(())
    }
}
