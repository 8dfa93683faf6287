//! Installed asset discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ValidationError};

/// Parameter file inside an asset folder.
pub const PARAMETER_FILE: &str = "asset.json";

/// An asset folder found under the asset root.
#[derive(Debug, Clone)]
pub struct AssetFolder {
    pub path: PathBuf,
    /// Raw content of the parameter file, if present.
    pub parameters: Option<serde_json::Value>,
}

/// File system access needed to discover and read assets.
pub trait AssetDirectory: Send + Sync {
    /// Directory holding one folder per asset.
    fn root(&self) -> &Path;

    /// Whether `folder` exists and contains at least one entry.
    fn has_entries(&self, folder: &Path) -> bool;

    /// Read a text file, `None` when it does not exist.
    fn read_text(&self, path: &Path) -> Result<Option<String>>;

    /// Find the folder of asset `name` with its parameters.
    ///
    /// A missing or empty folder means the asset is not installed.
    fn locate(&self, name: &str) -> Result<Option<AssetFolder>> {
        let path = self.root().join(name);
        if !self.has_entries(&path) {
            return Ok(None);
        }
        let parameters = match self.read_text(&path.join(PARAMETER_FILE))? {
            Some(text) => Some(serde_json::from_str(&text).map_err(|e| {
                ValidationError::Malformed {
                    message: format!("{} in {}: {}", PARAMETER_FILE, name, e),
                }
            })?),
            None => None,
        };
        Ok(Some(AssetFolder { path, parameters }))
    }
}

/// [`AssetDirectory`] on the local file system.
#[derive(Debug, Clone)]
pub struct FsAssetDirectory {
    root: PathBuf,
}

impl FsAssetDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetDirectory for FsAssetDirectory {
    fn root(&self) -> &Path {
        &self.root
    }

    fn has_entries(&self, folder: &Path) -> bool {
        fs::read_dir(folder)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    fn read_text(&self, path: &Path) -> Result<Option<String>> {
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }
}
