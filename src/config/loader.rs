//! Configuration file discovery and loading.

use crate::config::schema::AdminConfig;
use crate::error::{AdminError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the installation root.
pub const CONFIG_FILE_NAME: &str = "engine-admin.yml";

/// Default configuration path for an installation root.
pub fn default_config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Load the configuration for `root`.
///
/// With `explicit` set the file must exist. Otherwise a missing
/// `engine-admin.yml` yields the defaults.
///
/// # Errors
///
/// Returns `ConfigNotFound` if an explicit file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<AdminConfig> {
    match explicit {
        Some(path) => load_config_file(path),
        None => {
            let path = default_config_path(root);
            if path.exists() {
                load_config_file(&path)
            } else {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(AdminConfig::default())
            }
        }
    }
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<AdminConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AdminError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            AdminError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into AdminConfig.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<AdminConfig> {
    if content.trim().is_empty() {
        return Ok(AdminConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| AdminError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
