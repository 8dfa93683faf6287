//! Configuration validation rules.
//!
//! - A settings prefix must form valid environment variable names
//! - A configured assets root must exist

use crate::config::schema::AdminConfig;
use crate::error::{AdminError, Result};
use crate::settings::env::is_valid_variable_name;
use std::path::Path;

/// Validate a configuration and return all problems.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &AdminConfig, root: &Path) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(prefix) = &config.settings.prefix {
        if !is_valid_variable_name(prefix) {
            errors.push(format!(
                "settings prefix '{}' must not contain '=', NUL or whitespace",
                prefix.escape_default()
            ));
        }
    }

    if config.assets_root.is_some() {
        let assets = config.assets_root(root);
        if !assets.is_dir() {
            errors.push(format!(
                "assets_root '{}' does not exist",
                assets.display()
            ));
        }
    }

    errors
}

/// Validate and return an error if any problems are found.
pub fn validate(config: &AdminConfig, root: &Path) -> Result<()> {
    let errors = validate_config(config, root);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AdminError::ConfigValidationError {
            message: errors.join("; "),
        })
    }
}
