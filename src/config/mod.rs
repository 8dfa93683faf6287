//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use engine_admin::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("engine-admin.yml"), "auto_refresh_timeout: 0").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! validate(&config, temp.path()).unwrap();
//! assert_eq!(config.auto_refresh_interval(), None);
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{default_config_path, load_config, load_config_file, parse_config, CONFIG_FILE_NAME};
pub use schema::{AdminConfig, SettingsBackend, SettingsConfig};
pub use validator::{validate, validate_config};
