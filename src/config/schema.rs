//! Configuration schema definitions for engine administration.
//!
//! This module contains the struct definitions that map to
//! the `engine-admin.yml` file format.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings file used when `settings.path` is not configured.
pub const DEFAULT_SETTINGS_FILE: &str = "engine-admin.settings.yml";

/// Default automatic refresh interval in seconds.
pub const DEFAULT_AUTO_REFRESH_SECS: i64 = 120;

/// Accepted range for a configured automatic refresh interval.
pub const AUTO_REFRESH_RANGE: std::ops::RangeInclusive<i64> = 15..=3600;

/// Default HTTP probe timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Root configuration structure for engine-admin.yml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Directory holding one folder per asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets_root: Option<PathBuf>,

    /// Directory standing in for the local database server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_data_dir: Option<PathBuf>,

    /// HTTP probe timeout in seconds (0 = default)
    pub http_connect_timeout: u64,

    /// Replaces every database connection timeout (0 = keep)
    pub database_connect_timeout: u32,

    /// Collation for newly created databases
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_collation: Option<String>,

    /// Automatic status refresh in seconds (<= 0 disables)
    pub auto_refresh_timeout: i64,

    /// Let the HTTP probe accept self-signed certificates
    pub accept_invalid_certs: bool,

    /// Program hosting web server assets
    pub webserver_host: String,

    /// Where connection settings are persisted
    pub settings: SettingsConfig,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            assets_root: None,
            database_data_dir: None,
            http_connect_timeout: 0,
            database_connect_timeout: 0,
            database_collation: None,
            auto_refresh_timeout: DEFAULT_AUTO_REFRESH_SECS,
            accept_invalid_certs: false,
            webserver_host: crate::launcher::DEFAULT_WEBSERVER_HOST.to_string(),
            settings: SettingsConfig::default(),
        }
    }
}

impl AdminConfig {
    /// Automatic refresh interval, `None` when disabled.
    ///
    /// Out-of-range values fall back to the default interval.
    pub fn auto_refresh_interval(&self) -> Option<Duration> {
        let secs = self.auto_refresh_timeout;
        if secs <= 0 {
            return None;
        }
        let secs = if AUTO_REFRESH_RANGE.contains(&secs) {
            secs
        } else {
            DEFAULT_AUTO_REFRESH_SECS
        };
        Some(Duration::from_secs(secs as u64))
    }

    pub fn http_timeout(&self) -> Duration {
        match self.http_connect_timeout {
            0 => DEFAULT_HTTP_TIMEOUT,
            secs => Duration::from_secs(secs),
        }
    }

    /// Assets directory, relative paths resolved against `root`.
    pub fn assets_root(&self, root: &Path) -> PathBuf {
        match &self.assets_root {
            Some(path) => root.join(path),
            None => root.to_path_buf(),
        }
    }

    /// Local database directory, `<root>/data` unless configured.
    pub fn database_data_dir(&self, root: &Path) -> PathBuf {
        match &self.database_data_dir {
            Some(path) => root.join(path),
            None => root.join("data"),
        }
    }

    /// Settings file path for the file backend.
    pub fn settings_path(&self, root: &Path) -> PathBuf {
        match &self.settings.path {
            Some(path) => root.join(path),
            None => root.join(DEFAULT_SETTINGS_FILE),
        }
    }
}

/// Settings persistence configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub backend: SettingsBackend,

    /// File used by the `file` backend, relative to the root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Prefix prepended to environment variable names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

/// Where connection settings live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsBackend {
    /// Read-only process environment
    Environment,
    /// Settings file, with the environment overriding it on read
    #[default]
    File,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AdminConfig::default();
        assert_eq!(config.auto_refresh_interval(), Some(Duration::from_secs(120)));
        assert_eq!(config.http_timeout(), DEFAULT_HTTP_TIMEOUT);
        assert_eq!(config.webserver_host, "dotnet");
        assert_eq!(config.settings.backend, SettingsBackend::File);
        assert_eq!(
            config.settings_path(Path::new("/opt/engine")),
            PathBuf::from("/opt/engine/engine-admin.settings.yml")
        );
    }

    #[test]
    fn parses_full_config() {
        let yaml = r#"
assets_root: assets
http_connect_timeout: 10
database_connect_timeout: 45
database_collation: NOCASE
auto_refresh_timeout: 30
accept_invalid_certs: true
webserver_host: /usr/bin/dotnet
settings:
  backend: file
  path: settings.yml
"#;
        let config: AdminConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.assets_root, Some(PathBuf::from("assets")));
        assert_eq!(config.http_timeout(), Duration::from_secs(10));
        assert_eq!(config.database_connect_timeout, 45);
        assert_eq!(config.database_collation.as_deref(), Some("NOCASE"));
        assert_eq!(config.auto_refresh_interval(), Some(Duration::from_secs(30)));
        assert!(config.accept_invalid_certs);
        assert_eq!(config.settings.backend, SettingsBackend::File);
        assert_eq!(
            config.settings_path(Path::new("/opt/engine")),
            PathBuf::from("/opt/engine/settings.yml")
        );
    }

    #[test]
    fn non_positive_refresh_disables() {
        let config = AdminConfig {
            auto_refresh_timeout: 0,
            ..Default::default()
        };
        assert_eq!(config.auto_refresh_interval(), None);
        let config = AdminConfig {
            auto_refresh_timeout: -5,
            ..Default::default()
        };
        assert_eq!(config.auto_refresh_interval(), None);
    }

    #[test]
    fn out_of_range_refresh_uses_default() {
        for secs in [5, 14, 3601, 86400] {
            let config = AdminConfig {
                auto_refresh_timeout: secs,
                ..Default::default()
            };
            assert_eq!(config.auto_refresh_interval(), Some(Duration::from_secs(120)));
        }
        let config = AdminConfig {
            auto_refresh_timeout: 3600,
            ..Default::default()
        };
        assert_eq!(config.auto_refresh_interval(), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn paths_resolve_against_root() {
        let root = Path::new("/opt/engine");
        let config = AdminConfig::default();
        assert_eq!(config.assets_root(root), root);
        assert_eq!(config.database_data_dir(root), root.join("data"));

        let config = AdminConfig {
            assets_root: Some("/srv/assets".into()),
            ..Default::default()
        };
        assert_eq!(config.assets_root(root), PathBuf::from("/srv/assets"));
    }
}
