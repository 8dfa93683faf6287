//! Persistent connection settings.
//!
//! Connections are stored as connection strings under fixed keys. The
//! [`SettingsStore`] trait only needs raw key/value access; the typed
//! accessors are provided on top of it.
//!
//! # Modules
//!
//! - [`env`] - Process environment variables (read-only)
//! - [`file`] - YAML key/value file
//! - [`layered`] - Environment over a settings file
//! - [`memory`] - In-memory map for tests and embedding

pub mod env;
pub mod file;
pub mod layered;
pub mod memory;

pub use env::EnvSettings;
pub use file::FileSettings;
pub use layered::LayeredSettings;
pub use memory::MemorySettings;

use crate::connection::{DatabaseConnection, WebserverConnection};
use crate::error::{AdminError, Result};

/// Key of the backend database connection string.
pub const DATABASE_CONNECTION_KEY: &str = "EngineDatabaseConnection";

/// Key of the backend API connection string.
pub const API_CONNECTION_KEY: &str = "EngineApiConnection";

/// Key of the backend API key.
pub const API_KEY_KEY: &str = "EngineApiKey";

/// Key of the web application connection string.
pub const WEBAPP_CONNECTION_KEY: &str = "EngineWebAppConnection";

/// Keyed persistence for connection settings.
pub trait SettingsStore: Send + Sync {
    /// Raw value for `key`; blank values read as `None`.
    fn get_value(&self, key: &str) -> Result<Option<String>>;

    /// Store a raw value.
    fn set_value(&self, key: &str, value: &str) -> Result<()>;

    /// Stored database connection, empty when none is stored.
    fn database_connection(&self) -> Result<DatabaseConnection> {
        Ok(self
            .get_value(DATABASE_CONNECTION_KEY)?
            .and_then(|value| DatabaseConnection::parse(&value))
            .unwrap_or_default())
    }

    /// Store a database connection; an empty connection is not written.
    fn set_database_connection(&self, connection: &DatabaseConnection) -> Result<()> {
        let value = connection.to_connection_string(false);
        if value.trim().is_empty() {
            return Ok(());
        }
        self.set_value(DATABASE_CONNECTION_KEY, &value)
    }

    fn api_connection(&self) -> Result<Option<WebserverConnection>> {
        Ok(self
            .get_value(API_CONNECTION_KEY)?
            .and_then(|value| WebserverConnection::parse(&value)))
    }

    /// Store the API connection; a connection without base URL is not written.
    fn set_api_connection(&self, connection: &WebserverConnection) -> Result<()> {
        match connection.to_connection_string(false) {
            Some(value) => self.set_value(API_CONNECTION_KEY, &value),
            None => Ok(()),
        }
    }

    fn api_key(&self) -> Result<Option<String>> {
        self.get_value(API_KEY_KEY)
    }

    fn set_api_key(&self, api_key: &str) -> Result<()> {
        if api_key.trim().is_empty() {
            return Err(AdminError::InvalidArgument {
                message: "API key must not be blank".to_string(),
            });
        }
        self.set_value(API_KEY_KEY, api_key)
    }

    fn webapp_connection(&self) -> Result<Option<WebserverConnection>> {
        Ok(self
            .get_value(WEBAPP_CONNECTION_KEY)?
            .and_then(|value| WebserverConnection::parse(&value)))
    }

    /// Store the web app connection; a connection without base URL is not written.
    fn set_webapp_connection(&self, connection: &WebserverConnection) -> Result<()> {
        match connection.to_connection_string(false) {
            Some(value) => self.set_value(WEBAPP_CONNECTION_KEY, &value),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_connection_reads_empty() {
        let store = MemorySettings::new();
        assert!(store.database_connection().unwrap().is_empty());
    }

    #[test]
    fn database_connection_round_trips() {
        let store = MemorySettings::new();
        let connection = DatabaseConnection::new("srv", "Engine").with_credentials("sa", "p;w");
        store.set_database_connection(&connection).unwrap();
        assert!(store
            .database_connection()
            .unwrap()
            .equal_values(&connection));
    }

    #[test]
    fn empty_database_connection_is_not_written() {
        let store = MemorySettings::new();
        store
            .set_database_connection(&DatabaseConnection::default())
            .unwrap();
        assert_eq!(store.get_value(DATABASE_CONNECTION_KEY).unwrap(), None);
    }

    #[test]
    fn api_connection_round_trips() {
        let store = MemorySettings::new();
        assert_eq!(store.api_connection().unwrap(), None);
        let connection = WebserverConnection::new("https://localhost").with_port(44354);
        store.set_api_connection(&connection).unwrap();
        assert_eq!(store.api_connection().unwrap(), Some(connection));
    }

    #[test]
    fn connection_without_base_url_is_not_written() {
        let store = MemorySettings::new();
        store
            .set_webapp_connection(&WebserverConnection::default().with_port(80))
            .unwrap();
        assert_eq!(store.webapp_connection().unwrap(), None);
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let store = MemorySettings::new();
        assert!(matches!(
            store.set_api_key(" "),
            Err(AdminError::InvalidArgument { .. })
        ));
        store.set_api_key("secret").unwrap();
        assert_eq!(store.api_key().unwrap().as_deref(), Some("secret"));
    }
}
