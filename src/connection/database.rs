//! Database connection settings.

use std::fmt;

use super::parameters::ConnectionParameters;
use super::wire::{self, ConnectionStringWriter};
use crate::error::{AdminError, Result};

/// Connection timeout in seconds when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u32 = 15;

/// Timeout applied by the local preset.
pub const LOCAL_TIMEOUT_SECS: u32 = 30;

/// Timeout applied by the remote preset.
pub const REMOTE_TIMEOUT_SECS: u32 = 100;

/// Database name applied by the local preset.
pub const DEFAULT_DATABASE_NAME: &str = "Engine";

/// Where the database server lives relative to this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseHost {
    Local,
    Remote,
}

/// Settings needed to reach a SQL database.
///
/// The all-defaults value is "empty", which is distinct from "invalid": an
/// empty connection has simply not been configured yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConnection {
    pub server: Option<String>,
    pub database: Option<String>,
    pub user_id: Option<String>,
    pub password: Option<String>,
    /// Connection timeout in seconds.
    pub timeout: u32,
    pub integrated_security: bool,
    pub trusted_connection: bool,
    /// Never holds a known key; see [`DatabaseConnection::set_parameter`].
    custom_parameters: ConnectionParameters,
}

impl Default for DatabaseConnection {
    fn default() -> Self {
        Self {
            server: None,
            database: None,
            user_id: None,
            password: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            integrated_security: false,
            trusted_connection: false,
            custom_parameters: ConnectionParameters::new(),
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl DatabaseConnection {
    pub fn new(server: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            server: Some(server.into()),
            database: Some(database.into()),
            ..Self::default()
        }
    }

    /// Builder-style credentials.
    pub fn with_credentials(mut self, user_id: impl Into<String>, password: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self.password = Some(password.into());
        self
    }

    /// Builder-style trusted connection flag.
    pub fn trusted(mut self) -> Self {
        self.trusted_connection = true;
        self
    }

    /// True when every field holds its default.
    pub fn is_empty(&self) -> bool {
        is_blank(&self.server)
            && is_blank(&self.database)
            && is_blank(&self.user_id)
            && is_blank(&self.password)
            && self.effective_timeout() == DEFAULT_TIMEOUT_SECS
            && !self.integrated_security
            && !self.trusted_connection
            && self.custom_parameters.is_empty()
    }

    /// True when server and database are set and authentication is complete.
    ///
    /// Integrated and trusted connections authenticate without explicit
    /// credentials; everything else needs both user id and password.
    pub fn has_required_values(&self) -> bool {
        if is_blank(&self.server) || is_blank(&self.database) {
            return false;
        }
        if self.integrated_security || self.trusted_connection {
            return true;
        }
        !is_blank(&self.user_id) && !is_blank(&self.password)
    }

    /// Compare every field, custom parameters by value.
    ///
    /// Blank text counts as unset and a zero timeout as the default, the
    /// same way the connection string renders them.
    pub fn equal_values(&self, other: &Self) -> bool {
        non_blank(&self.server) == non_blank(&other.server)
            && non_blank(&self.database) == non_blank(&other.database)
            && non_blank(&self.user_id) == non_blank(&other.user_id)
            && non_blank(&self.password) == non_blank(&other.password)
            && self.effective_timeout() == other.effective_timeout()
            && self.integrated_security == other.integrated_security
            && self.trusted_connection == other.trusted_connection
            && self.custom_parameters.without_blank_values()
                == other.custom_parameters.without_blank_values()
    }

    fn effective_timeout(&self) -> u32 {
        match self.timeout {
            0 => DEFAULT_TIMEOUT_SECS,
            timeout => timeout,
        }
    }

    pub fn custom_parameters(&self) -> &ConnectionParameters {
        &self.custom_parameters
    }

    /// Set a parameter by connection string key.
    ///
    /// Known keys (matched case-insensitively) update their field, so a
    /// custom parameter can never shadow one.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a name the connection string cannot carry.
    pub fn set_parameter(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        if name.trim().is_empty() || name.trim() != name || name.contains(['=', ';']) {
            return Err(AdminError::InvalidArgument {
                message: format!("'{}' is not a valid connection parameter name", name),
            });
        }
        self.apply(name, value.into());
        Ok(())
    }

    /// Remove a custom parameter.
    pub fn remove_parameter(&mut self, name: &str) -> Option<String> {
        self.custom_parameters.remove(name)
    }

    fn apply(&mut self, key: &str, value: String) {
        match key.to_ascii_lowercase().as_str() {
            "server" => self.server = Some(value),
            "database" => self.database = Some(value),
            "user id" => self.user_id = Some(value),
            "password" => self.password = Some(value),
            "timeout" => {
                if let Ok(timeout) = value.parse::<u32>() {
                    if timeout > 0 {
                        self.timeout = timeout;
                    }
                }
            }
            "integrated security" => self.integrated_security = wire::parse_flag(&value),
            "trustservercertificate" => self.trusted_connection = wire::parse_flag(&value),
            _ => self.custom_parameters.set(key, value),
        }
    }

    /// Copy every field from `source`.
    pub fn import_values(&mut self, source: &Self) {
        self.clone_from(source);
    }

    /// Reset all fields to their defaults.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Classify the server as this machine or a remote host.
    ///
    /// Returns `None` while no server is configured.
    pub fn host(&self) -> Option<DatabaseHost> {
        let server = self.server.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let local = server.eq_ignore_ascii_case("localhost")
            || server == "."
            || server.eq_ignore_ascii_case("(local)")
            || machine_name().is_some_and(|name| server.eq_ignore_ascii_case(&name));
        Some(if local {
            DatabaseHost::Local
        } else {
            DatabaseHost::Remote
        })
    }

    /// Replace all fields with the preset for `host`.
    pub fn initialize(&mut self, host: DatabaseHost) {
        *self = match host {
            DatabaseHost::Local => Self {
                server: Some("localhost".to_string()),
                database: Some(DEFAULT_DATABASE_NAME.to_string()),
                timeout: LOCAL_TIMEOUT_SECS,
                integrated_security: true,
                trusted_connection: true,
                ..Self::default()
            },
            DatabaseHost::Remote => Self {
                timeout: REMOTE_TIMEOUT_SECS,
                ..Self::default()
            },
        };
    }

    /// Render the connection string, optionally masking the password.
    pub fn to_connection_string(&self, mask_password: bool) -> String {
        let mut writer = ConnectionStringWriter::new();
        writer.push_opt("Server", self.server.as_deref());
        writer.push_opt("Database", self.database.as_deref());
        if self.integrated_security {
            writer.push("Integrated Security", "true");
        }
        if self.trusted_connection {
            writer.push("TrustServerCertificate", "true");
        }
        writer.push_opt("User ID", self.user_id.as_deref());
        writer.push_secret("Password", self.password.as_deref(), mask_password);
        if self.effective_timeout() != DEFAULT_TIMEOUT_SECS {
            writer.push("Timeout", &self.timeout.to_string());
        }
        for parameter in self.custom_parameters.iter() {
            writer.push(&parameter.name, &parameter.value);
        }
        writer.finish()
    }

    /// Parse a connection string; `None` for blank input.
    ///
    /// Unknown keys are kept as custom parameters. A timeout that is not a
    /// positive integer leaves the default in place.
    pub fn parse(input: &str) -> Option<Self> {
        if input.trim().is_empty() {
            return None;
        }
        let mut connection = Self::default();
        for (key, value) in wire::pairs(input) {
            connection.apply(&key, value);
        }
        Some(connection)
    }
}

impl fmt::Display for DatabaseConnection {
    /// `server:database`, or nothing for an empty connection.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_blank(&self.server) && is_blank(&self.database) {
            return Ok(());
        }
        write!(
            f,
            "{}:{}",
            self.server.as_deref().unwrap_or_default(),
            self.database.as_deref().unwrap_or_default()
        )
    }
}

fn machine_name() -> Option<String> {
    std::env::var("COMPUTERNAME")
        .or_else(|_| std::env::var("HOSTNAME"))
        .ok()
        .filter(|name| !name.trim().is_empty())
}
