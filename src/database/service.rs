//! Database status derivation and script execution.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::connection::DatabaseConnection;
use crate::error::{AdminError, Result};
use crate::error_log::ErrorSink;

use super::{DatabaseBackend, DatabaseStatus, DatabaseVersion};

/// Status and setup operations over a [`DatabaseBackend`].
///
/// Nothing here returns a backend error: failures are recorded in the error
/// sink and surface as a status, `false` or `None`.
#[derive(Clone)]
pub struct DatabaseService {
    backend: Arc<dyn DatabaseBackend>,
    errors: Arc<dyn ErrorSink>,
    timeout_override: Option<u32>,
}

impl DatabaseService {
    pub fn new(backend: Arc<dyn DatabaseBackend>, errors: Arc<dyn ErrorSink>) -> Self {
        Self {
            backend,
            errors,
            timeout_override: None,
        }
    }

    /// Replace every connection's timeout; `0` keeps the configured one.
    pub fn with_timeout_override(mut self, seconds: u32) -> Self {
        self.timeout_override = (seconds > 0).then_some(seconds);
        self
    }

    pub fn errors(&self) -> &Arc<dyn ErrorSink> {
        &self.errors
    }

    fn effective<'a>(&self, connection: &'a DatabaseConnection) -> Cow<'a, DatabaseConnection> {
        match self.timeout_override {
            Some(timeout) if timeout != connection.timeout => {
                let mut connection = connection.clone();
                connection.timeout = timeout;
                Cow::Owned(connection)
            }
            _ => Cow::Borrowed(connection),
        }
    }

    fn capture(&self, error: &anyhow::Error) {
        self.errors.add_error(error.root_cause());
    }

    /// Walk the status cascade for `connection`.
    ///
    /// With a `target` version, a database whose highest recorded version is
    /// lower (or unreadable) is [`DatabaseStatus::OutdatedVersion`].
    pub fn status(
        &self,
        connection: &DatabaseConnection,
        target: Option<&DatabaseVersion>,
    ) -> DatabaseStatus {
        let status = self.derive_status(connection, target);
        debug!("Database {} status: {}", connection, status);
        status
    }

    fn derive_status(
        &self,
        connection: &DatabaseConnection,
        target: Option<&DatabaseVersion>,
    ) -> DatabaseStatus {
        if connection.is_empty() {
            return DatabaseStatus::UndefinedConnection;
        }
        if !connection.has_required_values() {
            return DatabaseStatus::InvalidConnection;
        }
        let connection = self.effective(connection);

        let exists = match self.backend.database_exists(&connection) {
            Ok(exists) => exists,
            Err(e) => {
                self.capture(&e);
                false
            }
        };
        if !exists {
            return match self.backend.ping_server(&connection) {
                Ok(_) => DatabaseStatus::MissingDatabase,
                Err(e) => {
                    self.capture(&e);
                    DatabaseStatus::MissingServer
                }
            };
        }

        match self.backend.table_count(&connection) {
            Ok(0) => return DatabaseStatus::EmptyDatabase,
            Ok(_) => {}
            Err(e) => {
                self.capture(&e);
                return match self.backend.ping_server(&connection) {
                    Ok(_) => DatabaseStatus::MissingDatabase,
                    Err(_) => DatabaseStatus::MissingServer,
                };
            }
        }

        if let Some(target) = target {
            let current = self.current_version(&connection);
            if current.is_none_or(|current| current < *target) {
                return DatabaseStatus::OutdatedVersion;
            }
        }
        DatabaseStatus::Available
    }

    /// Highest version recorded in the database, if readable.
    pub fn current_version(&self, connection: &DatabaseConnection) -> Option<DatabaseVersion> {
        let connection = self.effective(connection);
        match self.backend.versions(&connection) {
            Ok(versions) => versions.into_iter().max(),
            Err(e) => {
                self.capture(&e);
                None
            }
        }
    }

    /// Create the database; `false` when the backend refused.
    pub fn create_database(&self, connection: &DatabaseConnection, collation: Option<&str>) -> bool {
        let connection = self.effective(connection);
        info!("Creating database {}", connection);
        match self.backend.create_database(&connection, collation) {
            Ok(()) => true,
            Err(e) => {
                warn!("Database creation failed: {:#}", e);
                self.capture(&e);
                false
            }
        }
    }

    /// Run one script transactionally.
    ///
    /// Returns `Ok(None)` when the script failed and was rolled back. A blank
    /// script is a caller error.
    pub fn execute_script(
        &self,
        connection: &DatabaseConnection,
        script: &str,
    ) -> Result<Option<u64>> {
        if script.trim().is_empty() {
            return Err(AdminError::InvalidArgument {
                message: "database script is empty".to_string(),
            });
        }
        let connection = self.effective(connection);
        match self.backend.execute_script(&connection, script) {
            Ok(affected) => {
                debug!("Script affected {} rows", affected);
                Ok(Some(affected))
            }
            Err(e) => {
                warn!("Script failed and was rolled back: {:#}", e);
                self.capture(&e);
                Ok(None)
            }
        }
    }
}
