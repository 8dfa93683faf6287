//! Database engine abstraction.

use crate::connection::DatabaseConnection;

use super::DatabaseVersion;

/// Name of the table recording installed schema versions.
pub const VERSION_TABLE: &str = "Version";

/// Raw database operations behind the status and setup services.
///
/// Implementations report failures as errors; the
/// [`DatabaseService`](super::DatabaseService) decides how each failure maps
/// onto a status or sentinel.
pub trait DatabaseBackend: Send + Sync {
    /// Cheap reachability check of the server, returning a version banner.
    fn ping_server(&self, connection: &DatabaseConnection) -> anyhow::Result<String>;

    /// Whether the named database exists on the server.
    fn database_exists(&self, connection: &DatabaseConnection) -> anyhow::Result<bool>;

    /// Number of user tables in the database.
    fn table_count(&self, connection: &DatabaseConnection) -> anyhow::Result<u64>;

    /// Every row of the [`VERSION_TABLE`].
    fn versions(&self, connection: &DatabaseConnection) -> anyhow::Result<Vec<DatabaseVersion>>;

    /// Create the database, applying `collation` when given.
    fn create_database(
        &self,
        connection: &DatabaseConnection,
        collation: Option<&str>,
    ) -> anyhow::Result<()>;

    /// Run `script` inside one transaction and return the affected row count.
    ///
    /// On error nothing of the script may remain applied.
    fn execute_script(&self, connection: &DatabaseConnection, script: &str) -> anyhow::Result<u64>;
}
