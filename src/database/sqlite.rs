//! SQLite implementation of [`DatabaseBackend`].
//!
//! A connection's `server` names a directory and its `database` names a file
//! inside that directory. The local server names (`localhost`, `.`,
//! `(local)`) resolve to the backend's data directory; any other server is a
//! subdirectory of it. Both names must be a single path component so a
//! connection cannot reach outside the data directory.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use rusqlite::{Connection, OpenFlags, Transaction};

use crate::connection::DatabaseConnection;

use super::backend::{DatabaseBackend, VERSION_TABLE};
use super::DatabaseVersion;

/// File extension appended to database names without one.
pub const DATABASE_EXTENSION: &str = "db";

/// Header tag written into databases created by this backend.
const APPLICATION_ID: i32 = 0x454e_4741;

/// [`DatabaseBackend`] over database files on the local file system.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    data_dir: PathBuf,
}

impl SqliteBackend {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory standing in for the database server.
    pub fn server_dir(&self, connection: &DatabaseConnection) -> anyhow::Result<PathBuf> {
        let server = connection
            .server
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .context("connection has no server")?;
        let local = server.eq_ignore_ascii_case("localhost")
            || server == "."
            || server.eq_ignore_ascii_case("(local)");
        if local {
            return Ok(self.data_dir.clone());
        }
        Ok(self.data_dir.join(single_component("server", server)?))
    }

    /// File holding the connection's database.
    pub fn database_path(&self, connection: &DatabaseConnection) -> anyhow::Result<PathBuf> {
        let name = connection
            .database
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .context("connection has no database")?;
        let mut path = self
            .server_dir(connection)?
            .join(single_component("database", name)?);
        if path.extension().is_none() {
            path.set_extension(DATABASE_EXTENSION);
        }
        Ok(path)
    }

    fn open(&self, connection: &DatabaseConnection) -> anyhow::Result<Connection> {
        let path = self.database_path(connection)?;
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("cannot open database {}", path.display()))?;
        conn.busy_timeout(Duration::from_secs(u64::from(connection.timeout)))?;
        Ok(conn)
    }
}

fn single_component<'a>(what: &str, name: &'a str) -> anyhow::Result<&'a str> {
    let mut components = Path::new(name).components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !plain || name.contains(['/', '\\']) {
        bail!("{} name '{}' must not be a path", what, name);
    }
    Ok(name)
}

fn total_changes(tx: &Transaction<'_>) -> rusqlite::Result<u64> {
    let changes: i64 = tx.query_row("SELECT total_changes()", [], |row| row.get(0))?;
    Ok(changes.max(0) as u64)
}

fn run_batch(tx: &Transaction<'_>, script: &str) -> rusqlite::Result<u64> {
    let before = total_changes(tx)?;
    tx.execute_batch(script)?;
    Ok(total_changes(tx)?.saturating_sub(before))
}

fn check_collation(name: &str) -> anyhow::Result<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        bail!("invalid collation name '{}'", name);
    }
    let probe = Connection::open_in_memory()?;
    probe
        .query_row(&format!("SELECT 'a' = 'A' COLLATE {}", name), [], |_| Ok(()))
        .with_context(|| format!("unknown collation '{}'", name))
}

impl DatabaseBackend for SqliteBackend {
    fn ping_server(&self, connection: &DatabaseConnection) -> anyhow::Result<String> {
        let dir = self.server_dir(connection)?;
        if !dir.is_dir() {
            bail!("database server directory not found: {}", dir.display());
        }
        Ok(format!("SQLite {}", rusqlite::version()))
    }

    fn database_exists(&self, connection: &DatabaseConnection) -> anyhow::Result<bool> {
        Ok(self.database_path(connection)?.is_file())
    }

    fn table_count(&self, connection: &DatabaseConnection) -> anyhow::Result<u64> {
        let conn = self.open(connection)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
            [],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    fn versions(&self, connection: &DatabaseConnection) -> anyhow::Result<Vec<DatabaseVersion>> {
        let conn = self.open(connection)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT MajorVersion, MinorVersion, SubVersion FROM {}",
            VERSION_TABLE
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(DatabaseVersion::new(row.get(0)?, row.get(1)?, row.get(2)?))
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn create_database(
        &self,
        connection: &DatabaseConnection,
        collation: Option<&str>,
    ) -> anyhow::Result<()> {
        if let Some(collation) = collation.map(str::trim).filter(|c| !c.is_empty()) {
            check_collation(collation)?;
        }
        let path = self.database_path(connection)?;
        if path.exists() {
            bail!("database already exists: {}", path.display());
        }
        self.ping_server(connection)?;

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .with_context(|| format!("cannot create database {}", path.display()))?;
        conn.pragma_update(None, "application_id", APPLICATION_ID)?;
        tracing::info!("Created database {}", path.display());
        Ok(())
    }

    fn execute_script(&self, connection: &DatabaseConnection, script: &str) -> anyhow::Result<u64> {
        let mut conn = self.open(connection)?;
        let tx = conn.transaction()?;
        match run_batch(&tx, script) {
            Ok(affected) => {
                tx.commit()?;
                Ok(affected)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback() {
                    tracing::warn!("Rollback failed: {}", rollback);
                }
                Err(e.into())
            }
        }
    }
}
