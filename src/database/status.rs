//! Database status values.

use std::fmt;

use serde::Serialize;

/// How far a database connection gets through the status cascade.
///
/// Variants are ordered by progress: every later value implies all earlier
/// checks passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DatabaseStatus {
    /// No connection has been configured.
    #[default]
    UndefinedConnection,
    /// The connection is missing server, database or credentials.
    InvalidConnection,
    /// The database server cannot be reached.
    MissingServer,
    /// The server is reachable but the database does not exist.
    MissingDatabase,
    /// The database exists but holds no tables.
    EmptyDatabase,
    /// The schema is older than the required version.
    OutdatedVersion,
    Available,
}

impl DatabaseStatus {
    /// Some setup action can move this database forward.
    pub fn pending_change(&self) -> bool {
        self.ready_to_create() || self.ready_to_update()
    }

    /// The database (or its schema) must be created.
    pub fn ready_to_create(&self) -> bool {
        matches!(self, Self::MissingDatabase | Self::EmptyDatabase)
    }

    /// The schema exists and needs migrations.
    pub fn ready_to_update(&self) -> bool {
        matches!(self, Self::OutdatedVersion)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::UndefinedConnection => "undefined connection",
            Self::InvalidConnection => "invalid connection",
            Self::MissingServer => "missing server",
            Self::MissingDatabase => "missing database",
            Self::EmptyDatabase => "empty database",
            Self::OutdatedVersion => "outdated version",
            Self::Available => "available",
        }
    }
}

impl fmt::Display for DatabaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
