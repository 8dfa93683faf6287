//! Database status and script execution.
//!
//! # Modules
//!
//! - [`backend`] - The [`DatabaseBackend`] trait over the SQL engine
//! - [`service`] - Status cascade, version lookup and transactional scripts
//! - [`sqlite`] - SQLite implementation of the backend
//! - [`status`] - [`DatabaseStatus`] and its remediation helpers
//! - [`version`] - The [`DatabaseVersion`] triple

pub mod backend;
pub mod service;
pub mod sqlite;
pub mod status;
pub mod version;

pub use backend::{DatabaseBackend, VERSION_TABLE};
pub use service::DatabaseService;
pub use sqlite::SqliteBackend;
pub use status::DatabaseStatus;
pub use version::{DatabaseVersion, ParseVersionError};
