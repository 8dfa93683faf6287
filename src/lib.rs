//! engine-admin - Status and lifecycle administration for engine installations.
//!
//! An installation is a folder of assets: a local backend (database plus API
//! webserver), a web application, a console tool, tests and examples. This
//! crate discovers those assets, derives their status from the stored
//! connections and runs the database creation and migration workflows.
//!
//! # Modules
//!
//! - [`asset`] - Asset discovery and composite status
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`connection`] - Database and webserver connection strings
//! - [`database`] - Database status cascade and script execution
//! - [`error`] - Error types and result aliases
//! - [`error_log`] - Captured error text for display
//! - [`invalidation`] - Status staleness signal
//! - [`launcher`] - Detached process launching
//! - [`migration`] - Schema version parameters and script selection
//! - [`settings`] - Connection settings persistence
//! - [`setup`] - Database creation and migration workflows
//! - [`ui`] - Prompts, spinners, tables and terminal output
//! - [`webserver`] - HTTP reachability probes
//!
//! # Example
//!
//! ```
//! use engine_admin::connection::DatabaseConnection;
//!
//! let connection = DatabaseConnection::parse("Server=db; Database=Engine; User ID=sa; Password=pw; ")
//!     .unwrap();
//! assert!(connection.has_required_values());
//! assert_eq!(connection.to_string(), "db:Engine");
//! ```

pub mod asset;
pub mod cli;
pub mod config;
pub mod connection;
pub mod database;
pub mod error;
pub mod error_log;
pub mod invalidation;
pub mod launcher;
pub mod migration;
pub mod settings;
pub mod setup;
pub mod ui;
pub mod webserver;

pub use error::{AdminError, Result};
