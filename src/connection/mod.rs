//! Connection value types and their flat string encoding.
//!
//! Connections are plain values: they are loaded from a
//! [`SettingsStore`](crate::settings::SettingsStore), changed only by copying
//! fields from another value, and written back through the same store.
//!
//! # Example
//!
//! ```
//! use engine_admin::connection::DatabaseConnection;
//!
//! let connection = DatabaseConnection::new("localhost", "Engine").trusted();
//! let text = connection.to_connection_string(false);
//! let parsed = DatabaseConnection::parse(&text).unwrap();
//! assert!(parsed.equal_values(&connection));
//! ```

pub mod database;
pub mod parameters;
pub mod webserver;
mod wire;

pub use database::{DatabaseConnection, DatabaseHost};
pub use parameters::{ConnectionParameter, ConnectionParameters};
pub use webserver::WebserverConnection;
pub use wire::MASK;
