//! Webserver connectivity.
//!
//! A probe turns a [`WebserverConnection`](crate::connection::WebserverConnection)
//! into a coarse [`WebserverStatus`] with one bounded HTTP request. Timeouts
//! and transport errors are expected steady states and map to
//! [`WebserverStatus::NotAvailable`].

pub mod probe;
pub mod status;

pub use probe::{WebserverProbe, WebserverService, DEFAULT_TIMEOUT};
pub use status::WebserverStatus;
