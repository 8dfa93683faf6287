//! Webserver status values.

use std::fmt;

use serde::Serialize;

/// Result of probing an HTTP endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WebserverStatus {
    /// No usable URL is configured.
    #[default]
    UndefinedConnection,
    /// The endpoint did not answer with success in time.
    NotAvailable,
    Available,
}

impl WebserverStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::UndefinedConnection => "undefined connection",
            Self::NotAvailable => "not available",
            Self::Available => "available",
        }
    }
}

impl fmt::Display for WebserverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
