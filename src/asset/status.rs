//! Per-component status cascades.
//!
//! Each cascade is an ordered list of rules. The first rule whose predicate
//! holds decides the status; when none holds, the fallback (the "running"
//! state) applies. Facts are gathered before evaluation, so every rule is a
//! pure function and can be tested on its own.

use std::fmt;

use serde::Serialize;

use crate::database::DatabaseStatus;
use crate::webserver::WebserverStatus;

/// One step of a status cascade.
pub struct StatusRule<F, S> {
    pub name: &'static str,
    pub applies: fn(&F) -> bool,
    pub status: S,
}

/// Evaluate `rules` top-down against `facts`.
pub fn evaluate<F, S: Copy>(rules: &[StatusRule<F, S>], facts: &F, fallback: S) -> S {
    rules
        .iter()
        .find(|rule| (rule.applies)(facts))
        .map_or(fallback, |rule| rule.status)
}

/// Name of the first matching rule, for diagnostics.
pub fn matching_rule<F, S>(rules: &[StatusRule<F, S>], facts: &F) -> Option<&'static str> {
    rules
        .iter()
        .find(|rule| (rule.applies)(facts))
        .map(|rule| rule.name)
}

/// Status of the local backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum BackendStatus {
    #[default]
    NotAvailable,
    DatabaseNotAvailable,
    WebserverUndefined,
    WebserverNotStarted,
    Running,
}

impl BackendStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotAvailable => "not available",
            Self::DatabaseNotAvailable => "database not available",
            Self::WebserverUndefined => "webserver undefined",
            Self::WebserverNotStarted => "webserver not started",
            Self::Running => "running",
        }
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of the web application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WebAppStatus {
    #[default]
    NotAvailable,
    WebserverUndefined,
    WebserverNotStarted,
    Running,
}

impl WebAppStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotAvailable => "not available",
            Self::WebserverUndefined => "webserver undefined",
            Self::WebserverNotStarted => "webserver not started",
            Self::Running => "running",
        }
    }
}

impl fmt::Display for WebAppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs of the webserver cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebserverFacts {
    /// The asset is installed (or, for a virtual asset, active).
    pub configured: bool,
    /// Probe result; not consulted when the asset is not configured.
    pub probe: WebserverStatus,
}

pub const WEBSERVER_RULES: &[StatusRule<WebserverFacts, WebserverStatus>] = &[
    StatusRule {
        name: "asset not configured",
        applies: |f| !f.configured,
        status: WebserverStatus::NotAvailable,
    },
    StatusRule {
        name: "no webserver url",
        applies: |f| f.probe == WebserverStatus::UndefinedConnection,
        status: WebserverStatus::UndefinedConnection,
    },
    StatusRule {
        name: "probe failed",
        applies: |f| f.probe == WebserverStatus::NotAvailable,
        status: WebserverStatus::NotAvailable,
    },
];

impl WebserverFacts {
    pub fn status(&self) -> WebserverStatus {
        evaluate(WEBSERVER_RULES, self, WebserverStatus::Available)
    }
}

/// Inputs of the backend cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendFacts {
    pub available: bool,
    pub database: DatabaseStatus,
    pub webserver: WebserverStatus,
}

/// Database problems come before webserver problems: the backend process
/// cannot work without its database.
pub const BACKEND_RULES: &[StatusRule<BackendFacts, BackendStatus>] = &[
    StatusRule {
        name: "asset not available",
        applies: |f| !f.available,
        status: BackendStatus::NotAvailable,
    },
    StatusRule {
        name: "database not ready",
        applies: |f| f.database <= DatabaseStatus::EmptyDatabase,
        status: BackendStatus::DatabaseNotAvailable,
    },
    StatusRule {
        name: "webserver undefined",
        applies: |f| f.webserver == WebserverStatus::UndefinedConnection,
        status: BackendStatus::WebserverUndefined,
    },
    StatusRule {
        name: "webserver not started",
        applies: |f| f.webserver == WebserverStatus::NotAvailable,
        status: BackendStatus::WebserverNotStarted,
    },
];

impl BackendFacts {
    pub fn status(&self) -> BackendStatus {
        evaluate(BACKEND_RULES, self, BackendStatus::Running)
    }
}

/// Inputs of the web application cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebAppFacts {
    pub available: bool,
    /// The web application has a webserver connection.
    pub connection_defined: bool,
    pub webserver: WebserverStatus,
}

pub const WEBAPP_RULES: &[StatusRule<WebAppFacts, WebAppStatus>] = &[
    StatusRule {
        name: "asset not available",
        applies: |f| !f.available,
        status: WebAppStatus::NotAvailable,
    },
    StatusRule {
        name: "webserver undefined",
        applies: |f| !f.connection_defined,
        status: WebAppStatus::WebserverUndefined,
    },
    StatusRule {
        name: "webserver not available",
        applies: |f| f.webserver != WebserverStatus::Available,
        status: WebAppStatus::WebserverNotStarted,
    },
];

impl WebAppFacts {
    pub fn status(&self) -> WebAppStatus {
        evaluate(WEBAPP_RULES, self, WebAppStatus::Running)
    }
}
