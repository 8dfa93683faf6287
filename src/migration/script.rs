//! A single migration step.

use serde::{Deserialize, Serialize};

use crate::database::DatabaseVersion;
use crate::error::ValidationError;

/// Scripts that move a schema from one version to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationScript {
    pub from_version: DatabaseVersion,
    pub to_version: DatabaseVersion,
    /// Script file names, in execution order.
    #[serde(default)]
    pub scripts: Vec<String>,
}

impl MigrationScript {
    pub fn new(
        from_version: DatabaseVersion,
        to_version: DatabaseVersion,
        scripts: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            from_version,
            to_version,
            scripts: scripts.into_iter().map(Into::into).collect(),
        }
    }

    /// Check the step on its own: both versions set, moving forward, with
    /// at least one non-blank script.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidMigration {
            from: self.from_version,
            to: self.to_version,
            reason: reason.to_string(),
        };
        if self.from_version.is_empty() {
            return Err(invalid("missing from version"));
        }
        if self.to_version.is_empty() {
            return Err(invalid("missing to version"));
        }
        if self.from_version == self.to_version {
            return Err(invalid("from and to version are equal"));
        }
        if self.from_version > self.to_version {
            return Err(invalid("to version is lower than from version"));
        }
        if self.scripts.is_empty() {
            return Err(invalid("no scripts"));
        }
        if self.scripts.iter().any(|s| s.trim().is_empty()) {
            return Err(invalid("blank script name"));
        }
        Ok(())
    }
}
