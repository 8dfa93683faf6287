//! Version chain validation.

use serde::{Deserialize, Serialize};

use crate::database::DatabaseVersion;
use crate::error::ValidationError;

use super::MigrationScript;

/// Database parameters of a backend asset.
///
/// A valid set describes a schema that is created by `init_scripts` at
/// `min_version` and carried to `current_version` by `migrations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseParameterSet {
    pub min_version: DatabaseVersion,
    pub current_version: DatabaseVersion,
    pub init_scripts: Vec<String>,
    #[serde(alias = "updateScripts")]
    pub migrations: Vec<MigrationScript>,
}

fn missing(name: &str) -> ValidationError {
    ValidationError::MissingParameter {
        name: name.to_string(),
    }
}

impl DatabaseParameterSet {
    /// Migrations ordered by their from version.
    pub fn sorted_migrations(&self) -> Vec<&MigrationScript> {
        let mut sorted: Vec<_> = self.migrations.iter().collect();
        sorted.sort_by_key(|m| m.from_version);
        sorted
    }

    /// Check that the migrations form one closed chain from the minimum to
    /// the current version.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let min = self.min_version;
        let current = self.current_version;
        if min.is_empty() {
            return Err(missing("minVersion"));
        }
        if current.is_empty() {
            return Err(missing("currentVersion"));
        }
        if min > current {
            return Err(ValidationError::MinAboveCurrent { min, current });
        }
        if self.init_scripts.is_empty() || self.init_scripts.iter().any(|s| s.trim().is_empty()) {
            return Err(missing("initScripts"));
        }

        if min == current {
            if !self.migrations.is_empty() {
                return Err(ValidationError::UnexpectedMigrations { version: current });
            }
            return Ok(());
        }

        if self.migrations.is_empty() {
            return Err(ValidationError::MissingMigrations { min, current });
        }
        for migration in &self.migrations {
            migration.validate()?;
        }

        let sorted = self.sorted_migrations();
        let (first, last) = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ValidationError::MissingMigrations { min, current }),
        };
        if first.from_version != min {
            return Err(ValidationError::FirstMigrationMismatch {
                first: first.from_version,
                min,
            });
        }
        for pair in sorted.windows(2) {
            if pair[0].to_version != pair[1].from_version {
                return Err(ValidationError::VersionGap {
                    to: pair[0].to_version,
                    next: pair[1].from_version,
                });
            }
        }
        if last.to_version != current {
            return Err(ValidationError::LastMigrationMismatch {
                last: last.to_version,
                current,
            });
        }
        Ok(())
    }
}
