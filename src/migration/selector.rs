//! Script selection for an installed schema version.

use crate::database::DatabaseVersion;

use super::DatabaseParameterSet;

impl DatabaseParameterSet {
    /// Script names that carry a database at `existing` to the current
    /// version, in chain order.
    ///
    /// Steps starting below `existing` are skipped. A version between two
    /// steps receives every later step.
    pub fn scripts_from(&self, existing: &DatabaseVersion) -> Vec<&str> {
        self.sorted_migrations()
            .into_iter()
            .filter(|m| m.from_version >= *existing)
            .flat_map(|m| m.scripts.iter().map(String::as_str))
            .collect()
    }
}
