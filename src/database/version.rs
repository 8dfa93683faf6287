//! Schema version triple.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A `major.minor.sub` schema version, ordered field by field.
///
/// Serialized as its dotted text form, e.g. `"1.2"` or `"1.2.3"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatabaseVersion {
    pub major: u32,
    pub minor: u32,
    pub sub: u32,
}

impl DatabaseVersion {
    pub const fn new(major: u32, minor: u32, sub: u32) -> Self {
        Self { major, minor, sub }
    }

    /// A version with neither major nor minor set carries no information.
    pub fn is_empty(&self) -> bool {
        self.major == 0 && self.minor == 0
    }
}

impl fmt::Display for DatabaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.sub)
    }
}

/// Error for text that is not a `major.minor[.sub]` version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid database version '{0}'")]
pub struct ParseVersionError(String);

impl FromStr for DatabaseVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError(s.to_string());
        let parts = s
            .trim()
            .split('.')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        match parts[..] {
            [major, minor] => Ok(Self::new(major, minor, 0)),
            [major, minor, sub] => Ok(Self::new(major, minor, sub)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for DatabaseVersion {
    type Error = ParseVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DatabaseVersion> for String {
    fn from(version: DatabaseVersion) -> Self {
        version.to_string()
    }
}
