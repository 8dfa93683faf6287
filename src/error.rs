//! Error types for engine administration.
//!
//! This module defines [`AdminError`], the primary error type used throughout
//! the crate, [`ValidationError`] for broken static configuration, and a
//! [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Connectivity problems are never errors: probes fold them into status values
//! - Failed database work is reported as a sentinel plus text in an
//!   [`ErrorSink`](crate::error_log::ErrorSink)
//! - `AdminError` covers configuration, invalid arguments and I/O
//! - `ValidationError` is fatal at load time and names what is wrong

use std::path::PathBuf;
use thiserror::Error;

use crate::database::DatabaseVersion;

/// Core error type for administration operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Asset parameters failed validation.
    #[error("Invalid parameters for asset '{asset}': {source}")]
    InvalidAsset {
        asset: String,
        #[source]
        source: ValidationError,
    },

    /// Static parameters failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Caller passed an argument that can never be valid.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Database script referenced by the asset parameters is missing.
    #[error("Missing database script file: {path}")]
    MissingScript { path: PathBuf },

    /// Settings store could not read or write a value.
    #[error("Settings error for '{key}': {message}")]
    Settings { key: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for administration operations.
pub type Result<T> = std::result::Result<T, AdminError>;

/// Malformed or incomplete static configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required parameter is absent or blank.
    #[error("Missing parameter {name}")]
    MissingParameter { name: String },

    #[error("Minimum version {min} is greater than current version {current}")]
    MinAboveCurrent {
        min: DatabaseVersion,
        current: DatabaseVersion,
    },

    #[error("Unexpected migrations for database version {version}")]
    UnexpectedMigrations { version: DatabaseVersion },

    #[error("Missing migrations from version {min} to {current}")]
    MissingMigrations {
        min: DatabaseVersion,
        current: DatabaseVersion,
    },

    /// A single migration step is not usable on its own.
    #[error("Invalid migration {from} -> {to}: {reason}")]
    InvalidMigration {
        from: DatabaseVersion,
        to: DatabaseVersion,
        reason: String,
    },

    #[error("First migration version {first} does not match the minimum version {min}")]
    FirstMigrationMismatch {
        first: DatabaseVersion,
        min: DatabaseVersion,
    },

    #[error("Version update gap between version {to} and {next}")]
    VersionGap {
        to: DatabaseVersion,
        next: DatabaseVersion,
    },

    #[error("Last migration version {last} does not match the current version {current}")]
    LastMigrationMismatch {
        last: DatabaseVersion,
        current: DatabaseVersion,
    },

    /// The parameter file exists but cannot be deserialized.
    #[error("Malformed parameters: {message}")]
    Malformed { message: String },
}
