//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Every command except
//! `completions` runs against one [`AdminContext`](crate::cli::context::AdminContext)
//! built from the configuration and the stored settings.

pub mod completions;
pub mod connection;
pub mod database;
pub mod dispatcher;
pub mod display;
pub mod start;
pub mod status;
pub mod watch;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, EXIT_FAILURE, EXIT_NOT_CONFIGURED};
