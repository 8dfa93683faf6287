//! Command-line interface for engine-admin.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`context`] - Services shared by the commands of one invocation
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;
pub mod context;

pub use args::{Cli, Commands, ConnectionCommand, DbCommand, StatusArgs, WatchArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
pub use context::{AdminContext, ContextParts};
