//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, StatusArgs};
use crate::cli::context::AdminContext;
use crate::error::{AdminError, Result};
use crate::ui::UserInterface;

/// Exit code for a failed operation.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for missing configuration or assets.
pub const EXIT_NOT_CONFIGURED: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    root: PathBuf,
    config_path: Option<PathBuf>,
}

impl CommandDispatcher {
    pub fn new(root: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self { root, config_path }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Dispatch and execute a command.
    ///
    /// Configuration problems are reported here with exit code 2.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if let Some(Commands::Completions(args)) = &cli.command {
            return super::completions::CompletionsCommand::new(args.clone()).execute(ui);
        }

        let context = match AdminContext::load(&self.root, self.config_path.as_deref()) {
            Ok(context) => context,
            Err(
                e @ (AdminError::ConfigNotFound { .. }
                | AdminError::ConfigParseError { .. }
                | AdminError::ConfigValidationError { .. }),
            ) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_NOT_CONFIGURED));
            }
            Err(e) => return Err(e),
        };

        self.dispatch_with(&context, cli, ui)
    }

    /// Dispatch against an already built context.
    pub fn dispatch_with(
        &self,
        context: &AdminContext,
        cli: &Cli,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Status(args)) => {
                super::status::StatusCommand::new(context, args.clone()).execute(ui)
            }
            Some(Commands::Watch(args)) => {
                super::watch::WatchCommand::new(context, args.clone()).execute(ui)
            }
            Some(Commands::Db(command)) => {
                super::database::DatabaseCommand::new(context, command.clone()).execute(ui)
            }
            Some(Commands::Connection(command)) => {
                super::connection::ConnectionCommand::new(context, command.clone()).execute(ui)
            }
            Some(Commands::Start(args)) => {
                super::start::StartCommand::new(context, args.target.into()).execute(ui)
            }
            Some(Commands::Browse(args)) => {
                super::start::BrowseCommand::new(context, args.asset.into()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::status::StatusCommand::new(context, StatusArgs::default()).execute(ui),
        }
    }
}
