//! Database command implementation.
//!
//! `engine-admin db` inspects the local backend's database and runs the
//! creation and migration workflows against it.

use crate::asset::{AssetCatalog, BackendAsset};
use crate::cli::args::DbCommand;
use crate::cli::context::AdminContext;
use crate::database::{DatabaseStatus, DatabaseVersion};
use crate::error::Result;
use crate::error_log::ErrorSink;
use crate::setup::{SetupEvent, SetupMode, SetupOutcome};
use crate::ui::{Prompt, UserInterface};

use super::dispatcher::{Command, CommandResult, EXIT_FAILURE, EXIT_NOT_CONFIGURED};
use super::display::database_health;

/// The db command implementation.
pub struct DatabaseCommand<'a> {
    context: &'a AdminContext,
    command: DbCommand,
}

impl<'a> DatabaseCommand<'a> {
    pub fn new(context: &'a AdminContext, command: DbCommand) -> Self {
        Self { context, command }
    }

    fn target_version(backend: &BackendAsset) -> Option<DatabaseVersion> {
        Some(backend.parameters.database.current_version).filter(|v| !v.is_empty())
    }

    fn database_status(&self, backend: &BackendAsset) -> DatabaseStatus {
        self.context
            .services()
            .database
            .status(&backend.database, Self::target_version(backend).as_ref())
    }

    fn show_errors(&self, ui: &mut dyn UserInterface) {
        if let Some(errors) = self.context.errors().retrieve_errors() {
            for line in errors.lines() {
                ui.message(&format!("  {}", line));
            }
        }
    }

    fn status(&self, ui: &mut dyn UserInterface, backend: &BackendAsset) -> CommandResult {
        let status = self.database_status(backend);
        ui.status_line(
            database_health(status),
            &format!("Database {}: {}", backend.database, status),
        );
        if let Some(target) = Self::target_version(backend) {
            ui.message(&format!("Required schema version: {}", target));
        }
        match status {
            DatabaseStatus::Available => CommandResult::success(),
            s if s.ready_to_create() => {
                ui.message("Run 'engine-admin db create' to create it");
                CommandResult::failure(EXIT_FAILURE)
            }
            s if s.ready_to_update() => {
                ui.message("Run 'engine-admin db update' to migrate it");
                CommandResult::failure(EXIT_FAILURE)
            }
            _ => {
                self.show_errors(ui);
                CommandResult::failure(EXIT_FAILURE)
            }
        }
    }

    fn version(&self, ui: &mut dyn UserInterface, backend: &BackendAsset) -> CommandResult {
        match self
            .context
            .services()
            .database
            .current_version(&backend.database)
        {
            Some(version) => {
                ui.data(&version.to_string());
                CommandResult::success()
            }
            None => {
                ui.error("No schema version found");
                self.show_errors(ui);
                CommandResult::failure(EXIT_FAILURE)
            }
        }
    }

    fn confirm(&self, ui: &mut dyn UserInterface, skip: bool, question: String) -> Result<bool> {
        if skip {
            return Ok(true);
        }
        let answer = ui.prompt(&Prompt::confirm("confirm_setup", question))?;
        if !answer.as_bool() {
            ui.warning("Cancelled");
        }
        Ok(answer.as_bool())
    }

    fn create(
        &self,
        ui: &mut dyn UserInterface,
        catalog: &AssetCatalog,
        backend: &BackendAsset,
        collation: Option<String>,
        yes: bool,
    ) -> Result<CommandResult> {
        let status = self.database_status(backend);
        if !status.ready_to_create() {
            ui.error(&format!("Database is not ready to create: {}", status));
            if status < DatabaseStatus::MissingDatabase {
                self.show_errors(ui);
            }
            return Ok(CommandResult::failure(EXIT_FAILURE));
        }
        if !self.confirm(ui, yes, format!("Create database {}?", backend.database))? {
            return Ok(CommandResult::failure(EXIT_FAILURE));
        }

        let scripts = catalog.create_scripts()?;
        let setup = self
            .context
            .database_setup(collation)
            .with_signal(catalog.signal().clone());
        self.run_setup(ui, backend, &setup, SetupMode::Create, &scripts, "Database created")
    }

    fn update(
        &self,
        ui: &mut dyn UserInterface,
        catalog: &AssetCatalog,
        backend: &BackendAsset,
        yes: bool,
    ) -> Result<CommandResult> {
        let status = self.database_status(backend);
        if status == DatabaseStatus::Available {
            ui.success("Database is up to date");
            return Ok(CommandResult::success());
        }
        if !status.ready_to_update() {
            ui.error(&format!("Database cannot be updated: {}", status));
            return Ok(CommandResult::failure(EXIT_FAILURE));
        }

        let Some(existing) = self
            .context
            .services()
            .database
            .current_version(&backend.database)
        else {
            ui.error("Installed version unknown, refusing to migrate");
            ui.message("The Version table is missing or empty; check the database by hand");
            return Ok(CommandResult::failure(EXIT_FAILURE));
        };
        let scripts = catalog.update_scripts(&existing)?;
        if scripts.is_empty() {
            ui.warning(&format!("No migration scripts start from version {}", existing));
            return Ok(CommandResult::failure(EXIT_FAILURE));
        }
        let question = match Self::target_version(backend) {
            Some(target) => format!("Migrate database {} from {} to {}?", backend.database, existing, target),
            None => format!("Migrate database {} from {}?", backend.database, existing),
        };
        if !self.confirm(ui, yes, question)? {
            return Ok(CommandResult::failure(EXIT_FAILURE));
        }

        let setup = self
            .context
            .database_setup(None)
            .with_signal(catalog.signal().clone());
        self.run_setup(ui, backend, &setup, SetupMode::Update, &scripts, "Database updated")
    }

    fn run_setup(
        &self,
        ui: &mut dyn UserInterface,
        backend: &BackendAsset,
        setup: &crate::setup::DatabaseSetup,
        mode: SetupMode,
        scripts: &[String],
        done: &str,
    ) -> Result<CommandResult> {
        let mut spinner = ui.start_spinner("Preparing database...");
        let outcome = setup.run(&backend.database, mode, scripts, |event| match event {
            SetupEvent::Creating => spinner.set_message("Creating database..."),
            SetupEvent::Verifying { attempt } => {
                spinner.set_message(&format!("Waiting for database (attempt {})...", attempt))
            }
            SetupEvent::Executing { index, total } => {
                spinner.set_message(&format!("Running script {} of {}...", index + 1, total))
            }
        })?;

        match outcome {
            SetupOutcome::Completed {
                scripts,
                affected_rows,
            } => {
                spinner.finish_success(done);
                ui.success(&format!(
                    "{}: {} scripts, {} rows affected",
                    done, scripts, affected_rows
                ));
                Ok(CommandResult::success())
            }
            SetupOutcome::Failed { stage, message } => {
                spinner.finish_error(&format!("Failed at {}", stage));
                ui.error(&format!("{} failed: {}", stage, message));
                Ok(CommandResult::failure(EXIT_FAILURE))
            }
        }
    }
}

impl Command for DatabaseCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let catalog = self.context.catalog()?;
        let Some(backend) = catalog.backend().filter(|b| b.is_available()).cloned() else {
            ui.error(&format!(
                "No local backend is installed under {}",
                self.context.assets_root().display()
            ));
            return Ok(CommandResult::failure(EXIT_NOT_CONFIGURED));
        };
        if backend.database.is_empty() {
            ui.error("No database connection is stored");
            ui.message("Run 'engine-admin connection set-database' first");
            return Ok(CommandResult::failure(EXIT_NOT_CONFIGURED));
        }

        self.context.errors().reset();
        match &self.command {
            DbCommand::Status => Ok(self.status(ui, &backend)),
            DbCommand::Version => Ok(self.version(ui, &backend)),
            DbCommand::Create(args) => {
                self.create(ui, &catalog, &backend, args.collation.clone(), args.yes)
            }
            DbCommand::Update(args) => self.update(ui, &catalog, &backend, args.yes),
        }
    }
}
