//! Status command implementation.
//!
//! The `engine-admin status` command refreshes and shows every asset.

use crate::cli::args::StatusArgs;
use crate::cli::context::AdminContext;
use crate::error::Result;
use crate::error_log::ErrorSink;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, EXIT_NOT_CONFIGURED};
use super::display::{show_status, StatusReport};

/// The status command implementation.
pub struct StatusCommand<'a> {
    context: &'a AdminContext,
    args: StatusArgs,
}

impl<'a> StatusCommand<'a> {
    pub fn new(context: &'a AdminContext, args: StatusArgs) -> Self {
        Self { context, args }
    }
}

impl Command for StatusCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut catalog = self.context.catalog()?;
        if !catalog.has_any_asset() {
            ui.error(&format!(
                "No assets found under {}",
                self.context.assets_root().display()
            ));
            return Ok(CommandResult::failure(EXIT_NOT_CONFIGURED));
        }

        self.context.errors().reset();
        let mut spinner = ui.start_spinner("Checking status...");
        catalog.update_status(self.context.services());
        spinner.finish_success("Status checked");

        if self.args.json {
            let report =
                StatusReport::from_catalog(&catalog, self.context.assets_root().to_path_buf());
            let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
            ui.data(&json);
            return Ok(CommandResult::success());
        }

        ui.show_header("Engine status");
        show_status(ui, &catalog, self.context.errors().retrieve_errors());
        Ok(CommandResult::success())
    }
}
