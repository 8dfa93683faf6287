//! Watch command implementation.
//!
//! `engine-admin watch` keeps the status current: it refreshes whenever the
//! status signal goes stale and marks it stale itself on every tick of the
//! auto-refresh interval.

use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use crate::asset::AssetCatalog;
use crate::cli::args::WatchArgs;
use crate::cli::context::AdminContext;
use crate::error::Result;
use crate::error_log::ErrorSink;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, EXIT_NOT_CONFIGURED};
use super::display::show_status;

/// The watch command implementation.
pub struct WatchCommand<'a> {
    context: &'a AdminContext,
    args: WatchArgs,
}

impl<'a> WatchCommand<'a> {
    pub fn new(context: &'a AdminContext, args: WatchArgs) -> Self {
        Self { context, args }
    }

    /// Refresh interval; `None` when automatic refresh is disabled.
    pub fn interval(&self) -> Option<Duration> {
        match self.args.interval {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => self.context.config().auto_refresh_interval(),
        }
    }

    fn refresh(&self, ui: &mut dyn UserInterface, catalog: &mut AssetCatalog, cycle: u32) -> bool {
        self.context.errors().reset();
        if !catalog.refresh_if_stale(self.context.services()) {
            return false;
        }
        ui.show_header(&format!("Engine status (refresh {})", cycle));
        show_status(ui, catalog, self.context.errors().retrieve_errors());
        true
    }

    fn run_loop(
        &self,
        ui: &mut dyn UserInterface,
        catalog: &mut AssetCatalog,
        interval: Duration,
    ) -> u32 {
        let events = catalog.signal().subscribe();
        let mut cycles = 0;
        loop {
            if self.refresh(ui, catalog, cycles + 1) {
                cycles += 1;
                if self.args.cycles.is_some_and(|max| cycles >= max) {
                    break;
                }
            }
            // notifications raised before this refresh are already handled
            events.try_iter().for_each(drop);

            match events.recv_timeout(interval) {
                Ok(()) => {}
                Err(RecvTimeoutError::Timeout) => {
                    tracing::debug!("Auto-refresh interval elapsed");
                    catalog.invalidate_status();
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        cycles
    }
}

impl Command for WatchCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut catalog = self.context.catalog()?;
        if !catalog.has_any_asset() {
            ui.error(&format!(
                "No assets found under {}",
                self.context.assets_root().display()
            ));
            return Ok(CommandResult::failure(EXIT_NOT_CONFIGURED));
        }

        match self.interval() {
            Some(interval) => {
                ui.message(&format!(
                    "Refreshing every {}s, press Ctrl-C to stop",
                    interval.as_secs()
                ));
                self.run_loop(ui, &mut catalog, interval);
            }
            None => {
                ui.warning("Automatic refresh is disabled, showing status once");
                self.refresh(ui, &mut catalog, 1);
            }
        }
        Ok(CommandResult::success())
    }
}
