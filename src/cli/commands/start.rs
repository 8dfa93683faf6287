//! Start and browse command implementations.
//!
//! Both hand work to another process and return right away; the status is
//! marked stale so the next refresh sees the result.

use crate::asset::AssetKind;
use crate::cli::context::AdminContext;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, EXIT_NOT_CONFIGURED};

/// The start command implementation.
pub struct StartCommand<'a> {
    context: &'a AdminContext,
    kind: AssetKind,
}

impl<'a> StartCommand<'a> {
    pub fn new(context: &'a AdminContext, kind: AssetKind) -> Self {
        Self { context, kind }
    }
}

impl Command for StartCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let catalog = self.context.catalog()?;
        let Some(asset) = catalog.asset(self.kind).filter(|a| a.is_available()) else {
            ui.error(&format!("{} is not installed", self.kind));
            return Ok(CommandResult::failure(EXIT_NOT_CONFIGURED));
        };
        let Some(request) = asset.start_request() else {
            ui.error(&format!("{} has no webserver connection", self.kind));
            ui.message("Store one with 'engine-admin connection' first");
            return Ok(CommandResult::failure(EXIT_NOT_CONFIGURED));
        };

        self.context
            .launcher()
            .start_webserver(&request.working_dir, &request.exec, &request.url)?;
        catalog.invalidate_status();
        ui.success(&format!("Started {} at {}", self.kind, request.url));
        Ok(CommandResult::success())
    }
}

/// The browse command implementation.
pub struct BrowseCommand<'a> {
    context: &'a AdminContext,
    kind: AssetKind,
}

impl<'a> BrowseCommand<'a> {
    pub fn new(context: &'a AdminContext, kind: AssetKind) -> Self {
        Self { context, kind }
    }
}

impl Command for BrowseCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let catalog = self.context.catalog()?;
        let target = catalog.asset(self.kind).and_then(|a| a.browse_target());
        let Some(target) = target else {
            ui.error(&format!("Nothing to open for {}", self.kind));
            return Ok(CommandResult::failure(EXIT_NOT_CONFIGURED));
        };

        let target = target.to_target_string();
        self.context.launcher().start_process(&target)?;
        ui.success(&format!("Opened {}", target));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::testing::{test_context, TestContext};
    use crate::database::service::fake::FakeState;
    use crate::launcher::fake::Launch;
    use crate::settings::{MemorySettings, API_CONNECTION_KEY, WEBAPP_CONNECTION_KEY};
    use std::fs;
    use tempfile::TempDir;

    fn install(root: &std::path::Path, settings: MemorySettings) -> TestContext {
        fs::create_dir_all(root.join("WebApp")).unwrap();
        fs::write(
            root.join("WebApp").join("asset.json"),
            r#"{"webserverExec": "WebApp.dll"}"#,
        )
        .unwrap();
        fs::create_dir_all(root.join("Examples")).unwrap();
        fs::write(root.join("Examples").join("readme.txt"), "x").unwrap();
        test_context(root, settings, FakeState::default(), &[])
    }

    #[test]
    fn start_launches_webserver_asset() {
        let temp = TempDir::new().unwrap();
        let test = install(
            temp.path(),
            MemorySettings::new().with_value(WEBAPP_CONNECTION_KEY, "BaseUrl=https://localhost; Port=5001; "),
        );
        let mut ui = crate::ui::MockUI::new();
        let result = StartCommand::new(&test.context, AssetKind::WebApp)
            .execute(&mut ui)
            .unwrap();
        assert!(result.success);
        assert_eq!(
            test.launcher.launches.lock().unwrap()[0],
            Launch::Webserver {
                working_dir: temp.path().join("WebApp"),
                exec: "WebApp.dll".into(),
                url: "https://localhost:5001".into(),
            }
        );
        assert!(ui.has_success("https://localhost:5001"));
    }

    #[test]
    fn start_without_connection_is_refused() {
        let temp = TempDir::new().unwrap();
        let test = install(temp.path(), MemorySettings::new());
        let mut ui = crate::ui::MockUI::new();
        let result = StartCommand::new(&test.context, AssetKind::WebApp)
            .execute(&mut ui)
            .unwrap();
        assert_eq!(result.exit_code, 2);
        assert!(test.launcher.launches.lock().unwrap().is_empty());
    }

    #[test]
    fn start_uninstalled_asset_is_refused() {
        let temp = TempDir::new().unwrap();
        let test = install(temp.path(), MemorySettings::new());
        let mut ui = crate::ui::MockUI::new();
        let result = StartCommand::new(&test.context, AssetKind::Backend)
            .execute(&mut ui)
            .unwrap();
        assert_eq!(result.exit_code, 2);
        assert!(ui.has_error("not installed"));
    }

    #[test]
    fn browse_opens_folder_and_url() {
        let temp = TempDir::new().unwrap();
        let test = install(
            temp.path(),
            MemorySettings::new().with_value(API_CONNECTION_KEY, "BaseUrl=https://api.example.com; "),
        );
        let mut ui = crate::ui::MockUI::new();
        BrowseCommand::new(&test.context, AssetKind::Examples)
            .execute(&mut ui)
            .unwrap();
        BrowseCommand::new(&test.context, AssetKind::RemoteBackend)
            .execute(&mut ui)
            .unwrap();
        let launches = test.launcher.launches.lock().unwrap();
        assert_eq!(
            *launches,
            [
                Launch::Process(temp.path().join("Examples").display().to_string()),
                Launch::Process("https://api.example.com".into()),
            ]
        );
    }

    #[test]
    fn browse_missing_asset_fails() {
        let temp = TempDir::new().unwrap();
        let test = install(temp.path(), MemorySettings::new());
        let mut ui = crate::ui::MockUI::new();
        let result = BrowseCommand::new(&test.context, AssetKind::Tests)
            .execute(&mut ui)
            .unwrap();
        assert!(!result.success);
        assert!(ui.has_error("Nothing to open for Tests"));
    }
}
