//! Service wiring shared by the commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::asset::{AssetCatalog, AssetContext, AssetDirectory, FsAssetDirectory};
use crate::config::{load_config, validate, AdminConfig, SettingsBackend};
use crate::database::{DatabaseService, SqliteBackend};
use crate::error::Result;
use crate::error_log::ErrorLog;
use crate::launcher::{ProcessLauncher, SystemLauncher};
use crate::settings::{EnvSettings, FileSettings, LayeredSettings, SettingsStore};
use crate::setup::{DatabaseSetup, SetupOptions};
use crate::webserver::{WebserverProbe, WebserverService};

/// Everything a command needs to talk to one installation.
pub struct AdminContext {
    root: PathBuf,
    config: AdminConfig,
    settings: Arc<dyn SettingsStore>,
    errors: Arc<ErrorLog>,
    services: AssetContext,
    directory: Arc<dyn AssetDirectory>,
    launcher: Arc<dyn ProcessLauncher>,
}

/// Parts for [`AdminContext::new`].
pub struct ContextParts {
    pub settings: Arc<dyn SettingsStore>,
    pub errors: Arc<ErrorLog>,
    pub services: AssetContext,
    pub directory: Arc<dyn AssetDirectory>,
    pub launcher: Arc<dyn ProcessLauncher>,
}

impl AdminContext {
    /// Load configuration for `root` and build the real services.
    ///
    /// # Errors
    ///
    /// Configuration errors (`ConfigNotFound`, `ConfigParseError`,
    /// `ConfigValidationError`) and HTTP client construction failures.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let config = load_config(root, config_path)?;
        validate(&config, root)?;

        let overlay = match &config.settings.prefix {
            Some(prefix) => EnvSettings::with_prefix(prefix.clone()),
            None => EnvSettings::new(),
        };
        let settings: Arc<dyn SettingsStore> = match config.settings.backend {
            SettingsBackend::Environment => Arc::new(overlay),
            SettingsBackend::File => Arc::new(LayeredSettings::new(
                overlay,
                FileSettings::new(config.settings_path(root)),
            )),
        };

        let errors = Arc::new(ErrorLog::new());
        let backend = SqliteBackend::new(config.database_data_dir(root));
        let database = DatabaseService::new(Arc::new(backend), errors.clone())
            .with_timeout_override(config.database_connect_timeout);
        let probe = if config.accept_invalid_certs {
            WebserverProbe::accepting_invalid_certs(config.http_timeout(), errors.clone())?
        } else {
            WebserverProbe::new(config.http_timeout(), errors.clone())?
        };
        let webserver: Arc<dyn WebserverService> = Arc::new(probe);
        let directory = Arc::new(FsAssetDirectory::new(config.assets_root(root)));
        let launcher = Arc::new(SystemLauncher::new(config.webserver_host.clone()));

        tracing::debug!("Loaded configuration for {}", root.display());
        Ok(Self::new(
            root,
            config,
            ContextParts {
                settings,
                errors,
                services: AssetContext {
                    database,
                    webserver,
                },
                directory,
                launcher,
            },
        ))
    }

    /// Assemble a context from explicit parts.
    pub fn new(root: &Path, config: AdminConfig, parts: ContextParts) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            settings: parts.settings,
            errors: parts.errors,
            services: parts.services,
            directory: parts.directory,
            launcher: parts.launcher,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn settings(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    pub fn errors(&self) -> &Arc<ErrorLog> {
        &self.errors
    }

    pub fn services(&self) -> &AssetContext {
        &self.services
    }

    pub fn launcher(&self) -> &dyn ProcessLauncher {
        self.launcher.as_ref()
    }

    pub fn assets_root(&self) -> &Path {
        self.directory.root()
    }

    /// Discover the installed assets with the stored connections.
    pub fn catalog(&self) -> Result<AssetCatalog> {
        AssetCatalog::load(Arc::clone(&self.directory), self.settings())
    }

    /// Database setup workflow, `collation` overriding the configured one.
    pub fn database_setup(&self, collation: Option<String>) -> DatabaseSetup {
        let options = SetupOptions {
            collation: collation.or_else(|| self.config.database_collation.clone()),
            ..Default::default()
        };
        DatabaseSetup::new(
            self.services.database.clone(),
            Arc::clone(&self.errors),
            options,
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_without_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let context = AdminContext::load(temp.path(), None).unwrap();
        assert_eq!(context.config(), &AdminConfig::default());
        assert_eq!(context.assets_root(), temp.path());
    }

    #[test]
    fn load_reports_invalid_config() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("engine-admin.yml"),
            "settings:\n  prefix: \"A=B\"\n",
        )
        .unwrap();
        let result = AdminContext::load(temp.path(), None);
        assert!(matches!(result, Err(AdminError::ConfigValidationError { .. })));
    }

    #[test]
    fn default_settings_are_stored_in_root() {
        let temp = TempDir::new().unwrap();
        let context = AdminContext::load(temp.path(), None).unwrap();
        context.settings().set_api_key("k1").unwrap();
        assert!(temp.path().join("engine-admin.settings.yml").exists());

        let reloaded = AdminContext::load(temp.path(), None).unwrap();
        assert_eq!(reloaded.settings().api_key().unwrap().as_deref(), Some("k1"));
    }

    #[test]
    fn environment_backend_refuses_writes() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("engine-admin.yml"),
            "settings:\n  backend: environment\n  prefix: ENGINE_ADMIN_TEST_CTX_\n",
        )
        .unwrap();
        let context = AdminContext::load(temp.path(), None).unwrap();
        assert!(matches!(
            context.settings().set_api_key("k1"),
            Err(AdminError::Settings { .. })
        ));
    }

    #[test]
    fn file_settings_resolve_against_root() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("engine-admin.yml"),
            "settings:\n  backend: file\n  path: settings.yml\n",
        )
        .unwrap();
        let context = AdminContext::load(temp.path(), None).unwrap();
        context.settings().set_api_key("k1").unwrap();
        assert!(temp.path().join("settings.yml").exists());
    }

    #[test]
    fn setup_collation_falls_back_to_config() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("engine-admin.yml"),
            "database_collation: NOCASE\n",
        )
        .unwrap();
        let context = AdminContext::load(temp.path(), None).unwrap();
        let setup = context.database_setup(None);
        assert_eq!(setup.options().collation.as_deref(), Some("NOCASE"));
        let setup = context.database_setup(Some("BINARY".into()));
        assert_eq!(setup.options().collation.as_deref(), Some("BINARY"));
    }
}
