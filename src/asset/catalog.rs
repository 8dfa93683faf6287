//! The set of installed assets and their cached status.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, info_span};

use crate::database::DatabaseVersion;
use crate::error::{AdminError, Result, ValidationError};
use crate::invalidation::StatusSignal;
use crate::settings::SettingsStore;

use super::directory::{AssetDirectory, AssetFolder, PARAMETER_FILE};
use super::kind::{
    Asset, AssetContext, AssetKind, BackendAsset, ConsoleAsset, FolderAsset, RemoteBackendAsset,
    WebAppAsset, WebserverEndpoint,
};
use super::parameters::{AssetParameters, BackendParameters, ConsoleParameters, WebAppParameters};
use super::status::{BackendStatus, WebAppStatus};
use crate::webserver::WebserverStatus;

/// All managed assets of one installation.
///
/// Status is pulled: [`update_status`](Self::update_status) recomputes every
/// component and the result stays cached until the [`StatusSignal`] is
/// invalidated.
pub struct AssetCatalog {
    directory: Arc<dyn AssetDirectory>,
    assets: Vec<Asset>,
    signal: StatusSignal,
    last_refresh: Option<DateTime<Utc>>,
}

fn required_parameters<P: AssetParameters>(kind: AssetKind, folder: &AssetFolder) -> Result<P> {
    let value = folder
        .parameters
        .clone()
        .ok_or_else(|| ValidationError::MissingParameter {
            name: PARAMETER_FILE.to_string(),
        });
    value
        .and_then(P::from_value)
        .map_err(|source| AdminError::InvalidAsset {
            asset: kind.name().to_string(),
            source,
        })
}

fn api_endpoint(settings: &dyn SettingsStore) -> Result<WebserverEndpoint> {
    let mut connection = settings.api_connection()?.unwrap_or_default();
    if connection.api_key.is_none() {
        connection.api_key = settings.api_key()?;
    }
    Ok(WebserverEndpoint {
        connection,
        status: WebserverStatus::default(),
    })
}

impl AssetCatalog {
    /// Discover installed assets and import their connections.
    ///
    /// Fails on unreadable or invalid parameter files; a missing asset is not
    /// an error.
    pub fn load(directory: Arc<dyn AssetDirectory>, settings: &dyn SettingsStore) -> Result<Self> {
        let mut assets = Vec::with_capacity(AssetKind::ALL.len());
        let mut backend_installed = false;

        for kind in AssetKind::ALL {
            let folder = if kind.is_virtual() {
                None
            } else {
                directory.locate(kind.name())?
            };
            debug!(
                "Asset {}: {}",
                kind,
                folder
                    .as_ref()
                    .map_or("not installed".to_string(), |f| f.path.display().to_string())
            );

            let asset = match kind {
                AssetKind::Backend => match folder {
                    Some(folder) => {
                        backend_installed = true;
                        Asset::Backend(BackendAsset {
                            parameters: required_parameters::<BackendParameters>(kind, &folder)?,
                            endpoint: api_endpoint(settings)?,
                            database: settings.database_connection()?,
                            folder: Some(folder.path),
                            ..Default::default()
                        })
                    }
                    None => Asset::Backend(BackendAsset::default()),
                },
                AssetKind::RemoteBackend => Asset::RemoteBackend(RemoteBackendAsset {
                    active: !backend_installed,
                    endpoint: api_endpoint(settings)?,
                }),
                AssetKind::WebApp => match folder {
                    Some(folder) => Asset::WebApp(WebAppAsset {
                        parameters: required_parameters::<WebAppParameters>(kind, &folder)?,
                        endpoint: WebserverEndpoint {
                            connection: settings.webapp_connection()?.unwrap_or_default(),
                            status: WebserverStatus::default(),
                        },
                        folder: Some(folder.path),
                        ..Default::default()
                    }),
                    None => Asset::WebApp(WebAppAsset::default()),
                },
                AssetKind::Console => {
                    let parameters = match &folder {
                        Some(f) if f.parameters.is_some() => {
                            Some(required_parameters::<ConsoleParameters>(kind, f)?)
                        }
                        _ => None,
                    };
                    Asset::Console(ConsoleAsset {
                        folder: folder.map(|f| f.path),
                        parameters,
                    })
                }
                AssetKind::Tests => Asset::Tests(FolderAsset {
                    folder: folder.map(|f| f.path),
                }),
                AssetKind::Examples => Asset::Examples(FolderAsset {
                    folder: folder.map(|f| f.path),
                }),
            };
            assets.push(asset);
        }

        info!(
            "Loaded assets from {}: {} installed",
            directory.root().display(),
            assets.iter().filter(|a| a.folder().is_some()).count()
        );
        Ok(Self {
            directory,
            assets,
            signal: StatusSignal::new(),
            last_refresh: None,
        })
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn asset(&self, kind: AssetKind) -> Option<&Asset> {
        self.assets.iter().find(|a| a.kind() == kind)
    }

    pub fn backend(&self) -> Option<&BackendAsset> {
        self.assets.iter().find_map(|a| match a {
            Asset::Backend(backend) => Some(backend),
            _ => None,
        })
    }

    pub fn remote_backend(&self) -> Option<&RemoteBackendAsset> {
        self.assets.iter().find_map(|a| match a {
            Asset::RemoteBackend(remote) => Some(remote),
            _ => None,
        })
    }

    pub fn webapp(&self) -> Option<&WebAppAsset> {
        self.assets.iter().find_map(|a| match a {
            Asset::WebApp(webapp) => Some(webapp),
            _ => None,
        })
    }

    /// Handle to the staleness signal, shareable with other threads.
    pub fn signal(&self) -> &StatusSignal {
        &self.signal
    }

    /// Mark cached status stale.
    pub fn invalidate_status(&self) -> bool {
        self.signal.invalidate()
    }

    pub fn needs_refresh(&self) -> bool {
        self.signal.is_dirty()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    /// Recompute the status of every asset.
    ///
    /// Components are independent, so each is refreshed on its own thread.
    pub fn update_status(&mut self, context: &AssetContext) {
        let _span = info_span!("update_status").entered();
        self.signal.begin_refresh();
        std::thread::scope(|scope| {
            for asset in self.assets.iter_mut() {
                scope.spawn(move || asset.update_status(context));
            }
        });
        self.last_refresh = Some(Utc::now());
        for asset in &self.assets {
            debug!("{}: {}", asset.kind(), asset.status_label());
        }
    }

    /// Refresh only when the cached status is stale. Returns whether it ran.
    pub fn refresh_if_stale(&mut self, context: &AssetContext) -> bool {
        if !self.needs_refresh() {
            return false;
        }
        self.update_status(context);
        true
    }

    /// A local backend is installed and loaded.
    pub fn backend_available(&self) -> bool {
        self.backend()
            .is_some_and(|b| b.is_available() && b.status > BackendStatus::NotAvailable)
    }

    /// Some backend is usable by clients: the local one once its database
    /// works, otherwise a remote one with a defined webserver.
    pub fn backend_for_client_available(&self) -> bool {
        if let Some(backend) = self.backend().filter(|b| b.is_available()) {
            return backend.status > BackendStatus::WebserverUndefined;
        }
        self.remote_backend().is_some_and(|remote| {
            remote.active && remote.endpoint.status > WebserverStatus::UndefinedConnection
        })
    }

    pub fn webapp_available(&self) -> bool {
        self.webapp().is_some_and(|w| {
            w.is_available() && self.backend_for_client_available() && w.status > WebAppStatus::NotAvailable
        })
    }

    pub fn has_any_asset(&self) -> bool {
        self.assets.iter().any(|a| a.folder().is_some())
    }

    fn installed_backend(&self) -> Result<&BackendAsset> {
        self.backend()
            .filter(|b| b.is_available())
            .ok_or_else(|| AdminError::InvalidArgument {
                message: "no local backend is installed".to_string(),
            })
    }

    fn read_script(&self, folder: &Path, name: &str) -> Result<String> {
        let path = folder.join(name);
        self.directory
            .read_text(&path)?
            .ok_or(AdminError::MissingScript { path })
    }

    /// Bodies of the scripts creating the schema, in order.
    pub fn create_scripts(&self) -> Result<Vec<String>> {
        let backend = self.installed_backend()?;
        let folder = backend.folder.as_deref().unwrap_or(self.directory.root());
        backend
            .parameters
            .database
            .init_scripts
            .iter()
            .map(|name| self.read_script(folder, name))
            .collect()
    }

    /// Bodies of the migration scripts needed from `existing`, in order.
    pub fn update_scripts(&self, existing: &DatabaseVersion) -> Result<Vec<String>> {
        let backend = self.installed_backend()?;
        let folder = backend.folder.as_deref().unwrap_or(self.directory.root());
        backend
            .parameters
            .database
            .scripts_from(existing)
            .into_iter()
            .map(|name| self.read_script(folder, name))
            .collect()
    }
}
