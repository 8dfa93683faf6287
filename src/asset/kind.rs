//! Asset variants and their capabilities.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::connection::{DatabaseConnection, WebserverConnection};
use crate::database::{DatabaseService, DatabaseStatus};
use crate::webserver::{WebserverService, WebserverStatus};

use super::parameters::{BackendParameters, ConsoleParameters, WebAppParameters};
use super::status::{BackendFacts, BackendStatus, WebAppFacts, WebAppStatus, WebserverFacts};

/// Kinds of managed components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssetKind {
    /// Backend API installed on this machine.
    Backend,
    /// Backend API reached over the network; used when no local backend exists.
    RemoteBackend,
    WebApp,
    Console,
    Tests,
    Examples,
}

impl AssetKind {
    /// Every kind, in catalog order.
    pub const ALL: [AssetKind; 6] = [
        AssetKind::Backend,
        AssetKind::RemoteBackend,
        AssetKind::WebApp,
        AssetKind::Console,
        AssetKind::Tests,
        AssetKind::Examples,
    ];

    /// Folder name under the asset root.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Backend => "Backend",
            Self::RemoteBackend => "RemoteBackend",
            Self::WebApp => "WebApp",
            Self::Console => "Console",
            Self::Tests => "Tests",
            Self::Examples => "Examples",
        }
    }

    /// Virtual assets have no folder.
    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::RemoteBackend)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Services a status refresh talks to.
#[derive(Clone)]
pub struct AssetContext {
    pub database: DatabaseService,
    pub webserver: std::sync::Arc<dyn WebserverService>,
}

/// A webserver connection with its last probe result.
#[derive(Debug, Clone, Default)]
pub struct WebserverEndpoint {
    pub connection: WebserverConnection,
    pub status: WebserverStatus,
}

impl WebserverEndpoint {
    fn update_status(&mut self, configured: bool, context: &AssetContext) {
        let probe = if configured {
            context.webserver.status(&self.connection)
        } else {
            WebserverStatus::UndefinedConnection
        };
        self.status = WebserverFacts { configured, probe }.status();
    }
}

/// Local backend: database plus API webserver.
#[derive(Debug, Clone, Default)]
pub struct BackendAsset {
    pub folder: Option<PathBuf>,
    pub parameters: BackendParameters,
    pub endpoint: WebserverEndpoint,
    pub database: DatabaseConnection,
    pub database_status: DatabaseStatus,
    pub status: BackendStatus,
}

impl BackendAsset {
    pub fn is_available(&self) -> bool {
        self.folder.is_some()
    }

    fn update_status(&mut self, context: &AssetContext) {
        let available = self.is_available();
        self.endpoint.update_status(available, context);
        if !available {
            self.status = BackendStatus::NotAvailable;
            return;
        }
        let target = Some(self.parameters.database.current_version).filter(|v| !v.is_empty());
        self.database_status = context.database.status(&self.database, target.as_ref());
        self.status = BackendFacts {
            available,
            database: self.database_status,
            webserver: self.endpoint.status,
        }
        .status();
    }
}

/// Backend reached over the network.
#[derive(Debug, Clone, Default)]
pub struct RemoteBackendAsset {
    /// Active only while no local backend is installed.
    pub active: bool,
    pub endpoint: WebserverEndpoint,
}

/// Web client application.
#[derive(Debug, Clone, Default)]
pub struct WebAppAsset {
    pub folder: Option<PathBuf>,
    pub parameters: WebAppParameters,
    pub endpoint: WebserverEndpoint,
    pub status: WebAppStatus,
}

impl WebAppAsset {
    pub fn is_available(&self) -> bool {
        self.folder.is_some()
    }

    fn update_status(&mut self, context: &AssetContext) {
        let available = self.is_available();
        self.endpoint.update_status(available, context);
        self.status = WebAppFacts {
            available,
            connection_defined: !self.endpoint.connection.is_empty(),
            webserver: self.endpoint.status,
        }
        .status();
    }
}

/// Command line console tool.
#[derive(Debug, Clone, Default)]
pub struct ConsoleAsset {
    pub folder: Option<PathBuf>,
    pub parameters: Option<ConsoleParameters>,
}

/// A folder of files such as tests or examples.
#[derive(Debug, Clone, Default)]
pub struct FolderAsset {
    pub folder: Option<PathBuf>,
}

/// What browsing an asset opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseTarget {
    Url(String),
    Folder(PathBuf),
}

impl BrowseTarget {
    /// Argument for the system open handler.
    pub fn to_target_string(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Folder(path) => path.display().to_string(),
        }
    }
}

/// How to start a webserver asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    pub working_dir: PathBuf,
    pub exec: String,
    pub url: String,
}

/// A managed component, carrying only the capabilities of its kind.
#[derive(Debug, Clone)]
pub enum Asset {
    Backend(BackendAsset),
    RemoteBackend(RemoteBackendAsset),
    WebApp(WebAppAsset),
    Console(ConsoleAsset),
    Tests(FolderAsset),
    Examples(FolderAsset),
}

impl Asset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Backend(_) => AssetKind::Backend,
            Self::RemoteBackend(_) => AssetKind::RemoteBackend,
            Self::WebApp(_) => AssetKind::WebApp,
            Self::Console(_) => AssetKind::Console,
            Self::Tests(_) => AssetKind::Tests,
            Self::Examples(_) => AssetKind::Examples,
        }
    }

    /// Installed folder; `None` for virtual or missing assets.
    pub fn folder(&self) -> Option<&Path> {
        match self {
            Self::Backend(a) => a.folder.as_deref(),
            Self::RemoteBackend(_) => None,
            Self::WebApp(a) => a.folder.as_deref(),
            Self::Console(a) => a.folder.as_deref(),
            Self::Tests(a) | Self::Examples(a) => a.folder.as_deref(),
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            Self::RemoteBackend(a) => a.active,
            _ => self.folder().is_some(),
        }
    }

    /// Webserver connection and status of webserver-backed assets.
    pub fn endpoint(&self) -> Option<&WebserverEndpoint> {
        match self {
            Self::Backend(a) => Some(&a.endpoint),
            Self::RemoteBackend(a) => Some(&a.endpoint),
            Self::WebApp(a) => Some(&a.endpoint),
            Self::Console(_) | Self::Tests(_) | Self::Examples(_) => None,
        }
    }

    /// What browsing this asset would open, if anything.
    pub fn browse_target(&self) -> Option<BrowseTarget> {
        if !self.is_available() {
            return None;
        }
        match self {
            Self::Backend(_) | Self::RemoteBackend(_) | Self::WebApp(_) => self
                .endpoint()
                .map(|endpoint| endpoint.connection.to_url())
                .filter(|url| !url.is_empty())
                .map(BrowseTarget::Url),
            Self::Tests(a) | Self::Examples(a) => a.folder.clone().map(BrowseTarget::Folder),
            Self::Console(_) => None,
        }
    }

    /// How to start this asset, for installed webserver assets with a URL.
    pub fn start_request(&self) -> Option<StartRequest> {
        let (folder, exec, endpoint) = match self {
            Self::Backend(a) => (a.folder.as_ref()?, &a.parameters.webserver_exec, &a.endpoint),
            Self::WebApp(a) => (a.folder.as_ref()?, &a.parameters.webserver_exec, &a.endpoint),
            _ => return None,
        };
        let url = endpoint.connection.to_url();
        if url.is_empty() {
            return None;
        }
        Some(StartRequest {
            working_dir: folder.clone(),
            exec: exec.clone(),
            url,
        })
    }

    /// Refresh this asset's own status fields.
    ///
    /// Never fails; probe problems end up in the status values.
    pub fn update_status(&mut self, context: &AssetContext) {
        match self {
            Self::Backend(a) => a.update_status(context),
            Self::RemoteBackend(a) => a.endpoint.update_status(a.active, context),
            Self::WebApp(a) => a.update_status(context),
            Self::Console(_) | Self::Tests(_) | Self::Examples(_) => {}
        }
    }

    /// One-line status description.
    pub fn status_label(&self) -> String {
        if !self.is_available() {
            return "not installed".to_string();
        }
        match self {
            Self::Backend(a) => a.status.to_string(),
            Self::RemoteBackend(a) => a.endpoint.status.to_string(),
            Self::WebApp(a) => a.status.to_string(),
            Self::Console(_) | Self::Tests(_) | Self::Examples(_) => "installed".to_string(),
        }
    }
}
