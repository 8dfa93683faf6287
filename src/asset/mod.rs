//! Managed assets and their status.
//!
//! An installation consists of a backend (local or remote), a web
//! application and auxiliary folders. Each is an [`Asset`] variant that
//! carries only the capabilities of its kind. The [`AssetCatalog`] discovers
//! installed assets, imports their connections and refreshes their status.
//!
//! # Modules
//!
//! - [`catalog`] - Loading, status refresh and script lookup
//! - [`directory`] - Asset folder discovery
//! - [`kind`] - Asset variants, browse and start capabilities
//! - [`parameters`] - Typed parameter files with validation
//! - [`status`] - Rule-list status cascades

pub mod catalog;
pub mod directory;
pub mod kind;
pub mod parameters;
pub mod status;

pub use catalog::AssetCatalog;
pub use directory::{AssetDirectory, AssetFolder, FsAssetDirectory, PARAMETER_FILE};
pub use kind::{
    Asset, AssetContext, AssetKind, BackendAsset, BrowseTarget, ConsoleAsset, FolderAsset,
    RemoteBackendAsset, StartRequest, WebAppAsset, WebserverEndpoint,
};
pub use parameters::{AssetParameters, BackendParameters, ConsoleParameters, WebAppParameters};
pub use status::{BackendStatus, StatusRule, WebAppStatus};
