//! Shared status rendering for `status` and `watch`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::asset::{Asset, AssetCatalog, AssetKind, BackendStatus, WebAppStatus};
use crate::database::DatabaseStatus;
use crate::ui::{Health, Table, UserInterface};
use crate::webserver::WebserverStatus;

/// Machine-readable status of one installation.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub assets_root: PathBuf,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub backend_available: bool,
    pub backend_for_client_available: bool,
    pub webapp_available: bool,
    pub assets: Vec<AssetReport>,
}

#[derive(Debug, Serialize)]
pub struct AssetReport {
    pub kind: AssetKind,
    pub installed: bool,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webserver: Option<EndpointReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseReport>,
}

#[derive(Debug, Serialize)]
pub struct EndpointReport {
    pub url: String,
    pub status: WebserverStatus,
}

#[derive(Debug, Serialize)]
pub struct DatabaseReport {
    pub connection: String,
    pub status: DatabaseStatus,
}

impl StatusReport {
    pub fn from_catalog(catalog: &AssetCatalog, assets_root: PathBuf) -> Self {
        Self {
            assets_root,
            refreshed_at: catalog.last_refresh(),
            backend_available: catalog.backend_available(),
            backend_for_client_available: catalog.backend_for_client_available(),
            webapp_available: catalog.webapp_available(),
            assets: catalog.assets().iter().map(asset_report).collect(),
        }
    }
}

fn asset_report(asset: &Asset) -> AssetReport {
    let installed = asset.is_available();
    AssetReport {
        kind: asset.kind(),
        installed,
        status: asset.status_label(),
        folder: asset.folder().map(|p| p.to_path_buf()),
        webserver: asset
            .endpoint()
            .filter(|_| installed)
            .map(|endpoint| EndpointReport {
                url: endpoint.connection.to_url(),
                status: endpoint.status,
            }),
        database: match asset {
            Asset::Backend(backend) if installed => Some(DatabaseReport {
                connection: backend.database.to_string(),
                status: backend.database_status,
            }),
            _ => None,
        },
    }
}

/// How healthy an asset's composite status is.
pub fn asset_health(asset: &Asset) -> Health {
    if !asset.is_available() {
        return Health::Inactive;
    }
    match asset {
        Asset::Backend(backend) => match backend.status {
            BackendStatus::Running => Health::Good,
            BackendStatus::WebserverNotStarted | BackendStatus::WebserverUndefined => {
                Health::Attention
            }
            BackendStatus::DatabaseNotAvailable | BackendStatus::NotAvailable => Health::Bad,
        },
        Asset::RemoteBackend(remote) => webserver_health(remote.endpoint.status),
        Asset::WebApp(webapp) => match webapp.status {
            WebAppStatus::Running => Health::Good,
            WebAppStatus::WebserverNotStarted | WebAppStatus::WebserverUndefined => {
                Health::Attention
            }
            WebAppStatus::NotAvailable => Health::Bad,
        },
        Asset::Console(_) | Asset::Tests(_) | Asset::Examples(_) => Health::Good,
    }
}

fn webserver_health(status: WebserverStatus) -> Health {
    match status {
        WebserverStatus::Available => Health::Good,
        WebserverStatus::NotAvailable => Health::Bad,
        WebserverStatus::UndefinedConnection => Health::Attention,
    }
}

/// Health of a database status on its own.
pub fn database_health(status: DatabaseStatus) -> Health {
    match status {
        DatabaseStatus::Available => Health::Good,
        s if s.pending_change() => Health::Attention,
        _ => Health::Bad,
    }
}

/// Sub-status line for the details column.
pub fn asset_details(asset: &Asset) -> String {
    if !asset.is_available() {
        return String::new();
    }
    let endpoint = |url: String, status: WebserverStatus| {
        if url.is_empty() {
            format!("{}", status)
        } else {
            format!("{} ({})", url, status)
        }
    };
    match asset {
        Asset::Backend(backend) => format!(
            "database {}: {}, api {}",
            backend.database,
            backend.database_status,
            endpoint(backend.endpoint.connection.to_url(), backend.endpoint.status)
        ),
        Asset::RemoteBackend(remote) => format!(
            "api {}",
            endpoint(remote.endpoint.connection.to_url(), remote.endpoint.status)
        ),
        Asset::WebApp(webapp) => endpoint(webapp.endpoint.connection.to_url(), webapp.endpoint.status),
        Asset::Console(_) | Asset::Tests(_) | Asset::Examples(_) => asset
            .folder()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
    }
}

/// Print the status table, database hints and, in verbose mode, captured errors.
pub fn show_status(ui: &mut dyn UserInterface, catalog: &AssetCatalog, errors: Option<String>) {
    let mut table = Table::new(&["Asset", "Status", "Details"]);
    for asset in catalog.assets() {
        if asset.kind().is_virtual() && !asset.is_available() {
            continue;
        }
        table.add_row([
            asset.kind().to_string(),
            format!("{} {}", asset_health(asset).icon(), asset.status_label()),
            asset_details(asset),
        ]);
    }
    ui.show_table(&table);

    if let Some(refreshed) = catalog.last_refresh() {
        ui.message(&format!(
            "Refreshed {}",
            refreshed.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
        ));
    }

    if let Some(backend) = catalog.backend().filter(|b| b.is_available()) {
        let status = backend.database_status;
        if status.ready_to_create() {
            ui.status_line(database_health(status), &format!("Database: {}", status));
            ui.message("Run 'engine-admin db create' to create it");
        } else if status.ready_to_update() {
            ui.status_line(database_health(status), &format!("Database: {}", status));
            ui.message("Run 'engine-admin db update' to migrate it");
        }
    }

    if ui.output_mode().shows_details() {
        if let Some(errors) = errors {
            ui.warning("Errors during refresh:");
            for line in errors.lines() {
                ui.message(&format!("  {}", line));
            }
        }
    }
}
