//! Library-level tests over the real SQLite backend and HTTP probe.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use engine_admin::asset::{AssetCatalog, AssetContext, BackendStatus, FsAssetDirectory};
use engine_admin::connection::{DatabaseConnection, WebserverConnection};
use engine_admin::database::{DatabaseService, DatabaseStatus, DatabaseVersion, SqliteBackend};
use engine_admin::error_log::ErrorLog;
use engine_admin::settings::{MemorySettings, SettingsStore};
use engine_admin::setup::{DatabaseSetup, SetupMode, SetupOptions, SetupOutcome, SetupStage};
use engine_admin::webserver::{WebserverProbe, WebserverStatus};
use httpmock::prelude::*;
use tempfile::TempDir;

const BACKEND_PARAMETERS: &str = r#"{
    "webserverExec": "Backend.dll",
    "database": {
        "minVersion": "1.0",
        "currentVersion": "1.1",
        "initScripts": ["create.sql"],
        "migrations": [
            {"fromVersion": "1.0", "toVersion": "1.1", "scripts": ["to-1.1.sql"]}
        ]
    }
}"#;

fn install_backend(root: &Path) {
    let backend = root.join("Backend");
    fs::create_dir_all(&backend).unwrap();
    fs::write(backend.join("asset.json"), BACKEND_PARAMETERS).unwrap();
    fs::write(
        backend.join("create.sql"),
        "CREATE TABLE Version (MajorVersion INTEGER, MinorVersion INTEGER, SubVersion INTEGER);
         INSERT INTO Version VALUES (1, 0, 0);",
    )
    .unwrap();
    fs::write(
        backend.join("to-1.1.sql"),
        "CREATE TABLE Job (Id INTEGER PRIMARY KEY);
         INSERT INTO Version VALUES (1, 1, 0);",
    )
    .unwrap();
    fs::create_dir_all(root.join("data")).unwrap();
}

struct Installation {
    _temp: TempDir,
    catalog: AssetCatalog,
    context: AssetContext,
    errors: Arc<ErrorLog>,
    connection: DatabaseConnection,
}

fn installation(api_url: String) -> Installation {
    let temp = TempDir::new().unwrap();
    install_backend(temp.path());

    let connection = DatabaseConnection::new("localhost", "Engine").trusted();
    let settings = MemorySettings::new();
    settings.set_database_connection(&connection).unwrap();
    settings
        .set_api_connection(&WebserverConnection::new(api_url))
        .unwrap();

    let errors = Arc::new(ErrorLog::new());
    let context = AssetContext {
        database: DatabaseService::new(
            Arc::new(SqliteBackend::new(temp.path().join("data"))),
            errors.clone(),
        ),
        webserver: Arc::new(WebserverProbe::new(Duration::from_secs(2), errors.clone()).unwrap()),
    };
    let catalog =
        AssetCatalog::load(Arc::new(FsAssetDirectory::new(temp.path())), &settings).unwrap();
    Installation {
        _temp: temp,
        catalog,
        context,
        errors,
        connection,
    }
}

fn setup(install: &Installation) -> DatabaseSetup {
    DatabaseSetup::new(
        install.context.database.clone(),
        install.errors.clone(),
        SetupOptions {
            verify_interval: Duration::from_millis(10),
            ..Default::default()
        },
    )
    .with_signal(install.catalog.signal().clone())
}

#[test]
fn backend_lifecycle_from_missing_database_to_running() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200);
    });
    let mut install = installation(server.base_url());

    install.catalog.update_status(&install.context);
    let backend = install.catalog.backend().unwrap();
    assert_eq!(backend.database_status, DatabaseStatus::MissingDatabase);
    assert_eq!(backend.endpoint.status, WebserverStatus::Available);
    assert_eq!(backend.status, BackendStatus::DatabaseNotAvailable);
    assert!(!install.catalog.backend_for_client_available());

    let scripts = install.catalog.create_scripts().unwrap();
    let outcome = setup(&install)
        .run(&install.connection, SetupMode::Create, &scripts, |_| {})
        .unwrap();
    assert!(outcome.is_success(), "{:?}", outcome);
    assert!(install.catalog.needs_refresh());

    assert!(install.catalog.refresh_if_stale(&install.context));
    assert_eq!(
        install.catalog.backend().unwrap().database_status,
        DatabaseStatus::OutdatedVersion
    );

    let current = install
        .context
        .database
        .current_version(&install.connection)
        .unwrap();
    assert_eq!(current, DatabaseVersion::new(1, 0, 0));
    let scripts = install.catalog.update_scripts(&current).unwrap();
    assert_eq!(scripts.len(), 1);
    let outcome = setup(&install)
        .run(&install.connection, SetupMode::Update, &scripts, |_| {})
        .unwrap();
    assert_eq!(
        outcome,
        SetupOutcome::Completed {
            scripts: 1,
            affected_rows: 1
        }
    );

    install.catalog.refresh_if_stale(&install.context);
    let backend = install.catalog.backend().unwrap();
    assert_eq!(backend.database_status, DatabaseStatus::Available);
    assert_eq!(backend.status, BackendStatus::Running);
    assert!(install.catalog.backend_for_client_available());
}

#[test]
fn failing_migration_is_rolled_back_and_reported() {
    let mut install = installation("http://127.0.0.1:9".to_string());
    let scripts = install.catalog.create_scripts().unwrap();
    assert!(setup(&install)
        .run(&install.connection, SetupMode::Create, &scripts, |_| {})
        .unwrap()
        .is_success());

    let broken = vec!["INSERT INTO Version VALUES (1, 1, 0); INSERT INTO Missing VALUES (1);".to_string()];
    let outcome = setup(&install)
        .run(&install.connection, SetupMode::Update, &broken, |_| {})
        .unwrap();
    match outcome {
        SetupOutcome::Failed { stage, message } => {
            assert_eq!(stage, SetupStage::Script(0));
            assert!(message.contains("Missing"), "{}", message);
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(
        install.context.database.current_version(&install.connection),
        Some(DatabaseVersion::new(1, 0, 0))
    );

    install.catalog.update_status(&install.context);
    assert_eq!(
        install.catalog.backend().unwrap().status,
        BackendStatus::WebserverNotStarted
    );
}
