//! Integration tests for the engine-admin binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FILE_SETTINGS_CONFIG: &str = r#"
settings:
  backend: file
  path: settings.yml
"#;

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

const CREATE_SCRIPT: &str = "
CREATE TABLE Version (MajorVersion INTEGER, MinorVersion INTEGER, SubVersion INTEGER);
CREATE TABLE Job (Id INTEGER PRIMARY KEY, Name TEXT NOT NULL);
INSERT INTO Version VALUES (1, 1, 0);
";

fn admin(root: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("engine-admin"));
    cmd.current_dir(root)
        .env_remove("ENGINE_ADMIN_CONFIG")
        .env_remove("ENGINE_ADMIN_ROOT")
        .env_remove("EngineDatabaseConnection")
        .env_remove("EngineApiConnection")
        .env_remove("EngineApiKey")
        .env_remove("EngineWebAppConnection");
    cmd
}

/// An installation with a local backend, file settings and a data directory.
fn setup_installation() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("engine-admin.yml"), FILE_SETTINGS_CONFIG).unwrap();
    let backend = temp.path().join("Backend");
    fs::create_dir_all(&backend).unwrap();
    fs::write(backend.join("asset.json"), BACKEND_PARAMETERS).unwrap();
    fs::write(backend.join("create.sql"), CREATE_SCRIPT).unwrap();
    fs::write(backend.join("to-1.1.sql"), "UPDATE Version SET MinorVersion = 1;").unwrap();
    fs::create_dir_all(temp.path().join("data")).unwrap();
    temp
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("engine-admin"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Status and lifecycle administration"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("engine-admin"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_generates_completions() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    admin(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("engine-admin"));
    Ok(())
}

#[test]
fn cli_status_without_assets_exits_2() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    admin(temp.path())
        .arg("status")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No assets found"));
    Ok(())
}

#[test]
fn cli_missing_config_file_exits_2() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    admin(temp.path())
        .args(["--config", "missing.yml", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn cli_root_flag_selects_installation() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::create_dir_all(temp.path().join("Tests"))?;
    let elsewhere = TempDir::new()?;
    admin(elsewhere.path())
        .args(["--root", temp.path().to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tests"));
    Ok(())
}

#[test]
fn cli_status_json_is_parseable() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::create_dir_all(temp.path().join("Examples"))?;
    let output = admin(temp.path()).args(["status", "--json"]).output()?;
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let examples = report["assets"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["kind"] == "Examples")
        .unwrap();
    assert_eq!(examples["installed"], true);
    assert_eq!(report["backend_available"], false);
    Ok(())
}

#[test]
fn cli_stores_and_shows_connections() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_installation();
    admin(temp.path())
        .args([
            "connection",
            "set-database",
            "--server",
            "db.internal",
            "--database",
            "Engine",
            "--user",
            "admin",
            "--password",
            "s3cret",
        ])
        .assert()
        .success();
    admin(temp.path())
        .args(["connection", "set-api", "--url", "https://localhost", "--port", "44354"])
        .assert()
        .success();

    let settings = fs::read_to_string(temp.path().join("settings.yml"))?;
    assert!(settings.contains("EngineDatabaseConnection"));
    assert!(settings.contains("Password=s3cret"));

    admin(temp.path())
        .args(["connection", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Password=***"))
        .stdout(predicate::str::contains("BaseUrl=https://localhost; Port=44354;"))
        .stdout(predicate::str::contains("s3cret").not());
    Ok(())
}

#[test]
fn cli_incomplete_database_connection_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_installation();
    admin(temp.path())
        .args(["connection", "set-database", "Server=db; Database=Engine; "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("incomplete"));
    assert!(!temp.path().join("settings.yml").exists());
    Ok(())
}

#[test]
fn cli_creates_local_database() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_installation();
    admin(temp.path())
        .args(["connection", "set-database", "--preset", "local"])
        .assert()
        .success();

    admin(temp.path())
        .args(["db", "status"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("missing database"))
        .stdout(predicate::str::contains("db create"));

    admin(temp.path())
        .args(["db", "create", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database created"));
    assert!(temp.path().join("data").join("Engine.db").is_file());

    admin(temp.path())
        .args(["db", "version"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1.1.0\n"));

    admin(temp.path())
        .args(["db", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("available"));
    Ok(())
}

#[test]
fn cli_create_without_confirmation_does_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_installation();
    admin(temp.path())
        .args(["connection", "set-database", "--preset", "local"])
        .assert()
        .success();
    admin(temp.path())
        .args(["db", "create"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Cancelled"));
    assert!(!temp.path().join("data").join("Engine.db").exists());
    Ok(())
}

#[test]
fn cli_db_without_backend_exits_2() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::create_dir_all(temp.path().join("Tests"))?;
    admin(temp.path())
        .args(["db", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No local backend"));
    Ok(())
}

#[test]
fn cli_reads_connections_from_environment() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let backend = temp.path().join("Backend");
    fs::create_dir_all(&backend)?;
    fs::write(backend.join("asset.json"), BACKEND_PARAMETERS)?;
    admin(temp.path())
        .env("EngineDatabaseConnection", "Server=db; Database=Engine; User ID=sa; Password=pw; ")
        .args(["connection", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Server=db; Database=Engine;"));
    Ok(())
}

#[test]
fn cli_stores_connections_without_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let backend = temp.path().join("Backend");
    fs::create_dir_all(&backend)?;
    fs::write(backend.join("asset.json"), BACKEND_PARAMETERS)?;

    admin(temp.path())
        .args([
            "connection",
            "set-database",
            "--server",
            "db",
            "--database",
            "Engine",
            "--trusted",
        ])
        .assert()
        .success();
    assert!(temp.path().join("engine-admin.settings.yml").is_file());

    admin(temp.path())
        .args(["connection", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Server=db; Database=Engine;"));
    Ok(())
}

#[test]
fn cli_environment_backend_refuses_to_store() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(
        temp.path().join("engine-admin.yml"),
        "settings:\n  backend: environment\n",
    )?;
    admin(temp.path())
        .args(["connection", "set-api", "--url", "https://localhost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("read-only"));
    Ok(())
}
