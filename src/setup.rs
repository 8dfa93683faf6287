//! Database creation and migration workflow.
//!
//! Creating a database is asynchronous on some servers: the create call
//! returns before the database accepts connections. The workflow therefore
//! polls the status until the new database reports as empty before running
//! the schema scripts.

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::connection::DatabaseConnection;
use crate::database::{DatabaseService, DatabaseStatus};
use crate::error::Result;
use crate::error_log::{ErrorLog, WatchQuery};
use crate::invalidation::StatusSignal;

const WATCH_NAME: &str = "database-setup";

/// Which remediation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupMode {
    /// Create the database if needed, then run the init scripts.
    Create,
    /// Run migration scripts against an existing schema.
    Update,
}

/// Tuning of the creation check.
#[derive(Debug, Clone)]
pub struct SetupOptions {
    pub collation: Option<String>,
    pub verify_attempts: u32,
    pub verify_interval: Duration,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            collation: None,
            verify_attempts: 100,
            verify_interval: Duration::from_millis(200),
        }
    }
}

/// Where a setup run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    Create,
    Verify,
    /// Zero-based index into the script list.
    Script(usize),
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("database creation"),
            Self::Verify => f.write_str("database verification"),
            Self::Script(index) => write!(f, "script {}", index + 1),
        }
    }
}

/// Progress notifications for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupEvent {
    Creating,
    Verifying { attempt: u32 },
    Executing { index: usize, total: usize },
}

/// Result of a setup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Completed { scripts: usize, affected_rows: u64 },
    Failed { stage: SetupStage, message: String },
}

impl SetupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Runs [`SetupMode`] workflows against one database.
pub struct DatabaseSetup {
    service: DatabaseService,
    errors: Arc<ErrorLog>,
    options: SetupOptions,
    signal: Option<StatusSignal>,
}

impl DatabaseSetup {
    /// `errors` must be the log the service writes to.
    pub fn new(service: DatabaseService, errors: Arc<ErrorLog>, options: SetupOptions) -> Self {
        Self {
            service,
            errors,
            options,
            signal: None,
        }
    }

    pub fn options(&self) -> &SetupOptions {
        &self.options
    }

    /// Invalidate `signal` after every successful run.
    pub fn with_signal(mut self, signal: StatusSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Run `mode` with the given script bodies.
    ///
    /// Stops at the first failing step. Only a blank script is an `Err`.
    pub fn run(
        &self,
        connection: &DatabaseConnection,
        mode: SetupMode,
        scripts: &[String],
        mut progress: impl FnMut(SetupEvent),
    ) -> Result<SetupOutcome> {
        self.errors.add_watch(WATCH_NAME);
        let outcome = self.run_steps(connection, mode, scripts, &mut progress);
        let captured = self.errors.watch_errors(WATCH_NAME, WatchQuery::Remove);

        Ok(match outcome? {
            Err((stage, fallback)) => {
                let message = captured.unwrap_or(fallback);
                tracing::warn!("Database setup failed at {}: {}", stage, message);
                SetupOutcome::Failed { stage, message }
            }
            Ok(completed) => {
                if let Some(signal) = &self.signal {
                    signal.invalidate();
                }
                completed
            }
        })
    }

    fn run_steps(
        &self,
        connection: &DatabaseConnection,
        mode: SetupMode,
        scripts: &[String],
        progress: &mut dyn FnMut(SetupEvent),
    ) -> Result<std::result::Result<SetupOutcome, (SetupStage, String)>> {
        if mode == SetupMode::Create {
            let status = self.service.status(connection, None);
            if !status.ready_to_create() {
                return Ok(Err((
                    SetupStage::Create,
                    format!("Database is not ready to create: {}", status),
                )));
            }
            if status == DatabaseStatus::MissingDatabase {
                progress(SetupEvent::Creating);
                if !self
                    .service
                    .create_database(connection, self.options.collation.as_deref())
                {
                    return Ok(Err((
                        SetupStage::Create,
                        "Database creation failed".to_string(),
                    )));
                }
                if !self.wait_for_empty_database(connection, progress) {
                    return Ok(Err((
                        SetupStage::Verify,
                        "Created database did not become available".to_string(),
                    )));
                }
            }
        }

        let mut affected_rows = 0;
        for (index, script) in scripts.iter().enumerate() {
            progress(SetupEvent::Executing {
                index,
                total: scripts.len(),
            });
            match self.service.execute_script(connection, script)? {
                Some(rows) => affected_rows += rows,
                None => {
                    return Ok(Err((
                        SetupStage::Script(index),
                        format!("Script {} of {} failed", index + 1, scripts.len()),
                    )))
                }
            }
        }
        tracing::info!("Database setup ran {} scripts", scripts.len());
        Ok(Ok(SetupOutcome::Completed {
            scripts: scripts.len(),
            affected_rows,
        }))
    }

    fn wait_for_empty_database(
        &self,
        connection: &DatabaseConnection,
        progress: &mut dyn FnMut(SetupEvent),
    ) -> bool {
        for attempt in 1..=self.options.verify_attempts.max(1) {
            progress(SetupEvent::Verifying { attempt });
            if self.service.status(connection, None) == DatabaseStatus::EmptyDatabase {
                return true;
            }
            thread::sleep(self.options.verify_interval);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::service::fake::{FakeBackend, FakeState};
    use crate::error::AdminError;
    use crate::error_log::ErrorSink;

    fn setup(state: FakeState) -> (DatabaseSetup, Arc<FakeBackend>, Arc<ErrorLog>) {
        let backend = FakeBackend::with(state);
        let errors = Arc::new(ErrorLog::new());
        let service = DatabaseService::new(backend.clone(), errors.clone());
        let options = SetupOptions {
            verify_attempts: 3,
            verify_interval: Duration::from_millis(1),
            ..Default::default()
        };
        (DatabaseSetup::new(service, errors.clone(), options), backend, errors)
    }

    fn connection() -> DatabaseConnection {
        DatabaseConnection::new("localhost", "Engine").trusted()
    }

    fn scripts(bodies: &[&str]) -> Vec<String> {
        bodies.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn create_missing_database_then_run_scripts() {
        let (setup, backend, _) = setup(FakeState {
            server_up: true,
            ..Default::default()
        });
        let mut events = Vec::new();
        let outcome = setup
            .run(
                &connection(),
                SetupMode::Create,
                &scripts(&["CREATE A", "CREATE B"]),
                |e| events.push(e),
            )
            .unwrap();
        assert_eq!(
            outcome,
            SetupOutcome::Completed {
                scripts: 2,
                affected_rows: 2
            }
        );
        assert_eq!(events[0], SetupEvent::Creating);
        assert_eq!(events[1], SetupEvent::Verifying { attempt: 1 });
        assert_eq!(backend.state.lock().unwrap().executed, vec!["CREATE A", "CREATE B"]);
    }

    #[test]
    fn create_on_empty_database_skips_creation() {
        let (setup, _, _) = setup(FakeState {
            server_up: true,
            database_exists: true,
            ..Default::default()
        });
        let mut events = Vec::new();
        let outcome = setup
            .run(&connection(), SetupMode::Create, &scripts(&["X"]), |e| {
                events.push(e)
            })
            .unwrap();
        assert!(outcome.is_success());
        assert_eq!(events, vec![SetupEvent::Executing { index: 0, total: 1 }]);
    }

    #[test]
    fn create_refused_when_server_missing() {
        let (setup, backend, _) = setup(FakeState::default());
        let outcome = setup
            .run(&connection(), SetupMode::Create, &scripts(&["X"]), |_| {})
            .unwrap();
        let SetupOutcome::Failed { stage, message } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(stage, SetupStage::Create);
        assert!(message.contains("server unreachable"));
        assert!(backend.state.lock().unwrap().executed.is_empty());
    }

    #[test]
    fn creation_failure_reports_backend_error() {
        let (setup, _, _) = setup(FakeState {
            server_up: true,
            create_fails: true,
            ..Default::default()
        });
        let outcome = setup
            .run(&connection(), SetupMode::Create, &scripts(&["X"]), |_| {})
            .unwrap();
        assert_eq!(
            outcome,
            SetupOutcome::Failed {
                stage: SetupStage::Create,
                message: "create refused".into()
            }
        );
    }

    #[test]
    fn stops_at_first_failing_script() {
        let (setup, backend, errors) = setup(FakeState {
            fail_scripts_containing: Some("BAD".into()),
            ..Default::default()
        });
        errors.add_message("older unrelated error");
        let outcome = setup
            .run(
                &connection(),
                SetupMode::Update,
                &scripts(&["OK 1", "BAD 2", "OK 3"]),
                |_| {},
            )
            .unwrap();
        let SetupOutcome::Failed { stage, message } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(stage, SetupStage::Script(1));
        assert_eq!(message, "syntax error near 'BAD'");
        assert_eq!(backend.state.lock().unwrap().executed, vec!["OK 1"]);
        assert!(errors.retrieve_errors().unwrap().contains("older unrelated error"));
    }

    #[test]
    fn update_without_scripts_completes() {
        let (setup, _, _) = setup(FakeState::default());
        let outcome = setup
            .run(&connection(), SetupMode::Update, &[], |_| {})
            .unwrap();
        assert_eq!(
            outcome,
            SetupOutcome::Completed {
                scripts: 0,
                affected_rows: 0
            }
        );
    }

    #[test]
    fn blank_script_is_a_caller_error() {
        let (setup, _, _) = setup(FakeState::default());
        let result = setup.run(&connection(), SetupMode::Update, &scripts(&[" "]), |_| {});
        assert!(matches!(result, Err(AdminError::InvalidArgument { .. })));
    }

    #[test]
    fn success_invalidates_status() {
        let (setup, _, _) = setup(FakeState::default());
        let signal = StatusSignal::new();
        signal.begin_refresh();
        let setup = setup.with_signal(signal.clone());
        setup
            .run(&connection(), SetupMode::Update, &scripts(&["A"]), |_| {})
            .unwrap();
        assert!(signal.is_dirty());
    }

    #[test]
    fn failure_leaves_status_clean() {
        let (setup, _, _) = setup(FakeState {
            fail_scripts_containing: Some("A".into()),
            ..Default::default()
        });
        let signal = StatusSignal::new();
        signal.begin_refresh();
        let setup = setup.with_signal(signal.clone());
        setup
            .run(&connection(), SetupMode::Update, &scripts(&["A"]), |_| {})
            .unwrap();
        assert!(!signal.is_dirty());
    }

    #[test]
    fn stage_display() {
        assert_eq!(SetupStage::Script(0).to_string(), "script 1");
        assert_eq!(SetupStage::Verify.to_string(), "database verification");
    }
}
