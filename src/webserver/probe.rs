//! HTTP reachability probe.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::connection::WebserverConnection;
use crate::error::Result;
use crate::error_log::ErrorSink;

use super::WebserverStatus;

/// Probe timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves a webserver connection to a [`WebserverStatus`].
pub trait WebserverService: Send + Sync {
    /// Probe the endpoint. Never fails: problems become `NotAvailable`.
    fn status(&self, connection: &WebserverConnection) -> WebserverStatus;
}

/// [`WebserverService`] issuing one bounded HTTP GET per probe.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use engine_admin::connection::WebserverConnection;
/// use engine_admin::error_log::ErrorLog;
/// use engine_admin::webserver::{WebserverProbe, WebserverService, WebserverStatus};
///
/// let probe = WebserverProbe::new(Duration::from_secs(2), Arc::new(ErrorLog::new())).unwrap();
/// let status = probe.status(&WebserverConnection::new("http://localhost").with_port(5000));
/// assert_ne!(status, WebserverStatus::UndefinedConnection);
/// ```
pub struct WebserverProbe {
    client: Client,
    timeout: Duration,
    errors: Arc<dyn ErrorSink>,
}

impl WebserverProbe {
    /// Create a probe; a zero `timeout` selects [`DEFAULT_TIMEOUT`].
    pub fn new(timeout: Duration, errors: Arc<dyn ErrorSink>) -> Result<Self> {
        Self::build(timeout, false, errors)
    }

    /// Create a probe that also accepts self-signed certificates.
    pub fn accepting_invalid_certs(timeout: Duration, errors: Arc<dyn ErrorSink>) -> Result<Self> {
        Self::build(timeout, true, errors)
    }

    fn build(timeout: Duration, accept_invalid_certs: bool, errors: Arc<dyn ErrorSink>) -> Result<Self> {
        let timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };
        let client = Client::builder()
            .user_agent(concat!("engine-admin/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            timeout,
            errors,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl WebserverService for WebserverProbe {
    fn status(&self, connection: &WebserverConnection) -> WebserverStatus {
        let url = connection.to_url();
        if url.is_empty() {
            return WebserverStatus::UndefinedConnection;
        }
        let timeout = connection
            .timeout
            .filter(|t| !t.is_zero())
            .unwrap_or(self.timeout);

        match self.client.get(&url).timeout(timeout).send() {
            Ok(response) if response.status().is_success() || response.status() == StatusCode::ACCEPTED => {
                tracing::debug!("Webserver {} answered {}", url, response.status());
                WebserverStatus::Available
            }
            Ok(response) => {
                tracing::debug!("Webserver {} answered {}", url, response.status());
                WebserverStatus::NotAvailable
            }
            Err(e) => {
                tracing::debug!("Webserver {} unreachable: {}", url, e);
                self.errors.add_error(&e);
                WebserverStatus::NotAvailable
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_log::ErrorLog;
    use httpmock::prelude::*;

    fn probe() -> (WebserverProbe, Arc<ErrorLog>) {
        let errors = Arc::new(ErrorLog::new());
        let probe = WebserverProbe::new(Duration::from_secs(2), errors.clone()).unwrap();
        (probe, errors)
    }

    #[test]
    fn zero_timeout_uses_default() {
        let probe = WebserverProbe::new(Duration::ZERO, Arc::new(ErrorLog::new())).unwrap();
        assert_eq!(probe.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn missing_url_is_undefined() {
        let (probe, _) = probe();
        assert_eq!(
            probe.status(&WebserverConnection::default()),
            WebserverStatus::UndefinedConnection
        );
    }

    #[test]
    fn ok_response_is_available() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200);
        });
        let (probe, _) = probe();
        let connection = WebserverConnection::new(server.base_url());
        assert_eq!(probe.status(&connection), WebserverStatus::Available);
        mock.assert();
    }

    #[test]
    fn accepted_response_is_available() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(202);
        });
        let (probe, _) = probe();
        let connection = WebserverConnection::new(server.base_url());
        assert_eq!(probe.status(&connection), WebserverStatus::Available);
    }

    #[test]
    fn error_response_is_not_available() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(503);
        });
        let (probe, errors) = probe();
        let connection = WebserverConnection::new(server.base_url());
        assert_eq!(probe.status(&connection), WebserverStatus::NotAvailable);
        assert!(!errors.has_errors());
    }

    #[test]
    fn port_is_appended_to_base_url() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(200);
        });
        let (probe, _) = probe();
        let connection = WebserverConnection::new(format!("http://{}", server.host()))
            .with_port(server.port());
        assert_eq!(probe.status(&connection), WebserverStatus::Available);
    }

    #[test]
    fn transport_failure_is_captured() {
        let (probe, errors) = probe();
        // port 9 (discard) is closed on test machines
        let connection = WebserverConnection::new("http://127.0.0.1").with_port(9);
        assert_eq!(probe.status(&connection), WebserverStatus::NotAvailable);
        assert!(errors.has_errors());
    }

    #[test]
    fn slow_response_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(200).delay(Duration::from_millis(1500));
        });
        let (probe, errors) = probe();
        let mut connection = WebserverConnection::new(server.base_url());
        connection.timeout = Some(Duration::from_millis(200));
        assert_eq!(probe.status(&connection), WebserverStatus::NotAvailable);
        assert!(errors.has_errors());
    }
}
