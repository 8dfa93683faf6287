//! Webserver connection settings.

use std::fmt;
use std::time::Duration;

use reqwest::Url;

use super::wire::{self, ConnectionStringWriter};

/// Settings needed to reach an HTTP endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebserverConnection {
    pub base_url: Option<String>,
    /// Port appended to the base URL; `0` keeps the scheme default.
    pub port: u16,
    pub timeout: Option<Duration>,
    pub api_key: Option<String>,
}

impl WebserverConnection {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    fn base(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// The endpoint URL, or an empty string when no base URL is set.
    pub fn to_url(&self) -> String {
        match (self.base(), self.port) {
            (None, _) => String::new(),
            (Some(base), 0) => base.to_string(),
            (Some(base), port) => format!("{}:{}", base.trim_end_matches('/'), port),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base().is_none()
            && self.port == 0
            && self.timeout.is_none_or(|t| t.is_zero())
            && self.api_key.as_deref().is_none_or(|k| k.trim().is_empty())
    }

    pub fn has_required_values(&self) -> bool {
        self.base().is_some()
    }

    /// True for an `https` endpoint on this machine.
    pub fn is_local_secure(&self) -> bool {
        Url::parse(&self.to_url())
            .map(|url| url.scheme() == "https" && url.host_str() == Some("localhost"))
            .unwrap_or(false)
    }

    /// Render the connection string; `None` without a base URL.
    pub fn to_connection_string(&self, mask_api_key: bool) -> Option<String> {
        let base = self.base()?;
        let mut writer = ConnectionStringWriter::new();
        writer.push("BaseUrl", base);
        if self.port != 0 {
            writer.push("Port", &self.port.to_string());
        }
        if let Some(timeout) = self.timeout.filter(|t| !t.is_zero()) {
            writer.push("Timeout", &format_timeout(timeout));
        }
        writer.push_secret("ApiKey", self.api_key.as_deref(), mask_api_key);
        Some(writer.finish())
    }

    /// Parse a connection string; `None` for blank input.
    pub fn parse(input: &str) -> Option<Self> {
        if input.trim().is_empty() {
            return None;
        }
        let mut connection = Self::default();
        for (key, value) in wire::pairs(input) {
            match key.to_ascii_lowercase().as_str() {
                "baseurl" => connection.base_url = Some(value),
                "port" => {
                    if let Ok(port) = value.parse() {
                        connection.port = port;
                    }
                }
                "timeout" => connection.timeout = parse_timeout(&value),
                "apikey" => connection.api_key = Some(value),
                _ => {}
            }
        }
        Some(connection)
    }
}

impl fmt::Display for WebserverConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

/// `hh:mm:ss`, the form stored by existing installations.
fn format_timeout(timeout: Duration) -> String {
    let secs = timeout.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Accepts `hh:mm:ss`, `mm:ss` or plain seconds.
fn parse_timeout(value: &str) -> Option<Duration> {
    let mut secs: u64 = 0;
    for part in value.split(':') {
        secs = secs.checked_mul(60)?.checked_add(part.trim().parse().ok()?)?;
    }
    Some(Duration::from_secs(secs)).filter(|t| !t.is_zero())
}
