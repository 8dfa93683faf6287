//! Detached process launching.
//!
//! Starting a webserver or opening a URL hands control to another process.
//! The caller never waits on it; it re-probes connectivity afterwards.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context;

use crate::error::{AdminError, Result};

/// Default program hosting webserver assets.
pub const DEFAULT_WEBSERVER_HOST: &str = "dotnet";

/// Starts processes on behalf of the administration commands.
pub trait ProcessLauncher: Send + Sync {
    /// Start `exec` under the webserver host, listening on `url`.
    fn start_webserver(&self, working_dir: &Path, exec: &str, url: &str) -> Result<()>;

    /// Open a URL, folder or file with the system's default handler.
    fn start_process(&self, target: &str) -> Result<()>;
}

/// [`ProcessLauncher`] spawning real processes.
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    webserver_host: String,
}

impl Default for SystemLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_WEBSERVER_HOST)
    }
}

impl SystemLauncher {
    pub fn new(webserver_host: impl Into<String>) -> Self {
        Self {
            webserver_host: webserver_host.into(),
        }
    }

    /// Command line used to start a webserver asset.
    pub fn webserver_command(&self, working_dir: &Path, exec: &str, url: &str) -> Command {
        let mut command = Command::new(&self.webserver_host);
        command
            .arg(exec)
            .arg(format!("--urls={}", url))
            .current_dir(working_dir);
        command
    }

    /// Command line opening `target` with the platform handler.
    pub fn open_command(target: &str) -> Command {
        if cfg!(target_os = "windows") {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", "", target]);
            command
        } else if cfg!(target_os = "macos") {
            let mut command = Command::new("open");
            command.arg(target);
            command
        } else {
            let mut command = Command::new("xdg-open");
            command.arg(target);
            command
        }
    }
}

fn spawn_detached(mut command: Command) -> anyhow::Result<()> {
    let program = command.get_program().to_string_lossy().to_string();
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to start {}", program))?;
    Ok(())
}

impl ProcessLauncher for SystemLauncher {
    fn start_webserver(&self, working_dir: &Path, exec: &str, url: &str) -> Result<()> {
        if exec.trim().is_empty() || url.trim().is_empty() {
            return Err(AdminError::InvalidArgument {
                message: "webserver start needs an executable and a url".to_string(),
            });
        }
        tracing::info!(
            "Starting webserver {} at {} in {}",
            exec,
            url,
            working_dir.display()
        );
        spawn_detached(self.webserver_command(working_dir, exec, url))?;
        Ok(())
    }

    fn start_process(&self, target: &str) -> Result<()> {
        if target.trim().is_empty() {
            return Err(AdminError::InvalidArgument {
                message: "nothing to open".to_string(),
            });
        }
        tracing::info!("Opening {}", target);
        spawn_detached(Self::open_command(target))?;
        Ok(())
    }
}
