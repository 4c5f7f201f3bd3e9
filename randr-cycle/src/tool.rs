//! The external display tools the cycler drives.
//!
//! [`DisplayTool`] is the seam between the cycling loop and the outside
//! world: querying modes, applying one, and taking a screenshot.
//! [`CommandTool`] implements it by running the configured programs.

use crate::config::Config;
use crate::errors::ToolError;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Queries and changes display modes and captures the screen.
///
/// Every call blocks the cycling loop until the tool finishes; calls are never
/// issued concurrently.
#[allow(async_fn_in_trait)]
pub trait DisplayTool {
    /// Return the modeline listing of every monitor.
    async fn query_modes(&self) -> Result<String, ToolError>;

    /// Apply `mode_id` to `monitor`.
    async fn set_mode(&self, monitor: &str, mode_id: &str) -> Result<(), ToolError>;

    /// Capture the screen into `path`.
    async fn capture_screenshot(&self, path: &Path) -> Result<(), ToolError>;
}

/// [`DisplayTool`] backed by external programs, `gnome-randr` and
/// `gnome-screenshot` by default.
#[derive(Debug, Clone)]
pub struct CommandTool {
    query_program: String,
    query_args: Vec<String>,
    modify_program: String,
    screenshot_program: String,
    timeout: Option<Duration>,
}

impl CommandTool {
    /// Creates a tool from the configured program names.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            query_program: config.tools.query_program.clone(),
            query_args: config.tools.query_args.clone(),
            modify_program: config.tools.modify_program.clone(),
            screenshot_program: config.tools.screenshot_program.clone(),
            timeout: config.command_timeout(),
        }
    }

    async fn run<I, S>(&self, program: &str, args: I) -> Result<Output, ToolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        debug!("Running {:?}", cmd.as_std());

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, cmd.output())
                .await
                .map_err(|_| ToolError::Timeout {
                    program: program.to_string(),
                    timeout,
                })?,
            None => cmd.output().await,
        }
        .map_err(|source| ToolError::Spawn {
            program: program.to_string(),
            source,
        })?;

        if !output.status.success() {
            return Err(ToolError::ExitStatus {
                program: program.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl Default for CommandTool {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl DisplayTool for CommandTool {
    async fn query_modes(&self) -> Result<String, ToolError> {
        let output = self.run(&self.query_program, &self.query_args).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn set_mode(&self, monitor: &str, mode_id: &str) -> Result<(), ToolError> {
        self.run(&self.modify_program, ["modify", monitor, "-m", mode_id])
            .await
            .map(drop)
    }

    async fn capture_screenshot(&self, path: &Path) -> Result<(), ToolError> {
        self.run(
            &self.screenshot_program,
            [OsStr::new("-f"), path.as_os_str()],
        )
        .await
        .map(drop)
    }
}
