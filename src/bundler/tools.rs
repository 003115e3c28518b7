//! External tool invocation.
//!
//! Tools are always launched with an explicit argument vector, never through
//! a shell, so file names with spaces or shell metacharacters reach the tool
//! untouched. Exit status and both output streams are checked separately.

use crate::bundler::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured output of a successful tool run.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Standard output, lossily decoded as UTF-8.
    pub stdout: String,
    /// Standard error, lossily decoded as UTF-8.
    pub stderr: String,
}

/// A single external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
}

impl ToolCommand {
    /// Starts a command for `program`, a bare name looked up on `PATH` or a path.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Human-readable command line for logs and error messages.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    /// Runs the command to completion and returns its captured output.
    ///
    /// # Errors
    ///
    /// - [`Error::ToolNotFound`] if the program cannot be resolved
    /// - [`Error::CommandFailed`] if it cannot be spawned
    /// - [`Error::Timeout`] if it runs longer than `timeout` (the child is killed)
    /// - [`Error::CommandStatus`] if it exits unsuccessfully
    pub async fn run(&self, timeout: Duration) -> Result<ToolOutput> {
        let resolved = which::which(&self.program).map_err(|_| Error::ToolNotFound {
            tool: self.program.clone(),
        })?;

        let command_line = self.display();
        log::debug!("Running {}", command_line);

        let child = Command::new(&resolved)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| Error::CommandFailed {
                command: command_line.clone(),
                error,
            })?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|error| Error::CommandFailed {
                command: command_line.clone(),
                error,
            })?,
            Err(_) => {
                return Err(Error::Timeout {
                    command: command_line,
                    seconds: timeout.as_secs(),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::CommandStatus {
                command: command_line,
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        if !stderr.trim().is_empty() {
            log::debug!("{} wrote to stderr: {}", self.program, stderr.trim());
        }

        Ok(ToolOutput { stdout, stderr })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn test_display_joins_arguments() {
        let cmd = ToolCommand::new("otool").arg("-L").arg("my app.bin");
        assert_eq!(cmd.display(), "otool -L my app.bin");
    }

    #[tokio::test]
    async fn test_missing_tool_is_reported() {
        let err = ToolCommand::new("definitely-not-a-real-tool-4711")
            .run(TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }

    #[tokio::test]
    async fn test_stdout_is_captured() {
        let out = ToolCommand::new("sh")
            .args(["-c", "echo hello"])
            .run(TIMEOUT)
            .await
            .unwrap();
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let err = ToolCommand::new("sh")
            .args(["-c", "echo broken >&2; exit 3"])
            .run(TIMEOUT)
            .await
            .unwrap_err();
        match err {
            Error::CommandStatus { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_hung_tool_times_out() {
        let err = ToolCommand::new("sh")
            .args(["-c", "sleep 5"])
            .run(Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }
}
