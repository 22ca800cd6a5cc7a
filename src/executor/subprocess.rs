//! Safe subprocess execution.
//!
//! Provides utilities for running the service-manager binary safely with:
//! - No shell interpretation (direct exec)
//! - Configurable timeouts with kill-on-expiry
//! - Captured stdout/stderr
//!
//! A process that completes with a non-zero exit status is a *result*
//! (`SubprocessResult` with `success == false`), not an error. Only spawn
//! failures and timeouts are errors: several systemctl queries encode a
//! negative answer in their exit status, and callers must be able to tell
//! that apart from "the binary is missing".

use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{ExecutionErrorKind, ReconcileError};

/// Result of a completed subprocess execution.
#[derive(Debug, Clone)]
pub struct SubprocessResult {
    /// Whether the command exited successfully (exit code 0).
    pub success: bool,
    /// The exit code, if available.
    pub exit_code: Option<i32>,
    /// Captured stdout as a string.
    pub stdout: String,
    /// Captured stderr as a string.
    pub stderr: String,
}

impl SubprocessResult {
    fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Builder for subprocess execution.
pub struct SubprocessBuilder {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl SubprocessBuilder {
    /// Create a new subprocess builder.
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Add arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args.extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Set the timeout for the command.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The literal command line this builder will attempt, for diagnostics.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Execute the command and wait for completion with timeout enforcement.
    ///
    /// If the process exceeds the configured timeout, it is killed and a
    /// timeout error is returned.
    pub fn run(self) -> Result<SubprocessResult, ReconcileError> {
        let command_line = self.command_line();
        debug!(
            program = %self.program,
            args = ?self.args,
            timeout_secs = self.timeout.as_secs(),
            "Executing subprocess"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| ReconcileError::Execution {
            kind: ExecutionErrorKind::SpawnFailed {
                command: command_line.clone(),
                message: e.to_string(),
            },
        })?;

        // Poll for completion with timeout enforcement
        let start = Instant::now();
        let poll_interval = Duration::from_millis(100);

        loop {
            match child.try_wait() {
                Ok(Some(_status)) => {
                    // Process has finished - get the full output
                    let output =
                        child
                            .wait_with_output()
                            .map_err(|e| ReconcileError::Execution {
                                kind: ExecutionErrorKind::SpawnFailed {
                                    command: command_line.clone(),
                                    message: format!("Failed to collect output: {}", e),
                                },
                            })?;
                    let result = SubprocessResult::from_output(output);
                    debug!(
                        success = result.success,
                        exit_code = ?result.exit_code,
                        duration_ms = start.elapsed().as_millis(),
                        "Subprocess completed"
                    );
                    return Ok(result);
                }
                Ok(None) => {
                    // Process still running - check timeout
                    if start.elapsed() > self.timeout {
                        warn!(
                            command = %command_line,
                            timeout_secs = self.timeout.as_secs(),
                            "Process timed out, killing"
                        );
                        if let Err(e) = child.kill() {
                            warn!(error = %e, "Failed to kill timed-out process");
                        }
                        // Reap the zombie process
                        let _ = child.wait();
                        return Err(ReconcileError::Execution {
                            kind: ExecutionErrorKind::Timeout {
                                command: command_line,
                                timeout_secs: self.timeout.as_secs(),
                            },
                        });
                    }
                    std::thread::sleep(poll_interval);
                }
                Err(e) => {
                    return Err(ReconcileError::Execution {
                        kind: ExecutionErrorKind::SpawnFailed {
                            command: command_line,
                            message: format!("Failed to wait for process: {}", e),
                        },
                    });
                }
            }
        }
    }
}
