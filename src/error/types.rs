//! Error types for the reconciler.

use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Configuration-related errors, including conflicting desired state.
    #[error("Configuration error: {kind}")]
    Config { kind: ConfigErrorKind },

    /// External command execution errors.
    #[error("Execution error: {kind}")]
    Execution { kind: ExecutionErrorKind },
}

/// Configuration error kinds.
#[derive(Error, Debug)]
pub enum ConfigErrorKind {
    #[error(
        "Conflicting desired state for unit '{unit}': \
         start={start} stop={stop} enable={enable} disable={disable}"
    )]
    ConflictingIntent {
        unit: String,
        start: bool,
        stop: bool,
        enable: bool,
        disable: bool,
    },

    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },
}

/// Command execution error kinds.
///
/// `CommandFailed` is the only variant produced by a process that actually
/// ran to completion; the others mean the service-manager binary never
/// finished. Query code relies on that split: a completed non-zero exit can
/// encode a negative answer, a spawn failure never can.
#[derive(Error, Debug)]
pub enum ExecutionErrorKind {
    #[error("Failed to run '{command}': {message}")]
    SpawnFailed { command: String, message: String },

    #[error(
        "'{command}' failed{}: {stderr}",
        .exit_code.map_or_else(String::new, |code| format!(" with exit code {}", code))
    )]
    CommandFailed {
        command: String,
        /// `None` when the process was terminated by a signal.
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("'{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },
}

impl ReconcileError {
    /// True if this error is a desired-state conflict (detected before any
    /// side effect).
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ReconcileError::Config {
                kind: ConfigErrorKind::ConflictingIntent { .. }
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_detection() {
        let err = ReconcileError::Config {
            kind: ConfigErrorKind::ConflictingIntent {
                unit: "nginx.service".to_string(),
                start: true,
                stop: true,
                enable: false,
                disable: false,
            },
        };
        assert!(err.is_conflict());

        let err = ReconcileError::Execution {
            kind: ExecutionErrorKind::Timeout {
                command: "systemctl start nginx.service".to_string(),
                timeout_secs: 120,
            },
        };
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_command_failed_display_carries_command_and_stderr() {
        let err = ReconcileError::Execution {
            kind: ExecutionErrorKind::CommandFailed {
                command: "systemctl enable foo.service".to_string(),
                exit_code: Some(1),
                stderr: "Unit foo.service does not exist.".to_string(),
            },
        };
        let text = err.to_string();
        assert!(text.contains("systemctl enable foo.service"));
        assert!(text.contains("exit code 1"));
        assert!(text.contains("does not exist"));
    }

    #[test]
    fn test_command_failed_display_without_exit_code() {
        // Signal-killed processes have no exit code.
        let err = ReconcileError::Execution {
            kind: ExecutionErrorKind::CommandFailed {
                command: "systemctl stop foo.service".to_string(),
                exit_code: None,
                stderr: "Terminated".to_string(),
            },
        };
        let text = err.to_string();
        assert!(text.contains("'systemctl stop foo.service' failed: Terminated"));
        assert!(!text.contains("exit code"));
    }
}
