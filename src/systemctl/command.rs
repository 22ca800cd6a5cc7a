//! Unit-mutating systemctl commands.
//!
//! A [`UnitCommand`] is one verb applied to one unit, optionally with the
//! `--now` modifier (systemctl's combined enable+start / disable+stop form).

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::{ExecutionErrorKind, ReconcileError};
use crate::executor::sanitize_output;

use super::runner::Systemctl;

/// Maximum stderr lines carried into an error report.
const MAX_STDERR_LINES: usize = 20;

/// A systemctl verb that mutates unit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitVerb {
    Start,
    Stop,
    Enable,
    Disable,
}

impl UnitVerb {
    /// The systemctl subcommand name.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitVerb::Start => "start",
            UnitVerb::Stop => "stop",
            UnitVerb::Enable => "enable",
            UnitVerb::Disable => "disable",
        }
    }
}

impl fmt::Display for UnitVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One verb applied to one unit, with the optional `--now` modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCommand {
    pub verb: UnitVerb,
    /// Pass `--now`, combining enable+start or disable+stop in one call.
    pub now: bool,
}

impl UnitCommand {
    pub const fn new(verb: UnitVerb, now: bool) -> Self {
        Self { verb, now }
    }

    /// Render the argv for this command against a unit.
    pub fn args(&self, unit: &str) -> Vec<String> {
        let mut args = vec![self.verb.as_str().to_string()];
        if self.now {
            args.push("--now".to_string());
        }
        args.push(unit.to_string());
        args
    }

    /// The literal command line, for logs and error reports.
    pub fn display(&self, program: &str, unit: &str) -> String {
        let mut line = program.to_string();
        for arg in self.args(unit) {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}

impl fmt::Display for UnitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.now {
            write!(f, "{} --now", self.verb)
        } else {
            self.verb.fmt(f)
        }
    }
}

/// Execute one unit-mutating command, mapping any non-zero exit to a hard
/// error carrying the literal command line and captured stderr.
///
/// No retry at this layer; retries, if wanted, belong to the caller.
pub fn run_unit_command(
    ctl: &dyn Systemctl,
    command: UnitCommand,
    unit: &str,
    timeout: Duration,
) -> Result<(), ReconcileError> {
    let command_line = command.display(ctl.program(), unit);
    trace!(command = %command_line, "Running unit command");

    let result = ctl.invoke(&command.args(unit), timeout)?;
    if !result.success {
        warn!(
            command = %command_line,
            exit_code = ?result.exit_code,
            stderr = %result.stderr,
            "Unit command failed"
        );
        return Err(ReconcileError::Execution {
            kind: ExecutionErrorKind::CommandFailed {
                command: command_line,
                exit_code: result.exit_code,
                stderr: sanitize_output(&result.stderr, MAX_STDERR_LINES),
            },
        });
    }

    Ok(())
}

/// Make the service manager re-read unit definitions from disk
/// (`systemctl daemon-reload`).
///
/// Needed after a unit file's contents change; the orchestrator calls this
/// before reconciling such a unit. No unit argument, no output of interest.
pub fn daemon_reload(ctl: &dyn Systemctl, timeout: Duration) -> Result<(), ReconcileError> {
    let command_line = format!("{} daemon-reload", ctl.program());
    trace!(command = %command_line, "Reloading manager configuration");

    let result = ctl.invoke(&["daemon-reload".to_string()], timeout)?;
    if !result.success {
        warn!(
            command = %command_line,
            exit_code = ?result.exit_code,
            stderr = %result.stderr,
            "daemon-reload failed"
        );
        return Err(ReconcileError::Execution {
            kind: ExecutionErrorKind::CommandFailed {
                command: command_line,
                exit_code: result.exit_code,
                stderr: sanitize_output(&result.stderr, MAX_STDERR_LINES),
            },
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_without_now() {
        let cmd = UnitCommand::new(UnitVerb::Stop, false);
        assert_eq!(cmd.args("nginx.service"), vec!["stop", "nginx.service"]);
    }

    #[test]
    fn test_args_with_now() {
        let cmd = UnitCommand::new(UnitVerb::Enable, true);
        assert_eq!(
            cmd.args("nginx.service"),
            vec!["enable", "--now", "nginx.service"]
        );
    }

    #[test]
    fn test_display_command_line() {
        let cmd = UnitCommand::new(UnitVerb::Disable, true);
        assert_eq!(
            cmd.display("systemctl", "redis.service"),
            "systemctl disable --now redis.service"
        );
    }

    #[test]
    fn test_verb_serialization() {
        let json = serde_json::to_string(&UnitVerb::Disable).unwrap();
        assert_eq!(json, "\"disable\"");
    }

    #[test]
    fn test_command_display() {
        assert_eq!(
            UnitCommand::new(UnitVerb::Enable, true).to_string(),
            "enable --now"
        );
        assert_eq!(UnitCommand::new(UnitVerb::Stop, false).to_string(), "stop");
    }
}
