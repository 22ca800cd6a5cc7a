//! The service-manager capability interface and its subprocess-backed
//! implementation.

use std::time::Duration;

use crate::error::ReconcileError;
use crate::executor::{SubprocessBuilder, SubprocessResult};

/// Capability interface over the service-manager binary.
///
/// One call per invocation: argv in, exit status plus captured output out.
/// Implementations must return `Err` only when the process never completed
/// (spawn failure, timeout); a completed process with a non-zero exit status
/// is `Ok` with `success == false`. Callers decide whether that encodes a
/// failure or a negative query answer.
///
/// Tests substitute a scripted fake; production uses [`SystemctlRunner`].
pub trait Systemctl: Send + Sync {
    /// Invoke the manager binary once with the given arguments.
    fn invoke(
        &self,
        args: &[String],
        timeout: Duration,
    ) -> Result<SubprocessResult, ReconcileError>;

    /// Name of the manager binary, used when rendering command lines for
    /// diagnostics.
    fn program(&self) -> &str {
        "systemctl"
    }
}

/// Real `systemctl` invocation via subprocess.
#[derive(Debug, Clone)]
pub struct SystemctlRunner {
    program: String,
}

impl SystemctlRunner {
    /// Create a runner for the given binary path (usually `systemctl`).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemctlRunner {
    fn default() -> Self {
        Self::new("systemctl")
    }
}

impl Systemctl for SystemctlRunner {
    fn invoke(
        &self,
        args: &[String],
        timeout: Duration,
    ) -> Result<SubprocessResult, ReconcileError> {
        SubprocessBuilder::new(&self.program)
            .args(args)
            .timeout(timeout)
            .run()
    }

    fn program(&self) -> &str {
        &self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_program() {
        let runner = SystemctlRunner::default();
        assert_eq!(runner.program(), "systemctl");
    }

    #[test]
    fn test_custom_program_path() {
        let runner = SystemctlRunner::new("/usr/bin/systemctl");
        assert_eq!(runner.program(), "/usr/bin/systemctl");
    }
}
