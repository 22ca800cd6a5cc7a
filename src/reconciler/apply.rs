//! Sequential plan execution.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SystemctlConfig;
use crate::error::ReconcileError;
use crate::observer::StateObserver;
use crate::systemctl::{daemon_reload, run_unit_command, Systemctl, SystemctlRunner, UnitCommand};

use super::desired::DesiredState;
use super::plan::plan;

/// Result of one [`Reconciler::apply`] call: the commands that actually ran,
/// in order, and the first error encountered (commands after a failure are
/// never attempted).
///
/// An aborted sequence is a failure even when some steps succeeded; the
/// executed prefix is reported so the caller can re-invoke idempotently and
/// complete the remainder.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub executed: Vec<UnitCommand>,
    pub error: Option<ReconcileError>,
}

impl ReconcileOutcome {
    fn success(executed: Vec<UnitCommand>) -> Self {
        Self {
            executed,
            error: None,
        }
    }

    fn failure(executed: Vec<UnitCommand>, error: ReconcileError) -> Self {
        Self {
            executed,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a `Result`, keeping the executed list on success.
    pub fn into_result(self) -> Result<Vec<UnitCommand>, ReconcileError> {
        match self.error {
            None => Ok(self.executed),
            Some(error) => Err(error),
        }
    }
}

/// Reconciles a unit's desired run-state with its observed state.
///
/// Holds no per-unit state: each `apply` re-plans from the caller's desired
/// flags and issues its commands strictly in order through the injected
/// [`Systemctl`] capability. Different units may be reconciled concurrently
/// from separate calls; serializing overlapping calls against the *same*
/// unit is the caller's job, since the service manager does not guarantee
/// atomicity across overlapping enable/disable/start/stop invocations.
pub struct Reconciler {
    ctl: Arc<dyn Systemctl>,
    config: SystemctlConfig,
}

impl Reconciler {
    /// Build over an injected manager capability (tests pass a fake here).
    pub fn new(ctl: Arc<dyn Systemctl>, config: SystemctlConfig) -> Self {
        Self { ctl, config }
    }

    /// Build over the real systemctl binary named in the settings.
    pub fn from_config(config: SystemctlConfig) -> Self {
        let ctl = Arc::new(SystemctlRunner::new(config.program.clone()));
        Self::new(ctl, config)
    }

    /// Apply the desired state to `unit`.
    ///
    /// Conflicting intents fail before any side effect. Otherwise the mapped
    /// sequence executes in order, aborting on the first failure; the
    /// outcome lists exactly the commands that completed. On success the
    /// caller is expected to re-query the [`StateObserver`] for fresh drift
    /// state; no post-state is guessed here.
    pub fn apply(&self, unit: &str, desired: &DesiredState) -> ReconcileOutcome {
        let apply_id = Uuid::new_v4();
        debug!(
            apply_id = %apply_id,
            unit = %unit,
            desired = ?desired,
            "Reconciling unit"
        );

        let sequence = match plan(unit, desired) {
            Ok(sequence) => sequence,
            Err(e) => {
                warn!(apply_id = %apply_id, unit = %unit, error = %e, "Rejected desired state");
                return ReconcileOutcome::failure(Vec::new(), e);
            }
        };

        if sequence.is_empty() {
            debug!(apply_id = %apply_id, unit = %unit, "Nothing to reconcile");
            return ReconcileOutcome::success(Vec::new());
        }

        let timeout = Duration::from_secs(self.config.unit_timeout_seconds);
        let total = sequence.len();
        let mut executed = Vec::with_capacity(total);

        for command in sequence {
            if let Err(e) = run_unit_command(self.ctl.as_ref(), command, unit, timeout) {
                warn!(
                    apply_id = %apply_id,
                    unit = %unit,
                    command = %command,
                    completed = executed.len(),
                    total = total,
                    "Aborting reconciliation sequence"
                );
                return ReconcileOutcome::failure(executed, e);
            }
            info!(apply_id = %apply_id, unit = %unit, command = %command, "Command applied");
            executed.push(command);
        }

        info!(
            apply_id = %apply_id,
            unit = %unit,
            commands = executed.len(),
            "Unit reconciled"
        );
        ReconcileOutcome::success(executed)
    }

    /// Make the manager re-read unit definitions from disk.
    ///
    /// The orchestrator calls this before `apply` whenever the underlying
    /// unit file's contents changed; this core does not detect such changes.
    pub fn daemon_reload(&self) -> Result<(), ReconcileError> {
        daemon_reload(
            self.ctl.as_ref(),
            Duration::from_secs(self.config.reload_timeout_seconds),
        )
    }

    /// A state observer sharing this reconciler's manager capability.
    pub fn observer(&self) -> StateObserver<'_> {
        StateObserver::new(
            self.ctl.as_ref(),
            Duration::from_secs(self.config.query_timeout_seconds),
        )
    }
}
