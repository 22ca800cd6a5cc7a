//! Desired run-state of a unit.

use serde::{Deserialize, Serialize};

/// The target combination of run-state flags for one unit.
///
/// The four intents are independent booleans supplied fresh by the caller on
/// every reconciliation; nothing here is persisted. `start ∧ stop` and
/// `enable ∧ disable` are contradictory and rejected during planning, before
/// any side effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredState {
    /// The unit should be running.
    #[serde(default)]
    pub start: bool,
    /// The unit should not be running.
    #[serde(default)]
    pub stop: bool,
    /// The unit should start automatically at boot.
    #[serde(default)]
    pub enable: bool,
    /// The unit should not start automatically at boot.
    #[serde(default)]
    pub disable: bool,
}

impl DesiredState {
    /// True if the flags contradict each other.
    pub fn is_conflicting(&self) -> bool {
        (self.start && self.stop) || (self.enable && self.disable)
    }

    /// True if no flag is set; reconciling such a state is a valid no-op.
    pub fn is_noop(&self) -> bool {
        !(self.start || self.stop || self.enable || self.disable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_noop() {
        let desired = DesiredState::default();
        assert!(desired.is_noop());
        assert!(!desired.is_conflicting());
    }

    #[test]
    fn test_conflicting_run_flags() {
        let desired = DesiredState {
            start: true,
            stop: true,
            ..Default::default()
        };
        assert!(desired.is_conflicting());
    }

    #[test]
    fn test_conflicting_boot_flags() {
        let desired = DesiredState {
            enable: true,
            disable: true,
            ..Default::default()
        };
        assert!(desired.is_conflicting());
    }

    #[test]
    fn test_deserialize_missing_flags_default_false() {
        let desired: DesiredState = serde_json::from_str(r#"{"enable": true}"#).unwrap();
        assert!(desired.enable);
        assert!(!desired.start);
        assert!(!desired.stop);
        assert!(!desired.disable);
        assert!(!desired.is_noop());
    }
}
