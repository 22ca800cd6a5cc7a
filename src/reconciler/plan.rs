//! Intent classification: desired flags to an ordered command sequence.

use crate::error::{ConfigErrorKind, ReconcileError};
use crate::systemctl::{UnitCommand, UnitVerb};

use super::desired::DesiredState;

/// Map a desired state to the minimal ordered command sequence for `unit`.
///
/// Conflicting intents are rejected here, before anything executes. The
/// mapping is an explicit table over the eight non-conflicting flag
/// combinations (plus the all-false no-op):
///
/// - some combinations collapse into one combined systemctl call
///   (`enable --now`, `disable --now`);
/// - `enable`+`stop` and `disable`+`start` need two sequential calls,
///   because no single verb changes boot configuration and run state in
///   opposite directions;
/// - `enable` alone still uses `--now`: enabling implies bringing the unit
///   up to reflect its configured state immediately.
pub fn plan(unit: &str, desired: &DesiredState) -> Result<Vec<UnitCommand>, ReconcileError> {
    if desired.is_conflicting() {
        return Err(ReconcileError::Config {
            kind: ConfigErrorKind::ConflictingIntent {
                unit: unit.to_string(),
                start: desired.start,
                stop: desired.stop,
                enable: desired.enable,
                disable: desired.disable,
            },
        });
    }

    let sequence = match (desired.enable, desired.disable, desired.start, desired.stop) {
        // boot-enable intents
        (true, false, true, false) => vec![UnitCommand::new(UnitVerb::Enable, true)],
        (true, false, false, true) => vec![
            UnitCommand::new(UnitVerb::Enable, false),
            UnitCommand::new(UnitVerb::Stop, false),
        ],
        (true, false, false, false) => vec![UnitCommand::new(UnitVerb::Enable, true)],

        // boot-disable intents
        (false, true, false, true) => vec![UnitCommand::new(UnitVerb::Disable, true)],
        (false, true, true, false) => vec![
            UnitCommand::new(UnitVerb::Disable, false),
            UnitCommand::new(UnitVerb::Start, false),
        ],
        (false, true, false, false) => vec![UnitCommand::new(UnitVerb::Disable, false)],

        // run-state-only intents
        (false, false, true, false) => vec![UnitCommand::new(UnitVerb::Start, false)],
        (false, false, false, true) => vec![UnitCommand::new(UnitVerb::Stop, false)],

        // nothing requested
        (false, false, false, false) => vec![],

        // conflicting rows were rejected above
        (true, true, _, _) | (_, _, true, true) => unreachable!("conflicts rejected before planning"),
    };

    Ok(sequence)
}
