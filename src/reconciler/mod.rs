//! The reconciliation engine.
//!
//! Classifies desired flags into one of eight intent categories, maps each
//! to its minimal ordered systemctl sequence, and executes it with
//! abort-on-first-failure.

mod apply;
mod desired;
mod plan;

pub use apply::{ReconcileOutcome, Reconciler};
pub use desired::DesiredState;
pub use plan::plan;
