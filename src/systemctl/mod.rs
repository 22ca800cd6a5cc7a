//! Service-manager invocation.
//!
//! The [`Systemctl`] trait is the boundary to the real system: everything
//! else in this crate goes through it, so tests can swap in a fake without
//! touching a real service manager.

mod command;
mod runner;

pub use command::{daemon_reload, run_unit_command, UnitCommand, UnitVerb};
pub use runner::{Systemctl, SystemctlRunner};
