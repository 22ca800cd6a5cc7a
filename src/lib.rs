//! Unit Reconciler Library
//!
//! This crate reconciles the desired run-state of a systemd unit
//! (enabled/disabled at boot, started/stopped now) with its observed state:
//! it computes the minimal conflict-free `systemctl` sequence, executes it
//! strictly in order with abort-on-first-failure, and reports which commands
//! actually ran so callers can detect drift on later runs.

pub mod config;
pub mod error;
pub mod executor;
pub mod observer;
pub mod reconciler;
pub mod systemctl;

pub use error::ReconcileError;
pub use reconciler::{DesiredState, ReconcileOutcome, Reconciler};
