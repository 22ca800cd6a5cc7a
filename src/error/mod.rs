//! Error types for the reconciler.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
