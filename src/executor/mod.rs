//! Subprocess executor module.
//!
//! Handles safe subprocess spawning and execution timeouts.

mod output;
mod subprocess;

pub use output::sanitize_output;
pub use subprocess::{SubprocessBuilder, SubprocessResult};
