//! Unit state observation.

mod state;

pub use state::StateObserver;
