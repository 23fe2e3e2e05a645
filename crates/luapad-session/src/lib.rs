//! Run orchestration for playground sessions.
//!
//! Provides:
//! - `RunManager` - Owns the log store, dispatches runs, scopes entries to
//!   the current source text

pub mod manager;

pub use manager::{ManagerError, RunManager};
