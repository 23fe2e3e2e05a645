//! Execution trait for dispatching sandboxed runs.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::sink::OutputSink;

/// Executor error.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),
}

/// Handle to a dispatched run.
///
/// Dropping the handle detaches the worker; runs are never cancelled
/// mid-flight.
pub struct RunHandle {
    /// Join handle for the worker executing the run.
    pub task: tokio::task::JoinHandle<()>,
}

/// Trait for sandboxed code executors.
///
/// Implementations provide a fresh, disposable execution scope per call
/// whose only observable effect is the injected sink: state must not leak
/// between runs, and execution failures must surface through
/// [`OutputSink::on_error`], never as a panic or a host-visible error.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Dispatch one run of `code`. Must return without waiting for the run
    /// to complete.
    ///
    /// # Errors
    /// Returns error if the run could not be dispatched at all.
    async fn spawn(&self, code: String, sink: Arc<dyn OutputSink>)
    -> Result<RunHandle, ExecutorError>;
}
