//! Output interception interface for sandboxed execution.

use tokio::sync::mpsc;

use crate::message::{ErrorPayload, SandboxMessage};
use crate::value::Value;

/// Capability handed to a sandbox at instantiation.
///
/// The only I/O surface granted to executed code: every intercepted console
/// call lands here. Implementations must tolerate being called from a
/// blocking worker thread.
pub trait OutputSink: Send + Sync {
    /// A `console.log` call with its full argument sequence.
    fn on_output(&self, values: Vec<Value>);

    /// A raised error or explicit `console.error` call.
    fn on_error(&self, message: String, stack: Option<String>);

    /// A `console.clear` call.
    fn on_clear(&self);
}

/// `OutputSink` forwarding events over an unbounded channel as
/// [`SandboxMessage`]s.
///
/// Fire-and-forget: send failures (receiver gone, e.g. a superseded run)
/// are dropped silently.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SandboxMessage>,
}

impl ChannelSink {
    /// Create a sink writing to the given channel.
    #[must_use]
    pub const fn new(tx: mpsc::UnboundedSender<SandboxMessage>) -> Self {
        Self { tx }
    }
}

impl OutputSink for ChannelSink {
    fn on_output(&self, values: Vec<Value>) {
        let _ = self.tx.send(SandboxMessage::ConsoleLog { payload: values });
    }

    fn on_error(&self, message: String, stack: Option<String>) {
        let _ = self.tx.send(SandboxMessage::ConsoleError {
            payload: ErrorPayload { message, stack },
        });
    }

    fn on_clear(&self) {
        let _ = self.tx.send(SandboxMessage::ConsoleClear);
    }
}
