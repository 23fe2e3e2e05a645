//! Bridge messages between host and sandbox.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Host -> sandbox: trigger one run of the given source text.
///
/// No other fields are recognized; a message whose `code` is not a string
/// fails deserialization and is treated as a no-op by the receiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    /// Source text to execute.
    pub code: String,
}

/// Error payload carried by `console_error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable error message.
    pub message: String,
    /// Stack traceback, when the engine provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Sandbox -> host: one intercepted console event.
///
/// Delivery is fire-and-forget and FIFO within this direction; messages
/// with an unrecognized `type` fail deserialization and are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SandboxMessage {
    /// Full argument sequence of a `console.log` call.
    ConsoleLog { payload: Vec<Value> },
    /// A raised error or an explicit `console.error` call.
    ConsoleError { payload: ErrorPayload },
    /// A `console.clear` call. No payload.
    ConsoleClear,
}
