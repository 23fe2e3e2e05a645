//! Console log entries.

use serde::{Deserialize, Serialize};

use crate::message::SandboxMessage;
use crate::value::Value;

/// One entry in the log store. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    /// Values from a single `console.log` call.
    Output { values: Vec<Value> },
    /// An execution error or explicit `console.error`.
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace: Option<String>,
    },
    /// Marker for a sandboxed `console.clear`; rendered inline as a
    /// divider, it never erases prior entries.
    Cleared,
}

impl From<SandboxMessage> for LogEntry {
    fn from(msg: SandboxMessage) -> Self {
        match msg {
            SandboxMessage::ConsoleLog { payload } => Self::Output { values: payload },
            SandboxMessage::ConsoleError { payload } => Self::Error {
                message: payload.message,
                trace: payload.stack,
            },
            SandboxMessage::ConsoleClear => Self::Cleared,
        }
    }
}
