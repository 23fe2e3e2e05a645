//! Wire protocol between the playground page and the host.

use luapad_core::LogEntry;
use luapad_render::{ValueView, render};
use serde::{Deserialize, Serialize};

/// Message from the page to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Submit source text for execution.
    Run { code: String },
    /// Host-level clear: empty the console outright.
    ClearConsole,
    /// Keepalive.
    Ping,
}

/// Message from the host to the page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// One rendered console entry.
    Entry { entry: EntryView },
    /// The store was emptied; the page wipes its console panel.
    Reset,
    /// Keepalive response.
    Pong,
}

/// Display form of one log entry.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryView {
    Output {
        values: Vec<ValueView>,
    },
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace: Option<String>,
    },
    /// Rendered inline as a divider.
    Cleared,
}

impl From<&LogEntry> for EntryView {
    fn from(entry: &LogEntry) -> Self {
        match entry {
            LogEntry::Output { values } => Self::Output {
                values: values.iter().map(render).collect(),
            },
            LogEntry::Error { message, trace } => Self::Error {
                message: message.clone(),
                trace: trace.clone(),
            },
            LogEntry::Cleared => Self::Cleared,
        }
    }
}

#[cfg(test)]
mod tests {
    use luapad_core::Value;

    use super::*;

    #[test]
    fn test_run_round_trip() {
        let msg = ClientMessage::Run {
            code: "print(1)".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"run""#));

        let parsed: ClientMessage = serde_json::from_str(&json).unwrap();
        match parsed {
            ClientMessage::Run { code } => assert_eq!(code, "print(1)"),
            other => panic!("wrong message type: {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_client_message_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"reboot"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"run","code":7}"#).is_err());
    }

    #[test]
    fn test_entry_view_carries_previews() {
        let entry = LogEntry::Output {
            values: vec![
                Value::str("hi"),
                Value::Seq(vec![Value::Int(1), Value::Int(2)]),
            ],
        };
        let view = EntryView::from(&entry);
        let json = serde_json::to_string(&ServerMessage::Entry { entry: view }).unwrap();

        assert!(json.contains(r#""type":"entry""#));
        assert!(json.contains(r#""kind":"output""#));
        assert!(json.contains("(2) [1, 2]"));
    }

    #[test]
    fn test_cleared_entry_view() {
        let json = serde_json::to_string(&EntryView::from(&LogEntry::Cleared)).unwrap();
        assert_eq!(json, r#"{"kind":"cleared"}"#);
    }

    #[test]
    fn test_error_entry_view_omits_missing_trace() {
        let entry = LogEntry::Error {
            message: "boom".to_string(),
            trace: None,
        };
        let json = serde_json::to_string(&EntryView::from(&entry)).unwrap();
        assert!(!json.contains("trace"));
    }
}
