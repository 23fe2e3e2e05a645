//! Transport layer for the playground page.
//!
//! Provides:
//! - Wire protocol (JSON, tagged on `type`)
//! - Rendered entry views
//! - WebSocket transport (feature: websocket)

pub mod protocol;

#[cfg(feature = "websocket")]
pub mod websocket;

pub use protocol::{ClientMessage, EntryView, ServerMessage};
