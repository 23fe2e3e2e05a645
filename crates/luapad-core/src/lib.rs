//! Core abstractions for the luapad playground.
//!
//! This crate provides the fundamental building blocks:
//! - `Value` - Structured values crossing the sandbox boundary
//! - `SandboxMessage` / `RunRequest` - Bridge message types
//! - `LogEntry` - Typed console entry enum
//! - `LogStore` - Ordered store with broadcast + history
//! - `OutputSink` and `Executor` traits

pub mod entry;
pub mod message;
pub mod sink;
pub mod store;
pub mod traits;
pub mod value;

pub use entry::LogEntry;
pub use message::{ErrorPayload, RunRequest, SandboxMessage};
pub use sink::{ChannelSink, OutputSink};
pub use store::{LogStore, StoreEvent};
pub use traits::{Executor, ExecutorError, RunHandle};
pub use value::Value;
