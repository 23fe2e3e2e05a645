//! Ordered log store with broadcast + history.

use std::sync::RwLock;

use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::entry::LogEntry;

/// Store event delivered to live subscribers.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// An entry was appended.
    Appended(LogEntry),
    /// The store was emptied (new run or host-level clear).
    Reset,
}

/// Append-only ordered store of console entries with live broadcast.
///
/// Essential for reconnection: new clients receive history then seamlessly
/// switch to live updates. Insertion order is display order; growth is
/// unbounded, the store lives only as long as its run session.
pub struct LogStore {
    entries: RwLock<Vec<LogEntry>>,
    sender: broadcast::Sender<StoreEvent>,
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(10000);
        Self {
            entries: RwLock::new(Vec::new()),
            sender,
        }
    }

    /// Append one entry; live subscribers are notified.
    pub fn append(&self, entry: LogEntry) {
        let _ = self.sender.send(StoreEvent::Appended(entry.clone()));
        self.entries.write().unwrap().push(entry);
    }

    /// Empty the store outright and notify subscribers.
    ///
    /// Used when a new run begins and for a host-level "clear console"
    /// action. A sandboxed `console.clear` is appended as a
    /// [`LogEntry::Cleared`] marker instead.
    pub fn reset(&self) {
        self.entries.write().unwrap().clear();
        let _ = self.sender.send(StoreEvent::Reset);
    }

    /// Snapshot of the current entries.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().unwrap().clone()
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// True when the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Get a receiver for live updates.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Stream that yields the current history first, then live updates.
    #[must_use]
    pub fn history_plus_stream(&self) -> futures::stream::BoxStream<'static, StoreEvent> {
        let (history, rx) = (self.entries(), self.subscribe());

        let hist = futures::stream::iter(history.into_iter().map(StoreEvent::Appended));
        let live = BroadcastStream::new(rx).filter_map(|res| async move { res.ok() });

        Box::pin(hist.chain(live))
    }
}
