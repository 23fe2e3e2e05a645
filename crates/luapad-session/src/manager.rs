//! Run manager: dispatch, log scoping, host-level clear.

use std::sync::Arc;

use luapad_core::{ChannelSink, Executor, ExecutorError, LogEntry, LogStore, OutputSink};
use tokio::sync::{Mutex, mpsc};

/// Run manager error.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),
}

struct ActiveRun {
    forwarder: tokio::task::JoinHandle<()>,
}

/// Orchestrates runs for one playground session.
///
/// Owns the log store. Submitting source supersedes the previous run and
/// empties the store before the new run's first entry, so entries from two
/// different source texts never interleave.
pub struct RunManager {
    store: Arc<LogStore>,
    executor: Arc<dyn Executor>,
    active: Mutex<Option<ActiveRun>>,
}

impl RunManager {
    /// Create a manager with an empty store.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self {
            store: Arc::new(LogStore::new()),
            executor,
            active: Mutex::new(None),
        }
    }

    /// Shared store handle for transports.
    #[must_use]
    pub fn store(&self) -> Arc<LogStore> {
        Arc::clone(&self.store)
    }

    /// Submit new source text: detach the superseded run's bridge, empty
    /// the store, dispatch the code.
    ///
    /// # Errors
    /// Returns error if the executor fails to dispatch.
    pub async fn submit(&self, code: String) -> Result<(), ManagerError> {
        let mut active = self.active.lock().await;
        if let Some(prev) = active.take() {
            // The superseded sandbox may still be executing, but once its
            // forwarder is gone its messages have no receiver.
            prev.forwarder.abort();
            let _ = prev.forwarder.await;
        }
        self.store.reset();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink: Arc<dyn OutputSink> = Arc::new(ChannelSink::new(tx));
        let run = self.executor.spawn(code, sink).await?;
        tracing::debug!("run dispatched");
        // No cancellation: the worker runs to completion on its own.
        drop(run);

        let store = Arc::clone(&self.store);
        let forwarder = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                store.append(LogEntry::from(msg));
            }
        });
        *active = Some(ActiveRun { forwarder });
        Ok(())
    }

    /// Host-level clear: empty the store outright.
    ///
    /// Distinct from a sandboxed `console.clear`, which appends a marker
    /// entry instead.
    pub fn clear_console(&self) {
        self.store.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use luapad_core::{RunHandle, SandboxMessage, Value};
    use luapad_sandbox::LuaSandbox;

    use super::*;

    /// Executor that replays a fixed message script through the sink.
    struct ScriptedExecutor {
        script: Vec<SandboxMessage>,
    }

    #[async_trait]
    impl Executor for ScriptedExecutor {
        async fn spawn(
            &self,
            _code: String,
            sink: Arc<dyn OutputSink>,
        ) -> Result<RunHandle, ExecutorError> {
            for msg in self.script.clone() {
                match msg {
                    SandboxMessage::ConsoleLog { payload } => sink.on_output(payload),
                    SandboxMessage::ConsoleError { payload } => {
                        sink.on_error(payload.message, payload.stack);
                    }
                    SandboxMessage::ConsoleClear => sink.on_clear(),
                }
            }
            Ok(RunHandle {
                task: tokio::spawn(async {}),
            })
        }
    }

    fn log(n: i64) -> SandboxMessage {
        SandboxMessage::ConsoleLog {
            payload: vec![Value::Int(n)],
        }
    }

    async fn wait_for(store: &LogStore, n: usize) {
        for _ in 0..200 {
            if store.len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("store never reached {n} entries (has {})", store.len());
    }

    #[tokio::test]
    async fn test_entries_arrive_in_call_order() {
        let manager = RunManager::new(Arc::new(ScriptedExecutor {
            script: vec![log(1), log(2), log(3)],
        }));
        manager.submit("ignored".to_string()).await.unwrap();

        let store = manager.store();
        wait_for(&store, 3).await;

        let entries = store.entries();
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(
                *entry,
                LogEntry::Output {
                    values: vec![Value::Int(i as i64 + 1)]
                }
            );
        }
    }

    #[tokio::test]
    async fn test_new_submit_discards_previous_entries() {
        let manager = RunManager::new(Arc::new(ScriptedExecutor {
            script: vec![log(7)],
        }));

        manager.submit("first".to_string()).await.unwrap();
        let store = manager.store();
        wait_for(&store, 1).await;

        manager.submit("second".to_string()).await.unwrap();
        wait_for(&store, 1).await;

        // Only the second run's single entry remains.
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_sandbox_clear_appends_marker() {
        let manager = RunManager::new(Arc::new(ScriptedExecutor {
            script: vec![log(1), SandboxMessage::ConsoleClear, log(2)],
        }));
        manager.submit("x".to_string()).await.unwrap();

        let store = manager.store();
        wait_for(&store, 3).await;

        assert_eq!(store.entries()[1], LogEntry::Cleared);
    }

    #[tokio::test]
    async fn test_host_clear_empties_store() {
        let manager = RunManager::new(Arc::new(ScriptedExecutor {
            script: vec![log(1), log(2)],
        }));
        manager.submit("x".to_string()).await.unwrap();

        let store = manager.store();
        wait_for(&store, 2).await;

        manager.clear_console();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_end_to_end_with_lua_sandbox() {
        let manager = RunManager::new(Arc::new(LuaSandbox::new()));
        manager
            .submit("console.log('a') console.log({x = 1}) error('boom')".to_string())
            .await
            .unwrap();

        let store = manager.store();
        wait_for(&store, 3).await;

        let entries = store.entries();
        assert_eq!(
            entries[0],
            LogEntry::Output {
                values: vec![Value::str("a")]
            }
        );
        assert_eq!(
            entries[1],
            LogEntry::Output {
                values: vec![Value::Map(vec![("x".to_string(), Value::Int(1))])]
            }
        );
        match &entries[2] {
            LogEntry::Error { message, .. } => assert!(message.contains("boom")),
            other => panic!("expected error entry, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lua_error_produces_no_trailing_output() {
        let manager = RunManager::new(Arc::new(LuaSandbox::new()));
        manager
            .submit("console.log(1) error('stop') console.log(2)".to_string())
            .await
            .unwrap();

        let store = manager.store();
        wait_for(&store, 2).await;
        // Give the forwarder a chance to deliver anything extra.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let entries = store.entries();
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[1], LogEntry::Error { .. }));
    }
}
