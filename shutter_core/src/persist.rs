//! Loading the persisted target at startup and writing it back off-thread.
//!
//! Loading is strict: anything other than "no record" aborts startup.
//! Writing is best-effort: failures are logged and forwarded on an error
//! channel, and the in-memory target stays authoritative.

use std::sync::Arc;

use crossbeam_channel as xch;
use shutter_traits::TargetStore;

use crate::config::DispatchMode;
use crate::error::{Result, ShutterError};
use crate::state::{OPEN, is_valid_position};

/// Target assumed for a shutter that has never been seen before.
pub const DEFAULT_TARGET: f64 = OPEN;

pub type SharedStore = Arc<dyn TargetStore + Send + Sync>;

/// Load the target for `id`, writing the default when no record exists.
pub fn load_or_default(store: &dyn TargetStore, id: &str) -> Result<f64> {
    match store.load(id) {
        Ok(Some(v)) if is_valid_position(v) => {
            tracing::debug!(id, target_position = v, "loaded persisted target");
            Ok(v)
        }
        Ok(Some(v)) => Err(ShutterError::Store(format!(
            "persisted target {v} for {id} is outside 0..=100"
        ))),
        Ok(None) => {
            tracing::info!(id, target_position = DEFAULT_TARGET, "no persisted target; using default");
            if let Err(e) = store.save(id, DEFAULT_TARGET) {
                tracing::warn!(id, error = %e, "failed to persist default target");
            }
            Ok(DEFAULT_TARGET)
        }
        Err(e) => Err(ShutterError::Store(format!("load target for {id}: {e}"))),
    }
}

/// A save that did not make it to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistError {
    pub id: String,
    pub target: f64,
    pub message: String,
}

struct SaveRequest {
    id: String,
    target: f64,
}

enum Mode {
    Inline(SharedStore),
    Background {
        tx: Option<xch::Sender<SaveRequest>>,
        join_handle: Option<std::thread::JoinHandle<()>>,
    },
}

/// Non-blocking writer for persisted targets.
///
/// In background mode a single thread owns the store. Queued requests are
/// coalesced so only the newest target per burst reaches the disk. Dropping
/// the writer flushes what is queued and joins the thread.
pub struct TargetWriter {
    mode: Mode,
    err_tx: xch::Sender<PersistError>,
    err_rx: xch::Receiver<PersistError>,
}

fn write_one(store: &dyn TargetStore, req: &SaveRequest, err_tx: &xch::Sender<PersistError>) {
    match store.save(&req.id, req.target) {
        Ok(()) => tracing::trace!(id = %req.id, target_position = req.target, "target persisted"),
        Err(e) => {
            tracing::error!(id = %req.id, target_position = req.target, error = %e, "failed to persist target");
            let _ = err_tx.send(PersistError {
                id: req.id.clone(),
                target: req.target,
                message: e.to_string(),
            });
        }
    }
}

impl TargetWriter {
    pub fn new(store: SharedStore, mode: DispatchMode) -> Self {
        match mode {
            DispatchMode::Inline => Self::inline(store),
            DispatchMode::Background => Self::spawn(store),
        }
    }

    pub fn inline(store: SharedStore) -> Self {
        let (err_tx, err_rx) = xch::unbounded();
        Self {
            mode: Mode::Inline(store),
            err_tx,
            err_rx,
        }
    }

    pub fn spawn(store: SharedStore) -> Self {
        let (tx, rx) = xch::unbounded::<SaveRequest>();
        let (err_tx, err_rx) = xch::unbounded();
        let worker_err_tx = err_tx.clone();

        let join_handle = std::thread::Builder::new()
            .name("shutter-persist".into())
            .spawn(move || {
                // recv() keeps yielding queued requests after the sender is gone
                while let Ok(first) = rx.recv() {
                    let latest = rx.try_iter().last().unwrap_or(first);
                    write_one(store.as_ref(), &latest, &worker_err_tx);
                }
                tracing::trace!("persist thread exiting cleanly");
            });

        let (tx, join_handle) = match join_handle {
            Ok(h) => (Some(tx), Some(h)),
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn persist thread; saves will be dropped");
                (None, None)
            }
        };

        Self {
            mode: Mode::Background { tx, join_handle },
            err_tx,
            err_rx,
        }
    }

    /// Queue (or perform, in inline mode) a save. Never returns an error.
    pub fn save(&self, id: &str, target: f64) {
        let req = SaveRequest {
            id: id.to_string(),
            target,
        };
        match &self.mode {
            Mode::Inline(store) => write_one(store.as_ref(), &req, &self.err_tx),
            Mode::Background { tx, .. } => {
                let sent = tx.as_ref().map(|tx| tx.send(req));
                if !matches!(sent, Some(Ok(()))) {
                    tracing::error!(id, target_position = target, "persist thread unavailable; target not saved");
                    let _ = self.err_tx.send(PersistError {
                        id: id.to_string(),
                        target,
                        message: "persist thread unavailable".into(),
                    });
                }
            }
        }
    }

    /// Channel on which failed saves are reported.
    pub fn errors(&self) -> xch::Receiver<PersistError> {
        self.err_rx.clone()
    }
}

impl Drop for TargetWriter {
    fn drop(&mut self) {
        if let Mode::Background { tx, join_handle } = &mut self.mode {
            // Closing the channel lets the worker drain and exit.
            drop(tx.take());
            if let Some(handle) = join_handle.take() {
                match handle.join() {
                    Ok(()) => tracing::trace!("persist thread joined successfully"),
                    Err(e) => tracing::warn!(?e, "persist thread panicked during shutdown"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MemoryStore;

    #[test]
    fn missing_record_defaults_and_self_heals() {
        let store = MemoryStore::new();
        assert_eq!(load_or_default(&store, "a").ok(), Some(100.0));
        assert_eq!(store.get("a"), Some(100.0));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn existing_record_is_returned() {
        let store = MemoryStore::new();
        store.insert("a", 37.5);
        assert_eq!(load_or_default(&store, "a").ok(), Some(37.5));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn read_failure_is_fatal() {
        let store = MemoryStore::new();
        store.fail_loads(true);
        match load_or_default(&store, "a") {
            Err(ShutterError::Store(msg)) => assert!(msg.contains("load target")),
            other => panic!("expected Store error, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_record_is_fatal() {
        let store = MemoryStore::new();
        store.insert("a", 140.0);
        assert!(matches!(load_or_default(&store, "a"), Err(ShutterError::Store(_))));
    }

    #[test]
    fn failed_default_write_is_not_fatal() {
        let store = MemoryStore::new();
        store.fail_saves(true);
        assert_eq!(load_or_default(&store, "a").ok(), Some(100.0));
    }

    #[test]
    fn inline_writer_reports_failures() {
        let store = Arc::new(MemoryStore::new());
        store.fail_saves(true);
        let writer = TargetWriter::inline(store.clone());
        writer.save("a", 12.0);
        let err = writer.errors().try_recv().expect("error reported");
        assert_eq!(err.id, "a");
        assert_eq!(err.target, 12.0);
    }

    #[test]
    fn background_writer_flushes_on_drop() {
        let store = Arc::new(MemoryStore::new());
        {
            let writer = TargetWriter::spawn(store.clone());
            for v in [10.0, 20.0, 30.0] {
                writer.save("a", v);
            }
        }
        assert_eq!(store.get("a"), Some(30.0));
        assert!(store.save_count() >= 1);
    }
}
