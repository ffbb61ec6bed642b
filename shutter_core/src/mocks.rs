//! Test and helper doubles for shutter_core.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use shutter_traits::{BoxError, CommandPort, RemoteCommand, TargetStore};

/// Command port that remembers everything it was asked to send.
///
/// Clones share the same log, so a test can keep one handle and hand the
/// other to the controller.
#[derive(Debug, Clone, Default)]
pub struct RecordingPort {
    sent: Arc<Mutex<Vec<RemoteCommand>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail (the command is still recorded).
    pub fn fail(&self, on: bool) {
        self.failing.store(on, Ordering::Relaxed);
    }

    pub fn commands(&self) -> Vec<RemoteCommand> {
        self.sent.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn count(&self, command: RemoteCommand) -> usize {
        self.commands().iter().filter(|c| **c == command).count()
    }

    pub fn clear(&self) {
        if let Ok(mut g) = self.sent.lock() {
            g.clear();
        }
    }
}

impl CommandPort for RecordingPort {
    fn send(&mut self, command: RemoteCommand) -> Result<(), BoxError> {
        if let Ok(mut g) = self.sent.lock() {
            g.push(command);
        }
        if self.failing.load(Ordering::Relaxed) {
            return Err(Box::new(std::io::Error::other("rf emitter offline")));
        }
        Ok(())
    }
}

/// In-memory target store with switchable failures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, f64>>,
    saves: AtomicUsize,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record without counting it as a save.
    pub fn insert(&self, id: &str, target: f64) {
        if let Ok(mut g) = self.records.lock() {
            g.insert(id.to_string(), target);
        }
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.records.lock().ok().and_then(|g| g.get(id).copied())
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }

    pub fn fail_loads(&self, on: bool) {
        self.fail_loads.store(on, Ordering::Relaxed);
    }

    pub fn fail_saves(&self, on: bool) {
        self.fail_saves.store(on, Ordering::Relaxed);
    }
}

impl TargetStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Option<f64>, BoxError> {
        if self.fail_loads.load(Ordering::Relaxed) {
            return Err(Box::new(std::io::Error::other("permission denied")));
        }
        Ok(self.get(id))
    }

    fn save(&self, id: &str, target: f64) -> Result<(), BoxError> {
        if self.fail_saves.load(Ordering::Relaxed) {
            return Err(Box::new(std::io::Error::other("disk full")));
        }
        self.insert(id, target);
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
