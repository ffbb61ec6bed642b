//! `ShutterController`: the thread-safe owner of one shutter.
//!
//! Every mutation (a tick, a new target, a pairing press) takes the state
//! lock exactly once. The resulting effects are then handed to the command
//! dispatcher, the target writer and the status sink.

use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel as xch;
use shutter_traits::{Clock, RemoteCommand};

use crate::builder::ShutterControllerBuilder;
use crate::config::{DispatchMode, ShutterConfig};
use crate::dispatch::CommandDispatcher;
use crate::error::Result;
use crate::host::{ShutterSnapshot, StatusSink};
use crate::machine::{Effects, ShutterCore};
use crate::persist::{PersistError, TargetWriter};
use crate::state::{MotionState, ShutterState};
use crate::util::TICK;

pub(crate) struct Shared {
    pub(crate) core: Mutex<ShutterCore>,
    pub(crate) dispatcher: CommandDispatcher,
    pub(crate) writer: TargetWriter,
    pub(crate) sink: Arc<dyn StatusSink>,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) mode: DispatchMode,
}

/// Cheap to clone; all clones drive the same shutter.
#[derive(Clone)]
pub struct ShutterController {
    pub(crate) shared: Arc<Shared>,
}

impl core::fmt::Debug for ShutterController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShutterController")
            .field("state", &self.state())
            .field("mode", &self.shared.mode)
            .finish()
    }
}

impl ShutterController {
    /// Start building a controller.
    pub fn builder() -> ShutterControllerBuilder {
        ShutterControllerBuilder::default()
    }

    fn lock_core(&self) -> MutexGuard<'_, ShutterCore> {
        self.shared.core.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("shutter state lock poisoned; continuing with last state");
            poisoned.into_inner()
        })
    }

    /// Run `f` under the state lock and apply its effects.
    ///
    /// Background mode only enqueues, so effects are applied before the lock
    /// is released and stay in mutation order. Inline mode calls the port
    /// and the store directly and therefore releases the lock first.
    fn mutate<F>(&self, f: F) -> Result<Effects>
    where
        F: FnOnce(&mut ShutterCore) -> Result<Effects>,
    {
        let mut core = self.lock_core();
        let effects = f(&mut *core)?;
        let snapshot = effects.changed.then(|| core.snapshot());
        let id = core.config().id.clone();
        match self.shared.mode {
            DispatchMode::Background => {
                self.apply(&id, &effects, snapshot.as_ref());
                drop(core);
            }
            DispatchMode::Inline => {
                drop(core);
                self.apply(&id, &effects, snapshot.as_ref());
            }
        }
        Ok(effects)
    }

    fn apply(&self, id: &str, effects: &Effects, snapshot: Option<&ShutterSnapshot>) {
        if let Some(command) = effects.command {
            self.shared.dispatcher.send(command);
        }
        if let Some(target) = effects.save {
            self.shared.writer.save(id, target);
        }
        if let Some(snap) = snapshot {
            self.shared.sink.publish(snap);
        }
    }

    /// Simulated position, 0..=100 (100 = open).
    pub fn current_position(&self) -> f64 {
        self.lock_core().state().current_position
    }

    pub fn target_position(&self) -> f64 {
        self.lock_core().state().target_position
    }

    pub fn motion(&self) -> MotionState {
        self.lock_core().state().motion
    }

    pub fn state(&self) -> ShutterState {
        *self.lock_core().state()
    }

    pub fn config(&self) -> ShutterConfig {
        self.lock_core().config().clone()
    }

    /// `None` when the pairing button is not configured.
    pub fn pair_on(&self) -> Option<bool> {
        self.lock_core().pair_on()
    }

    pub fn snapshot(&self) -> ShutterSnapshot {
        self.lock_core().snapshot()
    }

    /// Request a new target. Returns the command that was issued, if any.
    ///
    /// Port and storage failures never surface here; they are logged, and
    /// storage failures are also reported on [`Self::persist_errors`].
    pub fn set_target_position(&self, target: f64) -> Result<Option<RemoteCommand>> {
        self.mutate(|core| core.set_target(target))
            .map(|fx| fx.command)
    }

    /// Press the pairing button.
    pub fn trigger_pair(&self) -> Result<()> {
        let now = self.shared.clock.now();
        self.mutate(|core| core.trigger_pair(now)).map(|_| ())
    }

    /// One fixed-length tick. Returns the stop command when one was issued.
    pub fn tick(&self) -> Option<RemoteCommand> {
        let now = self.shared.clock.now();
        self.mutate(|core| Ok(core.tick(TICK, now)))
            .ok()
            .and_then(|fx| fx.command)
    }

    /// Failed persistence writes.
    pub fn persist_errors(&self) -> xch::Receiver<PersistError> {
        self.shared.writer.errors()
    }

    pub(crate) fn publish_current(&self) {
        let snap = self.snapshot();
        self.shared.sink.publish(&snap);
    }
}
