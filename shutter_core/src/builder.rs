//! Builder for `ShutterController`.
//!
//! Config, command port and target store are mandatory; sink, clock and
//! dispatch mode have defaults. `build()` loads the persisted target, so a
//! storage read failure aborts construction.

use std::sync::{Arc, Mutex};

use shutter_traits::clock::{Clock, MonotonicClock};
use shutter_traits::{CommandPort, TargetStore};

use crate::config::{DispatchMode, ShutterConfig};
use crate::controller::{Shared, ShutterController};
use crate::dispatch::{BoxedPort, CommandDispatcher};
use crate::error::{BuildError, Result};
use crate::host::{NullSink, StatusSink};
use crate::machine::ShutterCore;
use crate::persist::{SharedStore, TargetWriter, load_or_default};

#[derive(Default)]
pub struct ShutterControllerBuilder {
    config: Option<ShutterConfig>,
    port: Option<BoxedPort>,
    store: Option<SharedStore>,
    sink: Option<Arc<dyn StatusSink>>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    dispatch: DispatchMode,
}

impl ShutterControllerBuilder {
    pub fn with_config(mut self, config: ShutterConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_port<P: CommandPort + Send + 'static>(mut self, port: P) -> Self {
        self.port = Some(Box::new(port));
        self
    }

    pub fn with_store<S: TargetStore + Send + Sync + 'static>(mut self, store: S) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Use a store the caller keeps a handle to.
    pub fn with_shared_store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_sink<S: StatusSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn with_clock<C: Clock + Send + Sync + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn with_dispatch(mut self, mode: DispatchMode) -> Self {
        self.dispatch = mode;
        self
    }

    pub fn build(self) -> Result<ShutterController> {
        let config = self.config.ok_or(BuildError::MissingConfig)?;
        config.validate()?;
        let port = self.port.ok_or(BuildError::MissingPort)?;
        let store = self.store.ok_or(BuildError::MissingStore)?;

        let target = load_or_default(store.as_ref(), &config.id)?;
        tracing::info!(
            id = %config.id,
            name = %config.name,
            target_position = target,
            dispatch = ?self.dispatch,
            "shutter initialized"
        );

        let controller = ShutterController {
            shared: Arc::new(Shared {
                core: Mutex::new(ShutterCore::new(config, target)),
                dispatcher: CommandDispatcher::new(port, self.dispatch),
                writer: TargetWriter::new(store, self.dispatch),
                sink: self.sink.unwrap_or_else(|| Arc::new(NullSink)),
                clock: self
                    .clock
                    .unwrap_or_else(|| Arc::new(MonotonicClock::new())),
                mode: self.dispatch,
            }),
        };
        controller.publish_current();
        Ok(controller)
    }
}
