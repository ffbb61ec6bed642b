//! Fixed-rate driver for `ShutterController::tick`.
//!
//! Spawns one thread that ticks the controller every `TICK` until the
//! `Ticker` is dropped. It keeps running while the shutter is idle; those
//! ticks are no-ops.
use shutter_traits::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::controller::ShutterController;
use crate::util::TICK;

pub struct Ticker {
    /// Shutdown flag for immediate response (atomic for lock-free check)
    shutdown: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn<C: Clock + Send + Sync + 'static>(controller: ShutterController, clock: C) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let ticks = Arc::new(AtomicU64::new(0));
        let ticks_clone = ticks.clone();

        let spawned = std::thread::Builder::new()
            .name("shutter-ticker".into())
            .spawn(move || {
                loop {
                    if shutdown_clone.load(Ordering::Relaxed) {
                        tracing::debug!("ticker thread received shutdown signal");
                        break;
                    }
                    let started = clock.now();
                    controller.tick();
                    ticks_clone.fetch_add(1, Ordering::Relaxed);

                    if shutdown_clone.load(Ordering::Relaxed) {
                        break;
                    }
                    // time spent in tick() comes out of the sleep
                    clock.sleep(TICK.saturating_sub(clock.elapsed_since(started)));
                }
                tracing::trace!("ticker thread exiting cleanly");
            });

        let join_handle = match spawned {
            Ok(h) => Some(h),
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn ticker thread; position will not advance");
                None
            }
        };

        Self {
            shutdown,
            ticks,
            join_handle,
        }
    }

    /// Ticks performed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // At most one TICK of latency: the thread exits after its current sleep.
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("ticker thread joined successfully");
                }
                Err(e) => {
                    tracing::warn!(?e, "ticker thread panicked during shutdown");
                }
            }
        }
    }
}
