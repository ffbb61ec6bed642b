//! Fire-and-forget delivery of RF commands.
//!
//! Failures are logged and otherwise ignored: the remote is one-way, so
//! there is nothing useful a caller could do with them.

use std::sync::Mutex;

use crossbeam_channel as xch;
use shutter_traits::{CommandPort, RemoteCommand};

use crate::config::DispatchMode;

pub type BoxedPort = Box<dyn CommandPort + Send>;

enum Mode {
    Inline(Mutex<BoxedPort>),
    Background {
        tx: Option<xch::Sender<RemoteCommand>>,
        join_handle: Option<std::thread::JoinHandle<()>>,
    },
}

/// Owns the command port. In background mode commands are sent in order
/// from a dedicated thread; dropping the dispatcher drains the queue.
pub struct CommandDispatcher {
    mode: Mode,
}

fn send_one(port: &mut BoxedPort, command: RemoteCommand) {
    match port.send(command) {
        Ok(()) => tracing::debug!(%command, button = command.button(), "command sent"),
        Err(e) => tracing::warn!(%command, error = %e, "command send failed"),
    }
}

impl CommandDispatcher {
    pub fn new(port: BoxedPort, mode: DispatchMode) -> Self {
        match mode {
            DispatchMode::Inline => Self {
                mode: Mode::Inline(Mutex::new(port)),
            },
            DispatchMode::Background => Self::spawn(port),
        }
    }

    fn spawn(mut port: BoxedPort) -> Self {
        let (tx, rx) = xch::unbounded::<RemoteCommand>();
        let join_handle = std::thread::Builder::new()
            .name("shutter-rf".into())
            .spawn(move || {
                for command in rx.iter() {
                    send_one(&mut port, command);
                }
                tracing::trace!("dispatcher thread exiting cleanly");
            });
        let (tx, join_handle) = match join_handle {
            Ok(h) => (Some(tx), Some(h)),
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn dispatcher thread; commands will be dropped");
                (None, None)
            }
        };
        Self {
            mode: Mode::Background { tx, join_handle },
        }
    }

    pub fn send(&self, command: RemoteCommand) {
        match &self.mode {
            Mode::Inline(port) => {
                let mut guard = port.lock().unwrap_or_else(|p| p.into_inner());
                send_one(&mut guard, command);
            }
            Mode::Background { tx, .. } => {
                let queued = tx.as_ref().is_some_and(|tx| tx.send(command).is_ok());
                if !queued {
                    tracing::warn!(%command, "dispatcher unavailable; command dropped");
                }
            }
        }
    }
}

impl Drop for CommandDispatcher {
    fn drop(&mut self) {
        if let Mode::Background { tx, join_handle } = &mut self.mode {
            drop(tx.take());
            if let Some(handle) = join_handle.take()
                && let Err(e) = handle.join()
            {
                tracing::warn!(?e, "dispatcher thread panicked during shutdown");
            }
        }
    }
}
