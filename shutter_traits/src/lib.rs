pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

use std::fmt;

/// Error type used across the trait boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The buttons of a one-way RF remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteCommand {
    /// "Up"
    Open,
    /// "Down"
    Close,
    /// "My": halts motion mid-travel (also pairs devices on a real remote).
    Stop,
    /// "Prog"
    Pair,
}

impl RemoteCommand {
    /// Wire name of the command.
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteCommand::Open => "open",
            RemoteCommand::Close => "close",
            RemoteCommand::Stop => "stop_or_pair",
            RemoteCommand::Pair => "pair",
        }
    }

    /// Label of the physical remote button.
    pub fn button(self) -> &'static str {
        match self {
            RemoteCommand::Open => "Up",
            RemoteCommand::Close => "Down",
            RemoteCommand::Stop => "My",
            RemoteCommand::Pair => "Prog",
        }
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound RF emitter. Delivery is fire-and-forget: there is no
/// acknowledgement and callers never retry.
pub trait CommandPort {
    fn send(&mut self, command: RemoteCommand) -> Result<(), BoxError>;
}

impl<P: CommandPort + ?Sized> CommandPort for Box<P> {
    fn send(&mut self, command: RemoteCommand) -> Result<(), BoxError> {
        (**self).send(command)
    }
}

/// Storage for the last requested target of each shutter.
pub trait TargetStore {
    /// `Ok(None)` means no record exists for `id`.
    fn load(&self, id: &str) -> Result<Option<f64>, BoxError>;
    fn save(&self, id: &str, target: f64) -> Result<(), BoxError>;
}

impl<S: TargetStore + ?Sized> TargetStore for Box<S> {
    fn load(&self, id: &str) -> Result<Option<f64>, BoxError> {
        (**self).load(id)
    }
    fn save(&self, id: &str, target: f64) -> Result<(), BoxError> {
        (**self).save(id, target)
    }
}

impl<S: TargetStore + ?Sized> TargetStore for std::sync::Arc<S> {
    fn load(&self, id: &str) -> Result<Option<f64>, BoxError> {
        (**self).load(id)
    }
    fn save(&self, id: &str, target: f64) -> Result<(), BoxError> {
        (**self).save(id, target)
    }
}
