//! Simulated RF remote. Nothing is transmitted; each button press is logged
//! and remembered so the CLI can report what would have been sent.

use std::sync::{Arc, Mutex};

use shutter_traits::{BoxError, CommandPort, RemoteCommand};

#[derive(Debug, Clone)]
pub struct SimulatedRemote {
    shutter: String,
    presses: Arc<Mutex<Vec<RemoteCommand>>>,
}

impl SimulatedRemote {
    pub fn new(shutter: impl Into<String>) -> Self {
        Self {
            shutter: shutter.into(),
            presses: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Buttons pressed so far, oldest first.
    pub fn presses(&self) -> Vec<RemoteCommand> {
        self.presses.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl CommandPort for SimulatedRemote {
    fn send(&mut self, command: RemoteCommand) -> Result<(), BoxError> {
        tracing::info!(
            shutter = %self.shutter,
            button = command.button(),
            command = command.as_str(),
            "remote button pressed"
        );
        let mut g = self
            .presses
            .lock()
            .map_err(|_| "remote press log poisoned")?;
        g.push(command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presses_are_shared_between_clones() {
        let remote = SimulatedRemote::new("x");
        let mut port = remote.clone();
        port.send(RemoteCommand::Close).unwrap();
        port.send(RemoteCommand::Stop).unwrap();
        assert_eq!(
            remote.presses(),
            vec![RemoteCommand::Close, RemoteCommand::Stop]
        );
    }
}
