//! Runtime configuration types for the shutter engine.
//!
//! These are separate from the TOML-deserialized config in `shutter_config`.

use crate::error::BuildError;

/// Immutable description of one shutter.
#[derive(Debug, Clone, PartialEq)]
pub struct ShutterConfig {
    /// Persistence key.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Full 0 -> 100 travel time.
    pub open_duration_ms: u64,
    /// Full 100 -> 0 travel time.
    pub close_duration_ms: u64,
    /// Time to cross the final 1% at the closed end.
    pub locking_duration_ms: u64,
    /// Whether the "Prog" pairing button is exposed.
    pub has_prog_button: bool,
}

impl ShutterConfig {
    pub fn new(
        id: impl Into<String>,
        open_duration_ms: u64,
        close_duration_ms: u64,
        locking_duration_ms: u64,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            open_duration_ms,
            close_duration_ms,
            locking_duration_ms,
            has_prog_button: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_prog_button(mut self, enabled: bool) -> Self {
        self.has_prog_button = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        if self.id.trim().is_empty() {
            return Err(BuildError::InvalidConfig("id must not be empty"));
        }
        if self.open_duration_ms == 0 {
            return Err(BuildError::InvalidConfig("open_duration_ms must be > 0"));
        }
        if self.close_duration_ms == 0 {
            return Err(BuildError::InvalidConfig("close_duration_ms must be > 0"));
        }
        if self.locking_duration_ms == 0 {
            return Err(BuildError::InvalidConfig(
                "locking_duration_ms must be > 0",
            ));
        }
        Ok(())
    }
}

/// Where side effects (RF commands, persistence writes) are executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// Dedicated worker threads; callers never wait on a port or the disk.
    #[default]
    Background,
    /// On the calling thread, after the state lock has been released.
    Inline,
}
