//! `From` implementations bridging `shutter_config` types to `shutter_core` types.

use crate::config::{DispatchMode, ShutterConfig};

// ── ShutterConfig ────────────────────────────────────────────────────────────

impl From<&shutter_config::ShutterCfg> for ShutterConfig {
    fn from(c: &shutter_config::ShutterCfg) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            open_duration_ms: c.open_duration_ms,
            close_duration_ms: c.close_duration_ms,
            locking_duration_ms: c.locking_duration_ms,
            has_prog_button: c.prog,
        }
    }
}

// ── DispatchMode ─────────────────────────────────────────────────────────────

impl From<shutter_config::DispatchMode> for DispatchMode {
    fn from(m: shutter_config::DispatchMode) -> Self {
        match m {
            shutter_config::DispatchMode::Background => DispatchMode::Background,
            shutter_config::DispatchMode::Inline => DispatchMode::Inline,
        }
    }
}
