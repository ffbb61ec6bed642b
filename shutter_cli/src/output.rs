//! Stdout rendering of snapshots, pretty or as JSON lines.

use std::sync::Mutex;

use shutter_core::{PositionState, ShutterSnapshot, StatusSink};

pub fn render(snap: &ShutterSnapshot, json: bool) -> String {
    if json {
        return serde_json::to_string(snap)
            .unwrap_or_else(|e| format!(r#"{{"reason":"Error","message":"serialize snapshot: {e}"}}"#));
    }
    let motion = match snap.position_state {
        PositionState::Decreasing => "closing",
        PositionState::Increasing => "opening",
        PositionState::Stopped => "stopped",
    };
    let mut line = format!(
        "{}: {}% -> {}% ({motion})",
        snap.name, snap.current_position, snap.target_position
    );
    if snap.pair_on == Some(true) {
        line.push_str(" [pairing]");
    }
    line
}

/// Prints every snapshot whose rounded view differs from the last one printed.
pub struct ConsoleSink {
    json: bool,
    last: Mutex<Option<ShutterSnapshot>>,
}

impl ConsoleSink {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            last: Mutex::new(None),
        }
    }
}

impl StatusSink for ConsoleSink {
    fn publish(&self, snapshot: &ShutterSnapshot) {
        let Ok(mut last) = self.last.lock() else {
            return;
        };
        if last.as_ref() == Some(snapshot) {
            return;
        }
        println!("{}", render(snapshot, self.json));
        *last = Some(snapshot.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shutter_core::{MotionState, ShutterState};

    #[test]
    fn pretty_line_shows_positions_and_direction() {
        let state = ShutterState {
            current_position: 64.4,
            target_position: 20.0,
            motion: MotionState::Closing,
        };
        let snap = ShutterSnapshot::new("lr", "Living room", &state, Some(true));
        assert_eq!(
            render(&snap, false),
            "Living room: 64% -> 20% (closing) [pairing]"
        );
    }

    #[test]
    fn json_line_uses_host_field_names() {
        let snap = ShutterSnapshot::new("lr", "Living room", &ShutterState::settled_at(35.0), None);
        let v: serde_json::Value = serde_json::from_str(&render(&snap, true)).unwrap();
        assert_eq!(v["current_position"], 35);
        assert_eq!(v["position_state"], "STOPPED");
        assert!(v.get("pair_on").is_none());
    }
}
