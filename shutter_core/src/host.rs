//! Host-facing view of a shutter and the channel updates are published on.

use crossbeam_channel as xch;
use serde::Serialize;

use crate::state::{MotionState, ShutterState};

/// Window-covering position state as hosts expect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionState {
    Decreasing,
    Increasing,
    Stopped,
}

impl From<MotionState> for PositionState {
    fn from(m: MotionState) -> Self {
        match m {
            MotionState::Closing => PositionState::Decreasing,
            MotionState::Opening => PositionState::Increasing,
            MotionState::Idle => PositionState::Stopped,
        }
    }
}

/// Snapshot published after every state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShutterSnapshot {
    pub id: String,
    pub name: String,
    /// Rounded to whole percent.
    pub current_position: u8,
    pub target_position: u8,
    pub position_state: PositionState,
    /// Momentary pairing switch; `None` when the button is not configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair_on: Option<bool>,
}

impl ShutterSnapshot {
    pub fn new(id: &str, name: &str, state: &ShutterState, pair_on: Option<bool>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            current_position: percent(state.current_position),
            target_position: percent(state.target_position),
            position_state: state.motion.into(),
            pair_on,
        }
    }
}

#[inline]
fn percent(p: f64) -> u8 {
    p.round().clamp(0.0, 100.0) as u8
}

/// Receives every published snapshot. Implementations must not block.
pub trait StatusSink: Send + Sync {
    fn publish(&self, snapshot: &ShutterSnapshot);
}

/// Discards updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn publish(&self, _snapshot: &ShutterSnapshot) {}
}

/// Forwards updates to a crossbeam channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: xch::Sender<ShutterSnapshot>,
}

impl ChannelSink {
    /// Create a sink plus the receiving end of its unbounded channel.
    pub fn new() -> (Self, xch::Receiver<ShutterSnapshot>) {
        let (tx, rx) = xch::unbounded();
        (Self { tx }, rx)
    }
}

impl StatusSink for ChannelSink {
    fn publish(&self, snapshot: &ShutterSnapshot) {
        if self.tx.send(snapshot.clone()).is_err() {
            tracing::trace!("status receiver dropped; update discarded");
        }
    }
}
