//! Open-loop position estimate.
//!
//! The motor never reports its position, so each tick moves the simulated
//! position toward the target at a rate derived from the configured travel
//! durations. The region `current <= 1` is crossed at the slower locking
//! rate whichever way the shutter is moving.

use std::time::Duration;

use crate::config::ShutterConfig;
use crate::state::ShutterState;

/// Upper bound of the locking zone, in percent.
pub const LOCKING_ZONE: f64 = 1.0;

/// Position change (always >= 0) for one tick of length `dt`.
pub fn step_size(state: &ShutterState, config: &ShutterConfig, dt: Duration) -> f64 {
    let dt_ms = dt.as_micros() as f64 / 1000.0;
    if state.current_position <= LOCKING_ZONE {
        dt_ms * LOCKING_ZONE / config.locking_duration_ms as f64
    } else if state.current_position < state.target_position {
        dt_ms * 100.0 / config.open_duration_ms as f64
    } else {
        dt_ms * 100.0 / config.close_duration_ms as f64
    }
}

/// New current position after one tick; never overshoots the target.
pub fn advance(state: &ShutterState, config: &ShutterConfig, dt: Duration) -> f64 {
    let current = state.current_position;
    let target = state.target_position;
    if current == target {
        return current;
    }
    let step = step_size(state, config, dt);
    if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}

/// Number of ticks `advance` needs to reach the target from `state`.
///
/// Simulates the ticks rather than solving in closed form so the count
/// matches the estimator exactly, locking zone included.
pub fn ticks_to_converge(state: &ShutterState, config: &ShutterConfig, dt: Duration) -> u64 {
    let mut s = *state;
    let mut ticks = 0u64;
    while !s.at_target() {
        let next = advance(&s, config, dt);
        if next == s.current_position {
            // zero-length tick; cannot make progress
            break;
        }
        s.current_position = next;
        ticks += 1;
    }
    ticks
}
