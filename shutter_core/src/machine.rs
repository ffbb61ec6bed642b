//! The shutter state machine (`ShutterCore`).
//!
//! Holds the authoritative `ShutterState` and turns requests and ticks into
//! `Effects`. It performs no I/O itself: the controller applies the effects
//! (RF command, persistence write, host update) after each mutation.

use std::time::{Duration, Instant};

use shutter_traits::RemoteCommand;

use crate::config::ShutterConfig;
use crate::error::{Result, ShutterError};
use crate::estimator;
use crate::host::ShutterSnapshot;
use crate::reconciler;
use crate::state::{MotionState, ShutterState, is_endpoint, is_valid_position};
use crate::util::PAIR_RESET;

/// Side effects produced by one mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Effects {
    /// RF command to send, at most one.
    pub command: Option<RemoteCommand>,
    /// Target to persist.
    pub save: Option<f64>,
    /// Whether the host-visible state changed.
    pub changed: bool,
}

pub struct ShutterCore {
    pub(crate) config: ShutterConfig,
    pub(crate) state: ShutterState,
    pub(crate) pair_reset_at: Option<Instant>,
}

impl core::fmt::Debug for ShutterCore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShutterCore")
            .field("id", &self.config.id)
            .field("current", &self.state.current_position)
            .field("target", &self.state.target_position)
            .field("motion", &self.state.motion)
            .finish()
    }
}

impl ShutterCore {
    /// A core settled at `target` (the shutter is assumed to have finished
    /// its last move while nothing was watching).
    pub fn new(config: ShutterConfig, target: f64) -> Self {
        Self {
            config,
            state: ShutterState::settled_at(target),
            pair_reset_at: None,
        }
    }

    pub fn config(&self) -> &ShutterConfig {
        &self.config
    }

    pub fn state(&self) -> &ShutterState {
        &self.state
    }

    /// `None` when the pairing button is not configured.
    pub fn pair_on(&self) -> Option<bool> {
        self.config
            .has_prog_button
            .then_some(self.pair_reset_at.is_some())
    }

    pub fn snapshot(&self) -> ShutterSnapshot {
        ShutterSnapshot::new(
            &self.config.id,
            &self.config.name,
            &self.state,
            self.pair_on(),
        )
    }

    /// Accept a new target. Out-of-range input leaves everything untouched.
    pub fn set_target(&mut self, target: f64) -> Result<Effects> {
        if !is_valid_position(target) {
            return Err(ShutterError::InvalidTarget(target));
        }
        let before = self.state.motion;
        let command = reconciler::apply(&mut self.state, target);
        tracing::info!(
            id = %self.config.id,
            target_position = target,
            current = self.state.current_position,
            from = ?before,
            to = ?self.state.motion,
            command = command.map(RemoteCommand::as_str),
            "target accepted"
        );
        Ok(Effects {
            command,
            save: Some(target),
            changed: true,
        })
    }

    /// Advance the simulation by one tick of length `dt`.
    pub fn tick(&mut self, dt: Duration, now: Instant) -> Effects {
        let mut effects = Effects::default();

        if let Some(deadline) = self.pair_reset_at
            && now >= deadline
        {
            self.pair_reset_at = None;
            effects.changed = true;
        }

        if self.state.at_target() {
            return effects;
        }

        let next = estimator::advance(&self.state, &self.config, dt);
        effects.changed = true;
        self.state.current_position = next;
        tracing::debug!(id = %self.config.id, current = next, "tick");

        if self.state.at_target() {
            self.state.motion = MotionState::Idle;
            let target = self.state.target_position;
            if !is_endpoint(target) {
                effects.command = Some(RemoteCommand::Stop);
            }
            tracing::info!(
                id = %self.config.id,
                position = target,
                stop_sent = effects.command.is_some(),
                "target reached"
            );
        }
        effects
    }

    /// Press the pairing button. The switch reads "on" until `PAIR_RESET`
    /// has elapsed, then a tick turns it off.
    pub fn trigger_pair(&mut self, now: Instant) -> Result<Effects> {
        if !self.config.has_prog_button {
            return Err(ShutterError::PairUnavailable);
        }
        self.pair_reset_at = Some(now + PAIR_RESET);
        tracing::info!(id = %self.config.id, "pairing command triggered");
        Ok(Effects {
            command: Some(RemoteCommand::Pair),
            save: None,
            changed: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::TICK;

    fn core_at(target: f64) -> ShutterCore {
        ShutterCore::new(ShutterConfig::new("c", 1_000, 1_000, 1_000), target)
    }

    #[test]
    fn invalid_target_is_rejected_without_mutation() {
        let mut c = core_at(40.0);
        for bad in [-0.1, 100.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(c.set_target(bad), Err(ShutterError::InvalidTarget(_))));
        }
        assert_eq!(c.state, ShutterState::settled_at(40.0));
    }

    #[test]
    fn converging_mid_range_emits_stop() {
        let mut c = core_at(50.0);
        let now = Instant::now();
        let fx = c.set_target(70.0).expect("valid");
        assert_eq!(fx.command, Some(RemoteCommand::Open));
        // 10% per tick
        let mut stops = 0;
        for _ in 0..5 {
            if c.tick(TICK, now).command == Some(RemoteCommand::Stop) {
                stops += 1;
            }
        }
        assert_eq!(c.state.current_position, 70.0);
        assert_eq!(c.state.motion, MotionState::Idle);
        assert_eq!(stops, 1);
    }

    #[test]
    fn converging_at_open_end_is_silent() {
        let mut c = core_at(80.0);
        let now = Instant::now();
        c.set_target(100.0).expect("valid");
        let cmds: Vec<_> = (0..10).filter_map(|_| c.tick(TICK, now).command).collect();
        assert!(cmds.is_empty());
        assert_eq!(c.state.motion, MotionState::Idle);
    }

    #[test]
    fn idle_tick_changes_nothing() {
        let mut c = core_at(25.0);
        assert_eq!(c.tick(TICK, Instant::now()), Effects::default());
    }

    #[test]
    fn pair_requires_prog_button() {
        let mut c = core_at(25.0);
        assert!(matches!(
            c.trigger_pair(Instant::now()),
            Err(ShutterError::PairUnavailable)
        ));
        assert_eq!(c.pair_on(), None);
    }
}
