//! Decides the motion state and the single RF command (if any) for a new target.

use shutter_traits::RemoteCommand;

use crate::state::{MotionState, ShutterState};

/// Outcome of one reconciliation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciliation {
    pub motion: MotionState,
    pub command: Option<RemoteCommand>,
}

impl Reconciliation {
    fn keep(motion: MotionState) -> Self {
        Self {
            motion,
            command: None,
        }
    }

    fn go(motion: MotionState, command: RemoteCommand) -> Self {
        Self {
            motion,
            command: Some(command),
        }
    }
}

/// Compute the reaction to `new_target` without touching `state`.
///
/// No command is issued when the shutter already travels the right way:
/// the earlier press keeps the motor running.
pub fn reconcile(state: &ShutterState, new_target: f64) -> Reconciliation {
    let current = state.current_position;
    let wants_close = current > new_target;
    let wants_open = current < new_target;

    match state.motion {
        MotionState::Idle => {
            if wants_close {
                Reconciliation::go(MotionState::Closing, RemoteCommand::Close)
            } else if wants_open {
                Reconciliation::go(MotionState::Opening, RemoteCommand::Open)
            } else {
                Reconciliation::keep(MotionState::Idle)
            }
        }
        MotionState::Closing => {
            if wants_close {
                Reconciliation::keep(MotionState::Closing)
            } else if wants_open {
                Reconciliation::go(MotionState::Opening, RemoteCommand::Open)
            } else {
                // already there while the motor is still running
                Reconciliation::go(MotionState::Idle, RemoteCommand::Stop)
            }
        }
        MotionState::Opening => {
            if wants_open {
                Reconciliation::keep(MotionState::Opening)
            } else if wants_close {
                Reconciliation::go(MotionState::Closing, RemoteCommand::Close)
            } else {
                Reconciliation::go(MotionState::Idle, RemoteCommand::Stop)
            }
        }
    }
}

/// Apply `new_target` to `state` and return the command to send.
///
/// The target is always updated, whatever the outcome.
pub fn apply(state: &mut ShutterState, new_target: f64) -> Option<RemoteCommand> {
    let r = reconcile(state, new_target);
    state.target_position = new_target;
    state.motion = r.motion;
    r.command
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn st(current: f64, motion: MotionState) -> ShutterState {
        ShutterState {
            current_position: current,
            target_position: current,
            motion,
        }
    }

    #[rstest]
    #[case(MotionState::Idle, 50.0, 20.0, MotionState::Closing, Some(RemoteCommand::Close))]
    #[case(MotionState::Idle, 50.0, 80.0, MotionState::Opening, Some(RemoteCommand::Open))]
    #[case(MotionState::Idle, 50.0, 50.0, MotionState::Idle, None)]
    #[case(MotionState::Closing, 50.0, 20.0, MotionState::Closing, None)]
    #[case(MotionState::Closing, 50.0, 80.0, MotionState::Opening, Some(RemoteCommand::Open))]
    #[case(MotionState::Closing, 50.0, 50.0, MotionState::Idle, Some(RemoteCommand::Stop))]
    #[case(MotionState::Opening, 50.0, 80.0, MotionState::Opening, None)]
    #[case(MotionState::Opening, 50.0, 20.0, MotionState::Closing, Some(RemoteCommand::Close))]
    #[case(MotionState::Opening, 50.0, 50.0, MotionState::Idle, Some(RemoteCommand::Stop))]
    fn transition_table(
        #[case] motion: MotionState,
        #[case] current: f64,
        #[case] target: f64,
        #[case] expect_motion: MotionState,
        #[case] expect_cmd: Option<RemoteCommand>,
    ) {
        let r = reconcile(&st(current, motion), target);
        assert_eq!(r.motion, expect_motion);
        assert_eq!(r.command, expect_cmd);
    }

    #[test]
    fn apply_always_updates_target() {
        let mut s = st(40.0, MotionState::Closing);
        s.target_position = 10.0;
        let cmd = apply(&mut s, 5.0);
        assert_eq!(cmd, None);
        assert_eq!(s.target_position, 5.0);
        assert_eq!(s.motion, MotionState::Closing);
        assert_eq!(s.current_position, 40.0);
    }
}
