//! Simulated shutter state.

/// Lowest position (fully closed).
pub const CLOSED: f64 = 0.0;
/// Highest position (fully open).
pub const OPEN: f64 = 100.0;

/// Believed direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Idle,
    Opening,
    Closing,
}

impl MotionState {
    pub fn is_moving(self) -> bool {
        !matches!(self, MotionState::Idle)
    }
}

/// Mutable state of one shutter. Positions are percentages, 100 = open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShutterState {
    pub current_position: f64,
    pub target_position: f64,
    pub motion: MotionState,
}

impl ShutterState {
    /// State of a shutter assumed to have settled at `target`.
    pub fn settled_at(target: f64) -> Self {
        let p = target.clamp(CLOSED, OPEN);
        Self {
            current_position: p,
            target_position: p,
            motion: MotionState::Idle,
        }
    }

    pub fn at_target(&self) -> bool {
        self.current_position == self.target_position
    }
}

impl Default for ShutterState {
    fn default() -> Self {
        Self::settled_at(OPEN)
    }
}

/// True for a finite value inside `0..=100`.
#[inline]
pub fn is_valid_position(p: f64) -> bool {
    p.is_finite() && (CLOSED..=OPEN).contains(&p)
}

/// True for the hard endpoints where the motor stops by itself.
#[inline]
pub fn is_endpoint(p: f64) -> bool {
    p == CLOSED || p == OPEN
}
