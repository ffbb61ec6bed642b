#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Roller shutter simulation core (hardware-agnostic).
//!
//! The shutter motor is driven by a one-way RF remote and never reports its
//! position, so this crate simulates it. All outside interactions go through
//! `shutter_traits::CommandPort` and `shutter_traits::TargetStore`.
//!
//! ## Architecture
//!
//! - **Estimator**: open-loop position step per tick (`estimator` module)
//! - **Reconciler**: motion state and RF command for a new target (`reconciler`)
//! - **Core**: the state machine tying both together (`ShutterCore`)
//! - **Controller**: thread-safe owner, effect application (`ShutterController`)
//! - **Ticker**: fixed-rate driver thread (`ticker`)
//! - **Persistence**: startup load and background writes (`persist`, `store`)
//! - **Host**: snapshots published after each change (`host`)

pub mod builder;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod dispatch;
pub mod error;
pub mod estimator;
pub mod host;
pub mod machine;
pub mod mocks;
pub mod persist;
pub mod reconciler;
pub mod state;
pub mod store;
pub mod ticker;
pub mod util;

pub use builder::ShutterControllerBuilder;
pub use config::{DispatchMode, ShutterConfig};
pub use controller::ShutterController;
pub use error::{BuildError, ShutterError};
pub use host::{ChannelSink, NullSink, PositionState, ShutterSnapshot, StatusSink};
pub use machine::{Effects, ShutterCore};
pub use persist::{PersistError, TargetWriter, load_or_default};
pub use state::{MotionState, ShutterState};
pub use store::FileTargetStore;
pub use ticker::Ticker;

pub use shutter_traits::{
    Clock, CommandPort, ManualClock, MonotonicClock, RemoteCommand, TargetStore,
};
