use std::time::{Duration, Instant};

use shutter_core::mocks::{MemoryStore, RecordingPort};
use shutter_core::{
    MonotonicClock, MotionState, RemoteCommand, ShutterConfig, ShutterController, Ticker,
};

#[test]
fn ticker_drives_shutter_to_target() {
    let port = RecordingPort::new();
    // 1s full travel, 10 ticks for 100%
    let ctl = ShutterController::builder()
        .with_config(ShutterConfig::new("fast", 1_000, 1_000, 100))
        .with_port(port.clone())
        .with_store(MemoryStore::new())
        .build()
        .expect("build");
    let ticker = Ticker::spawn(ctl.clone(), MonotonicClock::new());

    ctl.set_target_position(50.0).expect("valid");
    let deadline = Instant::now() + Duration::from_secs(5);
    while ctl.motion() != MotionState::Idle {
        assert!(Instant::now() < deadline, "ticker did not converge: {ctl:?}");
        std::thread::sleep(Duration::from_millis(20));
    }
    assert_eq!(ctl.current_position(), 50.0);
    assert!(ticker.ticks() >= 5);
    drop(ticker);
    drop(ctl);

    assert_eq!(port.commands(), vec![RemoteCommand::Close, RemoteCommand::Stop]);
}

#[test]
fn dropping_ticker_stops_ticking() {
    let ctl = ShutterController::builder()
        .with_config(ShutterConfig::new("slow", 60_000, 60_000, 5_000))
        .with_port(RecordingPort::new())
        .with_store(MemoryStore::new())
        .build()
        .expect("build");
    ctl.set_target_position(0.0).expect("valid");

    let ticker = Ticker::spawn(ctl.clone(), MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(250));
    drop(ticker);

    let frozen = ctl.current_position();
    assert!(frozen < 100.0);
    std::thread::sleep(Duration::from_millis(250));
    assert_eq!(ctl.current_position(), frozen);
    assert_eq!(ctl.motion(), MotionState::Closing);
}
