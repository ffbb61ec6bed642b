#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use shutter_core::state::is_endpoint;
use shutter_core::util::TICK;
use shutter_core::{MotionState, RemoteCommand, ShutterConfig, ShutterCore};

#[derive(Debug, Arbitrary)]
enum Op {
    Target(f64),
    Ticks(u8),
    Pair,
}

#[derive(Debug, Arbitrary)]
struct Input {
    open_ms: u16,
    close_ms: u16,
    locking_ms: u16,
    start: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let config = ShutterConfig::new(
        "fuzz",
        u64::from(input.open_ms.max(1)),
        u64::from(input.close_ms.max(1)),
        u64::from(input.locking_ms.max(1)),
    )
    .with_prog_button(true);
    let mut core = ShutterCore::new(config, f64::from(input.start.min(100)));
    let now = std::time::Instant::now();

    for op in input.ops {
        match op {
            Op::Target(t) => {
                let before = *core.state();
                match core.set_target(t) {
                    Ok(fx) => assert_eq!(fx.save, Some(t)),
                    Err(_) => assert_eq!(*core.state(), before),
                }
            }
            Op::Ticks(n) => {
                for _ in 0..n {
                    let fx = core.tick(TICK, now);
                    let s = core.state();
                    assert!((0.0..=100.0).contains(&s.current_position));
                    if fx.command == Some(RemoteCommand::Stop) {
                        assert_eq!(s.motion, MotionState::Idle);
                        assert!(!is_endpoint(s.target_position));
                    }
                }
            }
            Op::Pair => {
                let fx = core.trigger_pair(now);
                assert!(fx.is_ok());
            }
        }
        let s = core.state();
        if s.current_position == s.target_position {
            assert!(!s.motion.is_moving());
        }
    }
});
