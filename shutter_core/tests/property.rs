use proptest::prelude::*;
use shutter_core::mocks::{MemoryStore, RecordingPort};
use shutter_core::{
    DispatchMode, MotionState, RemoteCommand, ShutterConfig, ShutterController,
};

fn controller(config: ShutterConfig, start: f64) -> (ShutterController, RecordingPort) {
    let port = RecordingPort::new();
    let store = MemoryStore::new();
    store.insert(&config.id, start);
    let ctl = ShutterController::builder()
        .with_config(config)
        .with_port(port.clone())
        .with_store(store)
        .with_dispatch(DispatchMode::Inline)
        .build()
        .expect("build");
    (ctl, port)
}

fn durations() -> impl Strategy<Value = (u64, u64, u64)> {
    (1_000u64..60_000, 1_000u64..60_000, 200u64..5_000)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    // Any valid target is reached exactly, after which the shutter is idle.
    #[test]
    fn converges_to_any_target(
        start in 0.0f64..=100.0,
        target in 0.0f64..=100.0,
        (open, close, lock) in durations(),
    ) {
        let (ctl, port) = controller(ShutterConfig::new("p", open, close, lock), start);
        ctl.set_target_position(target).expect("valid target");

        let mut ticks = 0u32;
        while ctl.motion() != MotionState::Idle {
            let before = ctl.current_position();
            ctl.tick();
            let after = ctl.current_position();
            prop_assert!((0.0..=100.0).contains(&after));
            // never moves away from the target
            prop_assert!((after - target).abs() <= (before - target).abs());
            ticks += 1;
            prop_assert!(ticks < 20_000);
        }
        prop_assert_eq!(ctl.current_position(), target);

        let stops = port.count(RemoteCommand::Stop);
        let expected = usize::from(start != target && target != 0.0 && target != 100.0);
        prop_assert_eq!(stops, expected);
    }

    // Each request emits at most one command, and a command always agrees
    // with the direction the shutter now moves in.
    #[test]
    fn one_command_per_request(
        targets in prop::collection::vec((0.0f64..=100.0, 0usize..40), 1..8),
    ) {
        let (ctl, port) = controller(ShutterConfig::new("p", 20_000, 18_000, 2_000), 100.0);
        for (target, ticks) in targets {
            let sent_before = port.commands().len();
            let cmd = ctl.set_target_position(target).expect("valid target");
            prop_assert!(port.commands().len() - sent_before <= 1);
            match (cmd, ctl.motion()) {
                (Some(RemoteCommand::Open), m) => prop_assert_eq!(m, MotionState::Opening),
                (Some(RemoteCommand::Close), m) => prop_assert_eq!(m, MotionState::Closing),
                (Some(RemoteCommand::Stop), m) => prop_assert_eq!(m, MotionState::Idle),
                (Some(RemoteCommand::Pair), _) => prop_assert!(false, "pair from target request"),
                (None, _) => {}
            }
            prop_assert_eq!(ctl.target_position(), target);
            for _ in 0..ticks {
                ctl.tick();
            }
        }
    }
}
