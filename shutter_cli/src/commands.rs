//! One-shot subcommands: `set`, `status`, `self-check`.

use shutter_core::error::ShutterError;
use shutter_core::estimator::ticks_to_converge;
use shutter_core::util::{TICK, TICK_MS};
use shutter_core::{
    DispatchMode, FileTargetStore, ManualClock, MotionState, ShutterConfig, ShutterController,
    ShutterSnapshot, ShutterState, load_or_default,
};
use shutter_traits::RemoteCommand;

use crate::output::render;
use crate::remote::SimulatedRemote;

/// Result of a simulated move.
#[derive(Debug)]
pub struct SetOutcome {
    pub snapshot: ShutterSnapshot,
    pub commands: Vec<RemoteCommand>,
    pub ticks: u64,
}

/// Move the persisted shutter to `target` on a manual clock (no sleeping).
pub fn simulate_set(
    config: ShutterConfig,
    store: FileTargetStore,
    target: f64,
) -> eyre::Result<SetOutcome> {
    let remote = SimulatedRemote::new(config.name.clone());
    let clock = ManualClock::new();
    let controller = ShutterController::builder()
        .with_config(config.clone())
        .with_port(remote.clone())
        .with_store(store)
        .with_clock(clock.clone())
        .with_dispatch(DispatchMode::Inline)
        .build()?;

    controller.set_target_position(target)?;
    let budget = ticks_to_converge(&controller.state(), &config, TICK) + 1;
    let mut ticks = 0u64;
    while controller.motion() != MotionState::Idle {
        if ticks >= budget {
            return Err(ShutterError::State(format!(
                "no convergence after {ticks} ticks (current {:.2})",
                controller.current_position()
            ))
            .into());
        }
        clock.advance(TICK);
        controller.tick();
        ticks += 1;
    }

    if let Ok(e) = controller.persist_errors().try_recv() {
        tracing::warn!(id = %e.id, error = %e.message, "target not persisted");
    }

    Ok(SetOutcome {
        snapshot: controller.snapshot(),
        commands: remote.presses(),
        ticks,
    })
}

pub fn set(config: ShutterConfig, cfg: &shutter_config::Config, target: f64, json: bool) -> eyre::Result<()> {
    let store = FileTargetStore::open(&cfg.storage.dir)?;
    let out = simulate_set(config, store, target)?;
    if json {
        let commands: Vec<&str> = out.commands.iter().map(|c| c.as_str()).collect();
        println!(
            "{}",
            serde_json::json!({
                "snapshot": out.snapshot,
                "commands": commands,
                "ticks": out.ticks,
                "simulated_ms": out.ticks * TICK_MS,
            })
        );
    } else {
        let buttons: Vec<&str> = out.commands.iter().map(|c| c.button()).collect();
        println!("{}", render(&out.snapshot, false));
        if buttons.is_empty() {
            println!("commands: none");
        } else {
            println!("commands: {}", buttons.join(", "));
        }
        #[allow(clippy::cast_precision_loss)]
        let secs = (out.ticks * TICK_MS) as f64 / 1000.0;
        println!("settled after {} ticks ({secs:.1}s simulated)", out.ticks);
    }
    Ok(())
}

pub fn status(config: &ShutterConfig, cfg: &shutter_config::Config, json: bool) -> eyre::Result<()> {
    let store = FileTargetStore::open(&cfg.storage.dir)?;
    let target = load_or_default(&store, &config.id)?;
    let pair_on = config.has_prog_button.then_some(false);
    let snap = ShutterSnapshot::new(
        &config.id,
        &config.name,
        &ShutterState::settled_at(target),
        pair_on,
    );
    println!("{}", render(&snap, json));
    Ok(())
}

pub fn self_check(config: &ShutterConfig, cfg: &shutter_config::Config, json: bool) -> eyre::Result<()> {
    config.validate().map_err(ShutterError::from)?;
    let store = FileTargetStore::open(&cfg.storage.dir)?;

    // Probe writability without touching the shutter's record
    let probe = store.dir().join(".self-check");
    std::fs::write(&probe, b"ok")
        .map_err(|e| eyre::eyre!("storage dir {} is not writable: {e}", store.dir().display()))?;
    let _ = std::fs::remove_file(&probe);

    let record = store.record_path(&config.id);
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "id": config.id,
                "storage": store.dir().display().to_string(),
                "record_exists": record.exists(),
            })
        );
    } else {
        println!("OK: {} ({}) storage {}", config.name, config.id, store.dir().display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_set_reports_commands_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTargetStore::open(tmp.path()).unwrap();
        let config = ShutterConfig::new("t", 20_000, 18_000, 2_000);

        let out = simulate_set(config.clone(), store.clone(), 40.0).unwrap();
        assert_eq!(out.commands, vec![RemoteCommand::Close, RemoteCommand::Stop]);
        assert_eq!(out.snapshot.current_position, 40);
        // 60% at 100/18000 %/ms in 100 ms ticks
        assert!((108..=109).contains(&out.ticks), "ticks = {}", out.ticks);

        // second run starts from the persisted target
        let out = simulate_set(config, store, 100.0).unwrap();
        assert_eq!(out.commands, vec![RemoteCommand::Open]);
        assert_eq!(out.snapshot.current_position, 100);
    }
}
