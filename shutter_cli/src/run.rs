//! `run`: controller + ticker driven by host requests on stdin.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{self as xch, RecvTimeoutError};
use shutter_core::mocks::MemoryStore;
use shutter_core::persist::SharedStore;
use shutter_core::{
    DispatchMode, FileTargetStore, MonotonicClock, ShutterConfig, ShutterController, Ticker,
};

use crate::output::{ConsoleSink, render};
use crate::remote::SimulatedRemote;

/// One line of host input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    Target(f64),
    Pair,
    Status,
    Quit,
}

pub fn parse_request(line: &str) -> Result<Request, String> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    let req = match verb.as_str() {
        "target" => {
            let raw = parts
                .next()
                .ok_or_else(|| "usage: target <0-100>".to_string())?;
            let v = raw
                .parse::<f64>()
                .map_err(|_| format!("not a number: {raw:?}"))?;
            Request::Target(v)
        }
        "pair" => Request::Pair,
        "status" => Request::Status,
        "quit" | "exit" => Request::Quit,
        "" => return Err("empty request".into()),
        other => return Err(format!("unknown request {other:?} (target|pair|status|quit)")),
    };
    if parts.next().is_some() {
        return Err(format!("trailing input in {line:?}"));
    }
    Ok(req)
}

fn spawn_stdin_reader() -> xch::Receiver<String> {
    let (tx, rx) = xch::unbounded();
    let spawned = std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
            tracing::debug!("stdin closed");
        });
    if let Err(e) = spawned {
        tracing::error!(error = %e, "failed to spawn stdin reader; no requests will be read");
    }
    rx
}

pub fn run(
    config: ShutterConfig,
    cfg: &shutter_config::Config,
    ephemeral: bool,
    json: bool,
    shutdown: &Arc<AtomicBool>,
) -> eyre::Result<()> {
    let store: SharedStore = if ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileTargetStore::open(&cfg.storage.dir)?)
    };
    let mode: DispatchMode = cfg.runner.dispatch.into();

    let controller = ShutterController::builder()
        .with_config(config)
        .with_port(SimulatedRemote::new(&cfg.shutter.name))
        .with_shared_store(store)
        .with_sink(ConsoleSink::new(json))
        .with_dispatch(mode)
        .build()?;
    let ticker = Ticker::spawn(controller.clone(), MonotonicClock::new());
    let persist_errors = controller.persist_errors();
    let requests = spawn_stdin_reader();

    tracing::info!(id = %cfg.shutter.id, ephemeral, "shutter running; waiting for requests");

    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("shutdown requested");
            break;
        }
        for e in persist_errors.try_iter() {
            eprintln!("warning: target {} for {} not saved: {}", e.target, e.id, e.message);
        }
        let line = match requests.recv_timeout(Duration::from_millis(100)) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_request(&line) {
            Ok(Request::Quit) => break,
            Ok(Request::Status) => println!("{}", render(&controller.snapshot(), json)),
            Ok(Request::Pair) => {
                if let Err(e) = controller.trigger_pair() {
                    eprintln!("error: {e}");
                }
            }
            Ok(Request::Target(v)) => {
                if let Err(e) = controller.set_target_position(v) {
                    eprintln!("error: {e}");
                }
            }
            Err(msg) => eprintln!("error: {msg}"),
        }
    }

    drop(ticker);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("target 42", Ok(Request::Target(42.0)))]
    #[case("  TARGET   7.5 ", Ok(Request::Target(7.5)))]
    #[case("pair", Ok(Request::Pair))]
    #[case("status", Ok(Request::Status))]
    #[case("quit", Ok(Request::Quit))]
    fn parses_requests(#[case] line: &str, #[case] expected: Result<Request, String>) {
        assert_eq!(parse_request(line), expected);
    }

    #[rstest]
    #[case("target")]
    #[case("target abc")]
    #[case("target 1 2")]
    #[case("open")]
    fn rejects_malformed_requests(#[case] line: &str) {
        assert!(parse_request(line).is_err());
    }
}
