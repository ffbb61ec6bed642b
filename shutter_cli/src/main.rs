#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! `shutterd`: roller shutter simulator driven over stdin or one-shot commands.

mod cli;
mod commands;
mod error_fmt;
mod logging;
mod output;
mod remote;
mod run;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use shutter_core::ShutterConfig;

use crate::cli::{Cli, Commands, JSON_MODE, json_mode};
use crate::error_fmt::{ConfigProblem, exit_code_for_error, format_error_json, humanize};

fn report(err: &eyre::Report) -> i32 {
    if json_mode() {
        eprintln!("{}", format_error_json(err));
    } else {
        eprintln!("{}", humanize(err));
    }
    exit_code_for_error(err)
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let cfg = shutter_config::load_file(&cli.config)
        .map_err(|e| eyre::Report::new(ConfigProblem(e)))?;

    let level = cli
        .log_level
        .as_deref()
        .or(cfg.logging.level.as_deref())
        .unwrap_or("info");
    logging::init(cli.json, level, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    let config = ShutterConfig::from(&cfg.shutter);
    match cli.cmd {
        Commands::Run { ephemeral } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                tracing::warn!(error = %e, "could not install Ctrl-C handler");
            }
            run::run(config, &cfg, ephemeral, cli.json, &shutdown)
        }
        Commands::Set { target } => commands::set(config, &cfg, target, cli.json),
        Commands::Status => commands::status(&config, &cfg, cli.json),
        Commands::SelfCheck => commands::self_check(&config, &cfg, cli.json),
    }
}

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = real_main(cli) {
        tracing::error!(error = %err, "command failed");
        std::process::exit(report(&err));
    }
}
