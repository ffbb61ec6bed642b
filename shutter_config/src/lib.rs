#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the roller shutter simulator.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Travel durations accept both snake_case keys and the camelCase keys
//!   used by existing accessory configs (`openDurationMs`, ...).
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Longest travel duration we accept for any phase (10 minutes).
pub const MAX_DURATION_MS: u64 = 10 * 60 * 1000;

#[derive(Debug, Deserialize, Clone)]
pub struct ShutterCfg {
    /// Display label
    pub name: String,
    /// Stable identifier, used as the persistence key
    pub id: String,
    /// Time to travel 0 -> 100
    #[serde(alias = "openDurationMs")]
    pub open_duration_ms: u64,
    /// Time to travel 100 -> 0
    #[serde(alias = "closeDurationMs")]
    pub close_duration_ms: u64,
    /// Time to travel the last 1% at the closed end (lock/unlock phase)
    #[serde(alias = "lockingDurationMs")]
    pub locking_duration_ms: u64,
    /// Expose the "Prog" pairing button
    #[serde(default)]
    pub prog: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Storage {
    /// Directory holding one JSON record per shutter id
    pub dir: PathBuf,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("var/shutter"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Commands and writes run on worker threads
    #[default]
    Background,
    /// Commands and writes run on the caller's thread after the state lock is released
    Inline,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct RunnerCfg {
    pub dispatch: DispatchMode,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub shutter: ShutterCfg,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub runner: RunnerCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("invalid configuration: {}", e))?;
    cfg.validate()?;
    Ok(cfg)
}

fn check_duration(key: &str, ms: u64) -> eyre::Result<()> {
    if ms == 0 {
        eyre::bail!("shutter.{key} must be > 0");
    }
    if ms > MAX_DURATION_MS {
        eyre::bail!("shutter.{key} is unreasonably large (>10min)");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Shutter
        if self.shutter.name.trim().is_empty() {
            eyre::bail!("shutter.name must not be empty");
        }
        if self.shutter.id.trim().is_empty() {
            eyre::bail!("shutter.id must not be empty");
        }
        check_duration("open_duration_ms", self.shutter.open_duration_ms)?;
        check_duration("close_duration_ms", self.shutter.close_duration_ms)?;
        check_duration("locking_duration_ms", self.shutter.locking_duration_ms)?;

        // Storage
        if self.storage.dir.as_os_str().is_empty() {
            eyre::bail!("storage.dir must not be empty");
        }

        // Logging
        if let Some(level) = self.logging.level.as_deref()
            && !matches!(
                level.to_ascii_lowercase().as_str(),
                "error" | "warn" | "info" | "debug" | "trace"
            )
        {
            eyre::bail!("logging.level must be one of error|warn|info|debug|trace");
        }
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        // Runner: no extra validation; serde restricts to known modes

        Ok(())
    }
}
