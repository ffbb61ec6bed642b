//! Human-readable error descriptions and structured JSON error formatting.

use shutter_core::error::{BuildError, ShutterError};

/// Map an `eyre::Report` to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return format!(
            "What happened: The shutter could not be assembled ({be}).\nLikely causes: A required part was not wired into the builder.\nHow to fix: This is a bug in the caller; re-run with --log-level=debug and report it."
        );
    }

    if let Some(se) = err.downcast_ref::<ShutterError>() {
        return match se {
            ShutterError::InvalidTarget(v) => format!(
                "What happened: Target {v} is not a valid position.\nLikely causes: The value is outside 0..=100 or not a number.\nHow to fix: Use a percentage between 0 (closed) and 100 (open)."
            ),
            ShutterError::PairUnavailable => "What happened: The pairing button is not available.\nLikely causes: shutter.prog is false in the config.\nHow to fix: Set prog = true under [shutter] and restart.".to_string(),
            ShutterError::Store(msg) => format!(
                "What happened: The persisted target could not be read ({msg}).\nLikely causes: A corrupt record, an out-of-range value, or missing permissions on the storage directory.\nHow to fix: Inspect or delete the record under storage.dir, then rerun."
            ),
            ShutterError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
            ShutterError::State(msg) => format!(
                "What happened: {msg}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read.\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass --config <FILE> pointing at a readable TOML file. Original: {msg}"
        );
    }

    if lower.contains("invalid configuration")
        || lower.starts_with("shutter.")
        || lower.starts_with("storage.")
        || lower.starts_with("logging.")
    {
        return format!(
            "What happened: Configuration is invalid or incomplete ({msg}).\nLikely causes: Missing [shutter] keys (name, id, open/close/locking durations) or out-of-range values.\nHow to fix: Edit the TOML config and try again."
        );
    }

    if lower.contains("storage dir") {
        return format!(
            "What happened: The storage directory is not usable ({msg}).\nLikely causes: The path points at a file or the process lacks write permission.\nHow to fix: Fix storage.dir in the config or its permissions."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Bad input and bad configuration exit with 2, everything else with 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<ConfigProblem>().is_some() {
        return 2;
    }
    match err.downcast_ref::<ShutterError>() {
        Some(ShutterError::Config(_) | ShutterError::InvalidTarget(_)) => 2,
        _ => 1,
    }
}

/// Marker for errors raised while loading or validating the config file.
#[derive(Debug)]
pub struct ConfigProblem(pub eyre::Report);

impl std::fmt::Display for ConfigProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConfigProblem {}

/// Stable machine-readable name for the JSON `reason` field.
fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<ConfigProblem>().is_some() {
        return "Config";
    }
    match err.downcast_ref::<ShutterError>() {
        Some(ShutterError::Config(_)) => "Config",
        Some(ShutterError::InvalidTarget(_)) => "InvalidTarget",
        Some(ShutterError::Store(_)) => "Store",
        Some(ShutterError::PairUnavailable) => "PairUnavailable",
        Some(ShutterError::State(_)) => "State",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_target_is_a_usage_error() {
        let err = eyre::Report::new(ShutterError::InvalidTarget(140.0));
        assert_eq!(exit_code_for_error(&err), 2);
        assert!(humanize(&err).contains("between 0 (closed) and 100 (open)"));
    }

    #[test]
    fn store_error_is_a_runtime_error() {
        let err = eyre::Report::new(ShutterError::Store("parse x.json".into()));
        assert_eq!(exit_code_for_error(&err), 1);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Store");
    }

    #[test]
    fn config_problem_keeps_message_and_code() {
        let err = eyre::Report::new(ConfigProblem(eyre::eyre!("shutter.id must not be empty")));
        assert_eq!(exit_code_for_error(&err), 2);
        assert!(humanize(&err).contains("shutter.id must not be empty"));
    }
}
