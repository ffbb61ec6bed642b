use rstest::rstest;
use shutter_config::{DispatchMode, load_file, load_toml};
use std::fs;
use tempfile::tempdir;

fn shutter_toml(open: u64, close: u64, locking: u64) -> String {
    format!(
        r#"
[shutter]
name = "Living room"
id = "living-room"
open_duration_ms = {open}
close_duration_ms = {close}
locking_duration_ms = {locking}

[storage]
dir = "var/state"

[runner]
dispatch = "inline"

[logging]
level = "debug"
rotation = "daily"
"#
    )
}

#[test]
fn accepts_full_config() {
    let cfg = load_toml(&shutter_toml(20000, 18000, 2000)).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.runner.dispatch, DispatchMode::Inline);
    assert_eq!(cfg.logging.level.as_deref(), Some("debug"));
}

#[rstest]
#[case(0, 18000, 2000, "open_duration_ms must be > 0")]
#[case(20000, 0, 2000, "close_duration_ms must be > 0")]
#[case(20000, 18000, 0, "locking_duration_ms must be > 0")]
#[case(20000, 18000, 3_600_000, "locking_duration_ms is unreasonably large")]
fn rejects_bad_durations(
    #[case] open: u64,
    #[case] close: u64,
    #[case] locking: u64,
    #[case] needle: &str,
) {
    let cfg = load_toml(&shutter_toml(open, close, locking)).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject duration");
    assert!(
        format!("{err}").contains(needle),
        "unexpected error: {err}"
    );
}

#[test]
fn missing_id_fails_to_parse() {
    let toml = r#"
[shutter]
name = "Living room"
open_duration_ms = 20000
close_duration_ms = 18000
locking_duration_ms = 2000
"#;
    let err = load_toml(toml).expect_err("id is required");
    assert!(format!("{err}").contains("id"));
}

#[test]
fn missing_locking_duration_fails_to_parse() {
    let toml = r#"
[shutter]
name = "Living room"
id = "living-room"
open_duration_ms = 20000
close_duration_ms = 18000
"#;
    assert!(load_toml(toml).is_err());
}

#[test]
fn blank_id_is_rejected() {
    let toml = r#"
[shutter]
name = "Living room"
id = "   "
open_duration_ms = 20000
close_duration_ms = 18000
locking_duration_ms = 2000
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("blank id");
    assert!(format!("{err}").contains("shutter.id must not be empty"));
}

#[test]
fn unknown_rotation_is_rejected() {
    let toml = shutter_toml(20000, 18000, 2000).replace("\"daily\"", "\"weekly\"");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("weekly rotation");
    assert!(format!("{err}").contains("logging.rotation"));
}

#[test]
fn unknown_dispatch_mode_fails_to_parse() {
    let toml = shutter_toml(20000, 18000, 2000).replace("\"inline\"", "\"threaded\"");
    assert!(load_toml(&toml).is_err());
}

#[test]
fn load_file_parses_and_validates() {
    let dir = tempdir().expect("tempdir");
    let good = dir.path().join("good.toml");
    fs::write(&good, shutter_toml(20000, 18000, 2000)).expect("write");
    let cfg = load_file(&good).expect("load");
    assert_eq!(cfg.shutter.id, "living-room");

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, shutter_toml(0, 18000, 2000)).expect("write");
    assert!(load_file(&bad).is_err());

    let missing = dir.path().join("missing.toml");
    let err = load_file(&missing).expect_err("missing file");
    assert!(format!("{err}").contains("read config"));
}

#[test]
fn sample_config_in_repo_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../etc/shutter.toml");
    let cfg = load_file(&path).expect("sample config loads");
    assert_eq!(cfg.runner.dispatch, DispatchMode::Background);
    assert!(!cfg.shutter.prog);
}
