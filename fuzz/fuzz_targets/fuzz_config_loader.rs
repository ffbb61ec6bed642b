#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse errors and validation errors are fine; panics are not.
    if let Ok(cfg) = toml::from_str::<shutter_config::Config>(data)
        && cfg.validate().is_ok()
    {
        // a valid file must map onto a buildable engine config
        let core: shutter_core::ShutterConfig = (&cfg.shutter).into();
        assert!(core.validate().is_ok());
    }
});
