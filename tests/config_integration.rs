//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use objsim::config::SimConfig;
use objsim_run::RendererKind;
use serial_test::serial;

#[test]
#[serial]
fn test_default_file_is_loaded() {
    std::env::remove_var("OBJSIM_SCHEDULER__TICK_MS");

    let config = SimConfig::load_from("config").unwrap();
    assert!(config.scheduler.stop_when_empty, "default.toml enables stop_when_empty");
    assert!(config.renderers.pipeline.contains(&RendererKind::Rule));
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("OBJSIM_SCHEDULER__TICK_MS", "20");
    let config = SimConfig::load_from("config").unwrap();
    assert_eq!(config.scheduler.tick_ms, 20);
    assert_eq!(config.scheduler_config().tick_ms, 20);
    std::env::remove_var("OBJSIM_SCHEDULER__TICK_MS");
}

#[test]
#[serial]
fn test_invalid_env_value_is_rejected() {
    std::env::set_var("OBJSIM_SCHEDULER__TICK_MS", "0");
    let result = SimConfig::load_from("config");
    std::env::remove_var("OBJSIM_SCHEDULER__TICK_MS");

    let err = result.unwrap_err();
    assert!(err.to_string().contains("tick_ms"));
}

#[test]
#[serial]
fn test_missing_directory_falls_back_to_defaults() {
    std::env::remove_var("OBJSIM_SCHEDULER__TICK_MS");

    let config = SimConfig::load_from("does/not/exist").unwrap();
    assert_eq!(config.scheduler.tick_ms, 50);
    assert_eq!(config.pipeline().len(), RendererKind::DEFAULTS.len());
}
