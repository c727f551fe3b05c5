//! Config Validation Tests
//!
//! Exercise the TOML loading path end to end: typo detection, range checks,
//! and file-based loading, independently from the generator.

use iot_failure_sim::config::validation::{
    known_config_keys, suggest_correction, validate_ranges, validate_unknown_keys,
};
use iot_failure_sim::config::{ConfigError, SimConfig};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_anomaly_section_warns_with_suggestion() {
    let toml_str = r#"
[anomaly]
windw_max = 40
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("windw_max"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("anomaly.window_max"),
        "Should suggest the correct spelling"
    );
}

#[test]
fn typo_in_channel_name_warns() {
    let toml_str = r#"
[channels.temprature]
base = 30.0
std_dev = 1.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings
        .iter()
        .any(|w| w.suggestion.as_deref() == Some("channels.temperature")));
}

#[test]
fn full_config_produces_zero_warnings() {
    let toml_str = r#"
[dataset]
n_samples = 10000
failure_rate = 0.02
origin = "2025-03-01T00:00:00"
seed = 42

[noise]
level = 0.1
temperature_scale = 2.0
vibration_scale = 0.1
rotation_scale = 10.0

[channels.temperature]
base = 25.0
std_dev = 2.0

[channels.vibration]
base = 0.1
std_dev = 0.05

[channels.rotation_speed]
base = 1500.0
std_dev = 50.0

[anomaly]
window_min = 10
window_max = 50
temperature_peak_min = 15.0
temperature_peak_max = 30.0
vibration_peak_min = 0.2
vibration_peak_max = 0.5
rotation_std_dev = 200.0

[output]
path = "out.csv"
head_rows = 5
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "Unexpected warnings: {warnings:?}");

    let config = SimConfig::from_toml_str(toml_str).expect("valid config");
    assert_eq!(config.dataset.n_samples, 10_000);
    assert_eq!(config.dataset.seed, Some(42));
    assert_eq!(config.failure_count(), 200);
}

#[test]
fn unknown_keys_do_not_fail_loading() {
    let config = SimConfig::from_toml_str("[dataset]\nn_samples = 10\ncolour = \"red\"\n")
        .expect("unknown keys are warnings only");
    assert_eq!(config.dataset.n_samples, 10);
}

#[test]
fn known_keys_suggest_themselves() {
    let known = known_config_keys();
    for key in &known {
        assert_eq!(suggest_correction(key, &known).as_deref(), Some(*key));
    }
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn negative_noise_level_rejected() {
    let err = SimConfig::from_toml_str("[noise]\nlevel = -0.1\n").unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert!(errors.iter().any(|e| e.contains("noise.level")));
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn zero_window_min_rejected() {
    let err = SimConfig::from_toml_str("[anomaly]\nwindow_min = 0\n").unwrap_err();
    assert!(err.to_string().contains("window_min"));
}

#[test]
fn multiple_errors_reported_together() {
    let mut config = SimConfig::default();
    config.dataset.failure_rate = -0.5;
    config.channels.temperature.std_dev = f64::INFINITY;
    let errors = validate_ranges(&config);
    assert_eq!(errors.len(), 2, "got: {errors:?}");
}

// ============================================================================
// File Loading
// ============================================================================

#[test]
fn load_from_file_reads_toml() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let path = dir.path().join("sim_config.toml");
    std::fs::write(&path, "[dataset]\nn_samples = 123\n").expect("write");

    let config = SimConfig::load_from_file(&path).expect("load");
    assert_eq!(config.dataset.n_samples, 123);
}

#[test]
fn load_from_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let err = SimConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn parse_error_names_the_file() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[dataset]\nn_samples = \"many\"\n").expect("write");

    let err = SimConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

// ============================================================================
// Search Order
// ============================================================================

#[test]
fn no_config_files_uses_defaults() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let config = SimConfig::load_from(None, &dir.path().join("sim_config.toml")).expect("load");
    assert_eq!(config, SimConfig::default());
}

#[test]
fn env_path_takes_precedence_over_local_file() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let env = dir.path().join("env.toml");
    let local = dir.path().join("sim_config.toml");
    std::fs::write(&env, "[dataset]\nn_samples = 11\n").expect("write");
    std::fs::write(&local, "[dataset]\nn_samples = 22\n").expect("write");

    let config = SimConfig::load_from(Some(env), &local).expect("load");
    assert_eq!(config.dataset.n_samples, 11);
}

#[test]
fn missing_env_path_falls_back_to_local_file() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let local = dir.path().join("sim_config.toml");
    std::fs::write(&local, "[dataset]\nn_samples = 22\n").expect("write");

    let config =
        SimConfig::load_from(Some(dir.path().join("absent.toml")), &local).expect("load");
    assert_eq!(config.dataset.n_samples, 22);
}

#[test]
fn invalid_env_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let env = dir.path().join("env.toml");
    std::fs::write(&env, "[noise]\nlevel = -1.0\n").expect("write");

    let err = SimConfig::load_from(Some(env), &dir.path().join("sim_config.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn broken_local_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let local = dir.path().join("sim_config.toml");
    std::fs::write(&local, "[dataset\nn_samples = ").expect("write");

    let err = SimConfig::load_from(None, &local).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
