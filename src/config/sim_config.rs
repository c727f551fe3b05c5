//! Simulation Configuration - every generator constant as a TOML value
//!
//! Each struct implements `Default` with the values of the reference dataset,
//! so a run without a config file produces the standard 50 000-row export.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable pointing at a config file.
pub const CONFIG_ENV_VAR: &str = "IOT_SIM_CONFIG";
/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "sim_config.toml";
/// Default export file name.
pub const DEFAULT_OUTPUT_FILE: &str = "simulated_iot_device_data.csv";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a simulation run.
///
/// Load with `SimConfig::load()` which searches:
/// 1. `$IOT_SIM_CONFIG` env var
/// 2. `./sim_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub noise: NoiseConfig,

    #[serde(default)]
    pub channels: ChannelsConfig,

    #[serde(default)]
    pub anomaly: AnomalyConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl SimConfig {
    /// Load configuration using the standard search order:
    /// 1. `$IOT_SIM_CONFIG` environment variable
    /// 2. `./sim_config.toml` in the current working directory
    /// 3. Built-in defaults
    ///
    /// Defaults are used only when no config file exists. A file that is
    /// present but fails to parse or validate is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        Self::load_from(env, Path::new(LOCAL_CONFIG_FILE))
    }

    /// Search order of [`SimConfig::load`] with explicit candidate paths.
    pub fn load_from(env: Option<PathBuf>, local: &Path) -> Result<Self, ConfigError> {
        if let Some(p) = env {
            if p.exists() {
                let config = Self::load_from_file(&p)?;
                info!(path = %p.display(), "Loaded simulation config from {CONFIG_ENV_VAR}");
                return Ok(config);
            }
            warn!(path = %p.display(), "{CONFIG_ENV_VAR} points to non-existent file, falling back");
        }

        if local.exists() {
            let config = Self::load_from_file(local)?;
            info!(path = %local.display(), "Loaded simulation config");
            return Ok(config);
        }

        info!("No {LOCAL_CONFIG_FILE} found, using built-in defaults");
        Ok(Self::default())
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse and validate a TOML document held in memory.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::parse(contents, Path::new("<inline>"))
    }

    /// Two-pass parse: unknown keys are logged as warnings, then serde
    /// deserialization and validation.
    fn parse(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Number of failure events a run will inject.
    pub fn failure_count(&self) -> usize {
        crate::generator::failure_count_for(self.dataset.n_samples, self.dataset.failure_rate)
    }

    /// Check all values for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = super::validation::validate_ranges(self);

        let a = &self.anomaly;
        if a.window_min == 0 {
            errors.push("anomaly.window_min must be > 0".to_string());
        }
        if a.window_max < a.window_min {
            errors.push(format!(
                "anomaly.window_max ({}) must be >= window_min ({})",
                a.window_max, a.window_min
            ));
        }
        Self::check_interval(
            a.temperature_peak_min,
            a.temperature_peak_max,
            "anomaly.temperature_peak",
            &mut errors,
        );
        Self::check_interval(
            a.vibration_peak_min,
            a.vibration_peak_max,
            "anomaly.vibration_peak",
            &mut errors,
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_interval(min: f64, max: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass
        if !min.is_finite() || !max.is_finite() {
            errors.push(format!(
                "{name}: bounds must be finite (got min={min}, max={max})"
            ));
            return;
        }
        if min >= max {
            errors.push(format!("{name}: min ({min}) must be < max ({max})"));
        } else if !(max - min).is_finite() {
            errors.push(format!(
                "{name}: range width overflows (min={min}, max={max})"
            ));
        }
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// Size, labeling rate and time axis of the generated table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Number of rows
    #[serde(default = "default_n_samples")]
    pub n_samples: usize,

    /// Fraction of rows selected as failure events
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,

    /// Timestamp of the first row; rows are one minute apart
    #[serde(default = "default_origin")]
    pub origin: NaiveDateTime,

    /// Fixed RNG seed. Unset draws one from OS entropy. TOML integers are
    /// signed, so seeds above `i64::MAX` can only be given with `--seed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_n_samples() -> usize {
    50_000
}
fn default_failure_rate() -> f64 {
    0.01
}
fn default_origin() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            n_samples: default_n_samples(),
            failure_rate: default_failure_rate(),
            origin: default_origin(),
            seed: None,
        }
    }
}

// ============================================================================
// Global Noise
// ============================================================================

/// Low-amplitude Gaussian noise added to every row after anomaly injection.
///
/// Per-channel std dev is `level * <channel>_scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    #[serde(default = "default_noise_level")]
    pub level: f64,

    #[serde(default = "default_temperature_noise_scale")]
    pub temperature_scale: f64,

    #[serde(default = "default_vibration_noise_scale")]
    pub vibration_scale: f64,

    #[serde(default = "default_rotation_noise_scale")]
    pub rotation_scale: f64,
}

fn default_noise_level() -> f64 {
    0.1
}
fn default_temperature_noise_scale() -> f64 {
    2.0
}
fn default_vibration_noise_scale() -> f64 {
    0.1
}
fn default_rotation_noise_scale() -> f64 {
    10.0
}

impl NoiseConfig {
    pub fn temperature_std(&self) -> f64 {
        self.level * self.temperature_scale
    }

    pub fn vibration_std(&self) -> f64 {
        self.level * self.vibration_scale
    }

    pub fn rotation_std(&self) -> f64 {
        self.level * self.rotation_scale
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            level: default_noise_level(),
            temperature_scale: default_temperature_noise_scale(),
            vibration_scale: default_vibration_noise_scale(),
            rotation_scale: default_rotation_noise_scale(),
        }
    }
}

// ============================================================================
// Sensor Channels
// ============================================================================

/// Base characteristic of one channel: nominal mean and spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub base: f64,
    pub std_dev: f64,
}

/// Base characteristics for the three sensor channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelsConfig {
    /// Degrees Celsius
    #[serde(default = "default_temperature_channel")]
    pub temperature: ChannelConfig,

    #[serde(default = "default_vibration_channel")]
    pub vibration: ChannelConfig,

    /// RPM
    #[serde(default = "default_rotation_channel")]
    pub rotation_speed: ChannelConfig,
}

fn default_temperature_channel() -> ChannelConfig {
    ChannelConfig { base: 25.0, std_dev: 2.0 }
}
fn default_vibration_channel() -> ChannelConfig {
    ChannelConfig { base: 0.1, std_dev: 0.05 }
}
fn default_rotation_channel() -> ChannelConfig {
    ChannelConfig { base: 1500.0, std_dev: 50.0 }
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature_channel(),
            vibration: default_vibration_channel(),
            rotation_speed: default_rotation_channel(),
        }
    }
}

// ============================================================================
// Anomaly Injection
// ============================================================================

/// Shape of the degradation preceding each failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Shortest pre-failure window (rows)
    #[serde(default = "default_window_min")]
    pub window_min: usize,

    /// Longest pre-failure window (rows, inclusive)
    #[serde(default = "default_window_max")]
    pub window_max: usize,

    #[serde(default = "default_temperature_peak_min")]
    pub temperature_peak_min: f64,

    #[serde(default = "default_temperature_peak_max")]
    pub temperature_peak_max: f64,

    #[serde(default = "default_vibration_peak_min")]
    pub vibration_peak_min: f64,

    #[serde(default = "default_vibration_peak_max")]
    pub vibration_peak_max: f64,

    /// Std dev of the zero-mean rotation speed fluctuation (RPM)
    #[serde(default = "default_rotation_std_dev")]
    pub rotation_std_dev: f64,
}

fn default_window_min() -> usize {
    10
}
fn default_window_max() -> usize {
    50
}
fn default_temperature_peak_min() -> f64 {
    15.0
}
fn default_temperature_peak_max() -> f64 {
    30.0
}
fn default_vibration_peak_min() -> f64 {
    0.2
}
fn default_vibration_peak_max() -> f64 {
    0.5
}
fn default_rotation_std_dev() -> f64 {
    200.0
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            window_min: default_window_min(),
            window_max: default_window_max(),
            temperature_peak_min: default_temperature_peak_min(),
            temperature_peak_max: default_temperature_peak_max(),
            vibration_peak_min: default_vibration_peak_min(),
            vibration_peak_max: default_vibration_peak_max(),
            rotation_std_dev: default_rotation_std_dev(),
        }
    }
}

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Export path, relative to the working directory
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Rows shown in the console preview
    #[serde(default = "default_head_rows")]
    pub head_rows: usize,
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}
fn default_head_rows() -> usize {
    5
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            head_rows: default_head_rows(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config parse error ({}): {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}
