//! Config validation: unknown-key detection with Levenshtein suggestions
//! and numeric range checks.
//!
//! Unknown keys are found by walking the raw `toml::Value` tree before serde
//! runs, so a typo in an optional field is reported instead of silently
//! falling back to the default. Warnings never break a config.

use std::collections::HashSet;

/// A non-fatal config warning (typo, unknown section).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path for `SimConfig`.
///
/// Kept in step with the struct hierarchy in sim_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [dataset]
        "dataset",
        "dataset.n_samples",
        "dataset.failure_rate",
        "dataset.origin",
        "dataset.seed",
        // [noise]
        "noise",
        "noise.level",
        "noise.temperature_scale",
        "noise.vibration_scale",
        "noise.rotation_scale",
        // [channels]
        "channels",
        "channels.temperature",
        "channels.temperature.base",
        "channels.temperature.std_dev",
        "channels.vibration",
        "channels.vibration.base",
        "channels.vibration.std_dev",
        "channels.rotation_speed",
        "channels.rotation_speed.base",
        "channels.rotation_speed.std_dev",
        // [anomaly]
        "anomaly",
        "anomaly.window_min",
        "anomaly.window_max",
        "anomaly.temperature_peak_min",
        "anomaly.temperature_peak_max",
        "anomaly.vibration_peak_min",
        "anomaly.vibration_peak_max",
        "anomaly.rotation_std_dev",
        // [output]
        "output",
        "output.path",
        "output.head_rows",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// A table `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Closest known key within edit distance 3, ties broken alphabetically.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|&(dist, _)| dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return a warning for each unknown key.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // reported by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Numeric checks that make a run impossible: returns one message per
/// offending field.
pub fn validate_ranges(config: &super::SimConfig) -> Vec<String> {
    let mut errors = Vec::new();

    let d = &config.dataset;
    if d.n_samples == 0 {
        errors.push("dataset.n_samples must be > 0".to_string());
    }
    if !(0.0..=1.0).contains(&d.failure_rate) {
        errors.push(format!(
            "dataset.failure_rate = {} must be within 0..=1",
            d.failure_rate
        ));
    }

    let ch = &config.channels;
    for (name, channel) in [
        ("temperature", ch.temperature),
        ("vibration", ch.vibration),
        ("rotation_speed", ch.rotation_speed),
    ] {
        if !channel.base.is_finite() {
            errors.push(format!("channels.{name}.base must be finite"));
        }
        check_spread(channel.std_dev, &format!("channels.{name}.std_dev"), &mut errors);
    }

    let n = &config.noise;
    check_spread(n.level, "noise.level", &mut errors);
    check_spread(n.temperature_scale, "noise.temperature_scale", &mut errors);
    check_spread(n.vibration_scale, "noise.vibration_scale", &mut errors);
    check_spread(n.rotation_scale, "noise.rotation_scale", &mut errors);

    check_spread(
        config.anomaly.rotation_std_dev,
        "anomaly.rotation_std_dev",
        &mut errors,
    );

    errors
}

/// Standard deviations and scales: finite and non-negative.
fn check_spread(value: f64, name: &str, errors: &mut Vec<String>) {
    if !value.is_finite() || value < 0.0 {
        errors.push(format!("{name} = {value} must be finite and >= 0"));
    }
}

// ============================================================================
// Tests
// ============================================================================
