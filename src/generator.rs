//! Telemetry dataset generator
//!
//! Produces a labeled, per-minute series for three sensor channels and
//! injects degradation before randomly placed failure events:
//!
//! 1. Base series: independent Gaussian draws around each channel baseline
//! 2. Failure selection: `round(n * failure_rate)` distinct rows, uniform
//!    without replacement
//! 3. Anomaly windows: for each failure, a 10-50 row window ending at the
//!    failure row (clipped at row 0) gets a linear temperature and vibration
//!    ramp plus a Gaussian rotation speed fluctuation
//! 4. Global noise on every row of every channel
//!
//! All draws come from a single `StdRng` in a fixed order, so a seed fully
//! determines the output.

use chrono::{Duration, NaiveDateTime};
use rand::prelude::*;
use rand::seq::index;
use rand_distr::{Distribution, Normal, NormalError, Uniform};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ChannelConfig, SimConfig};
use crate::types::{FailureEvent, SensorTable, Simulation};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Invalid {channel} distribution: {source}")]
    InvalidDistribution {
        channel: &'static str,
        source: NormalError,
    },

    #[error("Invalid {channel} distribution: std dev {std_dev} is negative")]
    NegativeStdDev { channel: &'static str, std_dev: f64 },

    #[error("Invalid {name} range: [{low}, {high}]")]
    InvalidRange {
        name: &'static str,
        low: f64,
        high: f64,
    },
}

// ============================================================================
// Helpers
// ============================================================================

/// Number of failure events for `n` rows at `rate`, never more than `n`.
pub fn failure_count_for(n: usize, rate: f64) -> usize {
    ((n as f64 * rate).round().max(0.0) as usize).min(n)
}

/// First row of an anomaly window of length `window` ending at `index`.
pub fn window_start(index: usize, window: usize) -> usize {
    index.saturating_sub(window)
}

/// `num` evenly spaced values from `start` to `end`, both inclusive.
///
/// A single point is `[start]`.
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
            values[num - 1] = end;
            values
        }
    }
}

fn normal(mean: f64, std_dev: f64, channel: &'static str) -> Result<Normal<f64>, GenerateError> {
    // rand_distr 0.4 only rejects a non-finite std dev
    if std_dev < 0.0 {
        return Err(GenerateError::NegativeStdDev { channel, std_dev });
    }
    Normal::new(mean, std_dev)
        .map_err(|source| GenerateError::InvalidDistribution { channel, source })
}

fn channel_normal(c: ChannelConfig, channel: &'static str) -> Result<Normal<f64>, GenerateError> {
    normal(c.base, c.std_dev, channel)
}

fn uniform(low: f64, high: f64, name: &'static str) -> Result<Uniform<f64>, GenerateError> {
    // Uniform::new panics on an empty range or one whose width overflows
    if !(low.is_finite() && high.is_finite() && low < high && (high - low).is_finite()) {
        return Err(GenerateError::InvalidRange { name, low, high });
    }
    Ok(Uniform::new(low, high))
}

/// Random seed that fits a TOML integer, so it can be written back as
/// `dataset.seed`.
pub fn entropy_seed() -> u64 {
    rand::random::<u64>() >> 1
}

// ============================================================================
// Generator
// ============================================================================

/// Sampling distributions, built once from the config.
#[derive(Debug, Clone)]
struct Distributions {
    temperature: Normal<f64>,
    vibration: Normal<f64>,
    rotation_speed: Normal<f64>,

    window: Uniform<usize>,
    temperature_peak: Uniform<f64>,
    vibration_peak: Uniform<f64>,
    rotation_fluctuation: Normal<f64>,

    temperature_noise: Normal<f64>,
    vibration_noise: Normal<f64>,
    rotation_noise: Normal<f64>,
}

impl Distributions {
    fn new(config: &SimConfig) -> Result<Self, GenerateError> {
        let ch = &config.channels;
        let a = &config.anomaly;
        let n = &config.noise;

        if a.window_min > a.window_max {
            return Err(GenerateError::InvalidRange {
                name: "anomaly window",
                low: a.window_min as f64,
                high: a.window_max as f64,
            });
        }

        Ok(Self {
            temperature: channel_normal(ch.temperature, "temperature")?,
            vibration: channel_normal(ch.vibration, "vibration")?,
            rotation_speed: channel_normal(ch.rotation_speed, "rotation speed")?,

            window: Uniform::new_inclusive(a.window_min, a.window_max),
            temperature_peak: uniform(
                a.temperature_peak_min,
                a.temperature_peak_max,
                "temperature peak",
            )?,
            vibration_peak: uniform(a.vibration_peak_min, a.vibration_peak_max, "vibration peak")?,
            rotation_fluctuation: normal(0.0, a.rotation_std_dev, "rotation fluctuation")?,

            temperature_noise: normal(0.0, n.temperature_std(), "temperature noise")?,
            vibration_noise: normal(0.0, n.vibration_std(), "vibration noise")?,
            rotation_noise: normal(0.0, n.rotation_std(), "rotation noise")?,
        })
    }
}

/// One-shot dataset generator. Consumed by [`Generator::run`].
pub struct Generator {
    n_samples: usize,
    failure_rate: f64,
    origin: NaiveDateTime,
    dists: Distributions,
    rng: StdRng,
    seed: u64,
}

impl Generator {
    /// Build a generator seeded from `config.dataset.seed`, or from OS
    /// entropy when no seed is configured.
    pub fn new(config: &SimConfig) -> Result<Self, GenerateError> {
        let seed = config.dataset.seed.unwrap_or_else(entropy_seed);
        Self::with_seed(config, seed)
    }

    /// Build a generator with an explicit seed, ignoring the configured one.
    pub fn with_seed(config: &SimConfig, seed: u64) -> Result<Self, GenerateError> {
        Ok(Self {
            n_samples: config.dataset.n_samples,
            failure_rate: config.dataset.failure_rate,
            origin: config.dataset.origin,
            dists: Distributions::new(config)?,
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate the full table and the list of injected failures.
    pub fn run(mut self) -> Simulation {
        let n = self.n_samples;
        info!(rows = n, seed = self.seed, "Generating base sensor series");

        let mut table = SensorTable {
            timestamps: (0..n)
                .map(|i| self.origin + Duration::minutes(i as i64))
                .collect(),
            temperature: self.draw(n, |d| d.temperature),
            vibration: self.draw(n, |d| d.vibration),
            rotation_speed: self.draw(n, |d| d.rotation_speed),
            failure: vec![0; n],
        };

        let k = failure_count_for(n, self.failure_rate);
        let indices = index::sample(&mut self.rng, n, k).into_vec();
        info!(failures = k, "Injecting pre-failure anomalies");

        let events: Vec<FailureEvent> = indices
            .into_iter()
            .map(|idx| self.inject_failure(&mut table, idx))
            .collect();

        self.add_noise(&mut table);

        Simulation {
            table,
            events,
            seed: self.seed,
        }
    }

    fn draw(&mut self, n: usize, pick: impl Fn(&Distributions) -> Normal<f64>) -> Vec<f64> {
        let dist = pick(&self.dists);
        (0..n).map(|_| dist.sample(&mut self.rng)).collect()
    }

    fn inject_failure(&mut self, table: &mut SensorTable, idx: usize) -> FailureEvent {
        let flagged = idx + 1 < table.len();
        if flagged {
            table.failure[idx] = 1;
        }

        let window = self.dists.window.sample(&mut self.rng);
        let start = window_start(idx, window);
        let len = idx - start + 1;

        let temperature_peak = self.dists.temperature_peak.sample(&mut self.rng);
        for (value, ramp) in table.temperature[start..=idx]
            .iter_mut()
            .zip(linspace(0.0, temperature_peak, len))
        {
            *value += ramp;
        }

        let vibration_peak = self.dists.vibration_peak.sample(&mut self.rng);
        for (value, ramp) in table.vibration[start..=idx]
            .iter_mut()
            .zip(linspace(0.0, vibration_peak, len))
        {
            *value += ramp;
        }

        for value in &mut table.rotation_speed[start..=idx] {
            *value += self.dists.rotation_fluctuation.sample(&mut self.rng);
        }

        debug!(
            index = idx,
            window_start = start,
            window,
            flagged,
            temperature_peak,
            vibration_peak,
            "Injected failure"
        );

        FailureEvent {
            index: idx,
            window_start: start,
            window_drawn: window,
            flagged,
            temperature_peak,
            vibration_peak,
        }
    }

    fn add_noise(&mut self, table: &mut SensorTable) {
        let d = &self.dists;
        let rng = &mut self.rng;
        for value in &mut table.temperature {
            *value += d.temperature_noise.sample(rng);
        }
        for value in &mut table.vibration {
            *value += d.vibration_noise.sample(rng);
        }
        for value in &mut table.rotation_speed {
            *value += d.rotation_noise.sample(rng);
        }
    }
}
