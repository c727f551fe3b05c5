//! iot-sim - Simulated IoT device telemetry with labeled failures
//!
//! Generates a per-minute dataset of temperature, vibration and rotation
//! speed readings, ramps the sensors up before randomly placed failure
//! events, and writes the result to `simulated_iot_device_data.csv` in the
//! working directory.
//!
//! # Usage
//!
//! ```bash
//! # Reference dataset (50 000 rows, 1% failures)
//! cargo run --release
//!
//! # Reproducible run with a custom config
//! cargo run --release -- --config sim_config.toml --seed 42
//! ```
//!
//! # Environment Variables
//!
//! - `IOT_SIM_CONFIG`: Path to a TOML config (default: ./sim_config.toml)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use iot_failure_sim::{render_head, write_csv, DatasetSummary, Generator, SimConfig};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "iot-sim")]
#[command(about = "Simulated IoT sensor telemetry with pre-failure anomalies")]
#[command(version)]
struct CliArgs {
    /// TOML config file. Must load if given; skips the IOT_SIM_CONFIG and
    /// ./sim_config.toml lookup.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Random seed for reproducibility (overrides dataset.seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path (overrides output.path)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Rows shown in the console preview (overrides output.head_rows)
    #[arg(long, value_name = "N")]
    head: Option<usize>,
}

impl CliArgs {
    fn apply(&self, config: &mut SimConfig) {
        if let Some(seed) = self.seed {
            config.dataset.seed = Some(seed);
        }
        if let Some(ref path) = self.output {
            config.output.path = path.clone();
        }
        if let Some(head) = self.head {
            config.output.head_rows = head;
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the summary
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let mut config = match args.config {
        Some(ref path) => SimConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SimConfig::load().context("Failed to load simulation config")?,
    };
    args.apply(&mut config);

    let generator = Generator::new(&config).context("Invalid generator configuration")?;
    info!(
        rows = config.dataset.n_samples,
        failure_rate = config.dataset.failure_rate,
        seed = generator.seed(),
        "Starting simulation"
    );

    let simulation = generator.run();

    let path = &config.output.path;
    write_csv(&simulation.table, path)
        .with_context(|| format!("Failed to write dataset to {}", path.display()))?;

    println!(
        "Successfully generated simulated IoT data and saved it to '{}'",
        path.display()
    );
    println!();
    println!("--- Data Head ---");
    print!("{}", render_head(&simulation.table, config.output.head_rows));
    println!();
    print!("{}", DatasetSummary::from_simulation(&simulation));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = CliArgs::parse_from([
            "iot-sim", "--seed", "42", "--output", "run.csv", "--head", "10",
        ]);
        let mut config = SimConfig::default();
        config.dataset.seed = Some(7);
        args.apply(&mut config);

        assert_eq!(config.dataset.seed, Some(42));
        assert_eq!(config.output.path, PathBuf::from("run.csv"));
        assert_eq!(config.output.head_rows, 10);
    }

    #[test]
    fn no_flags_keep_config() {
        let args = CliArgs::parse_from(["iot-sim"]);
        let mut config = SimConfig::default();
        config.dataset.seed = Some(7);
        args.apply(&mut config);

        assert_eq!(config.dataset.seed, Some(7));
        assert_eq!(config.output, SimConfig::default().output);
    }
}
