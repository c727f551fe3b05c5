//! Simulation Configuration Module
//!
//! Every generator constant (sample count, failure rate, channel baselines,
//! anomaly shape, noise, output path) lives in `SimConfig`, loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `IOT_SIM_CONFIG` environment variable (path to TOML file)
//! 2. `sim_config.toml` in the current working directory
//! 3. Built-in defaults (the reference 50 000-row dataset), only when no file
//!    exists. A file that fails to parse or validate is an error.
//!
//! ## Usage
//!
//! ```ignore
//! let config = SimConfig::load()?;
//! let simulation = Generator::new(&config)?.run();
//! ```

mod sim_config;
pub mod validation;

pub use sim_config::*;
