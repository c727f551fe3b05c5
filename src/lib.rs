//! IoT failure simulator
//!
//! Synthesizes labeled telemetry (temperature, vibration, rotation speed) for
//! a mechanical device, with degradation ramps injected before randomly
//! placed failure events, and exports it as CSV for model training.
//!
//! ## Modules
//!
//! - **config**: every generator constant, loaded from TOML with validation
//! - **types**: columnar `SensorTable`, `FailureEvent`, `Simulation`
//! - **generator**: seeded base series, failure selection, anomaly windows, noise
//! - **export**: CSV writer and reader
//! - **summary**: console preview and dataset statistics

pub mod config;
pub mod export;
pub mod generator;
pub mod summary;
pub mod types;

pub use config::{ConfigError, SimConfig};
pub use export::{read_csv, write_csv, ExportError};
pub use generator::{GenerateError, Generator};
pub use summary::{render_head, DatasetSummary};
pub use types::{FailureEvent, SensorRow, SensorTable, Simulation};
