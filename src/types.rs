//! Shared data structures for simulated device telemetry
//!
//! The dataset is held column-wise: one vector per column, all of equal
//! length. `SensorRow` is a by-value view of a single index, used when a
//! caller needs a whole row at once (CSV export, console summary).

use chrono::NaiveDateTime;

/// CSV column order, shared by the writer and the reader.
pub const COLUMNS: [&str; 5] = [
    "timestamp",
    "temperature",
    "vibration",
    "rotation_speed",
    "failure",
];

// ============================================================================
// Rows
// ============================================================================

/// One sample of device telemetry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorRow {
    pub timestamp: NaiveDateTime,
    /// Degrees Celsius
    pub temperature: f64,
    /// Vibration amplitude (g)
    pub vibration: f64,
    /// Rotation speed (RPM)
    pub rotation_speed: f64,
    /// 1 when this row is a labeled failure event, 0 otherwise
    pub failure: u8,
}

impl SensorRow {
    pub fn is_failure(&self) -> bool {
        self.failure == 1
    }
}

// ============================================================================
// Columnar Table
// ============================================================================

/// Ordered sequence of rows stored as equal-length columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorTable {
    pub timestamps: Vec<NaiveDateTime>,
    pub temperature: Vec<f64>,
    pub vibration: Vec<f64>,
    pub rotation_speed: Vec<f64>,
    pub failure: Vec<u8>,
}

impl SensorTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(capacity),
            temperature: Vec::with_capacity(capacity),
            vibration: Vec::with_capacity(capacity),
            rotation_speed: Vec::with_capacity(capacity),
            failure: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Append a row to every column.
    pub fn push(&mut self, row: SensorRow) {
        self.timestamps.push(row.timestamp);
        self.temperature.push(row.temperature);
        self.vibration.push(row.vibration);
        self.rotation_speed.push(row.rotation_speed);
        self.failure.push(row.failure);
    }

    /// Row at `index`, or `None` past the end.
    pub fn row(&self, index: usize) -> Option<SensorRow> {
        Some(SensorRow {
            timestamp: *self.timestamps.get(index)?,
            temperature: *self.temperature.get(index)?,
            vibration: *self.vibration.get(index)?,
            rotation_speed: *self.rotation_speed.get(index)?,
            failure: *self.failure.get(index)?,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = SensorRow> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    /// Number of rows labeled `failure = 1`.
    pub fn failure_count(&self) -> usize {
        self.failure.iter().filter(|&&f| f == 1).count()
    }

    /// True when every column has the same length.
    pub fn is_consistent(&self) -> bool {
        let n = self.timestamps.len();
        self.temperature.len() == n
            && self.vibration.len() == n
            && self.rotation_speed.len() == n
            && self.failure.len() == n
    }
}

// ============================================================================
// Failure Events
// ============================================================================

/// A failure injected into the table, with the anomaly window that precedes it.
///
/// The window covers `window_start..=index`, so the failure row itself carries
/// the ramp peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FailureEvent {
    /// Row index of the failure
    pub index: usize,
    /// First perturbed row, clipped at 0
    pub window_start: usize,
    /// Window length that was drawn, before clipping
    pub window_drawn: usize,
    /// False when the failure landed on the last row and was left unlabeled
    pub flagged: bool,
    /// Temperature ramp end value (deg C)
    pub temperature_peak: f64,
    /// Vibration ramp end value
    pub vibration_peak: f64,
}

impl FailureEvent {
    /// Number of rows perturbed by this event.
    pub fn window_len(&self) -> usize {
        self.index - self.window_start + 1
    }

    /// True when the drawn window would have run past row 0.
    pub fn was_clipped(&self) -> bool {
        self.window_drawn > self.index
    }
}

/// Output of one generator run.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub table: SensorTable,
    /// Events in the order they were applied
    pub events: Vec<FailureEvent>,
    /// Seed the run was drawn from
    pub seed: u64,
}

impl Simulation {
    /// Number of events left unlabeled because they hit the last row.
    pub fn unflagged_events(&self) -> usize {
        self.events.iter().filter(|e| !e.flagged).count()
    }

    /// Number of distinct rows inside at least one anomaly window.
    pub fn anomalous_rows(&self) -> usize {
        let mut touched = vec![false; self.table.len()];
        for event in &self.events {
            for flag in touched
                .iter_mut()
                .take(event.index + 1)
                .skip(event.window_start)
            {
                *flag = true;
            }
        }
        touched.into_iter().filter(|&t| t).count()
    }
}
