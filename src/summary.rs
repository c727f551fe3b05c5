//! Console summary of a generated dataset
//!
//! Human-readable only: a preview of the first rows, the failure label
//! breakdown, anomaly coverage and per-channel statistics.

use statrs::statistics::Statistics;
use std::fmt;

use crate::export::TIMESTAMP_FORMAT;
use crate::types::{SensorTable, Simulation, COLUMNS};

/// Descriptive statistics for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub mean: f64,
    /// Sample standard deviation (NaN for fewer than two rows)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl ChannelStats {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            mean: values.iter().mean(),
            std_dev: values.iter().std_dev(),
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
        }
    }
}

/// Aggregate view of one generator run.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub rows: usize,
    pub normal_rows: usize,
    pub failure_rows: usize,
    pub events: usize,
    pub unflagged_events: usize,
    pub anomalous_rows: usize,
    pub seed: u64,
    pub temperature: ChannelStats,
    pub vibration: ChannelStats,
    pub rotation_speed: ChannelStats,
}

impl DatasetSummary {
    pub fn from_simulation(sim: &Simulation) -> Self {
        let table = &sim.table;
        let failure_rows = table.failure_count();
        Self {
            rows: table.len(),
            normal_rows: table.len() - failure_rows,
            failure_rows,
            events: sim.events.len(),
            unflagged_events: sim.unflagged_events(),
            anomalous_rows: sim.anomalous_rows(),
            seed: sim.seed,
            temperature: ChannelStats::from_values(&table.temperature),
            vibration: ChannelStats::from_values(&table.vibration),
            rotation_speed: ChannelStats::from_values(&table.rotation_speed),
        }
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Failure Distribution ---")?;
        writeln!(f, "failure")?;
        writeln!(f, "0    {:>8}", self.normal_rows)?;
        writeln!(f, "1    {:>8}", self.failure_rows)?;
        writeln!(f)?;

        writeln!(f, "--- Anomaly Injection ---")?;
        writeln!(f, "Failure events:     {}", self.events)?;
        if self.unflagged_events > 0 {
            writeln!(
                f,
                "Unlabeled (last row): {}",
                self.unflagged_events
            )?;
        }
        writeln!(
            f,
            "Rows in a window:   {} of {} ({:.1}%)",
            self.anomalous_rows,
            self.rows,
            percent(self.anomalous_rows, self.rows)
        )?;
        writeln!(f, "Seed:               {}", self.seed)?;
        writeln!(f)?;

        writeln!(f, "--- Channel Statistics ---")?;
        writeln!(
            f,
            "{:<16}{:>12}{:>12}{:>12}{:>12}",
            "channel", "mean", "std", "min", "max"
        )?;
        for (name, s) in [
            ("temperature", &self.temperature),
            ("vibration", &self.vibration),
            ("rotation_speed", &self.rotation_speed),
        ] {
            writeln!(
                f,
                "{:<16}{:>12.4}{:>12.4}{:>12.4}{:>12.4}",
                name, s.mean, s.std_dev, s.min, s.max
            )?;
        }
        Ok(())
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// First `n` rows as an aligned text table with a leading row index.
pub fn render_head(table: &SensorTable, n: usize) -> String {
    let mut out = format!(
        "{:>5}  {:<19}  {:>12}  {:>10}  {:>14}  {:>7}\n",
        "", COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4]
    );
    for (i, row) in table.rows().take(n).enumerate() {
        out.push_str(&format!(
            "{:>5}  {:<19}  {:>12.6}  {:>10.6}  {:>14.6}  {:>7}\n",
            i,
            row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            row.temperature,
            row.vibration,
            row.rotation_speed,
            row.failure
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FailureEvent, SensorRow};
    use chrono::NaiveDate;

    fn simulation() -> Simulation {
        let origin = NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let mut table = SensorTable::default();
        for (i, temp) in [20.0, 22.0, 24.0, 26.0].into_iter().enumerate() {
            table.push(SensorRow {
                timestamp: origin + chrono::Duration::minutes(i as i64),
                temperature: temp,
                vibration: 0.1,
                rotation_speed: 1500.0,
                failure: u8::from(i == 2),
            });
        }
        Simulation {
            table,
            events: vec![
                FailureEvent {
                    index: 2,
                    window_start: 0,
                    window_drawn: 10,
                    flagged: true,
                    temperature_peak: 20.0,
                    vibration_peak: 0.3,
                },
                FailureEvent {
                    index: 3,
                    window_start: 0,
                    window_drawn: 12,
                    flagged: false,
                    temperature_peak: 18.0,
                    vibration_peak: 0.25,
                },
            ],
            seed: 42,
        }
    }

    #[test]
    fn test_channel_stats() {
        let s = ChannelStats::from_values(&[20.0, 22.0, 24.0, 26.0]);
        assert_eq!(s.mean, 23.0);
        assert_eq!(s.min, 20.0);
        assert_eq!(s.max, 26.0);
        // sample std dev of an arithmetic sequence with step 2
        assert!((s.std_dev - 2.581_988_897_471_611).abs() < 1e-9);
    }

    #[test]
    fn test_summary_counts() {
        let summary = DatasetSummary::from_simulation(&simulation());
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.failure_rows, 1);
        assert_eq!(summary.normal_rows, 3);
        assert_eq!(summary.events, 2);
        assert_eq!(summary.unflagged_events, 1);
        assert_eq!(summary.anomalous_rows, 4);
    }

    #[test]
    fn test_summary_display() {
        let text = DatasetSummary::from_simulation(&simulation()).to_string();
        assert!(text.contains("--- Failure Distribution ---"));
        assert!(text.contains("Unlabeled (last row): 1"));
        assert!(text.contains("temperature"));
        assert!(text.contains("Seed:               42"));
    }

    #[test]
    fn test_render_head_limits_rows() {
        let sim = simulation();
        let head = render_head(&sim.table, 2);
        let lines: Vec<&str> = head.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("rotation_speed"));
        assert!(lines[1].contains("2025-01-01 00:00:00"));
        assert!(lines[2].trim_start().starts_with('1'));
    }

    #[test]
    fn test_render_head_short_table() {
        let sim = simulation();
        assert_eq!(render_head(&sim.table, 10).lines().count(), 5);
    }
}
