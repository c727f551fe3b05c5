//! CSV export and reload for generated datasets
//!
//! Format: one header line `timestamp,temperature,vibration,rotation_speed,failure`
//! followed by one line per row. Timestamps use `YYYY-MM-DD HH:MM:SS`, floats
//! use the shortest decimal that round-trips, failure is `0` or `1`. No row
//! index column is written.

use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::types::{SensorRow, SensorTable, COLUMNS};

/// Timestamp layout used in the export.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unexpected CSV header '{found}'")]
    Header { found: String },

    #[error("Malformed CSV on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

impl ExportError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn header() -> String {
    COLUMNS.join(",")
}

// ============================================================================
// Writing
// ============================================================================

/// Write the table as CSV to any writer.
pub fn write_table<W: Write>(table: &SensorTable, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{}", header())?;
    for row in table.rows() {
        writeln!(
            writer,
            "{},{},{},{},{}",
            row.timestamp.format(TIMESTAMP_FORMAT),
            row.temperature,
            row.vibration,
            row.rotation_speed,
            row.failure,
        )?;
    }
    writer.flush()
}

/// Create (or truncate) `path` and write the table to it.
pub fn write_csv(table: &SensorTable, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(ExportError::io(path))?;
    write_table(table, BufWriter::new(file)).map_err(ExportError::io(path))?;
    info!(path = %path.display(), rows = table.len(), "Wrote dataset");
    Ok(())
}

// ============================================================================
// Reading
// ============================================================================

/// Load a previously exported dataset.
///
/// The header must match exactly; empty lines are skipped; any other
/// malformed line is an error naming its 1-based line number.
pub fn read_csv(path: &Path) -> Result<SensorTable, ExportError> {
    let file = File::open(path).map_err(ExportError::io(path))?;
    let mut lines = BufReader::new(file).lines();

    let first = lines
        .next()
        .transpose()
        .map_err(ExportError::io(path))?
        .unwrap_or_default();
    if first.trim_end() != header() {
        return Err(ExportError::Header { found: first });
    }

    let mut table = SensorTable::default();
    for (i, line) in lines.enumerate() {
        let line = line.map_err(ExportError::io(path))?;
        if line.trim().is_empty() {
            continue;
        }
        let row = parse_line(&line).map_err(|reason| ExportError::Malformed {
            line: i + 2,
            reason,
        })?;
        table.push(row);
    }

    info!(path = %path.display(), rows = table.len(), "Loaded dataset");
    Ok(table)
}

fn parse_line(line: &str) -> Result<SensorRow, String> {
    let fields: Vec<&str> = line.trim_end().split(',').collect();
    if fields.len() != COLUMNS.len() {
        return Err(format!(
            "expected {} fields, got {}",
            COLUMNS.len(),
            fields.len()
        ));
    }

    let timestamp = NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT)
        .map_err(|e| format!("cannot parse timestamp '{}': {e}", fields[0]))?;
    let failure = match fields[4] {
        "0" => 0,
        "1" => 1,
        other => return Err(format!("failure must be 0 or 1, got '{other}'")),
    };

    Ok(SensorRow {
        timestamp,
        temperature: parse_f64(fields[1], "temperature")?,
        vibration: parse_f64(fields[2], "vibration")?,
        rotation_speed: parse_f64(fields[3], "rotation_speed")?,
        failure,
    })
}

fn parse_f64(s: &str, field: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .map_err(|_| format!("cannot parse {field} as f64: '{s}'"))
}
