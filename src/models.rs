//! Core data structures for coordinate conversion.
//!
//! Defines coordinate pairs, converted rows with their warnings, per-file
//! reports and batch processing statistics.

use crate::constants::OUTPUT_DECIMALS;
use crate::error::{ConverterError, Result};
use csv::ByteRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A coordinate pair in the source projection (easting, northing)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatePair {
    pub x: f64,
    pub y: f64,
}

impl CoordinatePair {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Render as a single-pair cell, e.g. `[385000.000000 6672000.000000]`
    pub fn format_cell(&self) -> String {
        format!("[{} {}]", format_decimal(self.x), format_decimal(self.y))
    }
}

/// A geographic coordinate in degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoCoordinate {
    pub longitude: f64,
    pub latitude: f64,
}

/// Format a number as fixed point with six digits after the decimal point
pub fn format_decimal(value: f64) -> String {
    format!("{:.*}", OUTPUT_DECIMALS, value)
}

/// Recoverable problem attached to an output row
#[derive(Debug, Clone, PartialEq)]
pub enum RowWarning {
    /// A coordinate value could not be parsed and was replaced by zero
    InvalidNumber { value: String },
    /// The projection failed and the coordinate was replaced by zero
    TransformFailed { pair: CoordinatePair, reason: String },
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowWarning::InvalidNumber { value } => {
                write!(f, "invalid number '{}' replaced by 0", value)
            }
            RowWarning::TransformFailed { pair, reason } => write!(
                f,
                "transform of ({}, {}) failed ({}), latitude/longitude set to 0",
                pair.x, pair.y, reason
            ),
        }
    }
}

/// One output row: original fields (coordinate cell possibly rewritten)
/// followed by latitude and longitude
///
/// Fields are kept as raw bytes so values in other encodings pass through
/// unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedRow {
    pub fields: ByteRecord,
    pub warnings: Vec<RowWarning>,
}

/// Final state of a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Converted,
    Failed,
}

/// Outcome of converting one input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: FileStatus,
    pub rows_read: usize,
    pub rows_written: usize,
    pub warnings: usize,
    pub error: Option<String>,
}

impl FileReport {
    pub fn converted(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            status: FileStatus::Converted,
            rows_read: 0,
            rows_written: 0,
            warnings: 0,
            error: None,
        }
    }

    pub fn failed(input: PathBuf, output: PathBuf, error: String) -> Self {
        Self {
            status: FileStatus::Failed,
            error: Some(error),
            ..Self::converted(input, output)
        }
    }
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub rows_read: usize,
    pub rows_written: usize,
    pub warnings: usize,
    pub processing_time_ms: u128,
    pub reports: Vec<FileReport>,
}

impl ProcessingStats {
    /// Fold a file outcome into the batch totals
    pub fn record(&mut self, report: FileReport) {
        match report.status {
            FileStatus::Converted => self.files_processed += 1,
            FileStatus::Failed => self.files_failed += 1,
        }
        self.rows_read += report.rows_read;
        self.rows_written += report.rows_written;
        self.warnings += report.warnings;
        self.reports.push(report);
    }

    /// Error if any file failed, for exit status reporting
    pub fn ensure_no_failures(&self) -> Result<()> {
        if self.files_failed > 0 {
            return Err(ConverterError::BatchFailed {
                failed: self.files_failed,
                total: self.files_processed + self.files_failed,
            });
        }
        Ok(())
    }
}
