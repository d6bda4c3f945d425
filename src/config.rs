//! Configuration management and validation.
//!
//! Provides the converter configuration: coordinate column marker, source
//! projection, and the policies that decide how file-level errors and
//! unparseable numbers are handled.

use crate::constants::{COORDINATE_COLUMN_MARKER, CSV_DELIMITER, DEFAULT_SOURCE_EPSG};
use crate::error::{ConverterError, Result};
use crate::projection::Etrs89Utm;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// What happens to the batch when a single file fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the whole run at the first failing file
    #[default]
    Abort,
    /// Log the failure, skip the file and continue with the next one
    Skip,
}

/// How coordinate values that are not numbers are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    /// Replace with zero and attach a warning to the row
    #[default]
    Zero,
    /// Fail the file
    Strict,
}

/// Converter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Directory scanned for input files
    pub directory: PathBuf,

    /// Case-insensitive substring identifying the coordinate column
    pub coordinate_marker: String,

    /// Field delimiter for input and output
    pub delimiter: u8,

    /// EPSG code of the source projection
    pub source_epsg: u32,

    /// Batch behaviour on file-level errors
    pub failure_policy: FailurePolicy,

    /// Row behaviour on unparseable numbers and transform failures
    pub numeric_policy: NumericPolicy,

    /// Show a progress bar while converting
    pub show_progress: bool,

    /// Optional path of a per-file report CSV
    pub report_path: Option<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            coordinate_marker: COORDINATE_COLUMN_MARKER.to_string(),
            delimiter: CSV_DELIMITER,
            source_epsg: DEFAULT_SOURCE_EPSG,
            failure_policy: FailurePolicy::Abort,
            numeric_policy: NumericPolicy::Zero,
            show_progress: true,
            report_path: None,
        }
    }
}

impl ConverterConfig {
    /// Set the directory to scan
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Set the failure policy
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set the numeric policy
    pub fn with_numeric_policy(mut self, policy: NumericPolicy) -> Self {
        self.numeric_policy = policy;
        self
    }

    /// Set the source projection EPSG code
    pub fn with_source_epsg(mut self, epsg: u32) -> Self {
        self.source_epsg = epsg;
        self
    }

    /// Write a per-file report to the given path
    pub fn with_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Disable the progress bar
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Check the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if self.coordinate_marker.trim().is_empty() {
            return Err(ConverterError::Configuration {
                message: "coordinate column marker must not be empty".to_string(),
            });
        }

        if matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(ConverterError::Configuration {
                message: format!("invalid delimiter {:?}", self.delimiter as char),
            });
        }

        Etrs89Utm::from_epsg(self.source_epsg)?;

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}
