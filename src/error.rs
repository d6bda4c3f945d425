//! Error handling for coordinate conversion operations.
//!
//! Provides error types with file and line context for directory scanning,
//! CSV reading/writing, coordinate cell parsing and projection failures.

use crate::coordinates::CellParseError;
use crate::projection::ProjectionError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to scan directory: {path}")]
    DirectoryScan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open input file: {path}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to create output file: {path}")]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("No header record in file: {path}")]
    MissingHeader { path: PathBuf },

    #[error("Failed to read header of file: {path}")]
    HeaderRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Could not find any header entry that contains '{marker}' in file: {path}")]
    CoordinateColumnNotFound { path: PathBuf, marker: String },

    #[error("Failed to read record at line {line} of file: {path}")]
    RecordRead {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write output file: {path}")]
    RecordWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid row at line {line} of file: {path}")]
    InvalidRow {
        path: PathBuf,
        line: u64,
        #[source]
        source: RowError,
    },

    #[error("Unsupported source projection EPSG:{epsg} (expected ETRS89 / UTM, 25828-25838)")]
    UnsupportedProjection { epsg: u32 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing failed for {failed} of {total} files")]
    BatchFailed { failed: usize, total: usize },
}

/// Failure converting a single data row
#[derive(Error, Debug)]
pub enum RowError {
    #[error("coordinate column {column} missing from record with {len} fields")]
    MissingCoordinateCell { column: usize, len: usize },

    #[error("coordinate cell in column {column} is not valid UTF-8")]
    InvalidEncoding {
        column: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("malformed coordinate cell")]
    MalformedCell(#[from] CellParseError),

    #[error("invalid number '{value}' in coordinate cell")]
    InvalidNumber {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("coordinate transform failed")]
    Transform(#[from] ProjectionError),
}

pub type Result<T> = std::result::Result<T, ConverterError>;
