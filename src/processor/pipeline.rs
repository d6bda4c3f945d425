//! Single-file conversion pipeline
//!
//! Reads one `;`-delimited input file, locates the coordinate column, runs
//! every data record through the row converter and writes the augmented
//! rows to the sibling `-out.csv` file.

use super::converter::RowConverter;
use super::discovery::output_path_for;
use super::writer::OutputWriter;

use crate::config::ConverterConfig;
use crate::error::{ConverterError, Result};
use crate::header::{header_names, locate_coordinate_column};
use crate::models::FileReport;
use crate::projection::GeodeticTransform;

use csv::{ByteRecord, ReaderBuilder};
use std::path::Path;
use tracing::{debug, info, warn};

/// Convert one input file, returning its report
///
/// Any error is file-level; the caller decides whether it stops the batch.
/// Records are read as raw bytes, so fields outside the coordinate column
/// may use any single-byte encoding.
/// The input and output handles are closed when this function returns.
pub fn convert_file(
    input: &Path,
    config: &ConverterConfig,
    transform: &dyn GeodeticTransform,
) -> Result<FileReport> {
    info!("Parsing file: {}", input.display());

    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(false)
        .from_path(input)
        .map_err(|source| ConverterError::FileOpen {
            path: input.to_path_buf(),
            source,
        })?;

    let output = output_path_for(input);
    let mut writer = OutputWriter::create(&output, config.delimiter)?;

    let mut header = ByteRecord::new();
    let has_header = reader
        .read_byte_record(&mut header)
        .map_err(|source| ConverterError::HeaderRead {
            path: input.to_path_buf(),
            source,
        })?;
    if !has_header {
        return Err(ConverterError::MissingHeader {
            path: input.to_path_buf(),
        });
    }

    let names = header_names(&header);
    let column = locate_coordinate_column(&names, &config.coordinate_marker).ok_or_else(|| {
        ConverterError::CoordinateColumnNotFound {
            path: input.to_path_buf(),
            marker: config.coordinate_marker.clone(),
        }
    })?;
    debug!(
        "Coordinate column in {}: {} ('{}')",
        input.display(),
        column,
        names[column]
    );

    writer.write_header(&header)?;

    let converter = RowConverter::new(column, transform, config.numeric_policy);
    let mut report = FileReport::converted(input.to_path_buf(), output.clone());
    let mut record = ByteRecord::new();

    loop {
        let more = reader
            .read_byte_record(&mut record)
            .map_err(|source| ConverterError::RecordRead {
                path: input.to_path_buf(),
                line: source.position().map(|p| p.line()).unwrap_or_default(),
                source,
            })?;
        if !more {
            break;
        }
        report.rows_read += 1;

        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let rows = converter
            .convert(&record)
            .map_err(|source| ConverterError::InvalidRow {
                path: input.to_path_buf(),
                line,
                source,
            })?;

        for row in &rows {
            for warning in &row.warnings {
                warn!("{}:{}: {}", input.display(), line, warning);
            }
            report.warnings += row.warnings.len();
            writer.write_row(row)?;
        }
    }

    report.rows_written = writer.finish()?;

    info!(
        "Wrote {} rows from {} records to {}",
        report.rows_written,
        report.rows_read,
        output.display()
    );
    Ok(report)
}
