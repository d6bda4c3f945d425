//! CSV output writing for converted files
//!
//! Wraps a delimiter-configured `csv::Writer` over the output file and keeps
//! track of how many rows were written.

use crate::error::{ConverterError, Result};
use crate::header::augmented_header;
use crate::models::ConvertedRow;

use csv::{ByteRecord, Writer, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writer for one augmented output file
pub struct OutputWriter {
    output_path: PathBuf,
    writer: Writer<File>,
    rows_written: usize,
}

impl OutputWriter {
    /// Create (or truncate) the output file
    pub fn create(output_path: &Path, delimiter: u8) -> Result<Self> {
        let writer = WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(output_path)
            .map_err(|source| ConverterError::OutputCreate {
                path: output_path.to_path_buf(),
                source,
            })?;

        debug!("Created output file: {}", output_path.display());

        Ok(Self {
            output_path: output_path.to_path_buf(),
            writer,
            rows_written: 0,
        })
    }

    /// Write the input header followed by latitude and longitude
    pub fn write_header(&mut self, header: &ByteRecord) -> Result<()> {
        let augmented = augmented_header(header);
        self.writer
            .write_byte_record(&augmented)
            .map_err(|source| self.write_error(source))
    }

    /// Write one converted row
    pub fn write_row(&mut self, row: &ConvertedRow) -> Result<()> {
        self.writer
            .write_byte_record(&row.fields)
            .map_err(|source| self.write_error(source))?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flush buffered rows to disk, returning the number of rows written
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush().map_err(|source| ConverterError::RecordWrite {
            path: self.output_path.clone(),
            source: source.into(),
        })?;

        debug!(
            "Flushed {} rows to {}",
            self.rows_written,
            self.output_path.display()
        );
        Ok(self.rows_written)
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn write_error(&self, source: csv::Error) -> ConverterError {
        ConverterError::RecordWrite {
            path: self.output_path.clone(),
            source,
        }
    }
}
