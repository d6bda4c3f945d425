//! Batch processing engine.
//!
//! Orchestrates the conversion workflow: file discovery, per-file
//! conversion through the pipeline, failure policy, progress display and
//! the optional batch report.

pub mod converter;
pub mod discovery;
pub mod pipeline;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::discovery::{FileDiscovery, output_path_for};
use self::pipeline::convert_file;

use crate::config::{ConverterConfig, FailurePolicy};
use crate::error::{ConverterError, Result};
use crate::models::{FileReport, ProcessingStats};
use crate::projection::{Etrs89Utm, GeodeticTransform};

use colored::*;
use csv::WriterBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error as StdError;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::{debug, error};

/// Main processor for a directory of coordinate CSV files
pub struct BatchProcessor {
    config: ConverterConfig,
    file_discovery: FileDiscovery,
    transform: Arc<dyn GeodeticTransform>,
}

impl BatchProcessor {
    /// Create a processor using the configured ETRS89 / UTM source projection
    pub fn new(config: ConverterConfig) -> Result<Self> {
        config.validate()?;
        let transform = Arc::new(Etrs89Utm::from_epsg(config.source_epsg)?);
        Ok(Self::with_transform(config, transform))
    }

    /// Create a processor with a custom transform
    pub fn with_transform(config: ConverterConfig, transform: Arc<dyn GeodeticTransform>) -> Self {
        Self {
            file_discovery: FileDiscovery::new(config.directory.clone()),
            config,
            transform,
        }
    }

    /// Main processing entry point
    ///
    /// Files are converted one at a time in discovery order. With
    /// `FailurePolicy::Abort` the first failing file ends the run with its
    /// error; with `FailurePolicy::Skip` failures are recorded and the batch
    /// continues.
    pub async fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        println!(
            "{}",
            "Starting coordinate conversion".bright_green().bold()
        );
        println!(
            "  {} {}",
            "Directory:".bright_cyan(),
            self.file_discovery.directory().display()
        );
        println!(
            "  {} EPSG:{}",
            "Source projection:".bright_cyan(),
            self.config.source_epsg
        );

        let csv_files = self.file_discovery.discover_csv_files().await?;
        println!(
            "  {} {} CSV files",
            "Found".bright_green(),
            csv_files.len().to_string().bright_white().bold()
        );

        let mut stats = ProcessingStats::default();
        let pb = self.progress_bar(csv_files.len());

        for file_path in &csv_files {
            if let Some(file_name) = file_path.file_name() {
                pb.set_message(format!("Converting: {}", file_name.to_string_lossy()));
            }

            let result = self.convert_one(file_path).await;
            pb.inc(1);

            match result {
                Ok(report) => {
                    debug!("Successfully converted: {}", file_path.display());
                    stats.record(report);
                }
                Err(e) => {
                    error!("Failed to convert {}: {}", file_path.display(), error_chain(&e));
                    stats.record(FileReport::failed(
                        file_path.clone(),
                        output_path_for(file_path),
                        error_chain(&e),
                    ));

                    if self.config.failure_policy == FailurePolicy::Abort {
                        pb.abandon_with_message("Conversion aborted");
                        self.write_report_if_requested(&stats)?;
                        return Err(e);
                    }
                }
            }
        }

        pb.finish_with_message("All CSV files converted");
        stats.processing_time_ms = start_time.elapsed().as_millis();

        self.write_report_if_requested(&stats)?;
        print_summary(&stats);

        Ok(stats)
    }

    /// Convert one file on the blocking pool, waiting for it to finish
    async fn convert_one(&self, file_path: &Path) -> Result<FileReport> {
        let input = file_path.to_path_buf();
        let config = self.config.clone();
        let transform = Arc::clone(&self.transform);

        task::spawn_blocking(move || convert_file(&input, &config, transform.as_ref()))
            .await
            .map_err(|e| {
                ConverterError::Io(std::io::Error::other(format!(
                    "conversion task for {} failed: {}",
                    file_path.display(),
                    e
                )))
            })?
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    fn write_report_if_requested(&self, stats: &ProcessingStats) -> Result<()> {
        match &self.config.report_path {
            Some(path) => write_report(path, &stats.reports, self.config.delimiter),
            None => Ok(()),
        }
    }
}

/// Write per-file reports as a delimited CSV with a header row
pub fn write_report(path: &Path, reports: &[FileReport], delimiter: u8) -> Result<()> {
    let to_error = |source: csv::Error| ConverterError::RecordWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|source| ConverterError::OutputCreate {
            path: path.to_path_buf(),
            source,
        })?;

    for report in reports {
        writer.serialize(report).map_err(to_error)?;
    }
    writer.flush().map_err(|e| to_error(e.into()))?;

    debug!("Wrote report for {} files to {}", reports.len(), path.display());
    Ok(())
}

/// Error message including its source chain
fn error_chain(error: &ConverterError) -> String {
    let mut message = error.to_string();
    let mut source = StdError::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Conversion Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files converted:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {} read, {} written",
        "Rows:".bright_cyan(),
        stats.rows_read.to_string().bright_white(),
        stats.rows_written.to_string().bright_white().bold()
    );
    if stats.warnings > 0 {
        println!(
            "  {} {}",
            "Warnings:".bright_yellow(),
            stats.warnings.to_string().bright_yellow()
        );
    }
}

