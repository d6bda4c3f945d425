//! Command-line interface components.

use crate::config::{ConverterConfig, FailurePolicy, NumericPolicy};
use crate::constants::DEFAULT_SOURCE_EPSG;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "etrs-csv-converter")]
#[command(about = "Add WGS84 latitude/longitude columns to ETRS-TM35 coordinate CSV files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory containing the CSV files to convert
    #[arg(value_name = "DIRECTORY", default_value = ".")]
    pub directory: PathBuf,

    /// What to do when a file cannot be converted
    #[arg(long, value_enum, default_value_t = FailurePolicy::Abort)]
    pub on_error: FailurePolicy,

    /// Fail on coordinate values that are not numbers instead of using 0
    #[arg(long)]
    pub strict_numbers: bool,

    /// EPSG code of the source projection (ETRS89 / UTM, 25828-25838)
    #[arg(long, default_value_t = DEFAULT_SOURCE_EPSG)]
    pub epsg: u32,

    /// Write a per-file conversion report to this CSV file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Increase logging verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Log level for the tracing filter
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

impl ConverterConfig {
    /// Build the converter configuration from command-line arguments
    pub fn from_args(args: &Args) -> Self {
        let numeric_policy = if args.strict_numbers {
            NumericPolicy::Strict
        } else {
            NumericPolicy::Zero
        };

        let mut config = ConverterConfig::default()
            .with_directory(&args.directory)
            .with_failure_policy(args.on_error)
            .with_numeric_policy(numeric_policy)
            .with_source_epsg(args.epsg);

        if let Some(report) = &args.report {
            config = config.with_report(report);
        }
        if !args.show_progress() {
            config = config.without_progress();
        }
        config
    }
}
