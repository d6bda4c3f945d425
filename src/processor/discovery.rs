//! File discovery module for coordinate CSV files
//!
//! Lists the candidate input files of a directory: regular files whose name
//! ends in `.csv` (any case) and that are not previously generated
//! `-out.csv` files.

use crate::constants::{INPUT_SUFFIX, OUTPUT_SUFFIX};
use crate::error::{ConverterError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File discovery component for a single directory
#[derive(Debug)]
pub struct FileDiscovery {
    directory: PathBuf,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Discover candidate input files, in directory enumeration order
    ///
    /// Only the directory itself is listed; subdirectories and symlinks are
    /// ignored.
    pub async fn discover_csv_files(&self) -> Result<Vec<PathBuf>> {
        debug!("Searching for CSV files in: {}", self.directory.display());

        let mut files = Vec::new();
        let mut dir = fs::read_dir(&self.directory)
            .await
            .map_err(|source| self.scan_error(source))?;

        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|source| self.scan_error(source))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|source| self.scan_error(source))?;
            if !file_type.is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                debug!("Skipping file with non UTF-8 name: {:?}", file_name);
                continue;
            };

            if is_candidate_file(name) {
                files.push(entry.path());
            }
        }

        debug!("Found {} CSV files", files.len());
        Ok(files)
    }

    fn scan_error(&self, source: std::io::Error) -> ConverterError {
        ConverterError::DirectoryScan {
            path: self.directory.clone(),
            source,
        }
    }
}

/// Check if a file name is a convertible input file
pub fn is_candidate_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(INPUT_SUFFIX) && !lower.ends_with(OUTPUT_SUFFIX)
}

/// Output file for an input file: lower-cased name, `.csv` replaced by `-out.csv`
pub fn output_path_for(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let output_name = match name.strip_suffix(INPUT_SUFFIX) {
        Some(stem) => format!("{}{}", stem, OUTPUT_SUFFIX),
        None => format!("{}{}", name, OUTPUT_SUFFIX),
    };

    input.with_file_name(output_name)
}
