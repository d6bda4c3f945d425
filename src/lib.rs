//! ETRS CSV Converter Library
//!
//! A Rust library for augmenting CSV files that carry ETRS89 / UTM
//! (EPSG:25835, ETRS-TM35FIN) coordinate pairs with WGS84 latitude and
//! longitude columns.
//!
//! This library provides tools for:
//! - Discovering input files in a directory, skipping generated `-out.csv` files
//! - Parsing single-pair `[x y]` and multi-pair `[[x1 y1] [x2 y2]]` coordinate cells
//! - Transverse Mercator inverse and forward projection on the GRS80 ellipsoid
//! - Expanding multi-pair rows and writing `;`-delimited augmented files
//! - Per-file error isolation and a serializable batch report

pub mod cli;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod error;
pub mod header;
pub mod models;
pub mod processor;
pub mod projection;

// Re-export commonly used types
pub use config::{ConverterConfig, FailurePolicy, NumericPolicy};
pub use error::{ConverterError, Result, RowError};
pub use models::{CoordinatePair, FileReport, GeoCoordinate, ProcessingStats};
pub use processor::BatchProcessor;
pub use projection::{Etrs89Utm, GeodeticTransform};
