//! Application constants for the ETRS CSV converter
//!
//! This module contains the file naming rules, CSV layout markers, cell
//! encoding tokens and geodetic parameters used throughout the converter.

// =============================================================================
// File Naming
// =============================================================================

/// Suffix (lower-cased) identifying candidate input files
pub const INPUT_SUFFIX: &str = ".csv";

/// Suffix (lower-cased) of generated output files, excluded from scans
pub const OUTPUT_SUFFIX: &str = "-out.csv";

// =============================================================================
// CSV Layout
// =============================================================================

/// Field delimiter for both input and output files
pub const CSV_DELIMITER: u8 = b';';

/// Substring (case-insensitive) identifying the coordinate column header
pub const COORDINATE_COLUMN_MARKER: &str = "koordinaatit";

/// Name of the first appended output column
pub const LATITUDE_COLUMN: &str = "latitude";

/// Name of the second appended output column
pub const LONGITUDE_COLUMN: &str = "longitude";

/// Digits after the decimal point for every number the converter writes
pub const OUTPUT_DECIMALS: usize = 6;

// =============================================================================
// Coordinate Cell Encoding
// =============================================================================

/// Prefix marking a multi-pair cell, e.g. `[[x1 y1] [x2 y2]]`
pub const MULTI_PAIR_PREFIX: &str = "[[";

/// Suffix closing a multi-pair cell
pub const MULTI_PAIR_SUFFIX: &str = "]]";

/// Separator between pairs inside a multi-pair cell
pub const PAIR_SEPARATOR: &str = "] [";

/// Separator between the two values of one pair
pub const VALUE_SEPARATOR: char = ' ';

/// Opening bracket of a single pair
pub const PAIR_OPEN: char = '[';

/// Closing bracket of a single pair
pub const PAIR_CLOSE: char = ']';

// =============================================================================
// Geodetic Parameters
// =============================================================================

/// Default source CRS: ETRS89 / UTM zone 35N (ETRS-TM35FIN)
pub const DEFAULT_SOURCE_EPSG: u32 = 25835;

/// EPSG codes of the ETRS89 / UTM family are `25800 + zone`
pub const ETRS89_UTM_EPSG_BASE: u32 = 25800;

/// Lowest ETRS89 / UTM zone with an EPSG code (25828)
pub const ETRS89_UTM_MIN_ZONE: u32 = 28;

/// Highest ETRS89 / UTM zone with an EPSG code (25838)
pub const ETRS89_UTM_MAX_ZONE: u32 = 38;

/// GRS80 ellipsoid used by ETRS89
pub mod grs80 {
    /// Semi-major axis in metres
    pub const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

    /// Inverse flattening
    pub const INVERSE_FLATTENING: f64 = 298.257_222_101;
}

/// Universal Transverse Mercator zone parameters
pub mod utm {
    /// Scale factor on the central meridian
    pub const SCALE_FACTOR: f64 = 0.9996;

    /// False easting in metres
    pub const FALSE_EASTING: f64 = 500_000.0;

    /// False northing in metres (northern hemisphere)
    pub const FALSE_NORTHING: f64 = 0.0;

    /// Width of a zone in degrees
    pub const ZONE_WIDTH_DEGREES: f64 = 6.0;
}

/// Newton iteration limit when recovering latitude from the conformal latitude
pub const MAX_LATITUDE_ITERATIONS: usize = 16;

/// Convergence threshold for the latitude iteration (tan φ units)
pub const LATITUDE_TOLERANCE: f64 = 1e-12;
