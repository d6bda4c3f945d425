//! Header handling for coordinate CSV files.
//!
//! Locates the coordinate column by its marker substring and builds the
//! augmented output header.

use crate::constants::{LATITUDE_COLUMN, LONGITUDE_COLUMN};
use csv::ByteRecord;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Find the coordinate column in a header row
///
/// Returns the index of the last header whose lower-cased name contains the
/// marker, or `None` when no header matches. When several headers match the
/// right-most one wins.
pub fn locate_coordinate_column<I, S>(headers: I, marker: &str) -> Option<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let marker = marker.to_lowercase();
    let matches: Vec<usize> = headers
        .into_iter()
        .enumerate()
        .filter(|(_, name)| name.as_ref().to_lowercase().contains(&marker))
        .map(|(index, _)| index)
        .collect();

    if matches.len() > 1 {
        warn!(
            "Multiple headers match '{}' at columns {:?}, using column {}",
            marker,
            matches,
            matches[matches.len() - 1]
        );
    }

    let column = matches.into_iter().max();
    debug!("Coordinate column for marker '{}': {:?}", marker, column);
    column
}

/// Header names for column matching
///
/// Bytes that are not UTF-8 are replaced, which cannot affect an ASCII
/// marker match.
pub fn header_names(header: &ByteRecord) -> Vec<Cow<'_, str>> {
    header.iter().map(String::from_utf8_lossy).collect()
}

/// Original header followed by the latitude and longitude columns
pub fn augmented_header(header: &ByteRecord) -> ByteRecord {
    let mut augmented = header.clone();
    augmented.push_field(LATITUDE_COLUMN.as_bytes());
    augmented.push_field(LONGITUDE_COLUMN.as_bytes());
    augmented
}
