//! Coordinate cell parsing.
//!
//! A coordinate cell holds either a single pair `[x y]` or a multi-pair
//! list `[[x1 y1] [x2 y2] ...]`. Parsing is purely structural: pairs come
//! back as borrowed numeric strings and number conversion is left to the
//! caller, which decides how to treat values that are not numbers.

use crate::constants::{
    MULTI_PAIR_PREFIX, MULTI_PAIR_SUFFIX, PAIR_CLOSE, PAIR_OPEN, PAIR_SEPARATOR, VALUE_SEPARATOR,
};
use std::num::ParseFloatError;
use thiserror::Error;

/// Structural problems with a coordinate cell
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CellParseError {
    #[error("cell '{value}' is too short to hold a bracketed pair")]
    TooShort { value: String },

    #[error("cell '{value}' is not wrapped in square brackets")]
    MissingBrackets { value: String },

    #[error("cell '{value}' has unbalanced brackets")]
    UnbalancedBrackets { value: String },

    #[error("pair '{fragment}' has {count} values, expected 2")]
    WrongTokenCount { fragment: String, count: usize },
}

/// A coordinate pair as it appears in the cell, before number conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPair<'a> {
    pub x: &'a str,
    pub y: &'a str,
}

impl RawPair<'_> {
    /// Convert both values to `f64`, reporting each failure separately
    pub fn parse(&self) -> (Result<f64, ParseFloatError>, Result<f64, ParseFloatError>) {
        (parse_value(self.x), parse_value(self.y))
    }
}

/// Parsed contents of a coordinate cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateCell<'a> {
    Single(RawPair<'a>),
    Multiple(Vec<RawPair<'a>>),
}

/// Parse a coordinate cell in either encoding
pub fn parse_cell(value: &str) -> Result<CoordinateCell<'_>, CellParseError> {
    if is_multi_pair(value) {
        parse_multi_pair(value).map(CoordinateCell::Multiple)
    } else {
        parse_single_pair(value).map(CoordinateCell::Single)
    }
}

/// Whether the cell uses the doubled-bracket multi-pair encoding
pub fn is_multi_pair(value: &str) -> bool {
    value.starts_with(MULTI_PAIR_PREFIX)
}

/// Parse `[x y]` into its two numeric strings
pub fn parse_single_pair(value: &str) -> Result<RawPair<'_>, CellParseError> {
    let inner = strip_brackets(value)?;
    split_pair(inner)
}

/// Parse `[[x1 y1] [x2 y2] ...]` into its pairs, preserving order
///
/// The leading `[[` and trailing `]]` are removed once each, the remainder is
/// split on `] [` and every fragment must hold exactly two space-separated
/// values.
pub fn parse_multi_pair(value: &str) -> Result<Vec<RawPair<'_>>, CellParseError> {
    let inner = value
        .strip_prefix(MULTI_PAIR_PREFIX)
        .and_then(|rest| rest.strip_suffix(MULTI_PAIR_SUFFIX))
        .ok_or_else(|| CellParseError::UnbalancedBrackets {
            value: value.to_string(),
        })?;

    inner
        .split(PAIR_SEPARATOR)
        .map(|fragment| {
            if fragment.contains([PAIR_OPEN, PAIR_CLOSE]) {
                return Err(CellParseError::UnbalancedBrackets {
                    value: value.to_string(),
                });
            }
            split_pair(fragment)
        })
        .collect()
}

/// Remove the first and last character of a `[...]` cell
pub fn strip_brackets(value: &str) -> Result<&str, CellParseError> {
    if value.len() < 2 {
        return Err(CellParseError::TooShort {
            value: value.to_string(),
        });
    }

    value
        .strip_prefix(PAIR_OPEN)
        .and_then(|rest| rest.strip_suffix(PAIR_CLOSE))
        .ok_or_else(|| CellParseError::MissingBrackets {
            value: value.to_string(),
        })
}

fn split_pair(fragment: &str) -> Result<RawPair<'_>, CellParseError> {
    let values: Vec<&str> = fragment.split(VALUE_SEPARATOR).collect();
    match values.as_slice() {
        [x, y] => Ok(RawPair { x: *x, y: *y }),
        _ => Err(CellParseError::WrongTokenCount {
            fragment: fragment.to_string(),
            count: values.len(),
        }),
    }
}

/// Parse one coordinate value
pub fn parse_value(value: &str) -> Result<f64, ParseFloatError> {
    value.parse::<f64>()
}
