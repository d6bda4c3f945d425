//! Row conversion for coordinate CSV files
//!
//! Turns one input record into one or more output rows: a single-pair cell
//! yields one row with latitude/longitude appended, a multi-pair cell yields
//! one row per pair with the coordinate cell rewritten to that pair.

use crate::config::NumericPolicy;
use crate::coordinates::{CoordinateCell, RawPair, parse_cell, parse_value};
use crate::error::RowError;
use crate::models::{CoordinatePair, ConvertedRow, GeoCoordinate, RowWarning, format_decimal};
use crate::projection::GeodeticTransform;
use csv::ByteRecord;
use tracing::warn;

/// Converts data records once the coordinate column is known
pub struct RowConverter<'a> {
    column: usize,
    transform: &'a dyn GeodeticTransform,
    numeric_policy: NumericPolicy,
}

impl<'a> RowConverter<'a> {
    pub fn new(
        column: usize,
        transform: &'a dyn GeodeticTransform,
        numeric_policy: NumericPolicy,
    ) -> Self {
        Self {
            column,
            transform,
            numeric_policy,
        }
    }

    /// Convert one data record into its output rows, in pair order
    ///
    /// Only the coordinate cell has to be UTF-8; other fields are copied as
    /// raw bytes.
    pub fn convert(&self, record: &ByteRecord) -> Result<Vec<ConvertedRow>, RowError> {
        let bytes = record
            .get(self.column)
            .ok_or(RowError::MissingCoordinateCell {
                column: self.column,
                len: record.len(),
            })?;
        let cell = std::str::from_utf8(bytes).map_err(|source| RowError::InvalidEncoding {
            column: self.column,
            source,
        })?;

        match parse_cell(cell)? {
            CoordinateCell::Single(raw) => {
                let mut warnings = Vec::new();
                let pair = self.parse_pair(&raw, &mut warnings)?;
                let geo = self.transform_pair(pair, &mut warnings)?;

                let mut fields = record.clone();
                push_lat_lon(&mut fields, geo);
                Ok(vec![ConvertedRow { fields, warnings }])
            }
            CoordinateCell::Multiple(pairs) => pairs
                .iter()
                .map(|raw| -> Result<ConvertedRow, RowError> {
                    let mut warnings = Vec::new();
                    let pair = self.parse_pair(raw, &mut warnings)?;
                    let geo = self.transform_pair(pair, &mut warnings)?;

                    let formatted = pair.format_cell();
                    let mut fields: ByteRecord = record
                        .iter()
                        .enumerate()
                        .map(|(index, field)| {
                            if index == self.column {
                                formatted.as_bytes()
                            } else {
                                field
                            }
                        })
                        .collect();
                    push_lat_lon(&mut fields, geo);
                    Ok(ConvertedRow { fields, warnings })
                })
                .collect(),
        }
    }

    fn parse_pair(
        &self,
        raw: &RawPair<'_>,
        warnings: &mut Vec<RowWarning>,
    ) -> Result<CoordinatePair, RowError> {
        let x = self.parse_number(raw.x, warnings)?;
        let y = self.parse_number(raw.y, warnings)?;
        Ok(CoordinatePair::new(x, y))
    }

    fn parse_number(&self, value: &str, warnings: &mut Vec<RowWarning>) -> Result<f64, RowError> {
        match parse_value(value) {
            Ok(number) => Ok(number),
            Err(source) => match self.numeric_policy {
                NumericPolicy::Zero => {
                    warn!("Invalid coordinate value '{}', using 0", value);
                    warnings.push(RowWarning::InvalidNumber {
                        value: value.to_string(),
                    });
                    Ok(0.0)
                }
                NumericPolicy::Strict => Err(RowError::InvalidNumber {
                    value: value.to_string(),
                    source,
                }),
            },
        }
    }

    fn transform_pair(
        &self,
        pair: CoordinatePair,
        warnings: &mut Vec<RowWarning>,
    ) -> Result<GeoCoordinate, RowError> {
        match self.transform.to_lon_lat(pair.x, pair.y, 0.0) {
            Ok(geo) => Ok(geo),
            Err(e) => match self.numeric_policy {
                NumericPolicy::Zero => {
                    warn!("Transform of ({}, {}) failed: {}", pair.x, pair.y, e);
                    warnings.push(RowWarning::TransformFailed {
                        pair,
                        reason: e.to_string(),
                    });
                    Ok(GeoCoordinate::default())
                }
                NumericPolicy::Strict => Err(RowError::Transform(e)),
            },
        }
    }
}

fn push_lat_lon(fields: &mut ByteRecord, geo: GeoCoordinate) {
    fields.push_field(format_decimal(geo.latitude).as_bytes());
    fields.push_field(format_decimal(geo.longitude).as_bytes());
}
