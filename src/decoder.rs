//! Per-type decoding of data lines.

use chrono::{DateTime, Local, Timelike};
use std::net::Ipv4Addr;

use crate::error::{Error, Result};
use crate::models::{FieldType, FieldValue, Record, Schema};

/// Convert fractional epoch seconds to a local wall-clock ISO-8601 string.
///
/// The fractional part alone is rounded (half to even) to microseconds, and is
/// only printed when non-zero. Returns `None` for values outside the representable range.
pub fn epoch_to_local_iso(epoch: f64) -> Option<String> {
    if !epoch.is_finite() {
        return None;
    }

    let whole = epoch.trunc();
    if whole.abs() >= i64::MAX as f64 {
        return None;
    }
    let mut secs = whole as i64;
    let mut micros = (epoch.fract() * 1_000_000.0).round_ties_even() as i64;
    if micros >= 1_000_000 {
        secs += 1;
        micros -= 1_000_000;
    } else if micros < 0 {
        secs -= 1;
        micros += 1_000_000;
    }

    let utc = DateTime::from_timestamp(secs, (micros * 1_000) as u32)?;
    let local = utc.with_timezone(&Local).naive_local();

    let rendered = if local.nanosecond() == 0 {
        local.format("%Y-%m-%dT%H:%M:%S")
    } else {
        local.format("%Y-%m-%dT%H:%M:%S%.6f")
    };
    Some(rendered.to_string())
}

fn decode_integer(token: &str) -> FieldValue {
    if let Ok(v) = token.parse::<i64>() {
        return FieldValue::Integer(v);
    }
    token
        .parse::<u64>()
        .map(FieldValue::Unsigned)
        .unwrap_or_else(|_| FieldValue::Text(token.to_string()))
}

/// Decodes raw data lines against a fixed [`Schema`].
#[derive(Debug, Clone, Copy)]
pub struct RowDecoder<'a> {
    schema: &'a Schema,
}

impl<'a> RowDecoder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Decode one data line. `line` must already have its terminator removed;
    /// `line_no` is only used for the record and for error reports.
    pub fn decode(&self, line: &str, line_no: u64) -> Result<Record> {
        let schema = self.schema;
        let expected = schema.field_names.len();

        if schema.field_types.len() != expected {
            return Err(Error::FieldShapeMismatch {
                line: line_no,
                expected,
                found: schema.field_types.len(),
                what: "types",
            });
        }

        let tokens: Vec<&str> = line.split(schema.field_separator).collect();
        if tokens.len() != expected {
            return Err(Error::FieldShapeMismatch {
                line: line_no,
                expected,
                found: tokens.len(),
                what: "tokens",
            });
        }

        let fields = tokens
            .iter()
            .zip(&schema.field_types)
            .map(|(token, field_type)| self.decode_field(token, field_type, line_no))
            .collect::<Result<Vec<_>>>()?;

        Ok(Record::new(line_no, fields))
    }

    /// Apply the sentinel checks and then the type rule to a single token.
    pub fn decode_field(&self, token: &str, field_type: &FieldType, line_no: u64) -> Result<FieldValue> {
        if token == self.schema.unset_marker {
            return Ok(FieldValue::Unset);
        }
        if token == self.schema.empty_marker {
            return Ok(FieldValue::Empty);
        }

        let value = match field_type {
            FieldType::Count | FieldType::Port => decode_integer(token),
            FieldType::Interval => token
                .parse::<f64>()
                .map(FieldValue::Float)
                .unwrap_or_else(|_| FieldValue::Text(token.to_string())),
            // IPv6 is not decoded; every non-IPv4 token maps to 0.
            FieldType::Addr => FieldValue::Address(
                token.parse::<Ipv4Addr>().map(u32::from).unwrap_or(0),
            ),
            FieldType::Time => {
                let iso = token
                    .parse::<f64>()
                    .ok()
                    .and_then(epoch_to_local_iso)
                    .ok_or_else(|| Error::TimestampParse {
                        line: line_no,
                        value: token.to_string(),
                    })?;
                FieldValue::Timestamp(iso)
            }
            FieldType::Other(_) => FieldValue::Text(token.to_string()),
        };

        Ok(value)
    }
}
