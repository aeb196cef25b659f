//! Parsing of the `#` directive block at the top of a Zeek log.

use crate::error::{Error, Result};
use crate::models::{FieldType, Schema};
use log::{debug, trace};
use std::io::BufRead;

pub const COMMENT_MARKER: char = '#';

/// Resolve a separator directive value.
///
/// Accepts a single literal character or `\x` followed by exactly two hex
/// digits.
pub fn parse_separator(value: &str) -> Result<char> {
    let mut chars = value.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(c);
    }

    if let Some(hex) = value.strip_prefix("\\x") {
        if hex.len() == 2 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            if let Ok(code) = u8::from_str_radix(hex, 16) {
                return Ok(char::from(code));
            }
        }
    }

    Err(Error::InvalidSeparatorFormat(value.to_string()))
}

/// Incremental builder for a [`Schema`].
///
/// Each header line is split with whatever field separator is in effect when
/// it arrives, so a `#separator` directive changes how every later directive
/// is tokenised.
#[derive(Debug, Default)]
pub struct HeaderParser {
    schema: Schema,
}

impl HeaderParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one header line. The leading `#` is optional.
    pub fn apply(&mut self, line: &str) -> Result<()> {
        let body = line.strip_prefix(COMMENT_MARKER).unwrap_or(line).trim();
        let tokens: Vec<&str> = body.split(self.schema.field_separator).collect();
        let key = tokens[0];
        let value = tokens.get(1).copied();

        match key {
            "separator" => {
                let sep = parse_separator(value.unwrap_or(""))?;
                debug!("Field separator set to {:?}", sep);
                self.schema.field_separator = sep;
            }
            "set_separator" => {
                self.schema.set_separator = parse_separator(value.unwrap_or(""))?;
            }
            "empty_field" => {
                self.schema.empty_marker = required(key, value)?;
            }
            "unset_field" => {
                self.schema.unset_marker = required(key, value)?;
            }
            "fields" => {
                self.schema.field_names = tokens[1..].iter().map(|s| s.to_string()).collect();
                debug!("Declared {} fields", self.schema.field_names.len());
            }
            "types" => {
                self.schema.field_types = tokens[1..].iter().map(|s| FieldType::from_tag(s)).collect();
            }
            "path" => {
                self.schema.path = Some(required(key, value)?);
            }
            "open" => {
                self.schema.open = Some(required(key, value)?);
            }
            _ => {
                trace!("Ignoring header directive {:?}", key);
            }
        }

        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn finish(self) -> Schema {
        self.schema
    }
}

fn required(key: &str, value: Option<&str>) -> Result<String> {
    value
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidHeader(format!("#{} directive has no value", key)))
}

/// Outcome of reading the header block from a line source.
#[derive(Debug)]
pub struct Header {
    pub schema: Schema,
    /// The first non-comment line, with its terminator still attached.
    /// `None` when the stream ended inside the header.
    pub first_data_line: Option<String>,
    /// Number of lines consumed, including `first_data_line`.
    pub lines_read: u64,
}

/// Read directives until the first line that does not start with `#`.
pub fn parse_header<R: BufRead>(reader: &mut R) -> Result<Header> {
    let mut parser = HeaderParser::new();
    let mut lines_read = 0;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(Header {
                schema: parser.finish(),
                first_data_line: None,
                lines_read,
            });
        }
        lines_read += 1;

        if !line.starts_with(COMMENT_MARKER) {
            return Ok(Header {
                schema: parser.finish(),
                first_data_line: Some(line),
                lines_read,
            });
        }

        parser.apply(&line)?;
    }
}
