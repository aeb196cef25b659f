use serde::{Serialize, Serializer};
use std::fmt;

pub const DEFAULT_FIELD_SEPARATOR: char = ' ';
pub const DEFAULT_SET_SEPARATOR: char = ',';
pub const DEFAULT_EMPTY_MARKER: &str = "(empty)";
pub const DEFAULT_UNSET_MARKER: &str = "-";

/// Declared type of a column, taken from the `#types` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Count,
    Port,
    Interval,
    Addr,
    Time,
    /// Any tag without a dedicated decoding rule, kept verbatim.
    Other(String),
}

impl FieldType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "count" => FieldType::Count,
            "port" => FieldType::Port,
            "interval" => FieldType::Interval,
            "addr" => FieldType::Addr,
            "time" => FieldType::Time,
            other => FieldType::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            FieldType::Count => "count",
            FieldType::Port => "port",
            FieldType::Interval => "interval",
            FieldType::Addr => "addr",
            FieldType::Time => "time",
            FieldType::Other(tag) => tag,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Structure of one log file, built from its header block.
///
/// Built by [`crate::header::HeaderParser`] and read-only once the first data
/// line is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub field_separator: char,
    pub set_separator: char,
    pub empty_marker: String,
    pub unset_marker: String,
    pub field_names: Vec<String>,
    pub field_types: Vec<FieldType>,
    /// Value of the `#path` directive, e.g. `conn`.
    pub path: Option<String>,
    /// Value of the `#open` directive.
    pub open: Option<String>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            field_separator: DEFAULT_FIELD_SEPARATOR,
            set_separator: DEFAULT_SET_SEPARATOR,
            empty_marker: DEFAULT_EMPTY_MARKER.to_string(),
            unset_marker: DEFAULT_UNSET_MARKER.to_string(),
            field_names: Vec::new(),
            field_types: Vec::new(),
            path: None,
            open: None,
        }
    }
}

impl Schema {
    pub fn len(&self) -> usize {
        self.field_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_names.is_empty()
    }

    /// Position of the named field, if declared.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.field_names.iter().position(|n| n == name)
    }
}

/// A single decoded field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The token matched the unset marker.
    Unset,
    /// The token matched the empty marker; renders as an empty string.
    Empty,
    Integer(i64),
    /// A `count` too large for `i64`; Zeek counts are unsigned 64-bit.
    Unsigned(u64),
    Float(f64),
    /// ISO-8601 local wall-clock time.
    Timestamp(String),
    /// IPv4 address as its 32-bit value. `0` for anything that is not IPv4.
    Address(u32),
    Text(String),
}

impl FieldValue {
    pub fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Unset)
    }

    /// String view for text-like values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Empty => Some(""),
            FieldValue::Timestamp(s) | FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view used by summaries.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Unsigned(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Address(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Unset | FieldValue::Empty => Ok(()),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Unsigned(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Timestamp(s) | FieldValue::Text(s) => f.write_str(s),
            FieldValue::Address(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Unset => serializer.serialize_none(),
            FieldValue::Empty => serializer.serialize_str(""),
            FieldValue::Integer(v) => serializer.serialize_i64(*v),
            FieldValue::Unsigned(v) => serializer.serialize_u64(*v),
            FieldValue::Float(v) => serializer.serialize_f64(*v),
            FieldValue::Timestamp(s) | FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Address(v) => serializer.serialize_u32(*v),
        }
    }
}

/// One decoded data line, positionally aligned with [`Schema::field_names`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// 1-based line number in the source file.
    pub line: u64,
    pub fields: Vec<FieldValue>,
}

impl Record {
    pub fn new(line: u64, fields: Vec<FieldValue>) -> Self {
        Self { line, fields }
    }

    /// Look a value up by field name.
    pub fn get<'a>(&'a self, schema: &Schema, name: &str) -> Option<&'a FieldValue> {
        schema.index_of(name).and_then(|i| self.fields.get(i))
    }

    /// Render the record as a JSON object keyed by field name.
    pub fn to_json(&self, schema: &Schema) -> serde_json::Value {
        let map = schema
            .field_names
            .iter()
            .zip(&self.fields)
            .map(|(name, value)| (name.clone(), serde_json::json!(value)))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}
