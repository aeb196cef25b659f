//! Error types for the Zeek log parser library.

use thiserror::Error;

/// Result type alias for Zeek log operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when reading, decoding or writing Zeek logs.
#[derive(Error, Debug)]
pub enum Error {
    /// The `#separator` or `#set_separator` value is neither a single
    /// character nor a `\xHH` escape.
    #[error("Invalid separator format: {0:?}")]
    InvalidSeparatorFormat(String),

    /// A header directive is missing the value it requires.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A data line does not line up with the declared fields.
    #[error("Field shape mismatch at line {line}: expected {expected} {what}, found {found}")]
    FieldShapeMismatch {
        line: u64,
        expected: usize,
        found: usize,
        what: &'static str,
    },

    /// A `time` field could not be read as epoch seconds.
    #[error("Invalid timestamp at line {line}: {value:?}")]
    TimestampParse { line: u64, value: String },

    /// The log file could not be opened.
    #[error("Cannot open {path}: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output sink error (e.g., Arrow or Parquet failure)
    #[error("Output error: {0}")]
    OutputError(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error ends the current log stream.
    ///
    /// Only a shape mismatch is scoped to a single record; every other error
    /// leaves the rest of the file untrusted.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::FieldShapeMismatch { .. })
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
