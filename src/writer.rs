//! Writing decoded Zeek records to Apache Parquet.

use crate::error::{Error, Result};
use crate::formats::parquet::ParquetFormatter;
use crate::models::{Record, Schema};
use crate::reader::ZeekLog;
use std::path::Path;

const DEFAULT_CHUNK_SIZE: usize = 50_000;

/// Writer for outputting decoded records as Parquet files.
///
/// # Examples
///
/// ```no_run
/// use zeek_log_parser::{ParquetWriter, ZeekLog};
///
/// let log = ZeekLog::from_file("conn.log")?;
/// let stats = ParquetWriter::new("./output")
///     .chunk_size(100_000)
///     .write_log(&log)?;
/// println!("{}", stats.summary());
/// # Ok::<(), zeek_log_parser::Error>(())
/// ```
pub struct ParquetWriter {
    output_directory: String,
    chunk_size: usize,
}

impl ParquetWriter {
    /// Create a writer targeting `output_directory`, which is created if missing.
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.as_ref().to_string_lossy().to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the number of rows per Parquet file. Default is 50,000.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Write records as `file_part000.parquet`, `file_part001.parquet`, ...
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputError`] if there are no records or a file cannot
    /// be written.
    pub fn write(self, schema: &Schema, records: &[Record]) -> Result<WriteStats> {
        let formatter = ParquetFormatter::new(self.output_directory, self.chunk_size);
        let num_chunks = formatter.chunk_count(records.len());

        formatter
            .convert(schema, records)
            .map_err(|e| Error::OutputError(e.to_string()))?;

        Ok(WriteStats {
            num_records: records.len(),
            num_chunks,
            chunk_size: self.chunk_size.max(1),
        })
    }

    pub fn write_log(self, log: &ZeekLog) -> Result<WriteStats> {
        self.write(log.schema(), log.records())
    }
}

/// Statistics about a Parquet write operation.
#[derive(Debug, Clone)]
pub struct WriteStats {
    /// Total number of records written
    pub num_records: usize,
    /// Number of Parquet files created
    pub num_chunks: usize,
    /// Rows per file (chunk size)
    pub chunk_size: usize,
}

impl WriteStats {
    /// Get a human-readable summary of the write operation.
    pub fn summary(&self) -> String {
        format!(
            "Wrote {} records across {} file(s) ({} rows per file)",
            self.num_records, self.num_chunks, self.chunk_size
        )
    }
}
