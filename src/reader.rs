//! High-level API for reading Zeek log files.

use crate::error::{Error, Result};
use crate::models::{FieldType, FieldValue, Record, Schema};
use crate::pipeline::{predicate_fn, FilterOutcome, RowPipeline, RowPredicate, RowTransformer};
use crate::stream::{LogStream, StreamStats};
use crate::summary;
use crate::table;
use arrow::record_batch::RecordBatch;
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Configures how a Zeek log is read and opens streams over it.
///
/// # Examples
///
/// ```no_run
/// use zeek_log_parser::{FieldValue, ZeekLogReader};
///
/// let log = ZeekLogReader::new()
///     .filter(|fields: &[FieldValue], _: &[_], names: &[String]| {
///         let proto = names.iter().position(|n| n == "proto");
///         proto.map(|i| fields[i].as_str() == Some("tcp"))
///     })
///     .read_file("conn.log")?;
///
/// println!("{} tcp connections", log.len());
/// # Ok::<(), zeek_log_parser::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ZeekLogReader {
    pipeline: RowPipeline,
    skip_malformed: bool,
}

impl ZeekLogReader {
    /// Create a reader with no hooks; every well-formed row is kept.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a closure that rewrites each row's values before filtering.
    pub fn transform<F>(self, f: F) -> Self
    where
        F: FnMut(&mut [FieldValue], &[FieldType], &[String]) + 'static,
    {
        self.transformer(Box::new(f))
    }

    /// Set a closure deciding which rows to keep.
    ///
    /// The closure may return `bool`, `Option<bool>` or `()`. Only `false`
    /// (or `Some(false)`) drops the row.
    pub fn filter<F, O>(self, f: F) -> Self
    where
        F: FnMut(&[FieldValue], &[FieldType], &[String]) -> O + 'static,
        O: FilterOutcome + 'static,
    {
        self.predicate(predicate_fn(f))
    }

    pub fn transformer(mut self, transformer: Box<dyn RowTransformer>) -> Self {
        self.pipeline = self.pipeline.with_transformer(transformer);
        self
    }

    pub fn predicate(mut self, predicate: Box<dyn RowPredicate>) -> Self {
        self.pipeline = self.pipeline.with_predicate(predicate);
        self
    }

    /// Skip rows whose field count does not match the header.
    ///
    /// Default is `false`: such rows surface as
    /// [`Error::FieldShapeMismatch`].
    pub fn skip_malformed(mut self, skip: bool) -> Self {
        self.skip_malformed = skip;
        self
    }

    /// Open a file and parse its header, returning a lazy record stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnavailable`] if the file cannot be opened, or a
    /// header error if the directives are malformed.
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<LogStream<BufReader<File>>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::SourceUnavailable {
            path: path.display().to_string(),
            source,
        })?;
        self.stream(BufReader::new(file))
    }

    /// Parse the header from any buffered source and return a lazy stream.
    pub fn stream<R: BufRead>(self, reader: R) -> Result<LogStream<R>> {
        Ok(LogStream::new(reader, self.pipeline)?.skip_malformed(self.skip_malformed))
    }

    /// Read a whole file into memory.
    pub fn read_file<P: AsRef<Path>>(self, path: P) -> Result<ZeekLog> {
        let path = path.as_ref();
        let log = ZeekLog::from_stream(self.open(path)?)?;
        info!("Read {} records from {}", log.len(), path.display());
        Ok(log)
    }

    /// Read a whole buffered source into memory.
    pub fn read<R: BufRead>(self, reader: R) -> Result<ZeekLog> {
        ZeekLog::from_stream(self.stream(reader)?)
    }
}

/// A fully decoded Zeek log: its schema and every accepted record.
///
/// # Examples
///
/// ```no_run
/// use zeek_log_parser::ZeekLog;
///
/// let log = ZeekLog::from_file("conn.log")?;
/// println!("{} fields, {} rows", log.schema().len(), log.len());
/// # Ok::<(), zeek_log_parser::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ZeekLog {
    schema: Schema,
    records: Vec<Record>,
    stats: StreamStats,
}

impl ZeekLog {
    /// Read a file with no transform or filter.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        ZeekLogReader::new().read_file(path)
    }

    pub fn from_stream<R: BufRead>(stream: LogStream<R>) -> Result<Self> {
        let (schema, records, stats) = stream.collect_records()?;
        Ok(Self {
            schema,
            records,
            stats,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_parts(self) -> (Schema, Vec<Record>) {
        (self.schema, self.records)
    }

    /// Materialise the records as a single Arrow batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        table::to_record_batch(&self.schema, &self.records)
            .map_err(|e| Error::OutputError(e.to_string()))
    }

    /// Count, mean, std, min and max of every numeric column.
    pub fn describe(&self) -> Result<RecordBatch> {
        summary::describe(&self.schema, &self.records)
            .map_err(|e| Error::OutputError(e.to_string()))
    }
}
