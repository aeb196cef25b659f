//! The streaming session over one log source.

use crate::error::Result;
use crate::header::{parse_header, Header, COMMENT_MARKER};
use crate::models::{Record, Schema};
use crate::pipeline::RowPipeline;
use log::{debug, warn};
use std::io::BufRead;
use std::iter::FusedIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    ReadingHeader,
    ReadingBody,
    Finished,
}

/// Counters collected while a [`LogStream`] runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Lines read from the source, header included.
    pub lines_read: u64,
    /// Comment lines skipped after the header.
    pub comment_lines: u64,
    pub records_accepted: u64,
    /// Rows dropped by the filter hook.
    pub records_rejected: u64,
    /// Rows whose shape did not match the schema.
    pub malformed_lines: u64,
}

impl StreamStats {
    pub fn summary(&self) -> String {
        format!(
            "Read {} lines: {} records accepted, {} rejected by filter, {} malformed",
            self.lines_read, self.records_accepted, self.records_rejected, self.malformed_lines
        )
    }
}

/// Lazily decodes records from a Zeek log.
///
/// The header is parsed when the stream is created, so [`LogStream::schema`]
/// is complete before the first record is produced. Iteration yields records
/// in file order. A shape mismatch is yielded as an error and iteration may
/// continue past it; any other error ends the stream and releases the source.
pub struct LogStream<R> {
    reader: Option<R>,
    schema: Schema,
    pipeline: RowPipeline,
    state: StreamState,
    pending: Option<String>,
    line_no: u64,
    skip_malformed: bool,
    stats: StreamStats,
}

impl<R: BufRead> LogStream<R> {
    pub fn new(mut reader: R, pipeline: RowPipeline) -> Result<Self> {
        let header = parse_header(&mut reader)?;
        let mut stream = Self {
            reader: Some(reader),
            schema: Schema::default(),
            pipeline,
            state: StreamState::ReadingHeader,
            pending: None,
            line_no: 0,
            skip_malformed: false,
            stats: StreamStats::default(),
        };
        stream.enter_body(header);
        Ok(stream)
    }

    /// Skip rows with the wrong number of fields instead of yielding an error.
    pub fn skip_malformed(mut self, skip: bool) -> Self {
        self.skip_malformed = skip;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Drain the stream, stopping at the first error of any kind.
    pub fn collect_records(mut self) -> Result<(Schema, Vec<Record>, StreamStats)> {
        let mut records = Vec::new();
        for record in self.by_ref() {
            records.push(record?);
        }
        Ok((self.schema, records, self.stats))
    }

    fn enter_body(&mut self, header: Header) {
        debug_assert_eq!(self.state, StreamState::ReadingHeader);
        debug!(
            "Parsed header: {} fields, separator {:?}, path {:?}",
            header.schema.field_names.len(),
            header.schema.field_separator,
            header.schema.path
        );

        self.stats.lines_read = header.lines_read;
        self.line_no = header.lines_read - u64::from(header.first_data_line.is_some());
        self.pending = header.first_data_line;
        self.schema = header.schema;
        self.state = StreamState::ReadingBody;
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            self.line_no += 1;
            return Ok(Some(line));
        }

        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        self.stats.lines_read += 1;
        Ok(Some(line))
    }

    fn finish(&mut self) {
        if self.state != StreamState::Finished {
            self.state = StreamState::Finished;
            self.reader = None;
            debug!("{}", self.stats.summary());
        }
    }
}

impl<R: BufRead> Iterator for LogStream<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.state == StreamState::ReadingBody {
            let line = match self.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.finish();
                    return None;
                }
                Err(err) => {
                    self.finish();
                    return Some(Err(err));
                }
            };

            if line.starts_with(COMMENT_MARKER) {
                self.stats.comment_lines += 1;
                continue;
            }

            let data = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
            match self.pipeline.process(&self.schema, data, self.line_no) {
                Ok(Some(record)) => {
                    self.stats.records_accepted += 1;
                    return Some(Ok(record));
                }
                Ok(None) => {
                    self.stats.records_rejected += 1;
                }
                Err(err) if err.is_fatal() => {
                    self.finish();
                    return Some(Err(err));
                }
                Err(err) => {
                    self.stats.malformed_lines += 1;
                    if !self.skip_malformed {
                        return Some(Err(err));
                    }
                    warn!("Skipping line {}: {}", self.line_no, err);
                }
            }
        }
        None
    }
}

impl<R: BufRead> FusedIterator for LogStream<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Cursor;

    const LOG: &str = "#separator \\x09\n#fields\tn\n#types\tcount\n";

    #[test]
    fn test_comment_lines_skipped_mid_file() {
        let input = "#fields n\n#types count\n1\n#close now\n2\n";
        let stream = LogStream::new(Cursor::new(input), RowPipeline::new()).unwrap();
        let (_, records, stats) = stream.collect_records().unwrap();

        assert_eq!(records.iter().map(|r| r.line).collect::<Vec<_>>(), vec![3, 5]);
        assert_eq!(stats.comment_lines, 1);
        assert_eq!(stats.lines_read, 5);
    }

    #[test]
    fn test_shape_mismatch_is_recoverable() {
        let input = "#fields a b\n#types count count\n1 2\n3\n4 5\n";
        let mut stream = LogStream::new(Cursor::new(input), RowPipeline::new()).unwrap();

        assert!(stream.next().unwrap().is_ok());
        assert!(matches!(stream.next(), Some(Err(Error::FieldShapeMismatch { line: 4, .. }))));
        assert_eq!(stream.next().unwrap().unwrap().line, 5);
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_skip_malformed() {
        let input = "#fields a b\n#types count count\n1 2\n3\n4 5\r\n";
        let stream = LogStream::new(Cursor::new(input), RowPipeline::new())
            .unwrap()
            .skip_malformed(true);
        let (_, records, stats) = stream.collect_records().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(stats.malformed_lines, 1);
    }

    #[test]
    fn test_fatal_error_ends_stream() {
        let input = "#fields ts\n#types time\nnope\n1482538000\n";
        let mut stream = LogStream::new(Cursor::new(input), RowPipeline::new()).unwrap();

        assert!(matches!(stream.next(), Some(Err(Error::TimestampParse { line: 3, .. }))));
        assert!(stream.next().is_none());
        assert!(stream.reader.is_none());
    }

    #[test]
    fn test_header_only() {
        let mut stream = LogStream::new(Cursor::new(LOG), RowPipeline::new()).unwrap();
        assert_eq!(stream.schema().field_separator, '\t');
        assert!(stream.next().is_none());
    }
}
