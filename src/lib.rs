//! # Zeek Log Parser
//!
//! A streaming decoder for Zeek (formerly Bro) network-activity logs in the
//! tab-separated ASCII format.
//!
//! Every Zeek log describes itself in a block of `#` directives: the field
//! separator, the markers for empty and unset values, and the name and type of
//! every column. This crate parses that header into a [`Schema`], decodes each
//! data line into a typed [`Record`], and lets callers plug in a per-row
//! transform and filter.
//!
//! ## Quick Start
//!
//! ```no_run
//! use zeek_log_parser::ZeekLog;
//!
//! let log = ZeekLog::from_file("conn.log")?;
//! println!("Read {} records with {} fields", log.len(), log.schema().len());
//! # Ok::<(), zeek_log_parser::Error>(())
//! ```
//!
//! ## Streaming
//!
//! Records are produced lazily, one line at a time:
//!
//! ```no_run
//! use zeek_log_parser::ZeekLogReader;
//!
//! let stream = ZeekLogReader::new().open("conn.log")?;
//! let proto = stream.schema().index_of("proto");
//!
//! for record in stream {
//!     let record = record?;
//!     if let Some(i) = proto {
//!         println!("line {}: {}", record.line, record.fields[i]);
//!     }
//! }
//! # Ok::<(), zeek_log_parser::Error>(())
//! ```
//!
//! ## Decoding Rules
//!
//! | Zeek type        | Decoded as                                     |
//! |------------------|------------------------------------------------|
//! | `count`, `port`  | `Integer`, or the raw text if not an integer   |
//! | `interval`       | `Float`, or the raw text if not a number       |
//! | `addr`           | IPv4 as `Address(u32)`; anything else is `0`   |
//! | `time`           | local ISO-8601 `Timestamp`; bad input is fatal |
//! | anything else    | `Text`                                         |
//!
//! Tokens equal to the unset or empty marker become `Unset` / `Empty`
//! regardless of type.
//!
//! ## Error Handling
//!
//! ```no_run
//! use zeek_log_parser::{Error, ZeekLog};
//!
//! match ZeekLog::from_file("conn.log") {
//!     Ok(log) => println!("{}", log.stats().summary()),
//!     Err(Error::SourceUnavailable { path, .. }) => eprintln!("missing: {}", path),
//!     Err(err @ Error::FieldShapeMismatch { .. }) => eprintln!("bad row: {}", err),
//!     Err(err) => eprintln!("Error: {}", err),
//! }
//! ```

// Public API modules
pub mod error;
pub mod reader;
pub mod writer;

// Re-export commonly used types
pub use error::{Error, Result};
pub use reader::{ZeekLog, ZeekLogReader};
pub use writer::{ParquetWriter, WriteStats};

pub use models::{FieldType, FieldValue, Record, Schema};
pub use pipeline::{FilterOutcome, RowPipeline, RowPredicate, RowTransformer};
pub use stream::{LogStream, StreamStats};

// Internal modules (public but not part of the high-level API)
pub mod decoder;
pub mod formats;
pub mod header;
pub mod models;
pub mod pipeline;
pub mod stream;
pub mod summary;
pub mod table;
