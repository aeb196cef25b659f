//! Stream a log through a hand-written transformer and predicate.

use std::io::Cursor;
use zeek_log_parser::{FieldType, FieldValue, RowPredicate, RowTransformer, ZeekLogReader};

/// Replaces unset byte counters with zero.
struct ZeroMissingCounts;

impl RowTransformer for ZeroMissingCounts {
    fn transform(&mut self, fields: &mut [FieldValue], types: &[FieldType], _names: &[String]) {
        for (value, field_type) in fields.iter_mut().zip(types) {
            if *field_type == FieldType::Count && value.is_unset() {
                *value = FieldValue::Integer(0);
            }
        }
    }
}

/// Keeps at most `limit` rows.
struct Limit {
    seen: usize,
    limit: usize,
}

impl RowPredicate for Limit {
    fn accept(&mut self, _fields: &[FieldValue], _types: &[FieldType], _names: &[String]) -> bool {
        self.seen += 1;
        self.seen <= self.limit
    }
}

const LOG: &str = "#separator \\x09
#fields\tts\tid.orig_h\torig_bytes
#types\ttime\taddr\tcount
1482538000.25\t10.0.0.1\t-
1482538001.50\t10.0.0.2\t512
1482538002.75\t10.0.0.3\t1024
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let stream = ZeekLogReader::new()
        .transformer(Box::new(ZeroMissingCounts))
        .predicate(Box::new(Limit { seen: 0, limit: 2 }))
        .stream(Cursor::new(LOG))?;

    let schema = stream.schema().clone();
    for record in stream {
        println!("{}", record?.to_json(&schema));
    }
    Ok(())
}
