//! Read a Zeek `conn.log`, keep TCP connections only, and print a summary.

use zeek_log_parser::{FieldType, FieldValue, ZeekLogReader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "conn.log".to_string());

    let log = ZeekLogReader::new()
        .filter(|fields: &[FieldValue], _: &[FieldType], names: &[String]| -> Option<bool> {
            let proto = names.iter().position(|n| n == "proto")?;
            Some(fields[proto].as_str() == Some("tcp"))
        })
        .read_file(&path)?;

    println!("{}", log.stats().summary());
    for summary in zeek_log_parser::summary::summarize(log.schema(), log.records()) {
        println!(
            "{:<20} count={:<8} mean={:?} max={:?}",
            summary.name, summary.count, summary.mean, summary.max
        );
    }

    Ok(())
}
