//! Command-line interface for the Zeek log parser.
//!
//! Decodes one or more Zeek logs, prints the first rows and a statistical
//! summary, and optionally writes the result to Parquet.

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use clap::Parser;
use log::{info, LevelFilter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use zeek_log_parser::{FieldType, FieldValue, ParquetWriter, ZeekLog, ZeekLogReader};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Decode Zeek/Bro log files into typed tables",
    long_about = "Reads self-describing Zeek ASCII logs, decodes every field according to its declared type, \
                  and prints a preview and summary statistics.\n\n\
                  Rows can be narrowed with --filter and exported to Parquet with --parquet-out."
)]
struct Args {
    /// Zeek log files to read
    #[arg(value_name = "LOG", required = true)]
    files: Vec<PathBuf>,

    /// Number of rows to preview
    #[arg(long, default_value = "10")]
    head: usize,

    /// Keep only rows where FIELD renders as VALUE (repeatable; all must match)
    #[arg(long, value_name = "FIELD=VALUE", value_parser = parse_filter)]
    filter: Vec<(String, String)>,

    /// Skip rows whose field count does not match the header
    #[arg(long)]
    skip_malformed: bool,

    /// Print accepted records as JSON lines instead of tables
    #[arg(long)]
    json: bool,

    /// Directory to write Parquet output into (one sub-directory per log)
    #[arg(long, value_name = "DIR")]
    parquet_out: Option<PathBuf>,

    /// Number of rows per Parquet file chunk
    #[arg(long, default_value = "50000")]
    chunk_size: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_filter(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(field, value)| (field.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", s))
}

fn build_reader(args: &Args) -> ZeekLogReader {
    let reader = ZeekLogReader::new().skip_malformed(args.skip_malformed);
    if args.filter.is_empty() {
        return reader;
    }

    let conditions = args.filter.clone();
    reader.filter(move |fields: &[FieldValue], _: &[FieldType], names: &[String]| {
        conditions.iter().all(|(field, expected)| {
            names
                .iter()
                .position(|n| n == field)
                .and_then(|i| fields.get(i))
                .is_some_and(|value| value.to_string() == *expected)
        })
    })
}

fn process_one_file(path: &Path, args: &Args) -> Result<()> {
    info!("📄 Processing: {}", path.display());
    let start_time = Instant::now();

    let log = build_reader(args).read_file(path)?;
    let schema = log.schema();

    if let Some(log_path) = &schema.path {
        info!("   ├─ Path: {}", log_path);
    }
    info!("   ├─ Separator: {:?}", schema.field_separator);
    info!("   ├─ Fields: {}", schema.len());
    info!("   ├─ {}", log.stats().summary());

    if args.json {
        for record in log.records() {
            println!("{}", record.to_json(schema));
        }
    } else {
        print_tables(&log, args.head)?;
    }

    if let Some(out_root) = &args.parquet_out {
        if log.is_empty() {
            info!("   ├─ No records, skipping Parquet output");
        } else {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unknown");
            let output_dir = out_root.join(format!("filename={}", stem));
            let stats = ParquetWriter::new(&output_dir)
                .chunk_size(args.chunk_size)
                .write_log(&log)?;
            info!("   ├─ {}", stats.summary());
        }
    }

    info!("   └─ ✓ Total time: {:.2?}\n", start_time.elapsed());
    Ok(())
}

fn print_tables(log: &ZeekLog, head: usize) -> Result<()> {
    let batch = log.to_record_batch()?;
    let preview = batch.slice(0, head.min(batch.num_rows()));
    println!("{}", pretty_format_batches(&[preview]).context("formatting preview")?);

    let summary = log.describe()?;
    if summary.num_columns() > 1 {
        println!("{}", pretty_format_batches(&[summary]).context("formatting summary")?);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .format_timestamp(None)
        .init();

    info!("📂 {} log file(s) to decode", args.files.len());
    let total_start = Instant::now();
    let mut failures = 0;

    for (idx, path) in args.files.iter().enumerate() {
        info!("[{}/{}]", idx + 1, args.files.len());

        if let Err(e) = process_one_file(path, &args) {
            log::error!("   └─ ✗ Error: {:#}", e);
            failures += 1;
        }
    }

    info!("🏁 All files processed in {:.2?}", total_start.elapsed());

    if failures > 0 {
        anyhow::bail!("{} of {} file(s) failed", failures, args.files.len());
    }
    Ok(())
}
