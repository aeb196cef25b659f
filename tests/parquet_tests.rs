mod common;

use arrow::array::{Array, Float64Array, Int64Array, StringArray, UInt32Array};
use arrow::datatypes::DataType;
use common::conn_log;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::io::Cursor;
use tempfile::tempdir;
use zeek_log_parser::{Error, ParquetWriter, Schema, ZeekLogReader};

#[test]
fn test_record_batch_types() {
    let log = ZeekLogReader::new().read(Cursor::new(conn_log().build())).unwrap();
    let batch = log.to_record_batch().unwrap();
    let schema = batch.schema();

    assert_eq!(batch.num_rows(), 3);
    assert_eq!(schema.field_with_name("ts").unwrap().data_type(), &DataType::Utf8);
    assert_eq!(schema.field_with_name("id.orig_h").unwrap().data_type(), &DataType::UInt32);
    assert_eq!(schema.field_with_name("id.resp_p").unwrap().data_type(), &DataType::Int64);
    assert_eq!(schema.field_with_name("duration").unwrap().data_type(), &DataType::Float64);
    assert_eq!(schema.field_with_name("orig_bytes").unwrap().data_type(), &DataType::Int64);

    let orig_h = batch.column(2).as_any().downcast_ref::<UInt32Array>().unwrap();
    assert_eq!(orig_h.value(0), 3_232_235_777);
    assert_eq!(orig_h.value(2), 0);

    let duration = batch.column(7).as_any().downcast_ref::<Float64Array>().unwrap();
    assert!(duration.is_null(1));
    assert_eq!(duration.value(2), 0.25);

    let service = batch.column(9).as_any().downcast_ref::<StringArray>().unwrap();
    assert_eq!(service.value(0), "http");
    assert_eq!(service.value(2), "");
}

#[test]
fn test_describe_numeric_columns() {
    let log = ZeekLogReader::new().read(Cursor::new(conn_log().build())).unwrap();
    let summary = log.describe().unwrap();
    let schema = summary.schema();

    let names: Vec<_> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(
        names,
        vec!["statistic", "id.orig_h", "id.orig_p", "id.resp_h", "id.resp_p", "duration", "orig_bytes"]
    );

    let orig_bytes = summary
        .column_by_name("orig_bytes")
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(orig_bytes.value(0), 2.0); // count
    assert_eq!(orig_bytes.value(1), 750.0); // mean
    assert_eq!(orig_bytes.value(3), 300.0); // min
    assert_eq!(orig_bytes.value(4), 1200.0); // max
}

#[test]
fn test_write_parquet_chunks() {
    let dir = tempdir().unwrap();
    let output_dir = dir.path().join("output");

    let log = ZeekLogReader::new().read(Cursor::new(conn_log().build())).unwrap();
    let stats = ParquetWriter::new(&output_dir)
        .chunk_size(2)
        .write_log(&log)
        .unwrap();

    assert_eq!(stats.num_records, 3);
    assert_eq!(stats.num_chunks, 2);
    assert!(output_dir.join("file_part000.parquet").exists());
    assert!(output_dir.join("file_part001.parquet").exists());

    let file = File::open(output_dir.join("file_part001.parquet")).unwrap();
    let mut reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let batch = reader.next().unwrap().unwrap();

    assert_eq!(batch.num_rows(), 1);
    let resp_p = batch
        .column_by_name("id.resp_p")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(resp_p.value(0), 443);
}

#[test]
fn test_write_empty_fails() {
    let dir = tempdir().unwrap();
    let err = ParquetWriter::new(dir.path())
        .write(&Schema::default(), &[])
        .unwrap_err();
    assert!(matches!(err, Error::OutputError(_)));
}
