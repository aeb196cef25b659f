//! Conversion of decoded records into Arrow columns.

use anyhow::Result;
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

use crate::models::{FieldValue, Record, Schema};

static UNSET: FieldValue = FieldValue::Unset;

/// Infer the Arrow type of one column from the values it actually holds.
///
/// Transforms and best-effort fallbacks mean the declared Zeek type is only a
/// hint: a `count` column with a single unparsable token must become text.
/// Integers mixed with counts beyond `i64` widen to UInt64 while none is negative.
pub fn infer_column_type(records: &[Record], index: usize) -> DataType {
    let mut inferred: Option<DataType> = None;
    let mut negative = false;

    for record in records {
        let data_type = match record.fields.get(index) {
            None | Some(FieldValue::Unset) => continue,
            Some(FieldValue::Integer(v)) => {
                negative |= *v < 0;
                DataType::Int64
            }
            Some(FieldValue::Unsigned(_)) => DataType::UInt64,
            Some(FieldValue::Float(_)) => DataType::Float64,
            Some(FieldValue::Address(_)) => DataType::UInt32,
            Some(_) => return DataType::Utf8,
        };

        inferred = match inferred {
            None => Some(data_type),
            Some(existing) if existing == data_type => Some(existing),
            Some(DataType::Int64 | DataType::UInt64)
                if matches!(data_type, DataType::Int64 | DataType::UInt64) =>
            {
                Some(DataType::UInt64)
            }
            Some(_) => return DataType::Utf8,
        };
    }

    match inferred {
        Some(DataType::UInt64) if negative => DataType::Utf8,
        Some(data_type) => data_type,
        None => DataType::Utf8,
    }
}

/// Arrow schema for a set of records, one nullable column per Zeek field.
pub fn infer_arrow_schema(schema: &Schema, records: &[Record]) -> SchemaRef {
    let fields: Vec<Field> = schema
        .field_names
        .iter()
        .enumerate()
        .map(|(i, name)| Field::new(name.as_str(), infer_column_type(records, i), true))
        .collect();
    Arc::new(ArrowSchema::new(fields))
}

/// Build a batch for `records` using a previously inferred schema.
pub fn build_batch(arrow_schema: SchemaRef, records: &[Record]) -> Result<RecordBatch> {
    if arrow_schema.fields().is_empty() {
        let options = RecordBatchOptions::new().with_row_count(Some(records.len()));
        return Ok(RecordBatch::try_new_with_options(arrow_schema, vec![], &options)?);
    }

    let arrays = arrow_schema
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| build_column(records, i, field.data_type()))
        .collect::<Vec<_>>();

    Ok(RecordBatch::try_new(arrow_schema, arrays)?)
}

/// Materialise all records as one batch.
pub fn to_record_batch(schema: &Schema, records: &[Record]) -> Result<RecordBatch> {
    build_batch(infer_arrow_schema(schema, records), records)
}

fn build_column(records: &[Record], index: usize, data_type: &DataType) -> ArrayRef {
    let values = records.iter().map(|r| r.fields.get(index).unwrap_or(&UNSET));

    match data_type {
        DataType::Int64 => Arc::new(Int64Array::from(
            values.map(FieldValue::as_i64).collect::<Vec<_>>(),
        )),
        DataType::UInt64 => Arc::new(UInt64Array::from(
            values
                .map(|v| match v {
                    FieldValue::Unsigned(u) => Some(*u),
                    FieldValue::Integer(i) => u64::try_from(*i).ok(),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        DataType::Float64 => Arc::new(Float64Array::from(
            values
                .map(|v| match v {
                    FieldValue::Float(f) => Some(*f),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        DataType::UInt32 => Arc::new(UInt32Array::from(
            values
                .map(|v| match v {
                    FieldValue::Address(a) => Some(*a),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        _ => Arc::new(StringArray::from(
            values
                .map(|v| match v {
                    FieldValue::Unset => None,
                    other => Some(other.to_string()),
                })
                .collect::<Vec<_>>(),
        )),
    }
}
