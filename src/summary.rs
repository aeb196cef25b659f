//! Descriptive statistics over numeric columns.

use anyhow::Result;
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

use crate::models::{Record, Schema};
use crate::table::infer_column_type;

const STATISTICS: [&str; 5] = ["count", "mean", "std", "min", "max"];

/// Summary of a single numeric column. Unset values are not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; `None` below two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    pub fn from_values(name: &str, values: &[f64]) -> Self {
        let count = values.len();
        let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
        let std = mean.filter(|_| count > 1).map(|mean| {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        });

        Self {
            name: name.to_string(),
            count,
            mean,
            std,
            min: values.iter().copied().reduce(f64::min),
            max: values.iter().copied().reduce(f64::max),
        }
    }

    fn column(&self) -> Vec<Option<f64>> {
        vec![Some(self.count as f64), self.mean, self.std, self.min, self.max]
    }
}

fn is_numeric(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int64 | DataType::UInt64 | DataType::Float64 | DataType::UInt32
    )
}

/// Summaries for every column whose values are all numeric.
pub fn summarize(schema: &Schema, records: &[Record]) -> Vec<ColumnSummary> {
    schema
        .field_names
        .iter()
        .enumerate()
        .filter(|(i, _)| is_numeric(&infer_column_type(records, *i)))
        .map(|(i, name)| {
            let values: Vec<f64> = records
                .iter()
                .filter_map(|r| r.fields.get(i).and_then(|v| v.as_f64()))
                .collect();
            ColumnSummary::from_values(name, &values)
        })
        .collect()
}

/// A `describe()`-style table: one row per statistic, one column per numeric field.
pub fn describe(schema: &Schema, records: &[Record]) -> Result<RecordBatch> {
    let summaries = summarize(schema, records);

    let mut fields = vec![Field::new("statistic", DataType::Utf8, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from(STATISTICS.to_vec()))];

    for summary in &summaries {
        fields.push(Field::new(summary.name.as_str(), DataType::Float64, true));
        arrays.push(Arc::new(Float64Array::from(summary.column())));
    }

    Ok(RecordBatch::try_new(Arc::new(ArrowSchema::new(fields)), arrays)?)
}
