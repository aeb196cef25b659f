//! Per-row transform and filter hooks.

use crate::decoder::RowDecoder;
use crate::error::Result;
use crate::models::{FieldType, FieldValue, Record, Schema};
use std::fmt;

/// Rewrites decoded field values in place before filtering.
pub trait RowTransformer {
    fn transform(&mut self, fields: &mut [FieldValue], types: &[FieldType], names: &[String]);
}

impl<F> RowTransformer for F
where
    F: FnMut(&mut [FieldValue], &[FieldType], &[String]),
{
    fn transform(&mut self, fields: &mut [FieldValue], types: &[FieldType], names: &[String]) {
        (*self)(fields, types, names)
    }
}

/// Decides whether a (transformed) row is kept.
pub trait RowPredicate {
    fn accept(&mut self, fields: &[FieldValue], types: &[FieldType], names: &[String]) -> bool;
}

impl<F> RowPredicate for F
where
    F: FnMut(&[FieldValue], &[FieldType], &[String]) -> bool,
{
    fn accept(&mut self, fields: &[FieldValue], types: &[FieldType], names: &[String]) -> bool {
        (*self)(fields, types, names)
    }
}

/// Return value of a filter closure.
///
/// Filters are inclusive: only an explicit `false` drops the row.
pub trait FilterOutcome {
    fn rejects(&self) -> bool;
}

impl FilterOutcome for bool {
    fn rejects(&self) -> bool {
        !*self
    }
}

impl FilterOutcome for Option<bool> {
    fn rejects(&self) -> bool {
        *self == Some(false)
    }
}

impl FilterOutcome for () {
    fn rejects(&self) -> bool {
        false
    }
}

/// Adapt any closure returning a [`FilterOutcome`] into a boxed predicate.
pub fn predicate_fn<F, O>(mut f: F) -> Box<dyn RowPredicate>
where
    F: FnMut(&[FieldValue], &[FieldType], &[String]) -> O + 'static,
    O: FilterOutcome + 'static,
{
    Box::new(
        move |fields: &[FieldValue], types: &[FieldType], names: &[String]| -> bool {
            !f(fields, types, names).rejects()
        },
    )
}

/// Decode, transform, filter; in that order, once per data line.
#[derive(Default)]
pub struct RowPipeline {
    transformer: Option<Box<dyn RowTransformer>>,
    predicate: Option<Box<dyn RowPredicate>>,
}

impl RowPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transformer(mut self, transformer: Box<dyn RowTransformer>) -> Self {
        self.transformer = Some(transformer);
        self
    }

    pub fn with_predicate(mut self, predicate: Box<dyn RowPredicate>) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Run one data line through the pipeline.
    ///
    /// Returns `Ok(None)` when the filter rejects the row.
    pub fn process(&mut self, schema: &Schema, line: &str, line_no: u64) -> Result<Option<Record>> {
        let mut record = RowDecoder::new(schema).decode(line, line_no)?;

        if let Some(transformer) = self.transformer.as_mut() {
            transformer.transform(&mut record.fields, &schema.field_types, &schema.field_names);
        }

        if let Some(predicate) = self.predicate.as_mut() {
            if !predicate.accept(&record.fields, &schema.field_types, &schema.field_names) {
                return Ok(None);
            }
        }

        Ok(Some(record))
    }
}

impl fmt::Debug for RowPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowPipeline")
            .field("transformer", &self.transformer.is_some())
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proto_schema() -> Schema {
        Schema {
            field_names: vec!["uid".into(), "proto".into()],
            field_types: vec![FieldType::Other("string".into()), FieldType::Other("enum".into())],
            ..Schema::default()
        }
    }

    #[test]
    fn test_filter_sees_transformed_values() {
        let schema = proto_schema();
        let mut pipeline = RowPipeline::new()
            .with_transformer(Box::new(|fields: &mut [FieldValue], _: &[FieldType], _: &[String]| {
                if let FieldValue::Text(proto) = &mut fields[1] {
                    *proto = proto.to_lowercase();
                }
            }))
            .with_predicate(predicate_fn(|fields: &[FieldValue], _: &[FieldType], _: &[String]| {
                fields[1].as_str() == Some("tcp")
            }));

        let kept = pipeline.process(&schema, "C1 TCP", 1).unwrap().unwrap();
        assert_eq!(kept.fields[1], FieldValue::Text("tcp".into()));
        assert!(pipeline.process(&schema, "C2 UDP", 2).unwrap().is_none());
    }

    #[test]
    fn test_filter_outcomes() {
        assert!(false.rejects());
        assert!(!true.rejects());
        assert!(Some(false).rejects());
        assert!(!None::<bool>.rejects());
        assert!(!().rejects());
    }

    #[test]
    fn test_unit_filter_keeps_everything() {
        let schema = proto_schema();
        let mut pipeline = RowPipeline::new()
            .with_predicate(predicate_fn(|_: &[FieldValue], _: &[FieldType], _: &[String]| {}));
        assert!(pipeline.process(&schema, "C1 udp", 1).unwrap().is_some());
    }
}
