use anyhow::Result;
use log::info;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::fs::{create_dir_all, File};
use std::path::Path;

use crate::models::{Record, Schema};
use crate::table::{build_batch, infer_arrow_schema};

pub struct ParquetFormatter {
    output_directory: String,
    chunk_size: usize,
}

impl ParquetFormatter {
    pub fn new(output_directory: String, chunk_size: usize) -> Self {
        Self {
            output_directory,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_count(&self, num_records: usize) -> usize {
        num_records.div_ceil(self.chunk_size)
    }

    /// Write `records` as `file_partNNN.parquet` files of at most `chunk_size` rows.
    ///
    /// Column types are inferred once over every record so all parts share
    /// the same Arrow schema.
    pub fn convert(&self, schema: &Schema, records: &[Record]) -> Result<()> {
        if records.is_empty() {
            anyhow::bail!("No valid records to write to Parquet");
        }

        create_dir_all(&self.output_directory)?;

        let arrow_schema = infer_arrow_schema(schema, records);
        let total_chunks = self.chunk_count(records.len());
        info!("Writing {} records in {} chunk(s)", records.len(), total_chunks);

        for (i, chunk) in records.chunks(self.chunk_size).enumerate() {
            info!("Writing chunk {}/{}, {} rows", i + 1, total_chunks, chunk.len());

            let output_path = Path::new(&self.output_directory).join(format!("file_part{:03}.parquet", i));
            let batch = build_batch(arrow_schema.clone(), chunk)?;

            let file = File::create(&output_path)?;
            let props = WriterProperties::builder().build();
            let mut writer = ArrowWriter::try_new(file, arrow_schema.clone(), Some(props))?;
            writer.write(&batch)?;
            writer.close()?;
        }

        info!("All chunks have been written");
        Ok(())
    }
}
