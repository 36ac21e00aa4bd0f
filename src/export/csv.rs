//! CSV table writer

use super::ExportError;
use arrow::csv::{Writer, WriterBuilder};
use arrow::record_batch::RecordBatch;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes record batches of one table to a CSV file.
///
/// The header row comes from the schema of the first batch written. A
/// table with no rows still needs one (empty) batch to get its header.
pub struct CsvTableWriter {
    path: PathBuf,
    writer: Writer<BufWriter<File>>,
    rows: usize,
}

impl CsvTableWriter {
    pub fn create(path: &Path) -> Result<Self, ExportError> {
        let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
        let writer = WriterBuilder::new()
            .with_header(true)
            .build(BufWriter::new(file));
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            rows: 0,
        })
    }

    pub fn write(&mut self, batch: &RecordBatch) -> Result<(), ExportError> {
        self.writer.write(batch)?;
        self.rows += batch.num_rows();
        Ok(())
    }

    /// Flush the file and return the number of rows written
    pub fn finish(self) -> Result<usize, ExportError> {
        let mut inner = self.writer.into_inner();
        inner.flush().map_err(|e| ExportError::io(&self.path, e))?;
        Ok(self.rows)
    }
}
