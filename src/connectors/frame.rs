//! Connector for in-memory tables
//!
//! Each table is an Arrow [`RecordBatch`]. Field types are inferred from the
//! column types alone; no primary or foreign keys are detected.

use super::{Connector, ConnectorError};
use crate::export::{ExportError, csv::CsvTableWriter, table_path};
use crate::models::{Field, MetaData, Table};
use crate::typemap::FrameTypeMapper;
use arrow::record_batch::RecordBatch;
use std::path::Path;
use tracing::{debug, info};

/// Connector over named Arrow record batches
pub struct FrameConnector {
    tables: Vec<(String, RecordBatch)>,
    metadata: MetaData,
}

impl FrameConnector {
    /// Create a connector from `(table name, batch)` pairs
    ///
    /// Tables keep the given order in the metadata document and on export.
    pub fn new<I, S>(tables: I) -> Result<Self, ConnectorError>
    where
        I: IntoIterator<Item = (S, RecordBatch)>,
        S: Into<String>,
    {
        let tables: Vec<(String, RecordBatch)> = tables
            .into_iter()
            .map(|(name, batch)| (name.into(), batch))
            .collect();

        let mut metadata = MetaData::new();
        metadata.set_tables(Self::analyze_tables(&tables)?)?;
        info!("Analyzed {} in-memory table(s)", tables.len());

        Ok(Self { tables, metadata })
    }

    fn analyze_tables(tables: &[(String, RecordBatch)]) -> Result<Vec<Table>, ConnectorError> {
        tables
            .iter()
            .map(|(name, batch)| {
                Self::analyze_fields(name, batch).map(|fields| Table::new(name.clone(), fields))
            })
            .collect()
    }

    fn analyze_fields(table_name: &str, batch: &RecordBatch) -> Result<Vec<Field>, ConnectorError> {
        let mapper = FrameTypeMapper::new();
        batch
            .schema_ref()
            .fields()
            .iter()
            .map(|column| -> Result<Field, ConnectorError> {
                let field_type = mapper.map_arrow_type(column.data_type()).map_err(|source| {
                    ConnectorError::TypeMapping {
                        table: table_name.to_string(),
                        field: column.name().clone(),
                        source,
                    }
                })?;
                debug!(
                    "{}.{}: {} -> {}",
                    table_name,
                    column.name(),
                    column.data_type(),
                    field_type
                );
                Ok(Field::typed(column.name().clone(), field_type))
            })
            .collect()
    }
}

impl Connector for FrameConnector {
    fn metadata(&self) -> &MetaData {
        &self.metadata
    }

    fn export_tables(&mut self, output_dir: &Path) -> Result<(), ExportError> {
        for (name, batch) in &self.tables {
            let mut writer = CsvTableWriter::create(&table_path(output_dir, name)?)?;
            writer.write(batch)?;
            let rows = writer.finish()?;
            debug!("Exported {} row(s) of {}", rows, name);
        }
        Ok(())
    }
}
