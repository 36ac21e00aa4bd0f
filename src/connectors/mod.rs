//! Source connectors
//!
//! A connector inspects a data source on construction and owns the
//! resulting [`MetaData`]. It also knows how to write the rows of every
//! table to a flat file:
//! - [`FrameConnector`]: in-memory Arrow record batches
//! - [`MysqlConnector`]: a MySQL database (feature `mysql`)

#[cfg(feature = "mysql")]
pub mod config;
pub mod frame;
#[cfg(feature = "mysql")]
pub mod mysql;

use crate::export::ExportError;
use crate::models::{MetaData, MetadataError};
use crate::typemap::TypeMapError;
use std::path::Path;

#[cfg(feature = "mysql")]
pub use config::{DEFAULT_PORT, MysqlConfig};
pub use frame::FrameConnector;
#[cfg(feature = "mysql")]
pub use mysql::MysqlConnector;

/// Error raised while populating a connector's metadata
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("Cannot map type of {table}.{field}: {source}")]
    TypeMapping {
        table: String,
        field: String,
        #[source]
        source: TypeMapError,
    },
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("Database error: {message}\n  Context: {context}")]
    Database { message: String, context: String },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConnectorError {
    /// Create a Database error with context about where it occurred
    pub fn database(message: impl ToString, context: impl Into<String>) -> Self {
        ConnectorError::Database {
            message: message.to_string(),
            context: context.into(),
        }
    }
}

/// A populated data source that can be exported
pub trait Connector {
    /// The metadata document built from the source
    fn metadata(&self) -> &MetaData;

    /// Write the metadata document to a JSON file
    fn export_metadata(&self, path: &Path) -> Result<(), ExportError> {
        self.metadata().to_json(Some(path))?;
        Ok(())
    }

    /// Write every table to `<output_dir>/<table>.csv`
    fn export_tables(&mut self, output_dir: &Path) -> Result<(), ExportError>;

    /// Export metadata and tables into `output_dir`, creating it if needed
    fn export(&mut self, output_dir: &Path) -> Result<(), ExportError> {
        crate::export::export(self, output_dir)
    }
}
