//! Export functionality
//!
//! Writes a connector's metadata document and table contents into a
//! directory:
//! - `metadata.json`: the metadata document
//! - `<table>.csv`: one file per table, with a header row and no index column

pub mod csv;

use crate::connectors::{Connector, ConnectorError};
use crate::models::MetadataError;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the exported metadata document
pub const METADATA_FILE: &str = "metadata.json";

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Connector(#[from] ConnectorError),
    #[error("CSV error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("Table name {0:?} cannot be used as a file name")]
    InvalidTableName(String),
}

impl ExportError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Path of the CSV file for `table_name` inside `output_dir`
///
/// Names that would resolve outside `output_dir` or into a subdirectory
/// (empty, `.`, `..`, path separators, NUL) are rejected.
pub fn table_path(output_dir: &Path, table_name: &str) -> Result<PathBuf, ExportError> {
    let invalid = table_name.is_empty()
        || table_name == "."
        || table_name == ".."
        || table_name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(ExportError::InvalidTableName(table_name.to_string()));
    }
    Ok(output_dir.join(format!("{}.csv", table_name)))
}

/// Export metadata and every table of `connector` into `output_dir`
///
/// The directory is created if it does not exist. Existing files with the
/// same names are overwritten.
pub fn export<C: Connector + ?Sized>(
    connector: &mut C,
    output_dir: &Path,
) -> Result<(), ExportError> {
    std::fs::create_dir_all(output_dir).map_err(|e| ExportError::io(output_dir, e))?;

    let metadata_path = output_dir.join(METADATA_FILE);
    connector.export_metadata(&metadata_path)?;
    info!("Wrote metadata to {}", metadata_path.display());

    connector.export_tables(output_dir)?;
    info!(
        "Exported {} table(s) to {}",
        connector.metadata().tables().len(),
        output_dir.display()
    );
    Ok(())
}
