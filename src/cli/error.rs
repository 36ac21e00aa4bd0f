//! CLI error types

use crate::connectors::ConnectorError;
use crate::export::ExportError;
use crate::models::MetadataError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("{failed} of {total} file(s) failed validation")]
    ValidationFailures { failed: usize, total: usize },
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Connector(#[from] ConnectorError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
