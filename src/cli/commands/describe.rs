//! Describe command implementation

use crate::cli::error::CliError;
use crate::models::MetaData;
use std::path::Path;

/// Load a metadata document and print its summary
pub fn handle_describe(path: &Path) -> Result<(), CliError> {
    let metadata = MetaData::from_json(path)?;
    print!("{}", metadata);
    Ok(())
}
