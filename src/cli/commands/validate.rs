//! Validate command implementation

use crate::cli::error::CliError;
use crate::validation::schema::validate_metadata_internal;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate one metadata file
pub fn validate_file(path: &Path) -> Result<(), CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
    validate_metadata_internal(&content).map_err(CliError::ValidationError)
}

/// Handle the validate command
///
/// Every file is checked even after a failure. Fails if any file did.
pub fn handle_validate(paths: &[PathBuf]) -> Result<(), CliError> {
    if paths.is_empty() {
        return Err(CliError::InvalidArgument(
            "at least one metadata file is required".to_string(),
        ));
    }

    let mut failed = 0;
    for path in paths {
        println!("Validating {}...", path.display());
        match validate_file(path) {
            Ok(()) => {
                debug!("{} is valid", path.display());
                println!("  OK");
            }
            Err(e) => {
                failed += 1;
                println!("  {}", e);
            }
        }
    }

    if failed > 0 {
        return Err(CliError::ValidationFailures {
            failed,
            total: paths.len(),
        });
    }
    println!("Validation successful");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write_file(dir.path(), "bad.json", r#"{"tables": [{"name": "t"}]}"#);
        let good = write_file(
            dir.path(),
            "good.json",
            r#"{"tables": [{"name": "t", "fields": [{"name": "id", "data_type": "id"}]}]}"#,
        );

        let err = handle_validate(&[bad, good]).unwrap_err();
        assert!(matches!(
            err,
            CliError::ValidationFailures {
                failed: 1,
                total: 2
            }
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = validate_file(Path::new("/nonexistent/metadata.json")).unwrap_err();
        assert!(matches!(err, CliError::FileReadError(..)));
    }
}
