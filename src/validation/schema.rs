//! JSON Schema validation of metadata documents
//!
//! The schema in `schemas/metadata.schema.json` is compiled once, on first
//! use, and the compiled validator is shared by every later call.

use super::ValidationError;
use crate::models::{ForeignKey, MetaData};
use jsonschema::Validator;
use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::debug;

const METADATA_SCHEMA: &str = include_str!("../../schemas/metadata.schema.json");

static METADATA_VALIDATOR: OnceCell<Validator> = OnceCell::new();

/// Return the compiled metadata schema, compiling it on the first call
pub fn schema_validator() -> Result<&'static Validator, ValidationError> {
    METADATA_VALIDATOR.get_or_try_init(|| {
        let schema: Value = serde_json::from_str(METADATA_SCHEMA).map_err(|e| {
            ValidationError::SchemaCompile(format!("Failed to load metadata schema: {}", e))
        })?;
        let validator = Validator::new(&schema).map_err(|e| {
            ValidationError::SchemaCompile(format!("Failed to compile metadata schema: {}", e))
        })?;
        debug!("Compiled metadata schema");
        Ok(validator)
    })
}

/// Convert a jsonschema error into a structural validation error
fn format_validation_error(error: &jsonschema::ValidationError) -> ValidationError {
    let path = error.instance_path().to_string();
    let path = if path == "/" || path.is_empty() {
        "root".to_string()
    } else {
        path
    };

    ValidationError::Schema {
        path,
        message: error.to_string(),
    }
}

/// Check a raw JSON value against the metadata schema
pub fn validate_structure(instance: &Value) -> Result<(), ValidationError> {
    let validator = schema_validator()?;
    if let Err(error) = validator.validate(instance) {
        return Err(format_validation_error(&error));
    }
    Ok(())
}

/// Check that both sides of every foreign key span the same number of fields
///
/// The schema rejects a scalar paired with a list; two lists of different
/// lengths can only be caught here.
pub fn check_key_arity(foreign_keys: &[ForeignKey]) -> Result<(), ValidationError> {
    for (index, fk) in foreign_keys.iter().enumerate() {
        if fk.field.arity() != fk.ref_field.arity() {
            return Err(ValidationError::KeyArity {
                path: format!("/foreign_keys/{}", index),
                table: fk.table.clone(),
                ref_table: fk.ref_table.clone(),
                field_arity: fk.field.arity(),
                ref_field_arity: fk.ref_field.arity(),
            });
        }
    }
    Ok(())
}

/// Structural phase for a typed document
pub fn validate_document_structure(metadata: &MetaData) -> Result<(), ValidationError> {
    let instance = serde_json::to_value(metadata).map_err(|e| ValidationError::Schema {
        path: "root".to_string(),
        message: format!("Failed to serialize metadata: {}", e),
    })?;
    validate_structure(&instance)?;
    check_key_arity(metadata.foreign_keys())
}

/// Validate metadata JSON text
///
/// The raw value is checked against the schema before it is loaded, so
/// structural problems are reported with their JSON path rather than as a
/// deserialization error. The loaded document is then fully validated.
/// Returns a string error for use by the CLI.
pub fn validate_metadata_internal(content: &str) -> Result<(), String> {
    let data: Value =
        serde_json::from_str(content).map_err(|e| format!("Failed to parse JSON: {}", e))?;

    validate_structure(&data).map_err(|e| e.to_string())?;

    let metadata =
        MetaData::from_json_str(content).map_err(|e| format!("Failed to load metadata: {}", e))?;
    metadata.validate().map_err(|e| e.to_string())
}
