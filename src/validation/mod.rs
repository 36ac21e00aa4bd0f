//! Validation functionality
//!
//! Provides validation logic for metadata documents:
//! - Structural validation against the metadata JSON Schema
//! - Table validation (unique names, primary keys)
//! - Relationship validation (foreign keys and constraints reference declared fields)

pub mod relationships;
pub mod schema;
pub mod tables;

use crate::models::MetaData;

pub use relationships::RelationshipValidator;
pub use schema::{schema_validator, validate_metadata_internal, validate_structure};
pub use tables::{FieldIndex, TableValidator};

/// Error during metadata validation
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Schema validation failed at path '{path}': {message}")]
    Schema { path: String, message: String },
    #[error(
        "Foreign key arity mismatch at '{path}': {table} has {field_arity} field(s), {ref_table} has {ref_field_arity}"
    )]
    KeyArity {
        path: String,
        table: String,
        ref_table: String,
        field_arity: usize,
        ref_field_arity: usize,
    },
    #[error("Duplicate table name: {0}")]
    DuplicateTable(String),
    #[error("Duplicate field name {field} in table {table}")]
    DuplicateField { table: String, field: String },
    #[error("Primary key of table {table} references unknown field {field}")]
    UnknownPrimaryKeyField { table: String, field: String },
    #[error("Foreign key {table} -> {ref_table} references unknown field {missing}")]
    DanglingForeignKey {
        table: String,
        ref_table: String,
        missing: String,
    },
    #[error("Constraint {constraint} references unknown field {table}.{field}")]
    DanglingConstraintField {
        constraint: usize,
        table: String,
        field: String,
    },
    #[error("Schema error: {0}")]
    SchemaCompile(String),
}

impl ValidationError {
    /// Whether the error comes from the structural phase
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ValidationError::Schema { .. }
                | ValidationError::KeyArity { .. }
                | ValidationError::SchemaCompile(_)
        )
    }
}

/// Validate a metadata document
///
/// The structural phase runs first and any failure there stops validation
/// before the referential checks run. Referential checks stop at the first
/// violation.
pub fn validate_metadata(metadata: &MetaData) -> Result<(), ValidationError> {
    schema::validate_document_structure(metadata)?;

    let table_validator = TableValidator::new();
    let index = table_validator.index_fields(metadata.tables())?;
    table_validator.check_primary_keys(metadata.tables(), &index)?;

    let relationship_validator = RelationshipValidator::new();
    relationship_validator.check_foreign_keys(metadata.foreign_keys(), &index)?;
    relationship_validator.check_constraints(metadata.constraints(), &index)?;

    Ok(())
}
