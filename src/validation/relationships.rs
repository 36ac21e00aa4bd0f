//! Relationship validation functionality
//!
//! Checks that foreign keys and constraints only reference declared fields.

use super::ValidationError;
use super::tables::FieldIndex;
use crate::models::{Constraint, ForeignKey};

/// Relationship validator
pub struct RelationshipValidator;

impl Default for RelationshipValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RelationshipValidator {
    /// Create a new relationship validator
    pub fn new() -> Self {
        Self
    }

    /// Check both sides of every foreign key against the field index
    pub fn check_foreign_keys(
        &self,
        foreign_keys: &[ForeignKey],
        index: &FieldIndex,
    ) -> Result<(), ValidationError> {
        for fk in foreign_keys {
            let columns = fk
                .source_columns()
                .into_iter()
                .chain(fk.referenced_columns());
            for (table, field) in columns {
                if !index.contains(table, field) {
                    return Err(ValidationError::DanglingForeignKey {
                        table: fk.table.clone(),
                        ref_table: fk.ref_table.clone(),
                        missing: format!("{}.{}", table, field),
                    });
                }
            }
        }
        Ok(())
    }

    /// Check every field referenced by a constraint against the field index
    pub fn check_constraints(
        &self,
        constraints: &[Constraint],
        index: &FieldIndex,
    ) -> Result<(), ValidationError> {
        for (position, constraint) in constraints.iter().enumerate() {
            for field_ref in constraint.referenced_fields() {
                if !index.contains(&field_ref.table, &field_ref.field) {
                    return Err(ValidationError::DanglingConstraintField {
                        constraint: position,
                        table: field_ref.table.clone(),
                        field: field_ref.field.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
