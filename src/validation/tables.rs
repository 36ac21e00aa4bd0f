//! Table validation functionality
//!
//! Checks that table names and `(table, field)` pairs are unique and that
//! primary keys only name fields of their own table.

use super::ValidationError;
use crate::models::Table;
use std::collections::HashSet;

/// Set of declared `(table, field)` pairs
#[derive(Debug, Default)]
pub struct FieldIndex {
    fields: HashSet<(String, String)>,
}

impl FieldIndex {
    pub fn contains(&self, table: &str, field: &str) -> bool {
        self.fields.contains(&(table.to_string(), field.to_string()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Table validator
pub struct TableValidator;

impl Default for TableValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl TableValidator {
    /// Create a new table validator
    pub fn new() -> Self {
        Self
    }

    /// Check name uniqueness across the tables and index their fields
    pub fn index_fields(&self, tables: &[Table]) -> Result<FieldIndex, ValidationError> {
        let mut table_names = HashSet::new();
        for table in tables {
            if !table_names.insert(table.name.as_str()) {
                return Err(ValidationError::DuplicateTable(table.name.clone()));
            }
        }

        let mut index = FieldIndex::default();
        for table in tables {
            for field in &table.fields {
                if !index
                    .fields
                    .insert((table.name.clone(), field.name.clone()))
                {
                    return Err(ValidationError::DuplicateField {
                        table: table.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }

        Ok(index)
    }

    /// Check that every primary key names declared fields of its table
    pub fn check_primary_keys(
        &self,
        tables: &[Table],
        index: &FieldIndex,
    ) -> Result<(), ValidationError> {
        for table in tables {
            let Some(primary_key) = &table.primary_key else {
                continue;
            };
            for name in primary_key.names() {
                if !index.contains(&table.name, name) {
                    return Err(ValidationError::UnknownPrimaryKeyField {
                        table: table.name.clone(),
                        field: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
