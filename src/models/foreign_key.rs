//! Foreign key model for the metadata document

use super::key::Key;
use serde::{Deserialize, Serialize};

/// Reference from `table.field` to `ref_table.ref_field`
///
/// `field` and `ref_field` must span the same number of columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ForeignKey {
    pub table: String,
    pub field: Key,
    pub ref_table: String,
    pub ref_field: Key,
}

impl ForeignKey {
    pub fn new(
        table: impl Into<String>,
        field: impl Into<Key>,
        ref_table: impl Into<String>,
        ref_field: impl Into<Key>,
    ) -> Self {
        Self {
            table: table.into(),
            field: field.into(),
            ref_table: ref_table.into(),
            ref_field: ref_field.into(),
        }
    }

    /// Whether the key touches the table, as source or as reference
    pub fn involves(&self, table_name: &str) -> bool {
        self.table == table_name || self.ref_table == table_name
    }

    /// `(table, field)` pairs on the referencing side
    pub fn source_columns(&self) -> Vec<(&str, &str)> {
        self.field
            .names()
            .into_iter()
            .map(|f| (self.table.as_str(), f))
            .collect()
    }

    /// `(table, field)` pairs on the referenced side
    pub fn referenced_columns(&self) -> Vec<(&str, &str)> {
        self.ref_field
            .names()
            .into_iter()
            .map(|f| (self.ref_table.as_str(), f))
            .collect()
    }
}
