//! Constraint model for the metadata document
//!
//! Constraints describe relationships between fields beyond foreign keys,
//! e.g. a derived or statistical dependency. Only the referenced fields are
//! interpreted; any other keys are kept as an opaque payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `(table, field)` reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(deny_unknown_fields)]
pub struct FieldRef {
    pub table: String,
    pub field: String,
}

impl FieldRef {
    pub fn new(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            field: field.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Constraint {
    pub fields_under_consideration: Vec<FieldRef>,
    pub related_fields: Vec<FieldRef>,
    /// Constraint-specific keys
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Constraint {
    pub fn new(fields_under_consideration: Vec<FieldRef>, related_fields: Vec<FieldRef>) -> Self {
        Self {
            fields_under_consideration,
            related_fields,
            payload: Map::new(),
        }
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    /// All referenced fields, considered ones first
    pub fn referenced_fields(&self) -> impl Iterator<Item = &FieldRef> {
        self.fields_under_consideration
            .iter()
            .chain(self.related_fields.iter())
    }
}
