//! Table model for the metadata document

use super::field::Field;
use super::key::Key;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Table {
    pub name: String,
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<Key>,
}

impl Table {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            primary_key: None,
        }
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<Key>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Whether the field belongs to this table's primary key
    pub fn is_primary_key(&self, field_name: &str) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(|pk| pk.contains(field_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataType;

    #[test]
    fn test_table_without_primary_key_omits_it() {
        let table = Table::new("users", vec![Field::new("name", DataType::Text)]);
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.get("primary_key").is_none());
    }

    #[test]
    fn test_is_primary_key() {
        let table = Table::new(
            "order_items",
            vec![
                Field::new("order_id", DataType::Id),
                Field::new("line", DataType::Id),
                Field::new("qty", DataType::Numerical),
            ],
        )
        .with_primary_key(vec!["order_id", "line"]);

        assert!(table.is_primary_key("order_id"));
        assert!(table.is_primary_key("line"));
        assert!(!table.is_primary_key("qty"));
        assert_eq!(table.field("qty").map(|f| f.data_type), Some(DataType::Numerical));
    }
}
