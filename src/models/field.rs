//! Field model for the metadata document

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized data type of a field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Numerical,
    Categorical,
    Boolean,
    Datetime,
    Text,
    Id,
    Other,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Numerical => "numerical",
            DataType::Categorical => "categorical",
            DataType::Boolean => "boolean",
            DataType::Datetime => "datetime",
            DataType::Text => "text",
            DataType::Id => "id",
            DataType::Other => "other",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Refinement of a [`DataType`]
///
/// `Integer` and `Float` refine `numerical`, `Boolean` refines `categorical`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DataSubtype {
    Integer,
    Float,
    Boolean,
}

impl DataSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSubtype::Integer => "integer",
            DataSubtype::Float => "float",
            DataSubtype::Boolean => "boolean",
        }
    }
}

/// A `{data_type, data_subtype?}` pair, the output of every type mapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldType {
    pub data_type: DataType,
    pub data_subtype: Option<DataSubtype>,
}

impl FieldType {
    pub const fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            data_subtype: None,
        }
    }

    pub const fn with_subtype(data_type: DataType, data_subtype: DataSubtype) -> Self {
        Self {
            data_type,
            data_subtype: Some(data_subtype),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data_subtype {
            Some(subtype) => write!(f, "{}/{}", self.data_type, subtype.as_str()),
            None => write!(f, "{}", self.data_type),
        }
    }
}

/// Field model representing a column of a table
///
/// # Example
///
/// ```rust
/// use metad::models::{DataType, Field};
///
/// let field = Field::new("user_id", DataType::Id);
/// assert_eq!(field.data_subtype, None);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Field {
    /// Field name, unique within its table
    pub name: String,
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_subtype: Option<DataSubtype>,
}

impl Field {
    /// Create a field without a subtype
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            data_subtype: None,
        }
    }

    /// Create a field from a mapped source type
    pub fn typed(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            data_type: field_type.data_type,
            data_subtype: field_type.data_subtype,
        }
    }

    pub fn field_type(&self) -> FieldType {
        FieldType {
            data_type: self.data_type,
            data_subtype: self.data_subtype,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_serializes_without_empty_subtype() {
        let field = Field::new("name", DataType::Text);
        let json = serde_json::to_string(&field).unwrap();
        assert_eq!(json, r#"{"name":"name","data_type":"text"}"#);
    }

    #[test]
    fn test_field_with_subtype() {
        let field = Field::typed(
            "amount",
            FieldType::with_subtype(DataType::Numerical, DataSubtype::Float),
        );
        let json = serde_json::to_string(&field).unwrap();
        assert_eq!(
            json,
            r#"{"name":"amount","data_type":"numerical","data_subtype":"float"}"#
        );
    }

    #[test]
    fn test_unknown_data_type_rejected() {
        let result: Result<Field, _> =
            serde_json::from_str(r#"{"name":"x","data_type":"string"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_field_type_display() {
        let ft = FieldType::with_subtype(DataType::Numerical, DataSubtype::Integer);
        assert_eq!(ft.to_string(), "numerical/integer");
        assert_eq!(FieldType::new(DataType::Datetime).to_string(), "datetime");
    }
}
