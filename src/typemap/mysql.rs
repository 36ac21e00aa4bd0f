//! Type mapping for MySQL column types.

use super::{TypeMapError, TypeMapper};
use crate::models::{DataSubtype, DataType, FieldType};

/// Maps MySQL `DATA_TYPE` names (as reported by `INFORMATION_SCHEMA.COLUMNS`)
/// to field types.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlTypeMapper;

impl MysqlTypeMapper {
    pub fn new() -> Self {
        Self
    }
}

impl TypeMapper for MysqlTypeMapper {
    type Source = str;

    fn map_native_type(&self, sql_type: &str) -> Result<FieldType, TypeMapError> {
        let field_type = match sql_type.trim().to_lowercase().as_str() {
            // Integer types
            "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "bigint" => {
                FieldType::with_subtype(DataType::Numerical, DataSubtype::Integer)
            }

            // Floating point and fixed point
            "float" | "double" | "real" | "decimal" | "numeric" => {
                FieldType::with_subtype(DataType::Numerical, DataSubtype::Float)
            }

            // String types
            "varchar" | "char" | "text" | "tinytext" | "mediumtext" | "longtext" | "enum" => {
                FieldType::new(DataType::Categorical)
            }

            // Bit fields
            "bit" | "binary" => FieldType::with_subtype(DataType::Categorical, DataSubtype::Boolean),

            // Date/time types
            "datetime" | "year" | "timestamp" | "time" | "date" => {
                FieldType::new(DataType::Datetime)
            }

            // Binary, set, document and spatial types
            "blob" | "tinyblob" | "mediumblob" | "longblob" | "varbinary" | "set" | "json"
            | "geometry" | "point" | "linestring" | "polygon" | "multipoint"
            | "multilinestring" | "multipolygon" | "geometrycollection" => {
                FieldType::new(DataType::Other)
            }

            _ => return Err(TypeMapError::UnknownSqlType(sql_type.to_string())),
        };
        Ok(field_type)
    }
}
