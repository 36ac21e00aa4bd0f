//! Type mapping for in-memory columnar tables.
//!
//! Columns are first reduced to a one-character kind code (`i` signed
//! integer, `u` unsigned integer, `f` floating point, `O` string/object,
//! `b` boolean, `M` date or timestamp, `m` duration, `V` anything else) and
//! the kind code is then mapped to a field type.

use arrow::datatypes::DataType as ArrowType;

use super::{TypeMapError, TypeMapper};
use crate::models::{DataSubtype, DataType, FieldType};

/// Kind code of an Arrow column type.
pub fn frame_kind(data_type: &ArrowType) -> char {
    match data_type {
        ArrowType::Int8 | ArrowType::Int16 | ArrowType::Int32 | ArrowType::Int64 => 'i',
        ArrowType::UInt8 | ArrowType::UInt16 | ArrowType::UInt32 | ArrowType::UInt64 => 'u',
        ArrowType::Float16
        | ArrowType::Float32
        | ArrowType::Float64
        | ArrowType::Decimal128(_, _)
        | ArrowType::Decimal256(_, _) => 'f',
        ArrowType::Utf8 | ArrowType::LargeUtf8 | ArrowType::Utf8View => 'O',
        ArrowType::Boolean => 'b',
        ArrowType::Date32 | ArrowType::Date64 | ArrowType::Timestamp(_, _) => 'M',
        ArrowType::Duration(_) => 'm',
        ArrowType::Dictionary(_, value) => frame_kind(value),
        _ => 'V',
    }
}

/// Maps column kind codes to field types.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTypeMapper;

impl FrameTypeMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map an Arrow column type via its kind code.
    pub fn map_arrow_type(&self, data_type: &ArrowType) -> Result<FieldType, TypeMapError> {
        self.map_native_type(&frame_kind(data_type))
    }
}

impl TypeMapper for FrameTypeMapper {
    type Source = char;

    fn map_native_type(&self, kind: &char) -> Result<FieldType, TypeMapError> {
        match kind {
            'i' | 'u' => Ok(FieldType::with_subtype(
                DataType::Numerical,
                DataSubtype::Integer,
            )),
            'f' => Ok(FieldType::with_subtype(
                DataType::Numerical,
                DataSubtype::Float,
            )),
            'O' => Ok(FieldType::new(DataType::Categorical)),
            'b' => Ok(FieldType::new(DataType::Boolean)),
            'M' => Ok(FieldType::new(DataType::Datetime)),
            other => Err(TypeMapError::UnknownKind(*other)),
        }
    }
}
