//! Type mapping from source type systems to the normalized field taxonomy
//!
//! Each source family has its own mapper. All mappers produce a
//! [`FieldType`] and fail on source types they do not know instead of
//! falling back to a default bucket.

pub mod frame;
pub mod mysql;

use crate::models::FieldType;

pub use frame::{FrameTypeMapper, frame_kind};
pub use mysql::MysqlTypeMapper;

/// Error raised when a source type has no mapping
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TypeMapError {
    #[error("Unknown column kind '{0}'")]
    UnknownKind(char),
    #[error("Unknown SQL type '{0}'")]
    UnknownSqlType(String),
}

/// Maps a source type descriptor to a normalized field type
pub trait TypeMapper {
    /// Source type descriptor, e.g. a kind code or an SQL type name
    type Source: ?Sized;

    fn map_native_type(&self, source: &Self::Source) -> Result<FieldType, TypeMapError>;
}
