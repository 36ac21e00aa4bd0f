//! metad - metadata documents for relational datasets
//!
//! Provides:
//! - The metadata document model (tables, fields, keys, constraints)
//! - Schema and referential validation
//! - Type mapping from Arrow columns and MySQL column types
//! - Connectors that build metadata from a source and export its tables

pub mod connectors;
pub mod export;
pub mod models;
pub mod typemap;
pub mod validation;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use connectors::{Connector, ConnectorError, FrameConnector};
#[cfg(feature = "mysql")]
pub use connectors::{MysqlConfig, MysqlConnector};
pub use export::{ExportError, METADATA_FILE};
pub use models::{
    Constraint, DataSubtype, DataType, Field, FieldRef, FieldType, ForeignKey, Key, MetaData,
    MetadataError, Table,
};
pub use typemap::{FrameTypeMapper, MysqlTypeMapper, TypeMapError, TypeMapper};
pub use validation::{ValidationError, validate_metadata};
