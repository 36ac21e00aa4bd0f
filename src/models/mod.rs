//! Models module
//!
//! Defines the metadata document and the types it is built from.

pub mod constraint;
pub mod field;
pub mod foreign_key;
pub mod key;
pub mod metadata;
pub mod table;

pub use constraint::{Constraint, FieldRef};
pub use field::{DataSubtype, DataType, Field, FieldType};
pub use foreign_key::ForeignKey;
pub use key::Key;
pub use metadata::{MetaData, MetadataError};
pub use table::Table;
