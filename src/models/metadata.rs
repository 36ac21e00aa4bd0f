//! The metadata document
//!
//! [`MetaData`] holds the tables, foreign keys and constraints of a relational
//! dataset. Every mutation appends and then re-validates the whole document,
//! so an invalid addition is reported at the call that introduced it.

use super::constraint::Constraint;
use super::field::Field;
use super::foreign_key::ForeignKey;
use super::table::Table;
use crate::validation::{self, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Error raised by metadata document operations
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Table not found: {0}")]
    TableNotFound(String),
}

/// Metadata describing a relational dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetaData {
    tables: Vec<Table>,
    #[serde(default)]
    foreign_keys: Vec<ForeignKey>,
    #[serde(default)]
    constraints: Vec<Constraint>,
}

impl MetaData {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document from a JSON file
    ///
    /// The document is not validated; call [`MetaData::validate`] explicitly.
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse a document from JSON text without validating it
    pub fn from_json_str(content: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize the document as 2-space indented JSON
    ///
    /// When `path` is given the JSON is also written to that file.
    pub fn to_json(&self, path: Option<&Path>) -> Result<String, MetadataError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(path) = path {
            std::fs::write(path, &json).map_err(|source| MetadataError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            debug!("Wrote metadata to {}", path.display());
        }
        Ok(json)
    }

    /// Validate the document
    ///
    /// Runs the structural schema check first, then the referential checks.
    /// Stops at the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_metadata(self)
    }

    pub fn add_table(&mut self, table: Table) -> Result<(), MetadataError> {
        self.tables.push(table);
        self.validate()?;
        Ok(())
    }

    pub fn add_foreign_key(&mut self, foreign_key: ForeignKey) -> Result<(), MetadataError> {
        self.foreign_keys.push(foreign_key);
        self.validate()?;
        Ok(())
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), MetadataError> {
        self.constraints.push(constraint);
        self.validate()?;
        Ok(())
    }

    /// Add tables one at a time, in order
    pub fn set_tables(
        &mut self,
        tables: impl IntoIterator<Item = Table>,
    ) -> Result<(), MetadataError> {
        for table in tables {
            self.add_table(table)?;
        }
        Ok(())
    }

    /// Add foreign keys one at a time, in order
    pub fn set_foreign_keys(
        &mut self,
        foreign_keys: impl IntoIterator<Item = ForeignKey>,
    ) -> Result<(), MetadataError> {
        for foreign_key in foreign_keys {
            self.add_foreign_key(foreign_key)?;
        }
        Ok(())
    }

    /// Add constraints one at a time, in order
    pub fn set_constraints(
        &mut self,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Result<(), MetadataError> {
        for constraint in constraints {
            self.add_constraint(constraint)?;
        }
        Ok(())
    }

    /// Append a field to an existing table
    ///
    /// Fails with [`MetadataError::TableNotFound`] if no table has that name.
    pub fn add_field(&mut self, table_name: &str, field: Field) -> Result<(), MetadataError> {
        let table = self
            .tables
            .iter_mut()
            .find(|t| t.name == table_name)
            .ok_or_else(|| MetadataError::TableNotFound(table_name.to_string()))?;
        table.fields.push(field);
        self.validate()?;
        Ok(())
    }

    pub fn get_tables(&self) -> Vec<Table> {
        self.tables.clone()
    }

    pub fn get_table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    pub fn get_table(&self, table_name: &str) -> Option<Table> {
        self.tables.iter().find(|t| t.name == table_name).cloned()
    }

    /// Foreign keys, optionally restricted to those touching `table_name`
    /// as source or as reference
    pub fn get_foreign_keys(&self, table_name: Option<&str>) -> Vec<ForeignKey> {
        match table_name {
            Some(name) => self
                .foreign_keys
                .iter()
                .filter(|fk| fk.involves(name))
                .cloned()
                .collect(),
            None => self.foreign_keys.clone(),
        }
    }

    pub fn get_constraints(&self) -> Vec<Constraint> {
        self.constraints.clone()
    }

    /// Borrowed view of the tables, in document order
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

impl fmt::Display for MetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of Tables: {}", self.tables.len())?;
        writeln!(f, "Number of Foreign Keys: {}", self.foreign_keys.len())?;
        writeln!(f, "Number of Constraints: {}", self.constraints.len())?;
        writeln!(f)?;
        for table in &self.tables {
            writeln!(f, "Table: {}", table.name)?;
            for field in &table.fields {
                if table.is_primary_key(&field.name) {
                    writeln!(f, "   *{}", field.name)?;
                } else {
                    writeln!(f, "    {}", field.name)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
