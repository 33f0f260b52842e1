//! Tables, columns and schemas

use heck::ToPascalCase;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ScalarType;
use crate::codegen::to_member_name;
use crate::error::{CodegenError, Result};

/// What a column stores: a scalar value, or a key into another table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Scalar(ScalarType),
    /// Foreign key; holds the referenced table name
    ForeignKey(String),
}

/// A single table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Scalar type or foreign-key target
    pub kind: ColumnKind,
}

impl Column {
    pub fn scalar(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Scalar(scalar),
        }
    }

    pub fn foreign_key(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::ForeignKey(table.into()),
        }
    }

    /// Referenced table name, if this column is a foreign key
    pub fn references(&self) -> Option<&str> {
        match &self.kind {
            ColumnKind::ForeignKey(table) => Some(table),
            ColumnKind::Scalar(_) => None,
        }
    }

    /// The scalar actually stored in the row (foreign keys store integers)
    pub fn storage_type(&self) -> ScalarType {
        match &self.kind {
            ColumnKind::Scalar(scalar) => *scalar,
            ColumnKind::ForeignKey(_) => ScalarType::Integer,
        }
    }
}

/// A database table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name
    pub name: String,

    /// Explicit class name; derived from the table name when absent
    pub class_name: Option<String>,

    /// Columns in declaration order
    pub columns: Vec<Column>,

    /// Primary key column (if declared)
    pub primary_key: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_name: None,
            columns: Vec::new(),
            primary_key: None,
        }
    }

    /// Append a column
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Override the derived class name
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Declare the primary key column
    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    /// Singular class name for this table
    ///
    /// Uses the explicit override when present, otherwise drops the trailing
    /// character of the table name ("Outlets" -> "Outlet").
    pub fn class_name(&self) -> String {
        match &self.class_name {
            Some(name) => name.clone(),
            None => {
                let mut chars = self.name.chars();
                chars.next_back();
                chars.as_str().to_pascal_case()
            }
        }
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The column rows are keyed by: the primary key, else the first column
    pub fn key_column(&self) -> Option<&Column> {
        self.primary_key
            .as_deref()
            .and_then(|pk| self.get_column(pk))
            .or_else(|| self.columns.first())
    }

    /// Position of the key column within `columns`
    pub fn key_index(&self) -> usize {
        self.primary_key
            .as_deref()
            .and_then(|pk| self.columns.iter().position(|c| c.name == pk))
            .unwrap_or(0)
    }

    /// Foreign-key columns that reference `table`
    pub fn foreign_keys_to<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a Column> {
        self.columns
            .iter()
            .filter(move |c| c.references() == Some(table))
    }
}

/// A named, ordered collection of tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name
    pub name: String,

    /// Tables in declaration order
    pub tables: Vec<Table>,
}

impl Schema {
    pub fn new(name: impl Into<String>, tables: Vec<Table>) -> Self {
        Self {
            name: name.into(),
            tables,
        }
    }

    /// Get a table by name
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Check that the schema carries everything code emission needs
    pub fn validate(&self) -> Result<()> {
        let mut table_names = HashSet::new();
        for table in &self.tables {
            if table.name.trim().is_empty() {
                return Err(CodegenError::ValidationError(format!(
                    "schema `{}` contains a table without a name",
                    self.name
                )));
            }
            if !table_names.insert(table.name.as_str()) {
                return Err(CodegenError::ValidationError(format!(
                    "duplicate table `{}`",
                    table.name
                )));
            }
            if table.columns.is_empty() {
                return Err(CodegenError::ValidationError(format!(
                    "table `{}` has no columns",
                    table.name
                )));
            }
            if table.class_name().is_empty() {
                return Err(CodegenError::ValidationError(format!(
                    "table `{}` derives an empty class name",
                    table.name
                )));
            }

            // Columns are compared by the member name they derive, so `name`
            // and `Name` collide.
            let mut member_names = HashSet::new();
            for column in &table.columns {
                if column.name.trim().is_empty() {
                    return Err(CodegenError::ValidationError(format!(
                        "table `{}` contains a column without a name",
                        table.name
                    )));
                }
                if !member_names.insert(to_member_name(&column.name)) {
                    return Err(CodegenError::ValidationError(format!(
                        "duplicate column `{}.{}`",
                        table.name, column.name
                    )));
                }
                if let Some(target) = column.references() {
                    if self.get_table(target).is_none() {
                        return Err(CodegenError::UnknownTable(format!(
                            "{} (referenced by {}.{})",
                            target, table.name, column.name
                        )));
                    }
                }
            }

            if let Some(pk) = &table.primary_key {
                if table.get_column(pk).is_none() {
                    return Err(CodegenError::ValidationError(format!(
                        "primary key `{}` is not a column of `{}`",
                        pk, table.name
                    )));
                }
            }
        }
        Ok(())
    }
}
