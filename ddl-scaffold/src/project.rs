//! Project registry: which tables are mutable, hidden, or owned as collections
//!
//! A [`Project`] wraps one [`Schema`] and turns its tables into [`Entity`]
//! values, the unit every emitter works on. Registries are plain fields, so
//! several projects can be built and generated side by side.

use heck::ToPascalCase;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

use crate::error::{CodegenError, Result};
use crate::model::{Class, Property, TypeRef};
use crate::schema::{ColumnKind, ScalarType, Schema, Table};

/// A table paired with its derived class and optional inverse partner
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<'a> {
    pub table: &'a Table,
    pub class: Class,
    pub inverse_table: Option<&'a Table>,
}

impl Entity<'_> {
    /// Name of the derived class
    pub fn class_name(&self) -> &str {
        &self.class.name
    }
}

/// Derive the class for `table`, appending a collection of `inverse` if given
pub fn derive_class(schema: &Schema, table: &Table, inverse: Option<&Table>) -> Result<Class> {
    let mut properties = Vec::with_capacity(table.columns.len() + usize::from(inverse.is_some()));

    for column in &table.columns {
        let type_ref = match &column.kind {
            ColumnKind::Scalar(scalar) => TypeRef::Scalar(*scalar),
            ColumnKind::ForeignKey(target) => {
                let target_table = schema.get_table(target).ok_or_else(|| {
                    CodegenError::UnknownTable(format!(
                        "{} (referenced by {}.{})",
                        target, table.name, column.name
                    ))
                })?;
                TypeRef::User(target_table.class_name())
            }
        };
        properties.push(Property::new(&column.name, type_ref));
    }

    if let Some(inverse) = inverse {
        properties.push(Property::new(
            &inverse.name,
            TypeRef::Collection(inverse.class_name()),
        ));
    }

    let mut names = HashSet::with_capacity(properties.len());
    if let Some(duplicate) = properties.iter().find(|p| !names.insert(p.name.as_str())) {
        return Err(CodegenError::ValidationError(format!(
            "class `{}` derived from `{}` declares property `{}` twice",
            table.class_name(),
            table.name,
            duplicate.name
        )));
    }

    Ok(Class {
        name: table.class_name(),
        properties,
    })
}

/// A schema plus its generation registries
#[derive(Debug, Clone)]
pub struct Project {
    schema: Schema,
    mutable_tables: BTreeSet<String>,
    hidden_tables: BTreeSet<String>,
    /// owner table -> inverse (child) table
    inverse_tables: BTreeMap<String, String>,
}

impl Project {
    /// Wrap a schema; fails if the schema cannot be emitted
    pub fn new(schema: Schema) -> Result<Self> {
        schema.validate()?;
        Ok(Self {
            schema,
            mutable_tables: BTreeSet::new(),
            hidden_tables: BTreeSet::new(),
            inverse_tables: BTreeMap::new(),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn require_table(&self, name: &str) -> Result<&Table> {
        self.schema
            .get_table(name)
            .ok_or_else(|| CodegenError::UnknownTable(name.to_string()))
    }

    /// Generate insert/update/delete artifacts for `table`
    pub fn mark_mutable(&mut self, table: &str) -> Result<()> {
        self.require_table(table)?;
        self.mutable_tables.insert(table.to_string());
        Ok(())
    }

    /// Exclude `table` from display-layer generation
    pub fn mark_hidden(&mut self, table: &str) -> Result<()> {
        self.require_table(table)?;
        self.hidden_tables.insert(table.to_string());
        Ok(())
    }

    /// Register `inverse` as the one-to-many collection owned by `owner`
    ///
    /// `inverse` must hold a foreign key referencing `owner`, and the
    /// collection property it adds must not clash with an owner column.
    pub fn register_inverse(&mut self, owner: &str, inverse: &str) -> Result<()> {
        let owner_table = self.require_table(owner)?;
        let inverse_table = self.require_table(inverse)?;
        if inverse_table.foreign_keys_to(owner).next().is_none() {
            return Err(CodegenError::MissingForeignKey {
                table: inverse.to_string(),
                owner: owner.to_string(),
            });
        }
        derive_class(&self.schema, owner_table, Some(inverse_table))?;
        debug!("Registered {} as inverse of {}", inverse, owner);
        self.inverse_tables
            .insert(owner.to_string(), inverse.to_string());
        Ok(())
    }

    pub fn is_mutable(&self, table: &str) -> bool {
        self.mutable_tables.contains(table)
    }

    pub fn is_hidden(&self, table: &str) -> bool {
        self.hidden_tables.contains(table)
    }

    /// Inverse (child) table owned by `owner`, if registered
    pub fn inverse_of(&self, owner: &str) -> Option<&Table> {
        self.inverse_tables
            .get(owner)
            .and_then(|name| self.schema.get_table(name))
    }

    /// Owner that registered `table` as its inverse, if any
    pub fn owner_of(&self, table: &str) -> Option<&Table> {
        self.inverse_tables
            .iter()
            .find(|(_, inverse)| inverse.as_str() == table)
            .and_then(|(owner, _)| self.schema.get_table(owner))
    }

    /// True when `owner` has registered `table` as its inverse collection
    pub fn is_inverse_of(&self, table: &str, owner: &str) -> bool {
        self.inverse_tables.get(owner).map(String::as_str) == Some(table)
    }

    /// Scalar type of the key rows of `table` are looked up by
    pub fn key_type(&self, table: &str) -> ScalarType {
        self.schema
            .get_table(table)
            .and_then(Table::key_column)
            .map(|c| c.storage_type())
            .unwrap_or(ScalarType::Integer)
    }

    /// Key type of the table whose class is `class_name`
    pub fn key_type_of_class(&self, class_name: &str) -> ScalarType {
        self.schema
            .tables
            .iter()
            .find(|t| t.class_name() == class_name)
            .map(|t| self.key_type(&t.name))
            .unwrap_or(ScalarType::Integer)
    }

    /// Build the entity for one table
    pub fn create_entity<'a>(&'a self, table: &'a Table) -> Result<Entity<'a>> {
        let inverse_table = self.inverse_of(&table.name);
        let class = derive_class(&self.schema, table, inverse_table)?;
        Ok(Entity {
            table,
            class,
            inverse_table,
        })
    }

    /// Build entities for every table, in schema order
    pub fn create_entities(&self) -> Result<Vec<Entity<'_>>> {
        self.schema
            .tables
            .iter()
            .map(|table| self.create_entity(table))
            .collect()
    }

    /// Name the generated namespace segments are rooted at
    pub fn name(&self) -> String {
        self.schema.name.to_pascal_case()
    }
}
