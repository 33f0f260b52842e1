//! SQL schema parser using sqlparser-rs

use std::collections::HashMap;

use sqlparser::ast::{
    ColumnDef, ColumnOption, CreateTable, Expr, ForeignKeyConstraint, Ident, IndexColumn,
    ObjectName, PrimaryKeyConstraint, Statement, TableConstraint,
};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;
use tracing::debug;

use crate::error::{CodegenError, Result};
use crate::schema::{Column, ScalarType, Schema, Table};

/// Parse the `CREATE TABLE` statements of a SQL script into a schema named `name`
///
/// Other statements are ignored. Foreign keys come from table-level
/// `FOREIGN KEY ... REFERENCES` constraints or column-level `REFERENCES`
/// clauses; the referencing column's declared type is irrelevant since
/// references are stored as integers.
pub fn parse_schema(name: &str, sql: &str) -> Result<Schema> {
    let dialect = MySqlDialect {};
    let statements = Parser::parse_sql(&dialect, sql)?;

    let mut tables = Vec::new();
    for stmt in statements {
        if let Statement::CreateTable(create_table) = stmt {
            let table = extract_table(&create_table)?;
            debug!("Parsed table {} ({} columns)", table.name, table.columns.len());
            tables.push(table);
        }
    }

    Ok(Schema::new(name, tables))
}

/// Build a table from a CREATE TABLE statement
fn extract_table(create: &CreateTable) -> Result<Table> {
    let name = extract_table_name(&create.name);

    let mut primary_key = None;
    let mut references: HashMap<String, String> = HashMap::new();
    for constraint in &create.constraints {
        match constraint {
            // The first key column identifies rows
            TableConstraint::PrimaryKey(PrimaryKeyConstraint {
                columns: pk_cols, ..
            }) => {
                primary_key = pk_cols.first().map(extract_ident_from_index_column);
            }
            TableConstraint::ForeignKey(ForeignKeyConstraint {
                columns,
                foreign_table,
                ..
            }) => {
                for col in columns {
                    references.insert(extract_ident(col), extract_table_name(foreign_table));
                }
            }
            _ => {}
        }
    }

    let mut table = Table::new(name.as_str());
    for col_def in &create.columns {
        let column_name = extract_ident(&col_def.name);
        if is_column_primary_key(col_def) {
            primary_key = Some(column_name.clone());
        }

        let target = references
            .get(&column_name)
            .cloned()
            .or_else(|| column_reference(col_def));
        let column = match target {
            Some(target) => Column::foreign_key(column_name, target),
            None => Column::scalar(column_name, extract_scalar_type(&name, col_def)?),
        };
        table = table.column(column);
    }

    if let Some(pk) = primary_key {
        table = table.with_primary_key(pk);
    }
    Ok(table)
}

/// Map a column's SQL data type onto a scalar
fn extract_scalar_type(table: &str, col_def: &ColumnDef) -> Result<ScalarType> {
    let data_type = format!("{}", col_def.data_type);
    ScalarType::from_sql(&data_type).ok_or_else(|| {
        CodegenError::UnsupportedDataType(format!(
            "{}.{}: {}",
            table,
            extract_ident(&col_def.name),
            data_type
        ))
    })
}

fn is_column_primary_key(col_def: &ColumnDef) -> bool {
    col_def
        .options
        .iter()
        .any(|option| matches!(option.option, ColumnOption::PrimaryKey(_)))
}

/// Target table of an inline `REFERENCES` clause
fn column_reference(col_def: &ColumnDef) -> Option<String> {
    col_def.options.iter().find_map(|option| match &option.option {
        ColumnOption::ForeignKey(ForeignKeyConstraint { foreign_table, .. }) => {
            Some(extract_table_name(foreign_table))
        }
        _ => None,
    })
}

/// Extract a simple string from an ObjectName
fn extract_table_name(name: &ObjectName) -> String {
    name.0
        .last()
        .and_then(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .unwrap_or_default()
}

/// Extract a string from an Ident, removing backticks if present
fn extract_ident(ident: &Ident) -> String {
    ident.value.clone()
}

/// Extract a column name string from an IndexColumn
fn extract_ident_from_index_column(ic: &IndexColumn) -> String {
    match &ic.column.expr {
        Expr::Identifier(ident) => ident.value.clone(),
        other => format!("{}", other),
    }
}
