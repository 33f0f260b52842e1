//! Read adapter generator - emits fill-only data access for read-only entities

use crate::project::{Entity, Project};

use super::adapter_common::{
    constructor, dependency_maps, field_declarations, fill_method, get_all_method,
    query_constant, select_columns, QUERY_EXECUTOR,
};
use super::text::{block, sections};

/// Name of the read adapter type for a class
pub fn read_adapter_name(class_name: &str) -> String {
    format!("{}Adapter", class_name)
}

/// Emit the read adapter for a read-only entity
pub fn generate_read_adapter(project: &Project, entity: &Entity<'_>) -> String {
    let type_name = read_adapter_name(&entity.class.name);
    let maps = dependency_maps(project, entity.class.dependencies());
    let query = format!(
        "SELECT {} FROM {}",
        select_columns(entity.table),
        entity.table.name
    );

    let body = sections([
        query_constant(&query),
        field_declarations(QUERY_EXECUTOR, &maps),
        constructor(&type_name, QUERY_EXECUTOR, &maps),
        get_all_method(&entity.class, QUERY_EXECUTOR),
        fill_method(project, &entity.class, entity.table),
    ]);
    block(&format!("public sealed class {}", type_name), &body)
}
