//! Record generator - emits one data-record type per entity

use crate::model::Class;
use crate::project::{Entity, Project};

use super::text::{block, comma_list, lines, null_check, sections};
use super::type_resolver::TypeResolver;

/// Emit the record type for an entity
///
/// Properties are construction-only unless the table is registered mutable.
pub fn generate_record(project: &Project, entity: &Entity<'_>) -> String {
    let mutable = project.is_mutable(&entity.table.name);
    let body = sections([
        property_block(&entity.class, mutable),
        constructor_block(&entity.class),
    ]);
    block(&format!("public sealed class {}", entity.class.name), &body)
}

/// One auto-property per class property, in order
fn property_block(class: &Class, mutable: bool) -> String {
    let accessors = if mutable { "{ get; set; }" } else { "{ get; }" };
    lines(class.properties.iter().map(|p| {
        format!(
            "public {} {} {}",
            TypeResolver::type_name(&p.type_ref),
            p.name,
            accessors
        )
    }))
}

/// Constructor taking every property, null-checking references first
fn constructor_block(class: &Class) -> String {
    let parameters = comma_list(class.properties.iter().map(|p| {
        format!(
            "{} {}",
            TypeResolver::type_name(&p.type_ref),
            p.parameter_name()
        )
    }));

    let checks = lines(
        class
            .null_checked_properties()
            .map(|p| null_check(&p.parameter_name())),
    );
    let assignments = lines(
        class
            .properties
            .iter()
            .map(|p| format!("this.{} = {};", p.name, p.parameter_name())),
    );

    block(
        &format!("public {}({})", class.name, parameters),
        &sections([checks, assignments]),
    )
}
