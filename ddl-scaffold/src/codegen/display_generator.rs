//! Display-layer scaffolding: view-item wrappers and module composition points

use crate::error::{CodegenError, Result};
use crate::project::{Entity, Project};

use super::text::{block, comma_list, lines, null_check, sections};
use super::type_resolver::TypeResolver;

/// Injected strategy that orders a module's results
pub const RESULT_ORDERER: &str = "IResultOrderer";
/// Injected strategy that filters a module's results
pub const RESULT_FILTERER: &str = "IResultFilterer";

pub fn display_wrapper_name(class_name: &str) -> String {
    format!("{}ViewItem", class_name)
}

pub fn module_name(class_name: &str) -> String {
    format!("{}Module", class_name)
}

/// Emit a pass-through wrapper presenting one record instance
///
/// Only read-only entities that are not hidden get a display wrapper.
pub fn generate_display_wrapper(project: &Project, entity: &Entity<'_>) -> Result<String> {
    let table = &entity.table.name;
    if project.is_mutable(table) || project.is_hidden(table) {
        return Err(CodegenError::ValidationError(format!(
            "display wrapper requested for `{}`, which is mutable or hidden",
            table
        )));
    }

    let class = &entity.class;
    let type_name = display_wrapper_name(&class.name);

    let item_property = lines([format!("public {} Item {{ get; }}", class.name)]);
    let ctor = block(
        &format!("public {}({} item)", type_name, class.name),
        &sections([lines([null_check("item")]), lines(["this.Item = item;"])]),
    );
    let pass_through = lines(
        class
            .properties
            .iter()
            .filter(|p| !p.is_collection())
            .map(|p| {
                format!(
                    "public {} {} => this.Item.{};",
                    TypeResolver::type_name(&p.type_ref),
                    p.name,
                    p.name
                )
            }),
    );

    Ok(block(
        &format!("public sealed class {}", type_name),
        &sections([item_property, ctor, pass_through]),
    ))
}

/// Emit a constructor-only module wired to externally supplied ordering and
/// filtering strategies
pub fn generate_module_scaffold(project: &Project, entity: &Entity<'_>) -> Result<String> {
    if project.is_hidden(&entity.table.name) {
        return Err(CodegenError::ValidationError(format!(
            "module requested for hidden table `{}`",
            entity.table.name
        )));
    }

    let class = &entity.class.name;
    let type_name = module_name(class);
    let orderer = format!("{}<{}>", RESULT_ORDERER, class);
    let filterer = format!("{}<{}>", RESULT_FILTERER, class);

    let properties = lines([
        format!("public {} Orderer {{ get; }}", orderer),
        format!("public {} Filterer {{ get; }}", filterer),
    ]);
    let ctor = block(
        &format!(
            "public {}({})",
            type_name,
            comma_list([format!("{} orderer", orderer), format!("{} filterer", filterer)])
        ),
        &sections([
            lines([null_check("orderer"), null_check("filterer")]),
            lines(["this.Orderer = orderer;", "this.Filterer = filterer;"]),
        ]),
    );

    Ok(block(
        &format!("public sealed class {}", type_name),
        &sections([properties, ctor]),
    ))
}
