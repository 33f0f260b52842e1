//! Mutation adapter generator - emits data access for mutable entities
//!
//! Every mutation adapter carries insert/update/delete stubs. Whether it also
//! fetches rows depends on the entity's place in an owner/inverse pair, see
//! [`FetchPlan`].

use tracing::debug;

use crate::error::Result;
use crate::model::Class;
use crate::project::{Entity, Project};
use crate::schema::{Column, Table};

use super::adapter_common::{
    constructor, construct, dependency_maps, field_declarations, fill_method, get_all_method,
    qualified_columns, query_constant, read_locals, select_columns, DependencyMap, ITEMS, ROW,
    TRANSACTION_CONTEXT,
};
use super::text::{block, lines, null_check, sections, statement_block};
use super::type_resolver::TypeResolver;

/// The mutation kinds every adapter stubs out
const MUTATIONS: [&str; 3] = ["Insert", "Update", "Delete"];

/// Key of the owner row being grouped
const OWNER_KEY: &str = "__ownerKey";

/// Owner instance the joined children are appended to
const OWNER: &str = "__owner";

/// How a mutation adapter fetches its rows
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPlan<'a> {
    /// Owner rows joined with their inverse children in one query, grouped
    /// by owner key
    ///
    /// Hosted by the owner's adapter, or by the child's adapter when the
    /// owner is read-only and has no mutation adapter.
    Composite {
        owner: &'a Table,
        child: &'a Table,
        /// Child column referencing the owner
        child_key: &'a Column,
    },
    /// Rows surface only through the composite fetch of `owner`'s mutation
    /// adapter
    Suppressed { owner: &'a Table },
    /// One instance per row, foreign keys resolved through dependency maps
    Plain,
}

/// Decide how the adapter for `entity` fetches rows
pub fn fetch_plan<'a>(project: &'a Project, entity: &Entity<'a>) -> FetchPlan<'a> {
    let table: &'a Table = entity.table;

    if let Some(child) = entity.inverse_table {
        if let Some(child_key) = child.foreign_keys_to(&table.name).next() {
            return FetchPlan::Composite {
                owner: table,
                child,
                child_key,
            };
        }
    }

    // The first foreign key whose target owns this table as its inverse
    // decides the plan.
    let owned = table.columns.iter().find_map(|column| {
        let target = column.references()?;
        if !project.is_inverse_of(&table.name, target) {
            return None;
        }
        project.schema().get_table(target).map(|owner| (owner, column))
    });

    match owned {
        Some((owner, _)) if project.is_mutable(&owner.name) => FetchPlan::Suppressed { owner },
        Some((owner, child_key)) => FetchPlan::Composite {
            owner,
            child: table,
            child_key,
        },
        None => FetchPlan::Plain,
    }
}

/// Name of the mutation adapter type for a class
pub fn mutation_adapter_name(class_name: &str) -> String {
    format!("{}DataAdapter", class_name)
}

/// Emit the mutation adapter for a mutable entity
pub fn generate_mutation_adapter(project: &Project, entity: &Entity<'_>) -> Result<String> {
    let type_name = mutation_adapter_name(&entity.class.name);
    let plan = fetch_plan(project, entity);
    debug!("{} fetch plan: {}", type_name, plan_label(&plan));

    let maps = mutation_dependencies(project, entity)?;

    let (query, fetch) = match &plan {
        FetchPlan::Composite {
            owner,
            child,
            child_key,
        } => {
            let owner_entity = project.create_entity(owner)?;
            let child_entity = project.create_entity(child)?;
            let query = format!(
                "SELECT {}, {} FROM {} LEFT JOIN {} ON {}.{} = {}.{}",
                qualified_columns(owner),
                qualified_columns(child),
                owner.name,
                child.name,
                child.name,
                child_key.name,
                owner.name,
                owner.key_column().map(|c| c.name.as_str()).unwrap_or_default(),
            );
            let fetch = composite_fetch(project, &owner_entity, &child_entity, child_key);
            (query_constant(&query), fetch)
        }
        FetchPlan::Suppressed { .. } => (String::new(), String::new()),
        FetchPlan::Plain => {
            let query = format!(
                "SELECT {} FROM {}",
                select_columns(entity.table),
                entity.table.name
            );
            let fetch = sections([
                get_all_method(&entity.class, TRANSACTION_CONTEXT),
                fill_method(project, &entity.class, entity.table),
            ]);
            (query_constant(&query), fetch)
        }
    };

    let body = sections([
        query,
        field_declarations(TRANSACTION_CONTEXT, &maps),
        constructor(&type_name, TRANSACTION_CONTEXT, &maps),
        fetch,
        mutation_stubs(&entity.class),
    ]);
    Ok(block(&format!("public sealed class {}", type_name), &body))
}

fn plan_label(plan: &FetchPlan<'_>) -> String {
    match plan {
        FetchPlan::Composite { owner, child, .. } => {
            format!("composite of {} with {}", owner.name, child.name)
        }
        FetchPlan::Suppressed { owner } => format!("suppressed, owned by {}", owner.name),
        FetchPlan::Plain => "plain".to_string(),
    }
}

/// `GetAll` over the owner/child join, grouping children under their owner
fn composite_fetch(
    project: &Project,
    owner: &Entity<'_>,
    child: &Entity<'_>,
    child_key: &Column,
) -> String {
    let owner_class = &owner.class;
    let child_class = &child.class;
    let owner_columns = owner.table.columns.len();
    let key_type = project.key_type(&owner.table.name);
    let collection = owner_class
        .properties
        .iter()
        .rev()
        .find(|p| p.is_collection())
        .map(|p| p.name.clone())
        .unwrap_or_default();

    let allocate_owner = block(
        &format!("if (!{}.TryGetValue({}, out {}))", ITEMS, OWNER_KEY, OWNER),
        &sections([
            read_locals(project, owner_class, owner.table, 0, None),
            lines([
                format!("{} = {};", OWNER, construct(owner_class)),
                format!("{}.Add({}, {});", ITEMS, OWNER_KEY, OWNER),
            ]),
        ]),
    );

    let append_child = block(
        &format!(
            "if (!{}.IsDBNull({}))",
            ROW,
            owner_columns + child.table.key_index()
        ),
        &sections([
            read_locals(
                project,
                child_class,
                child.table,
                owner_columns,
                Some((child_key.name.as_str(), OWNER)),
            ),
            lines([format!(
                "{}.{}.Add({});",
                OWNER,
                collection,
                construct(child_class)
            )]),
        ]),
    );

    let row_handler = lines([
        format!(
            "var {} = {};",
            OWNER_KEY,
            TypeResolver::read_expression(ROW, key_type, owner.table.key_index())
        ),
        format!("{} {};", owner_class.name, OWNER),
    ]) + &allocate_owner
        + &append_child;

    let body = sections([
        lines([format!(
            "var {} = new {}();",
            ITEMS,
            TypeResolver::map_type(key_type, &owner_class.name)
        )]),
        statement_block(
            &format!(
                "{}.Execute(Query, {} =>",
                TRANSACTION_CONTEXT.field(),
                ROW
            ),
            &row_handler,
        ),
        lines([format!(
            "return new List<{}>({}.Values);",
            owner_class.name, ITEMS
        )]),
    ]);

    block(&format!("public List<{}> GetAll()", owner_class.name), &body)
}

/// Insert/update/delete stubs: reject null, otherwise unimplemented
fn mutation_stubs(class: &Class) -> String {
    sections(MUTATIONS.iter().map(|mutation| {
        block(
            &format!("public void {}({} item)", mutation, class.name),
            &sections([
                lines([null_check("item")]),
                lines(["throw new NotImplementedException();"]),
            ]),
        )
    }))
}

/// Dependency maps an adapter for `entity` is constructed with
pub fn mutation_dependencies(project: &Project, entity: &Entity<'_>) -> Result<Vec<DependencyMap>> {
    Ok(match fetch_plan(project, entity) {
        FetchPlan::Composite {
            owner,
            child,
            child_key,
        } => {
            let owner_entity = project.create_entity(owner)?;
            let child_entity = project.create_entity(child)?;
            // Only the joined column is bound to the owner row; other keys
            // into the owner table still resolve through a map.
            let child_dependencies = child_entity
                .class
                .properties
                .iter()
                .zip(&child.columns)
                .filter(|(_, column)| column.name != child_key.name)
                .filter_map(|(property, _)| property.type_ref.user_class())
                .filter(|class| *class != child_entity.class.name);
            dependency_maps(
                project,
                owner_entity
                    .class
                    .dependencies()
                    .into_iter()
                    .chain(child_dependencies),
            )
        }
        FetchPlan::Suppressed { .. } => Vec::new(),
        FetchPlan::Plain => dependency_maps(project, entity.class.dependencies()),
    })
}
