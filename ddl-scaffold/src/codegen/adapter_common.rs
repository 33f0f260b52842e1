//! Building blocks shared by the read and mutation adapter generators

use crate::model::{ordered_distinct, Class, TypeRef};
use crate::project::Project;
use crate::schema::{ScalarType, Table};

use super::naming::{to_dependency_name, to_field_name};
use super::text::{block, comma_list, lines, sections};
use super::type_resolver::TypeResolver;

// Identifiers the generator declares itself carry a `__` prefix. Property
// locals are lowerCamel and never start with an underscore, so the two sets
// cannot collide.

/// Row variable name inside generated readers
pub const ROW: &str = "__r";

/// Accumulator of a `GetAll` body
pub const ITEMS: &str = "__items";

/// A collaborator injected first into every adapter constructor
#[derive(Debug, Clone, Copy)]
pub struct Collaborator {
    pub type_name: &'static str,
    pub parameter: &'static str,
}

impl Collaborator {
    pub fn field(&self) -> String {
        to_field_name(self.parameter)
    }
}

/// Executes read-only queries
pub const QUERY_EXECUTOR: Collaborator = Collaborator {
    type_name: "IQueryExecutor",
    parameter: "executor",
};

/// Executes queries and commands inside a transaction
pub const TRANSACTION_CONTEXT: Collaborator = Collaborator {
    type_name: "ITransactionContext",
    parameter: "context",
};

/// A constructor-supplied map from key to already-loaded instances of a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyMap {
    pub class: String,
    pub key: ScalarType,
}

impl DependencyMap {
    pub fn parameter(&self) -> String {
        to_dependency_name(&self.class)
    }

    pub fn field(&self) -> String {
        to_field_name(&self.parameter())
    }

    pub fn type_name(&self) -> String {
        TypeResolver::map_type(self.key, &self.class)
    }
}

/// One map per distinct class, in first-occurrence order
pub fn dependency_maps<'a, I>(project: &Project, classes: I) -> Vec<DependencyMap>
where
    I: IntoIterator<Item = &'a str>,
{
    ordered_distinct(classes)
        .into_iter()
        .map(|class| DependencyMap {
            class: class.to_string(),
            key: project.key_type_of_class(class),
        })
        .collect()
}

/// Column list of a table in declaration order
pub fn select_columns(table: &Table) -> String {
    comma_list(table.columns.iter().map(|c| c.name.as_str()))
}

/// Column list of a table qualified with the table name
pub fn qualified_columns(table: &Table) -> String {
    comma_list(
        table
            .columns
            .iter()
            .map(|c| format!("{}.{}", table.name, c.name)),
    )
}

/// `private const string Query = "...";`
pub fn query_constant(query: &str) -> String {
    lines([format!(
        "private const string Query = \"{}\";",
        query.replace('"', "\\\"")
    )])
}

/// Read-only fields for the collaborator and every dependency map
pub fn field_declarations(collaborator: Collaborator, maps: &[DependencyMap]) -> String {
    let mut fields = vec![format!(
        "private readonly {} {};",
        collaborator.type_name,
        collaborator.field()
    )];
    fields.extend(
        maps.iter()
            .map(|m| format!("private readonly {} {};", m.type_name(), m.field())),
    );
    lines(fields)
}

/// Constructor: collaborator first, then one parameter per dependency map
pub fn constructor(type_name: &str, collaborator: Collaborator, maps: &[DependencyMap]) -> String {
    let mut parameters = vec![format!(
        "{} {}",
        collaborator.type_name, collaborator.parameter
    )];
    parameters.extend(
        maps.iter()
            .map(|m| format!("{} {}", m.type_name(), m.parameter())),
    );

    let mut assignments = vec![format!(
        "{} = {};",
        collaborator.field(),
        collaborator.parameter
    )];
    assignments.extend(
        maps.iter()
            .map(|m| format!("{} = {};", m.field(), m.parameter())),
    );

    block(
        &format!("public {}({})", type_name, comma_list(parameters)),
        &lines(assignments),
    )
}

/// Declare and read one local per property of `class`
///
/// Column `i` of `table` is read from row index `offset + i`. Foreign keys
/// are resolved through the matching dependency map, except the column named
/// `resolved.0`, which is bound to the expression `resolved.1` instead.
pub fn read_locals(
    project: &Project,
    class: &Class,
    table: &Table,
    offset: usize,
    resolved: Option<(&str, &str)>,
) -> String {
    let mut statements = Vec::with_capacity(class.properties.len());

    for (i, property) in class.properties.iter().enumerate() {
        let local = property.parameter_name();
        let index = offset + i;

        let statement = match (&property.type_ref, table.columns.get(i)) {
            (TypeRef::User(_), Some(column))
                if Some(column.name.as_str()) == resolved.map(|r| r.0) =>
            {
                lines([format!(
                    "var {} = {};",
                    local,
                    resolved.map(|r| r.1).unwrap_or_default()
                )])
            }
            // No map is injected for the class being filled
            (TypeRef::User(target), Some(column)) if *target == class.name => lines([
                format!(
                    "// {}.{} refers back to {} and is left unset",
                    table.name, column.name, class.name
                ),
                format!(
                    "var {} = {};",
                    local,
                    TypeResolver::zero_value(&property.type_ref)
                ),
            ]),
            (TypeRef::User(target), Some(_)) => {
                let map = to_field_name(&to_dependency_name(target));
                let key = project.key_type_of_class(target);
                read_guarded(
                    &local,
                    &property.type_ref,
                    index,
                    &format!(
                        "{}[{}]",
                        map,
                        TypeResolver::read_expression(ROW, key, index)
                    ),
                )
            }
            (TypeRef::Scalar(scalar), Some(_)) => read_guarded(
                &local,
                &property.type_ref,
                index,
                &TypeResolver::read_expression(ROW, *scalar, index),
            ),
            // Collections have no column; they start empty
            (type_ref, _) => lines([format!(
                "var {} = {};",
                local,
                TypeResolver::zero_value(type_ref)
            )]),
        };
        statements.push(statement);
    }

    statements.concat()
}

/// Zero-initialise a local, then overwrite it when the column is not null
fn read_guarded(local: &str, type_ref: &TypeRef, index: usize, value: &str) -> String {
    let declaration = lines([format!(
        "var {} = {};",
        local,
        TypeResolver::zero_value(type_ref)
    )]);
    let read = block(
        &format!("if (!{}.IsDBNull({}))", ROW, index),
        &lines([format!("{} = {};", local, value)]),
    );
    format!("{}{}", declaration, read)
}

/// `new Class(local1, local2, ...)` in property order
pub fn construct(class: &Class) -> String {
    format!(
        "new {}({})",
        class.name,
        comma_list(class.properties.iter().map(|p| p.parameter_name()))
    )
}

/// `Fill` reads one row into a new instance of the class
pub fn fill_method(project: &Project, class: &Class, table: &Table) -> String {
    let body = sections([
        read_locals(project, class, table, 0, None),
        lines([format!("return {};", construct(class))]),
    ]);
    block(
        &format!("public {} Fill(IFieldDataReader {})", class.name, ROW),
        &body,
    )
}

/// `GetAll` runs the query and fills one instance per row
pub fn get_all_method(class: &Class, collaborator: Collaborator) -> String {
    let body = lines([
        format!("var {} = new List<{}>();", ITEMS, class.name),
        format!(
            "{}.Execute(Query, {} => {}.Add(this.Fill({})));",
            collaborator.field(),
            ROW,
            ITEMS,
            ROW
        ),
        format!("return {};", ITEMS),
    ]);
    block(&format!("public List<{}> GetAll()", class.name), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::tests::outlets_and_visits;
    use crate::schema::{Column, Schema};

    #[test]
    fn test_select_columns() {
        let schema = outlets_and_visits();
        let visits = schema.get_table("Visits").unwrap();
        assert_eq!(select_columns(visits), "Id, Outlet, Date");
        assert_eq!(
            qualified_columns(visits),
            "Visits.Id, Visits.Outlet, Visits.Date"
        );
    }

    #[test]
    fn test_constructor_orders_collaborator_first() {
        let maps = vec![
            DependencyMap {
                class: "Outlet".into(),
                key: ScalarType::Integer,
            },
            DependencyMap {
                class: "Category".into(),
                key: ScalarType::String,
            },
        ];
        let code = constructor("VisitAdapter", QUERY_EXECUTOR, &maps);
        assert!(code.starts_with(
            "public VisitAdapter(IQueryExecutor executor, Dictionary<long, Outlet> outlets, Dictionary<string, Category> categories)\n"
        ));
        assert!(code.contains("    _executor = executor;\n    _outlets = outlets;\n    _categories = categories;\n"));
    }

    #[test]
    fn test_read_locals_resolve_foreign_keys_through_maps() {
        let project = Project::new(outlets_and_visits()).unwrap();
        let table = project.schema().get_table("Visits").unwrap();
        let entity = project.create_entity(table).unwrap();
        let code = read_locals(&project, &entity.class, table, 0, None);

        assert!(code.contains("var id = 0L;\nif (!__r.IsDBNull(0))\n{\n    id = __r.GetInt64(0);\n}\n"));
        assert!(code.contains("var outlet = default(Outlet);\nif (!__r.IsDBNull(1))\n{\n    outlet = _outlets[__r.GetInt64(1)];\n}\n"));
        assert!(code.contains("date = __r.GetDateTime(2);"));
    }

    #[test]
    fn test_read_locals_with_offset_and_resolved_owner() {
        let project = Project::new(outlets_and_visits()).unwrap();
        let table = project.schema().get_table("Visits").unwrap();
        let entity = project.create_entity(table).unwrap();
        let code = read_locals(&project, &entity.class, table, 2, Some(("Outlet", "__owner")));

        assert!(code.contains("id = __r.GetInt64(2);"));
        assert!(code.contains("var outlet = __owner;\n"));
        assert!(code.contains("date = __r.GetDateTime(4);"));
        assert!(!code.contains("_outlets"));
    }

    #[test]
    fn test_only_the_joined_column_binds_to_the_owner() {
        let schema = Schema::new(
            "ledger",
            vec![
                Table::new("Outlets").column(Column::scalar("Id", ScalarType::Integer)),
                Table::new("Transfers")
                    .column(Column::scalar("Id", ScalarType::Integer))
                    .column(Column::foreign_key("From", "Outlets"))
                    .column(Column::foreign_key("To", "Outlets")),
            ],
        );
        let project = Project::new(schema).unwrap();
        let table = project.schema().get_table("Transfers").unwrap();
        let entity = project.create_entity(table).unwrap();
        let code = read_locals(&project, &entity.class, table, 1, Some(("From", "__owner")));

        assert!(code.contains("var from = __owner;\n"));
        assert!(code.contains("to = _outlets[__r.GetInt64(3)];"));
        assert!(!code.contains("var to = __owner;"));
    }

    #[test]
    fn test_self_reference_is_left_unset() {
        let schema = Schema::new(
            "field",
            vec![Table::new("Employees")
                .column(Column::scalar("Id", ScalarType::Integer))
                .column(Column::foreign_key("Manager", "Employees"))],
        );
        let project = Project::new(schema).unwrap();
        let table = project.schema().get_table("Employees").unwrap();
        let entity = project.create_entity(table).unwrap();
        let code = read_locals(&project, &entity.class, table, 0, None);

        assert!(code.contains(
            "// Employees.Manager refers back to Employee and is left unset\nvar manager = default(Employee);\n"
        ));
        assert!(!code.contains("_employees"));
    }

    #[test]
    fn test_get_all_uses_reserved_locals() {
        let project = Project::new(outlets_and_visits()).unwrap();
        let table = project.schema().get_table("Outlets").unwrap();
        let entity = project.create_entity(table).unwrap();
        let code = get_all_method(&entity.class, QUERY_EXECUTOR);

        assert!(code.contains("var __items = new List<Outlet>();"));
        assert!(code.contains("_executor.Execute(Query, __r => __items.Add(this.Fill(__r)));"));
        assert!(code.contains("return __items;"));
    }
}
