//! Checks the files `build.rs` generated from `schema.sql` and the
//! `[package.metadata.ddl-scaffold]` section of this crate's manifest.

macro_rules! generated {
    ($path:literal) => {
        include_str!(concat!(env!("OUT_DIR"), "/", $path))
    };
}

const REGION: &str = generated!("Objects/Region.cs");
const OUTLET: &str = generated!("Objects/Outlet.cs");
const VISIT: &str = generated!("Objects/Visit.cs");
const AUDIT_ENTRY: &str = generated!("Objects/AuditEntry.cs");

const EMPLOYEE_ADAPTER: &str = generated!("Adapters/EmployeeAdapter.cs");
const PRODUCT_ADAPTER: &str = generated!("Adapters/ProductAdapter.cs");
const AUDIT_ENTRY_ADAPTER: &str = generated!("Adapters/AuditEntryAdapter.cs");

const OUTLET_DATA_ADAPTER: &str = generated!("DataAdapters/OutletDataAdapter.cs");
const VISIT_DATA_ADAPTER: &str = generated!("DataAdapters/VisitDataAdapter.cs");

const OUTLET_MODULE: &str = generated!("Modules/OutletModule.cs");
const PRODUCT_VIEW_ITEM: &str = generated!("ViewItems/ProductViewItem.cs");

fn all_files() -> [&'static str; 11] {
    [
        REGION,
        OUTLET,
        VISIT,
        AUDIT_ENTRY,
        EMPLOYEE_ADAPTER,
        PRODUCT_ADAPTER,
        AUDIT_ENTRY_ADAPTER,
        OUTLET_DATA_ADAPTER,
        VISIT_DATA_ADAPTER,
        OUTLET_MODULE,
        PRODUCT_VIEW_ITEM,
    ]
}

mod records {
    use super::*;

    #[test]
    fn read_only_record() {
        assert_eq!(
            REGION,
            "using System;

namespace Field.Data.Objects
{
    public sealed class Region
    {
        public long Id { get; }
        public string Name { get; }

        public Region(long id, string name)
        {
            if (name == null) throw new ArgumentNullException(nameof(name));

            this.Id = id;
            this.Name = name;
        }
    }
}
"
        );
    }

    #[test]
    fn mutable_owner_record_carries_inverse_collection() {
        assert!(OUTLET.starts_with("using System;\nusing System.Collections.Generic;\n\n"));
        assert!(OUTLET.contains("public long Id { get; set; }"));
        assert!(OUTLET.contains("public Region Region { get; set; }"));
        assert!(OUTLET.contains("public List<Visit> Visits { get; set; }"));
        assert!(OUTLET.contains(
            "public Outlet(long id, string name, Region region, List<Visit> visits)"
        ));
    }

    #[test]
    fn null_checks_precede_assignments_in_property_order() {
        let outlet = VISIT.find("nameof(outlet)").unwrap();
        let employee = VISIT.find("nameof(employee)").unwrap();
        let notes = VISIT.find("nameof(notes)").unwrap();
        let first_assignment = VISIT.find("this.Id = id;").unwrap();
        assert!(outlet < employee && employee < notes && notes < first_assignment);
        assert!(!VISIT.contains("nameof(visitedOn)"));
    }

    #[test]
    fn class_name_override() {
        assert!(AUDIT_ENTRY.contains("public sealed class AuditEntry"));
        assert!(AUDIT_ENTRY.contains("public DateTime Happened { get; }"));
    }
}

mod adapters {
    use super::*;

    #[test]
    fn self_reference_and_dependency_maps() {
        assert!(EMPLOYEE_ADAPTER.contains(
            "private const string Query = \"SELECT Id, FullName, Manager, Region FROM Employees\";"
        ));
        assert!(EMPLOYEE_ADAPTER
            .contains("public EmployeeAdapter(IQueryExecutor executor, Dictionary<long, Region> regions)"));
        assert!(EMPLOYEE_ADAPTER.contains(
            "// Employees.Manager refers back to Employee and is left unset"
        ));
        assert!(EMPLOYEE_ADAPTER.contains("var manager = default(Employee);"));
        assert!(EMPLOYEE_ADAPTER.contains("region = _regions[__r.GetInt64(3)];"));
        assert!(EMPLOYEE_ADAPTER.contains("return new Employee(id, fullName, manager, region);"));
    }

    #[test]
    fn scalar_readers() {
        assert!(PRODUCT_ADAPTER.contains("var code = string.Empty;"));
        assert!(PRODUCT_ADAPTER.contains("price = __r.GetDecimal(1);"));
        assert!(PRODUCT_ADAPTER.contains("image = __r.GetBytes(2);"));
        assert!(PRODUCT_ADAPTER.contains("_executor.Execute(Query, __r => __items.Add(this.Fill(__r)));"));
    }

    #[test]
    fn hidden_tables_still_get_data_access() {
        assert!(AUDIT_ENTRY_ADAPTER.contains("public sealed class AuditEntryAdapter"));
    }

    #[test]
    fn owner_hosts_composite_fetch() {
        assert!(OUTLET_DATA_ADAPTER.contains(
            "SELECT Outlets.Id, Outlets.Name, Outlets.Region, Visits.Id, Visits.Outlet, Visits.Employee, Visits.VisitedOn, Visits.Notes FROM Outlets LEFT JOIN Visits ON Visits.Outlet = Outlets.Id"
        ));
        assert!(OUTLET_DATA_ADAPTER.contains(
            "public OutletDataAdapter(ITransactionContext context, Dictionary<long, Region> regions, Dictionary<long, Employee> employees)"
        ));
        assert!(OUTLET_DATA_ADAPTER.contains("employee = _employees[__r.GetInt64(5)];"));
        assert!(OUTLET_DATA_ADAPTER.contains("var outlet = __owner;"));
        assert!(OUTLET_DATA_ADAPTER
            .contains("__owner.Visits.Add(new Visit(id, outlet, employee, visitedOn, notes));"));
    }

    #[test]
    fn inverse_child_has_no_independent_fetch() {
        assert!(VISIT_DATA_ADAPTER.contains("using Data.Transactions;"));
        assert!(!VISIT_DATA_ADAPTER.contains("GetAll"));
        assert!(VISIT_DATA_ADAPTER.contains("public void Update(Visit item)"));
    }
}

mod display {
    use super::*;

    #[test]
    fn module_imports_presentation_namespace() {
        assert!(OUTLET_MODULE.contains("using Presentation;\nusing Field.Data.Objects;\n"));
        assert!(OUTLET_MODULE.contains("public IResultOrderer<Outlet> Orderer { get; }"));
    }

    #[test]
    fn view_item_passes_through() {
        assert!(PRODUCT_VIEW_ITEM.contains("namespace Field.Data.ViewItems"));
        assert!(PRODUCT_VIEW_ITEM.contains("public decimal Price => this.Item.Price;"));
    }
}

#[test]
fn blank_lines_are_never_indented() {
    for contents in all_files() {
        assert!(!contents.lines().any(|l| !l.is_empty() && l.trim().is_empty()));
    }
}
