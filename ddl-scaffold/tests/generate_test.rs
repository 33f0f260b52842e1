//! End-to-end generation against a temporary directory

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ddl_scaffold::codegen::{ArtifactKind, ProjectWriter, WriterOptions};
use ddl_scaffold::schema::{Column, ScalarType, Schema, Table};
use ddl_scaffold::{CodegenBuilder, CodegenConfig, CodegenError, Project};
use tempfile::TempDir;

const FIELD_SQL: &str = r#"
CREATE TABLE Regions (
    Id BIGINT PRIMARY KEY,
    Name VARCHAR(100) NOT NULL
);

CREATE TABLE Outlets (
    Id BIGINT PRIMARY KEY,
    Name VARCHAR(255) NOT NULL,
    Region BIGINT NOT NULL,
    FOREIGN KEY (Region) REFERENCES Regions(Id)
);

CREATE TABLE Visits (
    Id BIGINT PRIMARY KEY,
    Outlet BIGINT NOT NULL,
    VisitedOn DATETIME NOT NULL,
    FOREIGN KEY (Outlet) REFERENCES Outlets(Id)
);
"#;

fn write_schema(dir: &Path) -> PathBuf {
    let path = dir.join("field.sql");
    fs::write(&path, FIELD_SQL).unwrap();
    path
}

/// Relative path -> contents of every file below `root`
fn read_tree(root: &Path) -> BTreeMap<PathBuf, String> {
    let mut files = BTreeMap::new();
    for kind in ArtifactKind::ALL {
        let dir = root.join(kind.directory());
        if !dir.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            let relative = path.strip_prefix(root).unwrap().to_path_buf();
            files.insert(relative, fs::read_to_string(&path).unwrap());
        }
    }
    files
}

fn field_config(dir: &TempDir) -> CodegenConfig {
    let mut config = CodegenConfig::default_with_schema(write_schema(dir.path()));
    config.output_dir = dir.path().join("out");
    config.namespace = "Field.Data".to_string();
    config.mutable_tables = vec!["Outlets".into(), "Visits".into()];
    config.inverse_tables = BTreeMap::from([("Outlets".to_string(), "Visits".to_string())]);
    config
}

#[test]
fn test_generate_writes_every_bucket() {
    let dir = TempDir::new().unwrap();
    let config = field_config(&dir);

    let written = ddl_scaffold::generate(&config).unwrap();
    let files = read_tree(&config.output_dir);
    assert_eq!(written, files.len());

    let names: Vec<String> = files
        .keys()
        .map(|p| p.display().to_string().replace('\\', "/"))
        .collect();
    assert_eq!(
        names,
        vec![
            "Adapters/RegionAdapter.cs",
            "DataAdapters/OutletDataAdapter.cs",
            "DataAdapters/VisitDataAdapter.cs",
            "Modules/OutletModule.cs",
            "Modules/RegionModule.cs",
            "Modules/VisitModule.cs",
            "Objects/Outlet.cs",
            "Objects/Region.cs",
            "Objects/Visit.cs",
            "ViewItems/RegionViewItem.cs",
        ]
    );
}

#[test]
fn test_second_run_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let config = field_config(&dir);

    ddl_scaffold::generate(&config).unwrap();
    let first = read_tree(&config.output_dir);

    // Stale files from a previous layout disappear
    fs::write(config.output_dir.join("Objects").join("Stale.cs"), "// stale").unwrap();

    ddl_scaffold::generate(&config).unwrap();
    let second = read_tree(&config.output_dir);
    assert_eq!(first, second);
}

#[test]
fn test_plan_matches_saved_files() {
    let dir = TempDir::new().unwrap();
    let config = field_config(&dir);

    let mut planned: Vec<PathBuf> = ddl_scaffold::plan(&config)
        .unwrap()
        .into_iter()
        .map(|file| file.path)
        .collect();
    planned.sort();

    ddl_scaffold::generate(&config).unwrap();
    let saved: Vec<PathBuf> = read_tree(&config.output_dir).into_keys().collect();
    assert_eq!(planned, saved);
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut config = field_config(&dir);
    config.dry_run = true;

    assert_eq!(ddl_scaffold::generate(&config).unwrap(), 0);
    assert!(!config.output_dir.exists());
}

#[test]
fn test_composite_fetch_lives_in_owner_adapter() {
    let dir = TempDir::new().unwrap();
    let config = field_config(&dir);
    ddl_scaffold::generate(&config).unwrap();
    let files = read_tree(&config.output_dir);

    let outlets = &files[Path::new("DataAdapters/OutletDataAdapter.cs")];
    assert!(outlets.contains(
        "SELECT Outlets.Id, Outlets.Name, Outlets.Region, Visits.Id, Visits.Outlet, Visits.VisitedOn FROM Outlets LEFT JOIN Visits ON Visits.Outlet = Outlets.Id"
    ));
    assert!(outlets.contains(
        "public OutletDataAdapter(ITransactionContext context, Dictionary<long, Region> regions)"
    ));
    assert!(outlets.contains("var __items = new Dictionary<long, Outlet>();"));
    assert!(outlets.contains("if (!__items.TryGetValue(__ownerKey, out __owner))"));
    assert!(outlets.contains("if (!__r.IsDBNull(3))"));
    assert!(outlets.contains("var outlet = __owner;"));
    assert!(outlets.contains("__owner.Visits.Add(new Visit(id, outlet, visitedOn));"));
    assert!(outlets.contains("return new List<Outlet>(__items.Values);"));

    let visits = &files[Path::new("DataAdapters/VisitDataAdapter.cs")];
    assert!(!visits.contains("GetAll"));
    assert!(!visits.contains("Query"));
    assert!(visits.contains("public VisitDataAdapter(ITransactionContext context)"));
    assert!(visits.contains("public void Insert(Visit item)"));
    assert_eq!(visits.matches("throw new NotImplementedException();").count(), 3);
}

#[test]
fn test_read_only_owner_leaves_composite_fetch_to_child() {
    let dir = TempDir::new().unwrap();
    let mut config = field_config(&dir);
    config.mutable_tables = vec!["Visits".into()];
    ddl_scaffold::generate(&config).unwrap();
    let files = read_tree(&config.output_dir);

    // Outlets is read-only: its adapter fills an empty collection
    assert!(!files.contains_key(Path::new("DataAdapters/OutletDataAdapter.cs")));
    let outlets = &files[Path::new("Adapters/OutletAdapter.cs")];
    assert!(outlets.contains("var visits = new List<Visit>();"));
    assert!(!outlets.contains("JOIN"));

    let visits = &files[Path::new("DataAdapters/VisitDataAdapter.cs")];
    assert!(visits.contains(
        "SELECT Outlets.Id, Outlets.Name, Outlets.Region, Visits.Id, Visits.Outlet, Visits.VisitedOn FROM Outlets LEFT JOIN Visits ON Visits.Outlet = Outlets.Id"
    ));
    assert!(visits.contains(
        "public VisitDataAdapter(ITransactionContext context, Dictionary<long, Region> regions)"
    ));
    assert!(visits.contains("public List<Outlet> GetAll()"));
    assert!(visits.contains("region = _regions[__r.GetInt64(2)];"));
    assert!(visits.contains("__owner = new Outlet(id, name, region, visits);"));
    assert!(visits.contains("var outlet = __owner;"));
    assert!(visits.contains("__owner.Visits.Add(new Visit(id, outlet, visitedOn));"));
    assert!(visits.contains("public void Delete(Visit item)"));
}

#[test]
fn test_file_layout() {
    let dir = TempDir::new().unwrap();
    let config = field_config(&dir);
    ddl_scaffold::generate(&config).unwrap();
    let files = read_tree(&config.output_dir);

    let region_adapter = &files[Path::new("Adapters/RegionAdapter.cs")];
    assert!(region_adapter.starts_with(
        "using System;\nusing System.Collections.Generic;\nusing Data.Query;\nusing Field.Data.Objects;\n\nnamespace Field.Data.Adapters\n{\n"
    ));

    let outlet_adapter = &files[Path::new("DataAdapters/OutletDataAdapter.cs")];
    assert!(outlet_adapter.contains("using Data.Transactions;\n"));
    assert!(!outlet_adapter.contains("using Data.Query;"));

    let module = &files[Path::new("Modules/RegionModule.cs")];
    assert!(module.contains("using Presentation;\n"));
    assert!(module.contains("namespace Field.Data.Modules\n"));

    for contents in files.values() {
        assert!(contents.ends_with("}\n"));
        assert!(!contents.lines().any(|l| !l.is_empty() && l.trim().is_empty()));
    }
}

#[test]
fn test_hidden_tables_have_no_display_layer() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    CodegenBuilder::new(write_schema(dir.path()))
        .output_dir(&out)
        .hidden_tables(&["Regions"])
        .class_name("Visits", "CallReport")
        .generate()
        .unwrap();

    let files = read_tree(&out);
    assert!(files.contains_key(Path::new("Objects/Region.cs")));
    assert!(!files.contains_key(Path::new("Modules/RegionModule.cs")));
    assert!(!files.contains_key(Path::new("ViewItems/RegionViewItem.cs")));
    assert!(files.contains_key(Path::new("Objects/CallReport.cs")));
    assert!(files.contains_key(Path::new("ViewItems/CallReportViewItem.cs")));
}

#[test]
fn test_unknown_registry_table_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    let mut config = field_config(&dir);
    config.mutable_tables.push("Invoices".into());

    let err = ddl_scaffold::generate(&config).unwrap_err();
    assert!(matches!(err, CodegenError::UnknownTable(name) if name == "Invoices"));
    assert!(!config.output_dir.exists());
}

#[test]
fn test_writer_accepts_schema_built_in_code() {
    let dir = TempDir::new().unwrap();
    let schema = Schema::new(
        "lab",
        vec![Table::new("Samples")
            .column(Column::scalar("Code", ScalarType::String))
            .column(Column::scalar("Payload", ScalarType::Bytes))
            .with_primary_key("Code")],
    );
    let project = Project::new(schema).unwrap();
    let writer = ProjectWriter::new(WriterOptions::default());

    assert_eq!(writer.save(dir.path(), &project).unwrap(), 4);
    let adapter = fs::read_to_string(dir.path().join("Adapters/SampleAdapter.cs")).unwrap();
    assert!(adapter.contains("namespace Generated.Adapters"));
    assert!(adapter.contains("code = __r.GetString(0);"));
    assert!(adapter.contains("payload = __r.GetBytes(1);"));
}
