//! ddl-scaffold: Generate record types, data adapters and display scaffolding
//! from a relational schema
//!
//! This crate provides both a CLI tool and a library. It parses SQL DDL using
//! `sqlparser-rs` (or takes a [`schema::Schema`] built in code), derives one
//! class per table and writes five buckets of C# source files:
//!
//! - `Objects/` - one sealed record type per table
//! - `Adapters/` - fill-only read adapters for read-only tables
//! - `DataAdapters/` - adapters with fetch and insert/update/delete stubs for mutable tables
//! - `Modules/` - composition points for ordering and filtering strategies
//! - `ViewItems/` - pass-through display wrappers
//!
//! # Usage in build.rs (Recommended)
//!
//! Configure in your `Cargo.toml`:
//!
//! ```toml
//! [package.metadata.ddl-scaffold]
//! schema_file = "schema.sql"
//! namespace = "Field.Data"
//! mutable_tables = ["Visits"]
//!
//! [package.metadata.ddl-scaffold.inverse_tables]
//! Outlets = "Visits"
//! ```
//!
//! Then use a minimal `build.rs`:
//!
//! ```rust,ignore
//! fn main() {
//!     ddl_scaffold::generate_from_cargo_metadata()
//!         .expect("Failed to generate scaffolding");
//! }
//! ```
//!
//! # Alternative: Programmatic Configuration
//!
//! ```rust,ignore
//! fn main() {
//!     ddl_scaffold::CodegenBuilder::new("schema.sql")
//!         .output_dir("generated")
//!         .namespace("Field.Data")
//!         .mutable_tables(&["Visits"])
//!         .inverse("Outlets", "Visits")
//!         .generate()
//!         .expect("Failed to generate scaffolding");
//!
//!     println!("cargo:rerun-if-changed=schema.sql");
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! ddl-scaffold --schema schema.sql --output ./generated generate
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod project;
pub mod schema;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::info;

use codegen::{PlannedFile, ProjectWriter, WriterOptions};
pub use config::CodegenConfig;
pub use error::{CodegenError, Result};
pub use project::Project;

/// Parse the configured schema file and apply the configured registries
pub fn load_project(config: &CodegenConfig) -> Result<Project> {
    info!("Parsing schema: {:?}", config.schema_file);
    let schema_sql = std::fs::read_to_string(&config.schema_file)?;
    let schema = parser::parse_schema(&config.schema_name(), &schema_sql)?;
    info!("Found {} tables", schema.tables.len());
    config.build_project(schema)
}

/// Files a run with `config` would write, relative to `config.output_dir`
pub fn plan(config: &CodegenConfig) -> Result<Vec<PlannedFile>> {
    let project = load_project(config)?;
    ProjectWriter::new(WriterOptions::from(config)).plan(&project)
}

/// Main entry point for code generation; returns the number of files written
pub fn generate(config: &CodegenConfig) -> Result<usize> {
    let project = load_project(config)?;
    let writer = ProjectWriter::new(WriterOptions::from(config));

    if config.dry_run {
        let planned = writer.plan(&project)?;
        for file in &planned {
            info!("Would write {}", config.output_dir.join(&file.path).display());
        }
        return Ok(0);
    }

    let written = writer.save(&config.output_dir, &project)?;
    info!("Code generation complete");
    Ok(written)
}

/// Builder pattern for easy configuration in build.rs
pub struct CodegenBuilder {
    config: CodegenConfig,
}

impl CodegenBuilder {
    /// Create a new builder with the given schema file
    pub fn new(schema_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig::default_with_schema(schema_file.as_ref().to_path_buf()),
        }
    }

    /// Set the root of the generated directory layout
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the schema name (defaults to the schema file's stem)
    pub fn schema_name(mut self, name: &str) -> Self {
        self.config.schema_name = Some(name.to_string());
        self
    }

    /// Set the root namespace
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.config.namespace = namespace.to_string();
        self
    }

    /// Set the namespace read adapters import their collaborators from
    pub fn query_namespace(mut self, namespace: &str) -> Self {
        self.config.query_namespace = namespace.to_string();
        self
    }

    /// Set the namespace mutation adapters import their collaborators from
    pub fn transaction_namespace(mut self, namespace: &str) -> Self {
        self.config.transaction_namespace = namespace.to_string();
        self
    }

    /// Set the namespace modules import their strategies from
    pub fn presentation_namespace(mut self, namespace: &str) -> Self {
        self.config.presentation_namespace = namespace.to_string();
        self
    }

    /// Mark tables mutable
    pub fn mutable_tables(mut self, tables: &[&str]) -> Self {
        self.config
            .mutable_tables
            .extend(tables.iter().map(|t| t.to_string()));
        self
    }

    /// Hide tables from the display layer
    pub fn hidden_tables(mut self, tables: &[&str]) -> Self {
        self.config
            .hidden_tables
            .extend(tables.iter().map(|t| t.to_string()));
        self
    }

    /// Register `inverse` as the one-to-many collection of `owner`
    pub fn inverse(mut self, owner: &str, inverse: &str) -> Self {
        self.config
            .inverse_tables
            .insert(owner.to_string(), inverse.to_string());
        self
    }

    /// Override the class name derived for `table`
    pub fn class_name(mut self, table: &str, class_name: &str) -> Self {
        self.config
            .class_names
            .insert(table.to_string(), class_name.to_string());
        self
    }

    /// Enable dry run mode (preview without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    /// The assembled configuration
    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Generate the code
    pub fn generate(self) -> Result<usize> {
        generate(&self.config)
    }
}

/// Configuration for `[package.metadata.ddl-scaffold]` in Cargo.toml
#[derive(Debug, Clone, Default, serde::Deserialize)]
struct CargoMetadataConfig {
    /// Path to the SQL schema file (required)
    schema_file: Option<String>,

    /// Schema name (default: schema file stem)
    schema_name: Option<String>,

    /// Output directory, relative to the manifest (default: OUT_DIR)
    output_dir: Option<String>,

    namespace: Option<String>,
    query_namespace: Option<String>,
    transaction_namespace: Option<String>,
    presentation_namespace: Option<String>,

    #[serde(default)]
    mutable_tables: Vec<String>,

    #[serde(default)]
    hidden_tables: Vec<String>,

    /// Owner table -> inverse table
    #[serde(default)]
    inverse_tables: BTreeMap<String, String>,

    /// Table -> class name
    #[serde(default)]
    class_names: BTreeMap<String, String>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoToml {
    package: Option<CargoPackage>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackage {
    metadata: Option<CargoPackageMetadata>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackageMetadata {
    #[serde(rename = "ddl-scaffold")]
    ddl_scaffold: Option<CargoMetadataConfig>,
}

/// Generate code from `[package.metadata.ddl-scaffold]` in Cargo.toml
///
/// This function reads configuration from the downstream project's Cargo.toml,
/// making build.rs minimal:
///
/// ```rust,ignore
/// // build.rs
/// fn main() {
///     ddl_scaffold::generate_from_cargo_metadata()
///         .expect("Failed to generate scaffolding");
/// }
/// ```
///
/// Configure in Cargo.toml:
///
/// ```toml
/// [package.metadata.ddl-scaffold]
/// schema_file = "schema.sql"
/// mutable_tables = ["Visits"]
/// hidden_tables = ["AuditLog"]
/// ```
pub fn generate_from_cargo_metadata() -> Result<usize> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").map_err(|_| {
        CodegenError::ConfigError(
            "CARGO_MANIFEST_DIR not set - are you running from build.rs?".into(),
        )
    })?;

    let cargo_toml_path = PathBuf::from(&manifest_dir).join("Cargo.toml");
    let cargo_toml_content = std::fs::read_to_string(&cargo_toml_path)?;
    let metadata_config = metadata_from_manifest(&cargo_toml_content).map_err(|e| match e {
        CodegenError::ConfigError(msg) => CodegenError::ConfigError(format!(
            "{}: {}",
            cargo_toml_path.display(),
            msg
        )),
        other => other,
    })?;

    // Determine output directory (default to OUT_DIR)
    let out_dir = std::env::var("OUT_DIR").map(PathBuf::from).map_err(|_| {
        CodegenError::ConfigError("OUT_DIR not set - are you running from build.rs?".into())
    })?;

    let config = config_from_metadata(metadata_config, Path::new(&manifest_dir), &out_dir)?;

    // Emit rerun-if-changed
    println!("cargo:rerun-if-changed={}", config.schema_file.display());
    println!("cargo:rerun-if-changed={}", cargo_toml_path.display());

    generate(&config)
}

/// Extract the `[package.metadata.ddl-scaffold]` table from a manifest
fn metadata_from_manifest(cargo_toml_content: &str) -> Result<CargoMetadataConfig> {
    let cargo_toml: CargoToml = toml::from_str(cargo_toml_content)
        .map_err(|e| CodegenError::ConfigError(format!("Failed to parse manifest: {}", e)))?;

    cargo_toml
        .package
        .and_then(|p| p.metadata)
        .and_then(|m| m.ddl_scaffold)
        .ok_or_else(|| {
            CodegenError::ConfigError(
                "Missing [package.metadata.ddl-scaffold] section in Cargo.toml".into(),
            )
        })
}

/// Resolve manifest metadata into a full configuration
///
/// Paths are relative to `manifest_dir`; output defaults to `out_dir`.
fn config_from_metadata(
    metadata: CargoMetadataConfig,
    manifest_dir: &Path,
    out_dir: &Path,
) -> Result<CodegenConfig> {
    let schema_file = metadata.schema_file.ok_or_else(|| {
        CodegenError::ConfigError(
            "schema_file is required in [package.metadata.ddl-scaffold]".into(),
        )
    })?;

    let mut config = CodegenConfig::default_with_schema(manifest_dir.join(schema_file));
    config.schema_name = metadata.schema_name;
    config.output_dir = match metadata.output_dir {
        Some(dir) => manifest_dir.join(dir),
        None => out_dir.to_path_buf(),
    };
    if let Some(namespace) = metadata.namespace {
        config.namespace = namespace;
    }
    if let Some(namespace) = metadata.query_namespace {
        config.query_namespace = namespace;
    }
    if let Some(namespace) = metadata.transaction_namespace {
        config.transaction_namespace = namespace;
    }
    if let Some(namespace) = metadata.presentation_namespace {
        config.presentation_namespace = namespace;
    }
    config.mutable_tables = metadata.mutable_tables;
    config.hidden_tables = metadata.hidden_tables;
    config.inverse_tables = metadata.inverse_tables;
    config.class_names = metadata.class_names;
    Ok(config)
}
