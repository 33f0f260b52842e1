//! Configuration settings for ddl-scaffold

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::defaults;
use crate::error::{CodegenError, Result};
use crate::project::Project;
use crate::schema::Schema;

/// Main configuration struct for code generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path to the SQL schema file
    #[serde(default)]
    pub schema_file: PathBuf,

    /// Schema name; defaults to the schema file's stem
    #[serde(default)]
    pub schema_name: Option<String>,

    /// Root of the generated directory layout
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Root namespace of the generated files
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Namespace imported by read adapters
    #[serde(default = "default_query_namespace")]
    pub query_namespace: String,

    /// Namespace imported by mutation adapters
    #[serde(default = "default_transaction_namespace")]
    pub transaction_namespace: String,

    /// Namespace imported by modules
    #[serde(default = "default_presentation_namespace")]
    pub presentation_namespace: String,

    /// Tables that get mutation adapters instead of read adapters
    #[serde(default)]
    pub mutable_tables: Vec<String>,

    /// Tables without modules or display wrappers
    #[serde(default)]
    pub hidden_tables: Vec<String>,

    /// Owner table -> inverse (child) table
    #[serde(default)]
    pub inverse_tables: BTreeMap<String, String>,

    /// Table -> class name overrides
    #[serde(default)]
    pub class_names: BTreeMap<String, String>,

    /// Dry run mode - preview without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_output_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_DIR)
}
fn default_namespace() -> String {
    defaults::NAMESPACE.to_string()
}
fn default_query_namespace() -> String {
    defaults::QUERY_NAMESPACE.to_string()
}
fn default_transaction_namespace() -> String {
    defaults::TRANSACTION_NAMESPACE.to_string()
}
fn default_presentation_namespace() -> String {
    defaults::PRESENTATION_NAMESPACE.to_string()
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            schema_file: PathBuf::new(),
            schema_name: None,
            output_dir: default_output_dir(),
            namespace: default_namespace(),
            query_namespace: default_query_namespace(),
            transaction_namespace: default_transaction_namespace(),
            presentation_namespace: default_presentation_namespace(),
            mutable_tables: Vec::new(),
            hidden_tables: Vec::new(),
            inverse_tables: BTreeMap::new(),
            class_names: BTreeMap::new(),
            dry_run: default_dry_run(),
            log_level: None,
        }
    }
}

impl CodegenConfig {
    /// Create a default config with the given schema file
    pub fn default_with_schema(schema_file: PathBuf) -> Self {
        Self {
            schema_file,
            ..Default::default()
        }
    }

    /// Load configuration using config-rs (file + environment variables)
    ///
    /// Without a path, `ddl-scaffold.toml` in the working directory is read
    /// when present. `DDL_SCAFFOLD__<FIELD>` variables override either.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from config file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            // Try default locations
            builder = builder.add_source(File::with_name("ddl-scaffold").required(false));
        }

        // Override with environment variables (DDL_SCAFFOLD__*)
        builder = builder.add_source(Environment::with_prefix("DDL_SCAFFOLD").separator("__"));

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Schema name: explicit, else the schema file's stem
    pub fn schema_name(&self) -> String {
        self.schema_name.clone().unwrap_or_else(|| {
            self.schema_file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "schema".to_string())
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.schema_file.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "schema_file is required".into(),
            ));
        }

        if !self.schema_file.exists() {
            return Err(CodegenError::ValidationError(format!(
                "Schema file not found: {}",
                self.schema_file.display()
            )));
        }

        for (key, value) in [
            ("namespace", &self.namespace),
            ("query_namespace", &self.query_namespace),
            ("transaction_namespace", &self.transaction_namespace),
            ("presentation_namespace", &self.presentation_namespace),
        ] {
            if value.trim().is_empty() {
                return Err(CodegenError::ValidationError(format!(
                    "{} must not be empty",
                    key
                )));
            }
        }

        Ok(())
    }

    /// Apply the class-name overrides and registries to `schema`
    ///
    /// Any table named here but missing from the schema is an error.
    pub fn build_project(&self, mut schema: Schema) -> Result<Project> {
        for (table_name, class_name) in &self.class_names {
            let table = schema
                .tables
                .iter_mut()
                .find(|t| &t.name == table_name)
                .ok_or_else(|| CodegenError::UnknownTable(table_name.clone()))?;
            table.class_name = Some(class_name.clone());
        }

        let mut project = Project::new(schema)?;
        for table in &self.mutable_tables {
            project.mark_mutable(table)?;
        }
        for table in &self.hidden_tables {
            project.mark_hidden(table)?;
        }
        for (owner, inverse) in &self.inverse_tables {
            project.register_inverse(owner, inverse)?;
        }
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::tests::outlets_and_visits;

    #[test]
    fn test_default_config() {
        let config = CodegenConfig::default();
        assert_eq!(config.namespace, "Generated");
        assert_eq!(config.output_dir, PathBuf::from("./generated"));
        assert!(config.mutable_tables.is_empty());
        assert!(!config.dry_run);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_load_layers_environment_over_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ddl-scaffold.toml");
        std::fs::write(
            &path,
            r#"
                schema_file = "field.sql"
                namespace = "Field.Data"
                mutable_tables = ["Visits"]
            "#,
        )
        .unwrap();

        let config = CodegenConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.schema_file, PathBuf::from("field.sql"));
        assert_eq!(config.namespace, "Field.Data");
        assert_eq!(config.mutable_tables, vec!["Visits".to_string()]);
        assert_eq!(config.transaction_namespace, defaults::TRANSACTION_NAMESPACE);

        std::env::set_var("DDL_SCAFFOLD__NAMESPACE", "Route.Data");
        let config = CodegenConfig::load(Some(path.as_path()));
        std::env::remove_var("DDL_SCAFFOLD__NAMESPACE");

        let config = config.unwrap();
        assert_eq!(config.namespace, "Route.Data");
        assert_eq!(config.mutable_tables, vec!["Visits".to_string()]);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = CodegenConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(err, CodegenError::ConfigError(_)));
    }

    #[test]
    fn test_validation_missing_schema() {
        let config = CodegenConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_schema_name_falls_back_to_file_stem() {
        let config = CodegenConfig::default_with_schema(PathBuf::from("db/field.sql"));
        assert_eq!(config.schema_name(), "field");

        let config = CodegenConfig {
            schema_name: Some("sales".into()),
            ..config
        };
        assert_eq!(config.schema_name(), "sales");
    }

    #[test]
    fn test_registries_from_toml() {
        let toml_content = r#"
            schema_file = "field.sql"
            namespace = "Field.Data"
            mutable_tables = ["Visits"]
            hidden_tables = ["Outlets"]
            log_level = "debug"

            [inverse_tables]
            Outlets = "Visits"

            [class_names]
            Visits = "CallReport"
        "#;
        let config: CodegenConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert_eq!(config.query_namespace, defaults::QUERY_NAMESPACE);

        let project = config.build_project(outlets_and_visits()).unwrap();
        assert!(project.is_mutable("Visits"));
        assert!(project.is_hidden("Outlets"));
        assert!(project.is_inverse_of("Visits", "Outlets"));
        assert_eq!(
            project.schema().get_table("Visits").unwrap().class_name(),
            "CallReport"
        );
    }

    #[test]
    fn test_unknown_tables_fail() {
        let config = CodegenConfig {
            mutable_tables: vec!["Invoices".into()],
            ..Default::default()
        };
        assert!(matches!(
            config.build_project(outlets_and_visits()),
            Err(CodegenError::UnknownTable(_))
        ));

        let config = CodegenConfig {
            class_names: BTreeMap::from([("Invoices".to_string(), "Invoice".to_string())]),
            ..Default::default()
        };
        assert!(matches!(
            config.build_project(outlets_and_visits()),
            Err(CodegenError::UnknownTable(_))
        ));
    }

    #[test]
    fn test_inverse_without_foreign_key_fails() {
        let config = CodegenConfig {
            inverse_tables: BTreeMap::from([("Visits".to_string(), "Outlets".to_string())]),
            ..Default::default()
        };
        assert!(matches!(
            config.build_project(outlets_and_visits()),
            Err(CodegenError::MissingForeignKey { .. })
        ));
    }
}
