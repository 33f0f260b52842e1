//! CLI entry point for ddl-scaffold

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ddl_scaffold::codegen::{fetch_plan, ArtifactKind, FetchPlan, TypeResolver};
use ddl_scaffold::config::CodegenConfig;

#[derive(Parser)]
#[command(name = "ddl-scaffold")]
#[command(about = "Generate record types, data adapters and display scaffolding from SQL schema DDL")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to SQL schema file (overrides config)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Root namespace (overrides config)
    #[arg(short, long)]
    namespace: Option<String>,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all five artifact buckets
    Generate,
    /// List the files a generate run would write
    Plan,
    /// Inspect schema (show parsed tables and derived classes for debugging)
    Inspect,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    // File (or ./ddl-scaffold.toml when present), then DDL_SCAFFOLD__* variables
    let mut config = CodegenConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides
    if let Some(schema) = cli.schema {
        config.schema_file = schema;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(namespace) = cli.namespace {
        config.namespace = namespace;
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    // Validate configuration
    config.validate()?;

    match &cli.command {
        Some(Commands::Inspect) => return inspect_schema(&config),
        Some(Commands::Plan) => return print_plan(&config),
        Some(Commands::Generate) | None => {}
    }

    if config.dry_run {
        return print_plan(&config);
    }

    info!("Generating code from schema: {:?}", config.schema_file);
    let written = ddl_scaffold::generate(&config)?;

    info!(
        "Code generation completed successfully ({} files in {:?})",
        written, config.output_dir
    );
    Ok(())
}

fn print_plan(config: &CodegenConfig) -> Result<()> {
    let planned = ddl_scaffold::plan(config)?;
    println!("Dry run mode - would generate:");
    for file in &planned {
        println!("  {}", config.output_dir.join(&file.path).display());
    }
    println!("{} files", planned.len());
    Ok(())
}

fn inspect_schema(config: &CodegenConfig) -> Result<()> {
    let project = ddl_scaffold::load_project(config)?;
    let entities = project.create_entities()?;

    println!(
        "Schema {} ({} tables):\n",
        project.name(),
        entities.len()
    );
    for entity in &entities {
        let table = entity.table;
        println!("Table: {} -> class {}", table.name, entity.class.name);

        println!("  Columns:");
        for column in &table.columns {
            match column.references() {
                Some(target) => println!("    - {} -> {}", column.name, target),
                None => println!("    - {} {}", column.name, column.storage_type()),
            }
        }
        if let Some(key) = table.key_column() {
            println!("  Key: {}", key.name);
        }

        println!("  Properties:");
        for property in &entity.class.properties {
            println!(
                "    - {} {}",
                TypeResolver::type_name(&property.type_ref),
                property.name
            );
        }

        let mut flags = Vec::new();
        if project.is_mutable(&table.name) {
            flags.push("mutable");
        }
        if project.is_hidden(&table.name) {
            flags.push("hidden");
        }
        if !flags.is_empty() {
            println!("  Flags: {}", flags.join(", "));
        }
        if let Some(owner) = project.owner_of(&table.name) {
            println!("  Collected by: {}", owner.name);
        }

        if project.is_mutable(&table.name) {
            match fetch_plan(&project, entity) {
                FetchPlan::Composite {
                    owner,
                    child,
                    child_key,
                } => println!(
                    "  Fetch: {} joined with {} on {}.{}",
                    owner.name, child.name, child.name, child_key.name
                ),
                FetchPlan::Suppressed { owner } => {
                    println!("  Fetch: through {}", owner.name)
                }
                FetchPlan::Plain => println!("  Fetch: plain"),
            }
        }

        let buckets: Vec<&str> = ArtifactKind::ALL
            .iter()
            .filter(|kind| kind.applies_to(&project, &table.name))
            .map(|kind| kind.directory())
            .collect();
        println!("  Buckets: {}", buckets.join(", "));
        println!();
    }

    Ok(())
}
