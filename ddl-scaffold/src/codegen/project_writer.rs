//! Project writer - renders every artifact and lays the files out on disk

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{defaults, CodegenConfig};
use crate::error::Result;
use crate::project::{Entity, Project};

use super::display_generator::{
    display_wrapper_name, generate_display_wrapper, generate_module_scaffold, module_name,
};
use super::fs_utils::{FileSystem, StdFileSystem};
use super::mutation_adapter_generator::{generate_mutation_adapter, mutation_adapter_name};
use super::read_adapter_generator::{generate_read_adapter, read_adapter_name};
use super::record_generator::generate_record;
use super::text::{block, lines, sections};

/// Extension of every generated file
pub const FILE_EXTENSION: &str = "cs";

/// Import needed for null-check preconditions, `DateTime` and stub exceptions
pub const SYSTEM_IMPORT: &str = "System";
/// Import needed for `List` and `Dictionary`
pub const COLLECTIONS_IMPORT: &str = "System.Collections.Generic";

/// The five artifact buckets, one output directory each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Records,
    ReadAdapters,
    MutationAdapters,
    /// Helper modules wiring ordering/filtering strategies
    Modules,
    DisplayWrappers,
}

impl ArtifactKind {
    /// Buckets in the order they are written
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Records,
        ArtifactKind::ReadAdapters,
        ArtifactKind::MutationAdapters,
        ArtifactKind::Modules,
        ArtifactKind::DisplayWrappers,
    ];

    /// Output subdirectory (also the last namespace segment)
    pub fn directory(&self) -> &'static str {
        match self {
            ArtifactKind::Records => "Objects",
            ArtifactKind::ReadAdapters => "Adapters",
            ArtifactKind::MutationAdapters => "DataAdapters",
            ArtifactKind::Modules => "Modules",
            ArtifactKind::DisplayWrappers => "ViewItems",
        }
    }

    /// Emitted type name for a class in this bucket
    pub fn type_name(&self, class_name: &str) -> String {
        match self {
            ArtifactKind::Records => class_name.to_string(),
            ArtifactKind::ReadAdapters => read_adapter_name(class_name),
            ArtifactKind::MutationAdapters => mutation_adapter_name(class_name),
            ArtifactKind::Modules => module_name(class_name),
            ArtifactKind::DisplayWrappers => display_wrapper_name(class_name),
        }
    }

    /// `<ClassName><BucketSuffix>.cs`
    pub fn file_name(&self, class_name: &str) -> String {
        format!("{}.{}", self.type_name(class_name), FILE_EXTENSION)
    }

    /// Whether `table` gets an artifact in this bucket
    pub fn applies_to(&self, project: &Project, table: &str) -> bool {
        let mutable = project.is_mutable(table);
        let hidden = project.is_hidden(table);
        match self {
            ArtifactKind::Records => true,
            ArtifactKind::ReadAdapters => !mutable,
            ArtifactKind::MutationAdapters => mutable,
            ArtifactKind::Modules => !hidden,
            ArtifactKind::DisplayWrappers => !mutable && !hidden,
        }
    }

    /// Render the artifact body for one entity
    pub fn render(&self, project: &Project, entity: &Entity<'_>) -> Result<String> {
        match self {
            ArtifactKind::Records => Ok(generate_record(project, entity)),
            ArtifactKind::ReadAdapters => Ok(generate_read_adapter(project, entity)),
            ArtifactKind::MutationAdapters => generate_mutation_adapter(project, entity),
            ArtifactKind::Modules => generate_module_scaffold(project, entity),
            ArtifactKind::DisplayWrappers => generate_display_wrapper(project, entity),
        }
    }
}

/// Namespaces the generated files live in and import from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Root namespace; each bucket appends its directory name
    pub namespace: String,
    /// Provides `IQueryExecutor` and `IFieldDataReader`
    pub query_namespace: String,
    /// Provides `ITransactionContext` and `IFieldDataReader`
    pub transaction_namespace: String,
    /// Provides `IResultOrderer<T>` and `IResultFilterer<T>`
    pub presentation_namespace: String,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            namespace: defaults::NAMESPACE.to_string(),
            query_namespace: defaults::QUERY_NAMESPACE.to_string(),
            transaction_namespace: defaults::TRANSACTION_NAMESPACE.to_string(),
            presentation_namespace: defaults::PRESENTATION_NAMESPACE.to_string(),
        }
    }
}

impl From<&CodegenConfig> for WriterOptions {
    fn from(config: &CodegenConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            query_namespace: config.query_namespace.clone(),
            transaction_namespace: config.transaction_namespace.clone(),
            presentation_namespace: config.presentation_namespace.clone(),
        }
    }
}

impl WriterOptions {
    /// Namespace of one bucket
    pub fn namespace_for(&self, kind: ArtifactKind) -> String {
        format!("{}.{}", self.namespace, kind.directory())
    }
}

/// A file the writer would produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub kind: ArtifactKind,
    /// Path relative to the output directory
    pub path: PathBuf,
}

/// Minimal `using` set for one artifact, in fixed order
pub fn imports(
    kind: ArtifactKind,
    project: &Project,
    entity: &Entity<'_>,
    options: &WriterOptions,
) -> Vec<String> {
    let class = &entity.class;
    let is_adapter = matches!(
        kind,
        ArtifactKind::ReadAdapters | ArtifactKind::MutationAdapters
    );
    let throws = matches!(
        kind,
        ArtifactKind::MutationAdapters | ArtifactKind::Modules | ArtifactKind::DisplayWrappers
    );

    let mut imports = Vec::new();
    if class.has_reference_property() || class.has_timestamp_property() || throws {
        imports.push(SYSTEM_IMPORT.to_string());
    }
    if entity.inverse_table.is_some() || is_adapter {
        imports.push(COLLECTIONS_IMPORT.to_string());
    }
    if is_adapter {
        if project.is_mutable(&entity.table.name) {
            imports.push(options.transaction_namespace.clone());
        } else {
            imports.push(options.query_namespace.clone());
        }
    }
    if kind == ArtifactKind::Modules {
        imports.push(options.presentation_namespace.clone());
    }
    if kind != ArtifactKind::Records {
        imports.push(options.namespace_for(ArtifactKind::Records));
    }
    imports
}

/// `using` directives followed by the body inside one namespace block
pub fn wrap_in_namespace(imports: &[String], namespace: &str, body: &str) -> String {
    sections([
        lines(imports.iter().map(|i| format!("using {};", i))),
        block(&format!("namespace {}", namespace), body),
    ])
}

/// Writes every artifact of a project into a fixed directory layout
pub struct ProjectWriter<F: FileSystem = StdFileSystem> {
    fs: F,
    options: WriterOptions,
}

impl ProjectWriter<StdFileSystem> {
    /// Writer backed by the real file system
    pub fn new(options: WriterOptions) -> Self {
        Self {
            fs: StdFileSystem,
            options,
        }
    }
}

impl<F: FileSystem> ProjectWriter<F> {
    pub fn with_file_system(fs: F, options: WriterOptions) -> Self {
        Self { fs, options }
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Render every file of one bucket without touching the file system
    pub fn render_bucket(
        &self,
        kind: ArtifactKind,
        project: &Project,
        entities: &[Entity<'_>],
    ) -> Result<Vec<(String, String)>> {
        let namespace = self.options.namespace_for(kind);
        entities
            .iter()
            .filter(|entity| kind.applies_to(project, &entity.table.name))
            .map(|entity| {
                let body = kind.render(project, entity)?;
                let imports = imports(kind, project, entity, &self.options);
                Ok((
                    kind.file_name(&entity.class.name),
                    wrap_in_namespace(&imports, &namespace, &body),
                ))
            })
            .collect()
    }

    /// Files `save` would write, bucket by bucket
    pub fn plan(&self, project: &Project) -> Result<Vec<PlannedFile>> {
        let entities = project.create_entities()?;
        let mut planned = Vec::new();
        for kind in ArtifactKind::ALL {
            for entity in &entities {
                if kind.applies_to(project, &entity.table.name) {
                    planned.push(PlannedFile {
                        kind,
                        path: Path::new(kind.directory()).join(kind.file_name(&entity.class.name)),
                    });
                }
            }
        }
        Ok(planned)
    }

    /// Regenerate every bucket under `output_dir`; returns the number of files written
    ///
    /// Each bucket is fully rendered before its directory is recreated.
    pub fn save(&self, output_dir: &Path, project: &Project) -> Result<usize> {
        let entities = project.create_entities()?;
        info!(
            "Writing {} entities of schema `{}` to {:?}",
            entities.len(),
            project.schema().name,
            output_dir
        );

        let mut written = 0;
        for kind in ArtifactKind::ALL {
            let files = self.render_bucket(kind, project, &entities)?;
            let dir = output_dir.join(kind.directory());

            if self.fs.dir_exists(&dir) {
                self.fs.remove_dir_all(&dir)?;
            }
            self.fs.create_dir_all(&dir)?;

            for (file_name, contents) in &files {
                debug!("Writing {}/{}", kind.directory(), file_name);
                self.fs.write_all_text(&dir.join(file_name), contents)?;
            }
            info!("{}: {} files", kind.directory(), files.len());
            written += files.len();
        }
        Ok(written)
    }
}
