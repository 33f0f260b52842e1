//! Default configuration values - single source of truth

/// Default output directory; the five bucket directories are created below it
pub const OUTPUT_DIR: &str = "./generated";

/// Default root namespace of the generated files
pub const NAMESPACE: &str = "Generated";

/// Namespace providing `IQueryExecutor` and `IFieldDataReader`
pub const QUERY_NAMESPACE: &str = "Data.Query";

/// Namespace providing `ITransactionContext`
pub const TRANSACTION_NAMESPACE: &str = "Data.Transactions";

/// Namespace providing `IResultOrderer<T>` and `IResultFilterer<T>`
pub const PRESENTATION_NAMESPACE: &str = "Presentation";

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;
