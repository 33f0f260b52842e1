//! Code generation module

mod adapter_common;
mod display_generator;
mod fs_utils;
mod mutation_adapter_generator;
mod naming;
mod project_writer;
mod read_adapter_generator;
mod record_generator;
pub mod text;
mod type_resolver;

pub use display_generator::*;
pub use fs_utils::*;
pub use mutation_adapter_generator::{
    fetch_plan, generate_mutation_adapter, mutation_adapter_name, FetchPlan,
};
pub use naming::*;
pub use project_writer::*;
pub use read_adapter_generator::*;
pub use record_generator::*;
pub use type_resolver::*;
