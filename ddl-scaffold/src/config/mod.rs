//! Configuration for ddl-scaffold

pub mod defaults;
mod settings;

pub use settings::*;
