//! Schema model: tables, columns and scalar types

mod metadata;
mod scalar;

pub use metadata::*;
pub use scalar::*;
