//! SQL schema parser module using sqlparser-rs

mod schema_parser;

pub use schema_parser::*;
