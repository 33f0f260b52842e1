//! The closed set of column scalar types

use serde::{Deserialize, Serialize};

/// A column's primitive storage type
///
/// The set is closed: every emitter matches on it exhaustively, so adding a
/// variant forces every type name, reader and zero value to be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// 64-bit signed integer
    Integer,
    String,
    Decimal,
    /// Date and time
    Timestamp,
    /// Raw byte blob
    Bytes,
}

impl ScalarType {
    /// All scalar types in declaration order
    pub const ALL: [ScalarType; 5] = [
        ScalarType::Integer,
        ScalarType::String,
        ScalarType::Decimal,
        ScalarType::Timestamp,
        ScalarType::Bytes,
    ];

    /// Map a SQL data type (e.g. "BIGINT", "VARCHAR(255)") onto a scalar
    ///
    /// Returns `None` for types that have no scalar counterpart.
    pub fn from_sql(data_type: &str) -> Option<Self> {
        let data_type_lower = data_type.trim().to_lowercase();

        // Integer types
        if data_type_lower.starts_with("bigint")
            || data_type_lower == "int"
            || data_type_lower.starts_with("int(")
            || data_type_lower.starts_with("int ")
            || data_type_lower.starts_with("integer")
            || data_type_lower.starts_with("mediumint")
            || data_type_lower.starts_with("smallint")
            || data_type_lower.starts_with("tinyint")
        {
            return Some(ScalarType::Integer);
        }

        // Decimal types
        if data_type_lower.starts_with("decimal")
            || data_type_lower.starts_with("numeric")
            || data_type_lower.starts_with("money")
        {
            return Some(ScalarType::Decimal);
        }

        // String types
        if data_type_lower.starts_with("char")
            || data_type_lower.starts_with("varchar")
            || data_type_lower.starts_with("nvarchar")
            || data_type_lower.starts_with("nchar")
            || data_type_lower.contains("text")
        {
            return Some(ScalarType::String);
        }

        // Date/time types
        if data_type_lower == "date"
            || data_type_lower.starts_with("datetime")
            || data_type_lower.starts_with("timestamp")
        {
            return Some(ScalarType::Timestamp);
        }

        // Binary types
        if data_type_lower.starts_with("binary")
            || data_type_lower.starts_with("varbinary")
            || data_type_lower.contains("blob")
            || data_type_lower == "bytea"
        {
            return Some(ScalarType::Bytes);
        }

        None
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScalarType::Integer => "Integer",
            ScalarType::String => "String",
            ScalarType::Decimal => "Decimal",
            ScalarType::Timestamp => "Timestamp",
            ScalarType::Bytes => "Bytes",
        };
        f.write_str(name)
    }
}
