//! Object-model types to emitted type names, readers and zero values

use crate::model::TypeRef;
use crate::schema::ScalarType;

/// Resolve object-model types to the emitted language's spelling
pub struct TypeResolver;

impl TypeResolver {
    /// Emitted name of a scalar type
    pub fn scalar_name(scalar: ScalarType) -> &'static str {
        match scalar {
            ScalarType::Integer => "long",
            ScalarType::String => "string",
            ScalarType::Decimal => "decimal",
            ScalarType::Timestamp => "DateTime",
            ScalarType::Bytes => "byte[]",
        }
    }

    /// Field reader method that extracts a scalar from a result row
    pub fn reader_method(scalar: ScalarType) -> &'static str {
        match scalar {
            ScalarType::Integer => "GetInt64",
            ScalarType::String => "GetString",
            ScalarType::Decimal => "GetDecimal",
            ScalarType::Timestamp => "GetDateTime",
            ScalarType::Bytes => "GetBytes",
        }
    }

    /// Value a local of this scalar starts with before the row is read
    pub fn scalar_zero_value(scalar: ScalarType) -> &'static str {
        match scalar {
            ScalarType::Integer => "0L",
            ScalarType::String => "string.Empty",
            ScalarType::Decimal => "0M",
            ScalarType::Timestamp => "DateTime.MinValue",
            ScalarType::Bytes => "new byte[0]",
        }
    }

    /// Emitted type name for a property type
    pub fn type_name(type_ref: &TypeRef) -> String {
        match type_ref {
            TypeRef::Scalar(scalar) => Self::scalar_name(*scalar).to_string(),
            TypeRef::User(class) => class.clone(),
            TypeRef::Collection(class) => format!("List<{}>", class),
        }
    }

    /// Initial value of a local holding a property before the row is read
    pub fn zero_value(type_ref: &TypeRef) -> String {
        match type_ref {
            TypeRef::Scalar(scalar) => Self::scalar_zero_value(*scalar).to_string(),
            TypeRef::User(class) => format!("default({})", class),
            TypeRef::Collection(class) => format!("new List<{}>()", class),
        }
    }

    /// Read expression for column `index` of row variable `row`
    pub fn read_expression(row: &str, scalar: ScalarType, index: usize) -> String {
        format!("{}.{}({})", row, Self::reader_method(scalar), index)
    }

    /// Dependency map type resolving keys to instances of `class`
    pub fn map_type(key: ScalarType, class: &str) -> String {
        format!("Dictionary<{}, {}>", Self::scalar_name(key), class)
    }
}
