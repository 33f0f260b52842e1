//! Object model derived from the schema: classes, properties and type references

use heck::ToLowerCamelCase;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

use crate::codegen::{escape_identifier, to_member_name, TypeResolver};
use crate::schema::ScalarType;

/// Type of a class property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// One of the primitive scalars
    Scalar(ScalarType),
    /// Another generated class
    User(String),
    /// Collection of another generated class
    Collection(String),
}

impl TypeRef {
    /// Scalar name, or the generated class name for user types and collections
    pub fn name(&self) -> String {
        match self {
            TypeRef::Scalar(scalar) => scalar.to_string(),
            TypeRef::User(class) | TypeRef::Collection(class) => class.clone(),
        }
    }

    /// True when the type names a generated class rather than a primitive
    pub fn is_user_type(&self) -> bool {
        matches!(self, TypeRef::User(_) | TypeRef::Collection(_))
    }

    /// True when values of this type must be null-checked before use
    pub fn is_reference(&self) -> bool {
        match self {
            TypeRef::Scalar(ScalarType::String) | TypeRef::Scalar(ScalarType::Bytes) => true,
            TypeRef::Scalar(
                ScalarType::Integer | ScalarType::Decimal | ScalarType::Timestamp,
            ) => false,
            TypeRef::User(_) | TypeRef::Collection(_) => true,
        }
    }

    /// Value a local of this type holds before a row is read
    pub fn zero_value(&self) -> String {
        TypeResolver::zero_value(self)
    }

    /// Referenced class of a single-valued user type
    pub fn user_class(&self) -> Option<&str> {
        match self {
            TypeRef::User(class) => Some(class),
            _ => None,
        }
    }
}

/// A named, typed class member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name (PascalCase)
    pub name: String,

    /// Property type
    pub type_ref: TypeRef,
}

impl Property {
    pub fn new(name: &str, type_ref: TypeRef) -> Self {
        Self {
            name: to_member_name(name),
            type_ref,
        }
    }

    /// Constructor parameter / local variable name (lowerCamel, keyword-escaped)
    pub fn parameter_name(&self) -> String {
        escape_identifier(&self.name.to_lower_camel_case())
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.type_ref, TypeRef::Collection(_))
    }

    /// True when the property holds another instance of `class_name`
    pub fn is_self_reference(&self, class_name: &str) -> bool {
        self.type_ref.user_class() == Some(class_name)
    }
}

/// A generated class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    /// Class name
    pub name: String,

    /// Properties in column order, inverse collection last
    pub properties: Vec<Property>,
}

impl Class {
    /// Get a property by name
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// True when any property must be null-checked
    pub fn has_reference_property(&self) -> bool {
        self.null_checked_properties().next().is_some()
    }

    /// Reference properties the constructor rejects null for, in order
    ///
    /// A self-reference is left out: no adapter can supply the instance
    /// before it has been built.
    pub fn null_checked_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties
            .iter()
            .filter(|p| p.type_ref.is_reference() && !p.is_self_reference(&self.name))
    }

    /// True when any property holds a timestamp
    pub fn has_timestamp_property(&self) -> bool {
        self.properties
            .iter()
            .any(|p| p.type_ref == TypeRef::Scalar(ScalarType::Timestamp))
    }

    /// Distinct single-valued user types other than this class itself
    ///
    /// First-occurrence property order; collections are skipped because
    /// children are never supplied from outside.
    pub fn dependencies(&self) -> Vec<&str> {
        ordered_distinct(
            self.properties
                .iter()
                .filter_map(|p| p.type_ref.user_class())
                .filter(|class| *class != self.name),
        )
    }
}

/// Deduplicate while keeping the first occurrence of each item in place
///
/// Every ordering contract of the emitted code (dependency-map parameters,
/// imports) goes through here so that output is stable across runs.
pub fn ordered_distinct<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
