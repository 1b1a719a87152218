//! Type identity value objects
//!
//! [`TypeKey`] names a type, [`TypeDescriptor`] describes how a declaration
//! refers to one, and [`Ownership`] records whether it is held by value or
//! through a pointer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{BUILTIN_NAMESPACE, PRIMITIVE_TYPE_NAMES};

/// Qualified identity of a named type: originating namespace plus local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeKey {
    /// Originating module/package path
    pub namespace: String,
    /// Local type name
    pub name: String,
}

impl TypeKey {
    /// Create a new type key
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// Whether a value is held directly or through a pointer indirection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ownership {
    /// Held by value
    #[default]
    Value,
    /// Held through a pointer
    Pointer,
}

impl Ownership {
    /// Build from a pointer flag
    pub fn from_pointer(is_pointer: bool) -> Self {
        if is_pointer { Self::Pointer } else { Self::Value }
    }

    /// True for [`Ownership::Pointer`]
    pub fn is_pointer(self) -> bool {
        matches!(self, Self::Pointer)
    }

    /// Declaration prefix in the generated language
    pub fn marker(self) -> &'static str {
        match self {
            Self::Value => "",
            Self::Pointer => "*",
        }
    }
}

/// Kind tag of a [`TypeDescriptor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Builtin scalar
    Primitive,
    /// Struct-like named type
    Composite,
    /// Array/slice of an element type
    Array,
    /// Map from key to value type
    Map,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Primitive => "primitive",
            Self::Composite => "composite",
            Self::Array => "array",
            Self::Map => "map",
        };
        f.write_str(name)
    }
}

/// How a declaration refers to a type
///
/// A closed set of shapes. Only [`TypeDescriptor::Composite`] types can be
/// produced by a factory or registered as instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDescriptor {
    /// Builtin scalar such as `int` or `string`
    Primitive {
        /// Builtin name
        name: String,
    },
    /// Named struct-like type
    Composite(TypeKey),
    /// Slice of an element type
    Array {
        /// Element type
        element: Box<TypeDescriptor>,
        /// Whether elements are pointers
        element_ownership: Ownership,
    },
    /// Map type
    Map {
        /// Key type
        key: Box<TypeDescriptor>,
        /// Value type
        value: Box<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    /// Builtin scalar descriptor
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive { name: name.into() }
    }

    /// Composite descriptor for `namespace.name`
    pub fn composite(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Composite(TypeKey::new(namespace, name))
    }

    /// Array descriptor
    pub fn array(element: TypeDescriptor, element_ownership: Ownership) -> Self {
        Self::Array {
            element: Box::new(element),
            element_ownership,
        }
    }

    /// Map descriptor
    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Kind tag
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Primitive { .. } => TypeKind::Primitive,
            Self::Composite(_) => TypeKind::Composite,
            Self::Array { .. } => TypeKind::Array,
            Self::Map { .. } => TypeKind::Map,
        }
    }

    /// The key of a composite descriptor
    pub fn composite_key(&self) -> Option<&TypeKey> {
        match self {
            Self::Composite(key) => Some(key),
            _ => None,
        }
    }

    /// Every composite key this descriptor mentions, outermost first
    pub fn referenced_keys(&self) -> Vec<&TypeKey> {
        let mut keys = Vec::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys<'a>(&'a self, keys: &mut Vec<&'a TypeKey>) {
        match self {
            Self::Primitive { .. } => {}
            Self::Composite(key) => keys.push(key),
            Self::Array { element, .. } => element.collect_keys(keys),
            Self::Map { key, value } => {
                key.collect_keys(keys);
                value.collect_keys(keys);
            }
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { name } => f.write_str(name),
            Self::Composite(key) => write!(f, "{key}"),
            Self::Array {
                element,
                element_ownership,
            } => write!(f, "[]{}{element}", element_ownership.marker()),
            Self::Map { key, value } => write!(f, "map[{key}]{value}"),
        }
    }
}

/// True if `name` is a builtin of the generated language
pub fn is_primitive_name(name: &str) -> bool {
    PRIMITIVE_TYPE_NAMES.contains(&name)
}

/// True if `namespace` is the builtin namespace
pub fn is_builtin_namespace(namespace: &str) -> bool {
    namespace == BUILTIN_NAMESPACE
}

/// Flatten an arbitrary string into an identifier
///
/// Every character that is not ASCII alphanumeric or `_` becomes `_`;
/// a leading digit gets a `_` prefix.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if is_identifier_char(c) { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
