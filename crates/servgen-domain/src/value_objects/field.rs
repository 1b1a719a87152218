//! Field descriptors of composite types

use serde::{Deserialize, Serialize};

use super::types::{Ownership, TypeDescriptor};

/// One field of a composite type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as written in the source
    pub name: String,
    /// Declared type
    pub ty: TypeDescriptor,
    /// Value or pointer field
    pub ownership: Ownership,
    /// Literal default, emitted verbatim when constructing the type inline
    pub default: Option<String>,
    /// Validation expression attached to the field
    pub validation: Option<String>,
    /// Wire name from the field tag
    pub json_name: Option<String>,
    /// Trailing doc comment
    pub comment: Option<String>,
}

impl FieldDescriptor {
    /// Create a field with no default, validation or tag data
    pub fn new(name: impl Into<String>, ty: TypeDescriptor, ownership: Ownership) -> Self {
        Self {
            name: name.into(),
            ty,
            ownership,
            default: None,
            validation: None,
            json_name: None,
            comment: None,
        }
    }

    /// Set the literal default
    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(literal.into());
        self
    }
}
