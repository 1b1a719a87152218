//! Domain Value Objects
//!
//! Immutable values describing types, fields and generated expressions.
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`TypeKey`] | Qualified identity of a named type |
//! | [`TypeDescriptor`] | How a declaration refers to a type |
//! | [`Ownership`] | Value or pointer indirection |
//! | [`FieldDescriptor`] | One field of a composite type |
//! | [`Expr`] | Expression in the generated language |

/// Reference expressions
pub mod expr;
/// Field descriptors
pub mod field;
/// Type identity and descriptors
pub mod types;

pub use expr::{Callee, Expr};
pub use field::FieldDescriptor;
pub use types::{
    Ownership, TypeDescriptor, TypeKey, TypeKind, is_builtin_namespace, is_primitive_name,
    sanitize_identifier,
};
