//! Type expressions
//!
//! Parses the Go-like type syntax of manifests: `*T`, `[]T`, `[N]T`,
//! `map[K]V`, `pkg/path.Name`, builtin names and bare names of the
//! manifest's own namespace.

use servgen_domain::error::{Error, Result};
use servgen_domain::value_objects::{Ownership, TypeDescriptor, TypeKey, is_primitive_name};

/// A parsed type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedType {
    /// Type shape
    pub descriptor: TypeDescriptor,
    /// Pointer marker on the outermost type
    pub ownership: Ownership,
}

impl ParsedType {
    /// Key of a composite type
    pub fn composite_key(&self) -> Option<&TypeKey> {
        self.descriptor.composite_key()
    }
}

/// Parse `expr`, resolving bare names against `namespace`
pub fn parse_type_expr(expr: &str, namespace: &str) -> Result<ParsedType> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(invalid(expr, "empty type"));
    }

    if let Some(rest) = trimmed.strip_prefix('*') {
        let inner = parse_type_expr(rest, namespace)?;
        if inner.ownership.is_pointer() {
            return Err(invalid(expr, "pointer to pointer is not supported"));
        }
        return Ok(ParsedType {
            descriptor: inner.descriptor,
            ownership: Ownership::Pointer,
        });
    }

    if let Some(rest) = trimmed.strip_prefix("map[") {
        let close = matching_bracket(rest).ok_or_else(|| invalid(expr, "unclosed map key"))?;
        let key = parse_type_expr(&rest[..close], namespace)?;
        let value = parse_type_expr(&rest[close + 1..], namespace)?;
        return Ok(value_of(TypeDescriptor::map(key.descriptor, value.descriptor)));
    }

    if let Some(rest) = trimmed.strip_prefix('[') {
        let close = rest.find(']').ok_or_else(|| invalid(expr, "unclosed array length"))?;
        let length = &rest[..close];
        if !length.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid(expr, "array length must be a number"));
        }
        let element = parse_type_expr(&rest[close + 1..], namespace)?;
        let array = TypeDescriptor::array(element.descriptor, element.ownership);
        return Ok(value_of(array));
    }

    match trimmed.rsplit_once('.') {
        Some((package, name)) => {
            check_name(expr, name)?;
            if package.is_empty() {
                return Err(invalid(expr, "missing package path"));
            }
            Ok(value_of(TypeDescriptor::composite(package, name)))
        }
        None => {
            check_name(expr, trimmed)?;
            if is_primitive_name(trimmed) {
                Ok(value_of(TypeDescriptor::primitive(trimmed)))
            } else {
                Ok(value_of(TypeDescriptor::composite(namespace, trimmed)))
            }
        }
    }
}

fn value_of(descriptor: TypeDescriptor) -> ParsedType {
    ParsedType {
        descriptor,
        ownership: Ownership::Value,
    }
}

/// Index of the `]` closing a `[` that was already consumed
fn matching_bracket(rest: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (index, c) in rest.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

fn check_name(expr: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(invalid(expr, &format!("'{name}' is not a type name")))
    }
}

fn invalid(expr: &str, reason: &str) -> Error {
    Error::invalid_declaration(format!("invalid type expression '{expr}': {reason}"))
}
