//! Reference expressions handed to emitters
//!
//! The value binder builds an [`Expr`] tree; emitters render it once the
//! import aliases of the target file are known.

use std::collections::BTreeSet;

use serde::Serialize;

use super::types::TypeKey;
use crate::constants::ADDRESS_HELPER;
use crate::ports::Qualifier;

/// What is being called
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Callee {
    /// Package-level function
    Function {
        /// Declaring namespace
        namespace: String,
        /// Function name
        name: String,
    },
    /// Method on a receiver value
    Method {
        /// Receiver expression
        receiver: Box<Expr>,
        /// Method name
        name: String,
    },
}

/// Expression in the generated language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expr {
    /// Reference to a generated variable
    Ident(String),
    /// Literal copied verbatim
    Literal(String),
    /// Function or method call
    Call {
        /// Call target
        callee: Callee,
        /// Arguments in declaration order
        args: Vec<Expr>,
    },
    /// Composite literal `pkg.Type{Field: value}`
    Composite {
        /// Constructed type
        ty: TypeKey,
        /// Field assignments in declaration order
        fields: Vec<(String, Expr)>,
    },
    /// Address-of
    AddressOf(Box<Expr>),
    /// Dereference
    Deref(Box<Expr>),
}

impl Expr {
    /// Call a package-level function
    pub fn call(namespace: impl Into<String>, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call {
            callee: Callee::Function {
                namespace: namespace.into(),
                name: name.into(),
            },
            args,
        }
    }

    /// Call a method on `receiver`
    pub fn method_call(receiver: Expr, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call {
            callee: Callee::Method {
                receiver: Box::new(receiver),
                name: name.into(),
            },
            args,
        }
    }

    /// Take the address, folding `&*x` into `x`
    pub fn address_of(inner: Expr) -> Self {
        match inner {
            Self::Deref(target) => *target,
            other => Self::AddressOf(Box::new(other)),
        }
    }

    /// Dereference, folding `*&x` into `x`
    pub fn deref(inner: Expr) -> Self {
        match inner {
            Self::AddressOf(target) => *target,
            other => Self::Deref(Box::new(other)),
        }
    }

    /// True if the address is taken of something that is not addressable
    pub fn requires_address_helper(&self) -> bool {
        match self {
            Self::AddressOf(inner) => {
                matches!(**inner, Self::Call { .. } | Self::Literal(_))
                    || inner.requires_address_helper()
            }
            Self::Deref(inner) => inner.requires_address_helper(),
            Self::Call { callee, args } => {
                let receiver = match callee {
                    Callee::Method { receiver, .. } => receiver.requires_address_helper(),
                    Callee::Function { .. } => false,
                };
                receiver || args.iter().any(Expr::requires_address_helper)
            }
            Self::Composite { fields, .. } => {
                fields.iter().any(|(_, v)| v.requires_address_helper())
            }
            Self::Ident(_) | Self::Literal(_) => false,
        }
    }

    /// Namespaces that must be imported to render this expression
    pub fn namespaces(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_namespaces(&mut out);
        out
    }

    fn collect_namespaces(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Ident(_) | Self::Literal(_) => {}
            Self::Call { callee, args } => {
                match callee {
                    Callee::Function { namespace, .. } => {
                        if !namespace.is_empty() {
                            out.insert(namespace.clone());
                        }
                    }
                    Callee::Method { receiver, .. } => receiver.collect_namespaces(out),
                }
                for arg in args {
                    arg.collect_namespaces(out);
                }
            }
            Self::Composite { ty, fields } => {
                if !ty.namespace.is_empty() {
                    out.insert(ty.namespace.clone());
                }
                for (_, value) in fields {
                    value.collect_namespaces(out);
                }
            }
            Self::AddressOf(inner) | Self::Deref(inner) => inner.collect_namespaces(out),
        }
    }

    /// Render using the aliases of the file being emitted
    pub fn render(&self, qualifier: &dyn Qualifier) -> String {
        match self {
            Self::Ident(name) | Self::Literal(name) => name.clone(),
            Self::Call { callee, args } => {
                let args = args
                    .iter()
                    .map(|arg| arg.render(qualifier))
                    .collect::<Vec<_>>()
                    .join(", ");
                match callee {
                    Callee::Function { namespace, name } => {
                        format!("{}({args})", qualified(qualifier, namespace, name))
                    }
                    Callee::Method { receiver, name } => {
                        format!("{}.{name}({args})", receiver.render(qualifier))
                    }
                }
            }
            Self::Composite { ty, fields } => {
                let body = fields
                    .iter()
                    .map(|(name, value)| format!("{name}: {}", value.render(qualifier)))
                    .collect::<Vec<_>>()
                    .join(", ");
                let name = qualified(qualifier, &ty.namespace, &ty.name);
                format!("{name}{{{body}}}")
            }
            Self::AddressOf(inner) => match **inner {
                Self::Call { .. } | Self::Literal(_) => {
                    format!("{ADDRESS_HELPER}({})", inner.render(qualifier))
                }
                _ => format!("&{}", inner.render(qualifier)),
            },
            Self::Deref(inner) => format!("*{}", inner.render(qualifier)),
        }
    }
}

fn qualified(qualifier: &dyn Qualifier, namespace: &str, name: &str) -> String {
    match qualifier.alias(namespace) {
        Some(alias) => format!("{alias}.{name}"),
        None => name.to_string(),
    }
}
