//! Manifest file model
//!
//! One manifest describes one namespace: its composite types and its
//! producer functions. The same model is read from TOML and JSON.

use serde::{Deserialize, Serialize};

/// A declaration manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Package path of the declarations
    pub namespace: String,

    /// Package name used for import aliases; last path segment when absent
    #[serde(default)]
    pub package: Option<String>,

    /// Composite type declarations
    #[serde(default)]
    pub types: Vec<TypeDecl>,

    /// Producer declarations
    #[serde(default)]
    pub producers: Vec<ProducerDecl>,
}

/// A composite type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    /// Type name
    pub name: String,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

/// One field of a composite type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    /// Field name
    pub name: String,

    /// Type expression
    #[serde(rename = "type")]
    pub ty: String,

    /// Literal default used for inline construction
    #[serde(default)]
    pub default: Option<String>,

    /// Validation expression
    #[serde(default)]
    pub validation: Option<String>,

    /// Wire name
    #[serde(default)]
    pub json: Option<String>,

    /// Doc comment
    #[serde(default)]
    pub comment: Option<String>,
}

/// Producer role in a manifest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleDecl {
    /// Scheduled singleton factory
    #[default]
    Initiator,
    /// Construction override
    Creator,
}

/// A producer function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProducerDecl {
    /// Function or method name
    pub function: String,

    /// Initiator (default) or creator
    #[serde(default)]
    pub role: RoleDecl,

    /// Type expression of the single result
    pub returns: String,

    /// Declared instance name
    #[serde(default)]
    pub instance: Option<String>,

    /// Receiver type expression of a method
    #[serde(default)]
    pub receiver: Option<String>,

    /// Parameters in declaration order
    #[serde(default)]
    pub params: Vec<ParamDecl>,
}

/// A producer parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamDecl {
    /// Parameter name, also the requested instance name
    #[serde(default)]
    pub name: Option<String>,

    /// Type expression
    #[serde(rename = "type")]
    pub ty: String,
}
