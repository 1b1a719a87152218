//! Manifest declaration adapter
//!
//! Manifests are TOML or JSON files, one namespace each, declaring the
//! composite types and producer functions the engine resolves.

pub mod model;
pub mod source;
pub mod type_expr;

pub use model::{FieldDecl, Manifest, ParamDecl, ProducerDecl, RoleDecl, TypeDecl};
pub use source::{ManifestSource, apply_manifest};
pub use type_expr::{ParsedType, parse_type_expr};
