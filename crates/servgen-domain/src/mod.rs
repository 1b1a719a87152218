//! # Domain Layer
//!
//! Core types of the servgen wiring generator: the things a declaration
//! source hands over and the things the resolution engine reasons about.
//!
//! ## Module Categories
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`value_objects`] | Type keys, type descriptors, fields, reference expressions |
//! | [`entities`] | Type catalog, producers, registered instances |
//! | [`ports`] | Declaration source and import qualifier interfaces |
//! | [`error`] | Error taxonomy shared by every layer |
//! | [`constants`] | Builtin type names and emission constants |
//!
//! This crate performs no I/O and has no dependency on any other servgen
//! crate.

pub mod constants;
pub mod entities;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use entities::*;
pub use error::{Error, Result, StuckProducer};
pub use ports::{DeclarationSource, Declarations, Qualifier, Unqualified};
pub use value_objects::*;
