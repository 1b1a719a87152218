//! Registered instances

use std::fmt;

use serde::Serialize;

use super::producer::ProducerId;
use crate::value_objects::{Ownership, TypeKey};

/// Index of an instance inside the resolution registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InstanceId(pub usize);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A produced value with its final name and emitted identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedInstance {
    /// Registry-assigned id
    pub id: InstanceId,
    /// Produced type
    pub ty: TypeKey,
    /// Instance name, never empty
    pub name: String,
    /// False when the name was synthesized from the namespace
    pub name_declared: bool,
    /// Value or pointer
    pub ownership: Ownership,
    /// Variable name in generated code, unique across the run
    pub identifier: String,
    /// Scheduling round, starting at 1
    pub level: usize,
    /// Producer that builds it
    pub producer: ProducerId,
}
