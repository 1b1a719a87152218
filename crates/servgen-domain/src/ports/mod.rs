//! Domain ports
//!
//! Interfaces the application layer depends on and the infrastructure layer
//! implements.

use crate::entities::{ProducerSet, TypeCatalog};
use crate::error::Result;

/// Everything a declaration source hands to the resolution engine
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    /// Types seen while scanning
    pub catalog: TypeCatalog,
    /// Producer declarations
    pub producers: ProducerSet,
}

impl Declarations {
    /// Bundle a catalog and a producer set
    pub fn new(catalog: TypeCatalog, producers: ProducerSet) -> Self {
        Self { catalog, producers }
    }
}

/// Source of type and producer declarations (the scanner port)
pub trait DeclarationSource {
    /// Load every declaration
    fn load(&self) -> Result<Declarations>;
}

/// Maps a namespace to the alias used in the file being emitted
pub trait Qualifier {
    /// Alias for `namespace`; `None` renders the name unqualified
    fn alias(&self, namespace: &str) -> Option<&str>;
}

/// Qualifier that never qualifies, for diagnostics and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct Unqualified;

impl Qualifier for Unqualified {
    fn alias(&self, _namespace: &str) -> Option<&str> {
        None
    }
}
