//! Domain entities
//!
//! | Entity | Purpose |
//! |--------|---------|
//! | [`TypeCatalog`] | Named types and their structure, per namespace |
//! | [`Producer`] | One factory declaration |
//! | [`ProducerSet`] | All factory declarations of a run |
//! | [`NamedInstance`] | A registered, named produced value |

pub mod catalog;
pub mod instance;
pub mod producer;
pub mod producers;

pub use catalog::{CatalogEntry, Structure, TypeCatalog, default_package_name};
pub use instance::{InstanceId, NamedInstance};
pub use producer::{Invocation, Producer, ProducerId, ProducerRole, Requirement};
pub use producers::ProducerSet;
