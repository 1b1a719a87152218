//! Resolution Engine
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ResolutionRegistry`] | Named and default instances per produced type |
//! | [`DependencyScheduler`] | Fixed-point ordering of initiators into levels |
//! | [`ValueBinder`] | Expression selection and ownership reconciliation |

/// Value binding at consumer sites
pub mod binder;
/// Named instance registry
pub mod registry;
/// Initiator scheduling
pub mod scheduler;

pub use binder::{BindRequest, Binding, BindingSource, ValueBinder, reconcile};
pub use registry::{ResolutionRegistry, synthesized_name};
pub use scheduler::{DependencyScheduler, Level, Schedule, ScheduledProducer};
