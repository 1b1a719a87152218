//! # servgen
//!
//! Compile-time dependency wiring for Go services. servgen reads type and
//! producer declarations, schedules every initiator into creation levels,
//! and emits a Go file that declares and initializes each service singleton.
//!
//! ## Example
//!
//! ```ignore
//! use servgen::{RunOptions, load_config, generate};
//!
//! let options = RunOptions::new("./service");
//! let config = load_config(&options)?;
//! let outcome = generate(&options, &config)?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - catalog, producers, instances, expressions and errors
//! - `application` - registry, scheduler, binder and the wiring use case
//! - `infrastructure` - configuration, logging, manifests and Go emission

/// Domain layer - core types and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use servgen_domain::*;
}

/// Application layer - resolution engine
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use servgen_application::*;
}

/// Infrastructure layer - config, logging, manifests and emitters
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use servgen_infrastructure::*;
}

mod run;

pub use run::{RunOptions, RunOutcome, describe_schedule, generate, load_config};
