//! # Infrastructure Layer
//!
//! Everything around the resolution engine that touches the outside world.
//!
//! ## Module Categories
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-merged TOML and environment configuration |
//! | [`constants`] | File names, env prefixes and generation defaults |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//!
//! ### Declarations & Emission
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Manifest-backed declaration source |
//! | [`emit`] | Import tables and Go wiring templates |

pub mod adapters;
pub mod config;
pub mod constants;
pub mod emit;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use adapters::ManifestSource;
pub use emit::{EmitOptions, GeneratedFile, WiringEmitter};
pub use error_ext::ErrorContext;
