//! Configuration
//!
//! Typed configuration merged by [`loader::ConfigLoader`] from defaults,
//! project TOML files and `SERVGEN__` environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{GenerationConfig, GeneratorConfig, LoggingConfig};
