//! Configuration types module

pub mod app;
pub mod generation;
pub mod logging;

// Re-export main types
pub use app::GeneratorConfig;
pub use generation::GenerationConfig;
pub use logging::LoggingConfig;
