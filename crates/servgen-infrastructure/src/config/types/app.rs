//! Root configuration

use serde::{Deserialize, Serialize};

use super::generation::GenerationConfig;
use super::logging::LoggingConfig;

/// Complete generator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Logging settings
    pub logging: LoggingConfig,

    /// Generation settings
    pub generation: GenerationConfig,
}
