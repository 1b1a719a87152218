//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Resolution constants are defined in `servgen_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Shared project configuration, usually committed
pub const PUBLIC_CONFIG_FILENAME: &str = "servgen.public.toml";

/// Local overrides of the public configuration
pub const PRIVATE_CONFIG_FILENAME: &str = "servgen.private.toml";

/// Environment variable prefix for configuration (`SERVGEN__SECTION__KEY`)
pub const CONFIG_ENV_PREFIX: &str = "SERVGEN";

/// Separator between prefix, section and key in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "SERVGEN_LOG";

/// File stem used when the log file path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "servgen";

// ============================================================================
// GENERATION CONSTANTS
// ============================================================================

/// Directory holding declaration manifests, relative to the project root
pub const DEFAULT_MANIFEST_DIR: &str = "manifests";

/// Directory receiving generated files, relative to the project root
pub const DEFAULT_OUTPUT_DIR: &str = "gen";

/// Package clause of generated files
pub const DEFAULT_PACKAGE_NAME: &str = "gen";

/// Manifest file extensions
pub const MANIFEST_EXTENSIONS: &[&str] = &["json", "toml"];

/// Generated wiring file
pub const WIRING_FILE_NAME: &str = "servgen_wiring.go";

/// Generated test-export file
pub const EXPORT_FILE_NAME: &str = "servgen_export4test.go";

/// Header placed on every generated file
pub const GENERATED_HEADER: &str = "// Code generated by servgen. DO NOT EDIT.";
