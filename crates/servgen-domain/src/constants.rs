//! Domain layer constants
//!
//! Constants shared by the resolution engine and the emitters. Infrastructure
//! defaults (file names, env prefixes) live in the infrastructure crate.

// ============================================================================
// TYPE SYSTEM CONSTANTS
// ============================================================================

/// Builtin type names of the generated language; never produced or registered
pub const PRIMITIVE_TYPE_NAMES: &[&str] = &[
    "string", "bool", "byte", "rune", "int", "int8", "int16", "int32", "int64", "uint", "uint8",
    "uint16", "uint32", "uint64", "uintptr", "float32", "float64", "complex64", "complex128",
    "error", "any",
];

/// Namespace used for builtin types
pub const BUILTIN_NAMESPACE: &str = "";

// ============================================================================
// EMISSION CONSTANTS
// ============================================================================

/// Helper used to take the address of a non-addressable expression
pub const ADDRESS_HELPER: &str = "getAddr";

/// Fallback instance name when a namespace sanitizes to nothing
pub const ROOT_INSTANCE_NAME: &str = "root";

/// Prefix of generated instance variables
pub const DEFAULT_VARIABLE_PREFIX: &str = "Global";

/// Prefix replacing [`DEFAULT_VARIABLE_PREFIX`] in the test-export file
pub const DEFAULT_TEST_PREFIX: &str = "GlobalTest";
