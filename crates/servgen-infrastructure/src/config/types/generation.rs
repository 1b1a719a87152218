//! Generation configuration types

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use servgen_domain::constants::{DEFAULT_TEST_PREFIX, DEFAULT_VARIABLE_PREFIX};

use crate::constants::{DEFAULT_MANIFEST_DIR, DEFAULT_OUTPUT_DIR, DEFAULT_PACKAGE_NAME};

/// What to read and what to emit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Manifest file or directory, relative to the project root
    pub manifest_path: PathBuf,

    /// Output directory, relative to the project root
    pub output_dir: PathBuf,

    /// Package clause of generated files
    pub package_name: String,

    /// Prefix of generated instance variables
    pub variable_prefix: String,

    /// Prefix of the exported copies in the test-export file
    pub test_prefix: String,

    /// Emit the test-export file
    pub emit_test_export: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            variable_prefix: DEFAULT_VARIABLE_PREFIX.to_string(),
            test_prefix: DEFAULT_TEST_PREFIX.to_string(),
            emit_test_export: true,
        }
    }
}

impl GenerationConfig {
    /// Manifest location resolved against `root`
    pub fn manifest_location(&self, root: &Path) -> PathBuf {
        root.join(&self.manifest_path)
    }

    /// Output directory resolved against `root`
    pub fn output_location(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }
}
