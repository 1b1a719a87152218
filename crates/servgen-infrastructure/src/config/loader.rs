//! Configuration loader
//!
//! Merges configuration sources with Figment, later sources overriding
//! earlier ones:
//!
//! 1. Defaults from `GeneratorConfig::default()`
//! 2. `servgen.public.toml` in the project root
//! 3. `servgen.private.toml` in the project root
//! 4. An explicit configuration file
//! 5. Environment variables (`SERVGEN__GENERATION__OUTPUT_DIR`)

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use servgen_domain::error::{Error, Result};
use servgen_domain::value_objects::sanitize_identifier;

use crate::config::GeneratorConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, PRIVATE_CONFIG_FILENAME, PUBLIC_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Directory searched for the public and private files
    project_root: PathBuf,

    /// Explicit configuration file
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a loader rooted at the current directory
    pub fn new() -> Self {
        Self {
            project_root: PathBuf::from("."),
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the project root
    pub fn with_project_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.project_root = root.as_ref().to_path_buf();
        self
    }

    /// Set the explicit configuration file
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// A missing public or private file is skipped; a missing explicit file
    /// is an error.
    pub fn load(&self) -> Result<GeneratorConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(GeneratorConfig::default()));

        for name in [PUBLIC_CONFIG_FILENAME, PRIVATE_CONFIG_FILENAME] {
            let path = self.project_root.join(name);
            let found = path.is_file();
            if found {
                figment = figment.merge(Toml::file(&path));
            }
            log_config_loaded(&path, found);
        }

        if let Some(config_path) = &self.config_path {
            if !config_path.is_file() {
                return Err(Error::configuration(format!(
                    "Configuration file not found: {}",
                    config_path.display()
                )));
            }
            figment = figment.merge(Toml::file(config_path));
            log_config_loaded(config_path, true);
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}{CONFIG_ENV_SEPARATOR}", self.env_prefix))
                .split(CONFIG_ENV_SEPARATOR),
        );

        let config: GeneratorConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Serialize a configuration to TOML at `path`
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &GeneratorConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;
        std::fs::write(path.as_ref(), toml_string).io_context("Failed to write config file")?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a loaded configuration
pub fn validate_config(config: &GeneratorConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    validate_generation(config)
}

fn validate_generation(config: &GeneratorConfig) -> Result<()> {
    let generation = &config.generation;
    if generation.package_name.is_empty() {
        return Err(Error::configuration("Package name cannot be empty"));
    }
    if sanitize_identifier(&generation.package_name) != generation.package_name {
        return Err(Error::configuration(format!(
            "Package name '{}' is not a valid identifier",
            generation.package_name
        )));
    }
    if generation.variable_prefix.is_empty() {
        return Err(Error::configuration("Variable prefix cannot be empty"));
    }
    if generation.test_prefix.is_empty() {
        return Err(Error::configuration("Test prefix cannot be empty"));
    }
    if generation.test_prefix == generation.variable_prefix {
        return Err(Error::configuration("Test and variable prefix must differ"));
    }
    if generation.output_dir.as_os_str().is_empty() {
        return Err(Error::configuration("Output directory cannot be empty"));
    }
    Ok(())
}
