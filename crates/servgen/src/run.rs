//! Generator run
//!
//! Loads configuration, reads manifests, resolves the wiring and either
//! reports the schedule or writes the generated files.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use servgen_application::{ResolutionOptions, Wiring, WiringService};
use servgen_infrastructure::config::{ConfigLoader, GeneratorConfig};
use servgen_infrastructure::{EmitOptions, ManifestSource, WiringEmitter};
use tracing::info;

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Project root; configuration and relative paths resolve against it
    pub project_root: PathBuf,
    /// Extra configuration file merged after the project files
    pub config: Option<PathBuf>,
    /// Manifest file or directory overriding the configured one
    pub manifest: Option<PathBuf>,
    /// Resolve and report without writing files
    pub check: bool,
}

impl RunOptions {
    /// Options for `project_root` with nothing overridden
    pub fn new<P: AsRef<Path>>(project_root: P) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
            config: None,
            manifest: None,
            check: false,
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// `--check`: the rendered schedule
    Checked(String),
    /// Files written to the output directory
    Generated(Vec<PathBuf>),
}

/// Load and validate the configuration for `options`
pub fn load_config(options: &RunOptions) -> anyhow::Result<GeneratorConfig> {
    let mut loader = ConfigLoader::new().with_project_root(&options.project_root);
    if let Some(path) = &options.config {
        loader = loader.with_config_path(path);
    }
    let mut config = loader.load().context("Failed to load configuration")?;
    if let Some(manifest) = &options.manifest {
        config.generation.manifest_path.clone_from(manifest);
    }
    Ok(config)
}

/// Resolve the project's declarations and emit or report the result
pub fn generate(options: &RunOptions, config: &GeneratorConfig) -> anyhow::Result<RunOutcome> {
    let generation = &config.generation;
    let root = &options.project_root;
    let manifests = generation.manifest_location(root);
    let output = generation.output_location(root);

    info!(
        manifests = %manifests.display(),
        output = %output.display(),
        "Resolving wiring"
    );
    let source = ManifestSource::new(&manifests).excluding(&output);
    let service = WiringService::new(
        ResolutionOptions::default().with_variable_prefix(&generation.variable_prefix),
    );
    let wiring = service
        .from_source(&source)
        .with_context(|| format!("Failed to resolve declarations in {}", manifests.display()))?;

    if options.check {
        return Ok(RunOutcome::Checked(describe_schedule(&wiring)));
    }

    let emitter = WiringEmitter::new(EmitOptions::from(generation))?;
    let files = emitter.render(&wiring).context("Failed to render wiring")?;
    let written = emitter.write(&files, &output)?;
    Ok(RunOutcome::Generated(written))
}

/// One line per scheduled instance, grouped by level
pub fn describe_schedule(wiring: &Wiring) -> String {
    let schedule = wiring.schedule();
    let registry = schedule.registry();
    let mut out = String::new();
    for level in schedule.levels() {
        let _ = writeln!(out, "level {}", level.number);
        for entry in &level.entries {
            let Some(instance) = registry.get(entry.instance) else {
                continue;
            };
            let origin = registry.origin(entry.instance).unwrap_or("?");
            let _ = writeln!(
                out,
                "  {} {}{} <- {}",
                instance.identifier,
                instance.ownership.marker(),
                instance.ty,
                origin
            );
        }
    }
    if out.is_empty() {
        out.push_str("no initiators declared\n");
    }
    out
}
