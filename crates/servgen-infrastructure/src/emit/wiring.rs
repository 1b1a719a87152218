//! Go wiring emitter
//!
//! Renders the converged schedule of a [`Wiring`] into Go source with
//! templates embedded at compile time.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use servgen_application::Wiring;
use servgen_domain::constants::{ADDRESS_HELPER, DEFAULT_TEST_PREFIX};
use servgen_domain::error::{Error, Result};
use servgen_domain::{InstanceId, NamedInstance, TypeCatalog};
use tera::{Context, Tera};
use tracing::{debug, info};

use super::imports::{Import, ImportTable};
use crate::config::GenerationConfig;
use crate::constants::{DEFAULT_PACKAGE_NAME, EXPORT_FILE_NAME, GENERATED_HEADER, WIRING_FILE_NAME};
use crate::error_ext::ErrorContext;

// Template names carry no html suffix, so tera does not escape output
const TPL_WIRING: &str = include_str!("templates/wiring.go.tera");
const TPL_EXPORT: &str = include_str!("templates/export.go.tera");
const WIRING_TEMPLATE: &str = "wiring.go";
const EXPORT_TEMPLATE: &str = "export.go";

/// Emission settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Package clause of generated files
    pub package_name: String,
    /// Prefix of the exported copies in the test-export file
    pub test_prefix: String,
    /// Emit the test-export file
    pub emit_test_export: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            test_prefix: DEFAULT_TEST_PREFIX.to_string(),
            emit_test_export: true,
        }
    }
}

impl From<&GenerationConfig> for EmitOptions {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            package_name: config.package_name.clone(),
            test_prefix: config.test_prefix.clone(),
            emit_test_export: config.emit_test_export,
        }
    }
}

/// A rendered file, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name inside the output directory
    pub name: String,
    /// Source text
    pub content: String,
}

#[derive(Debug, Serialize)]
struct VariableView {
    identifier: String,
    ty: String,
}

#[derive(Debug, Serialize)]
struct AssignmentView {
    identifier: String,
    expr: String,
}

#[derive(Debug, Serialize)]
struct LevelView {
    number: usize,
    assignments: Vec<AssignmentView>,
}

#[derive(Debug, Serialize)]
struct WiringView<'a> {
    header: &'a str,
    package: &'a str,
    imports: Vec<Import>,
    variables: Vec<VariableView>,
    levels: Vec<LevelView>,
    address_helper: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ExportView {
    identifier: String,
    source: String,
    ty: String,
}

#[derive(Debug, Serialize)]
struct ExportFileView<'a> {
    header: &'a str,
    package: &'a str,
    imports: Vec<Import>,
    exports: Vec<ExportView>,
}

/// Renders wiring and test-export files
#[derive(Debug)]
pub struct WiringEmitter {
    options: EmitOptions,
    templates: Tera,
}

impl WiringEmitter {
    /// Create an emitter with the embedded templates
    pub fn new(options: EmitOptions) -> Result<Self> {
        let mut templates = Tera::default();
        templates
            .add_raw_template(WIRING_TEMPLATE, TPL_WIRING)
            .template_context("Failed to register wiring template")?;
        templates
            .add_raw_template(EXPORT_TEMPLATE, TPL_EXPORT)
            .template_context("Failed to register export template")?;
        Ok(Self { options, templates })
    }

    /// Render every file for `wiring`
    pub fn render(&self, wiring: &Wiring) -> Result<Vec<GeneratedFile>> {
        let mut files = vec![self.render_wiring(wiring)?];
        if self.options.emit_test_export {
            files.push(self.render_export(wiring)?);
        }
        Ok(files)
    }

    /// Write `files` into `dir`, creating it if needed
    pub fn write(&self, files: &[GeneratedFile], dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .io_context(format!("Failed to create output directory {}", dir.display()))?;
        let mut written = Vec::with_capacity(files.len());
        for file in files {
            let path = dir.join(&file.name);
            fs::write(&path, &file.content)
                .io_context(format!("Failed to write {}", path.display()))?;
            debug!(path = %path.display(), bytes = file.content.len(), "Wrote generated file");
            written.push(path);
        }
        info!(files = written.len(), dir = %dir.display(), "Generated files written");
        Ok(written)
    }

    fn render_wiring(&self, wiring: &Wiring) -> Result<GeneratedFile> {
        let schedule = wiring.schedule();
        let registry = schedule.registry();
        let binder = wiring.binder();

        // Bind everything first so aliases can be allocated in a stable order
        let mut bound = Vec::with_capacity(registry.len());
        let mut namespaces = BTreeSet::new();
        let mut helpers = BTreeSet::new();
        for level in schedule.levels() {
            for entry in &level.entries {
                let instance = instance(wiring, entry.instance)?;
                let binding = binder.initializer(entry)?;
                namespaces.insert(instance.ty.namespace.clone());
                namespaces.extend(binding.imports.iter().cloned());
                helpers.extend(binding.helpers.iter().copied());
                bound.push((level.number, instance, binding));
            }
        }
        let imports = import_table(wiring.catalog(), &namespaces);

        // Initializers take scheduled instances; creators serve consumer binds
        let creators = wiring.producers().creator_count();
        if creators > 0 {
            debug!(creators, "Creators do not contribute to the wiring file");
        }

        let variables = registry
            .instances()
            .iter()
            .map(|instance| VariableView {
                identifier: instance.identifier.clone(),
                ty: imports.type_ref(&instance.ty, instance.ownership),
            })
            .collect();

        let mut levels: Vec<LevelView> = Vec::new();
        for (number, instance, binding) in bound {
            let assignment = AssignmentView {
                identifier: instance.identifier.clone(),
                expr: binding.expr.render(&imports),
            };
            if levels.last().is_none_or(|level| level.number != number) {
                levels.push(LevelView {
                    number,
                    assignments: Vec::new(),
                });
            }
            if let Some(level) = levels.last_mut() {
                level.assignments.push(assignment);
            }
        }

        let view = WiringView {
            header: GENERATED_HEADER,
            package: &self.options.package_name,
            imports: imports.imports(),
            variables,
            levels,
            address_helper: helpers.contains(ADDRESS_HELPER).then_some(ADDRESS_HELPER),
        };
        let content = self.render_template(WIRING_TEMPLATE, &view)?;
        debug!(
            instances = registry.len(),
            imports = imports.len(),
            "Rendered wiring file"
        );
        Ok(GeneratedFile {
            name: WIRING_FILE_NAME.to_string(),
            content,
        })
    }

    fn render_export(&self, wiring: &Wiring) -> Result<GeneratedFile> {
        let registry = wiring.schedule().registry();
        let namespaces: BTreeSet<String> = registry
            .instances()
            .iter()
            .map(|instance| instance.ty.namespace.clone())
            .collect();
        let imports = import_table(wiring.catalog(), &namespaces);

        let exports = registry
            .instances()
            .iter()
            .map(|instance| ExportView {
                identifier: export_identifier(
                    &instance.identifier,
                    registry.prefix(),
                    &self.options.test_prefix,
                ),
                source: instance.identifier.clone(),
                ty: imports.type_ref(&instance.ty, instance.ownership),
            })
            .collect();

        let view = ExportFileView {
            header: GENERATED_HEADER,
            package: &self.options.package_name,
            imports: imports.imports(),
            exports,
        };
        let content = self.render_template(EXPORT_TEMPLATE, &view)?;
        Ok(GeneratedFile {
            name: EXPORT_FILE_NAME.to_string(),
            content,
        })
    }

    fn render_template<V: Serialize>(&self, name: &str, view: &V) -> Result<String> {
        let message = format!("Failed to build {name} context");
        let context = Context::from_serialize(view).template_context(message)?;
        self.templates
            .render(name, &context)
            .template_context(format!("Failed to render {name}"))
    }
}

/// Identifier of the exported copy: the variable prefix swapped for `test_prefix`
pub fn export_identifier(identifier: &str, variable_prefix: &str, test_prefix: &str) -> String {
    match identifier.strip_prefix(variable_prefix) {
        Some(rest) => format!("{test_prefix}{rest}"),
        None => format!("{test_prefix}{identifier}"),
    }
}

fn instance(wiring: &Wiring, id: InstanceId) -> Result<&NamedInstance> {
    wiring
        .schedule()
        .registry()
        .get(id)
        .ok_or_else(|| Error::internal(format!("scheduled instance {id} is not registered")))
}

fn import_table(catalog: &TypeCatalog, namespaces: &BTreeSet<String>) -> ImportTable {
    let mut imports = ImportTable::new();
    for namespace in namespaces {
        imports.import(namespace, &catalog.package_name(namespace));
    }
    imports
}
