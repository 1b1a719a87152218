//! Manifest declaration source
//!
//! Reads one manifest file, or walks a directory for `*.json` and `*.toml`
//! manifests, and builds the type catalog and producer set of a run.

use std::fs;
use std::path::{Path, PathBuf};

use servgen_domain::error::{Error, Result};
use servgen_domain::{
    DeclarationSource, Declarations, FieldDescriptor, Producer, ProducerRole, Requirement,
    TypeCatalog, TypeDescriptor, TypeKey,
};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use super::model::{Manifest, ProducerDecl, RoleDecl, TypeDecl};
use super::type_expr::parse_type_expr;
use crate::constants::MANIFEST_EXTENSIONS;
use crate::error_ext::ErrorContext;

/// Declaration source backed by manifest files
#[derive(Debug, Clone)]
pub struct ManifestSource {
    root: PathBuf,
    excluded: Vec<PathBuf>,
}

impl ManifestSource {
    /// Read manifests from `path`, a file or a directory
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            root: path.as_ref().to_path_buf(),
            excluded: Vec::new(),
        }
    }

    /// Never descend into `dir` (typically the output directory)
    pub fn excluding<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.excluded.push(dir.as_ref().to_path_buf());
        self
    }

    /// Manifest files in walk order (sorted by file name)
    pub fn manifest_files(&self) -> Result<Vec<PathBuf>> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }
        if !self.root.is_dir() {
            let message = format!("Manifest path not found: {}", self.root.display());
            return Err(Error::io(message));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.should_visit(entry));
        for entry in walker {
            let entry = entry.io_context(format!("Failed to walk {}", self.root.display()))?;
            if entry.file_type().is_file() && is_manifest_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Parse one manifest file
    pub fn read_manifest(path: &Path) -> Result<Manifest> {
        let content = fs::read_to_string(path)
            .io_context(format!("Failed to read manifest {}", path.display()))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        if extension.eq_ignore_ascii_case("json") {
            serde_json::from_str(&content)
                .manifest_context(format!("Malformed manifest {}", path.display()))
        } else {
            toml::from_str(&content)
                .manifest_context(format!("Malformed manifest {}", path.display()))
        }
    }

    fn should_visit(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let hidden = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'));
        !hidden && !self.excluded.iter().any(|dir| entry.path() == dir)
    }
}

impl DeclarationSource for ManifestSource {
    fn load(&self) -> Result<Declarations> {
        let mut declarations = Declarations::default();
        let files = self.manifest_files()?;
        for path in &files {
            let manifest = Self::read_manifest(path)?;
            debug!(
                manifest = %path.display(),
                namespace = %manifest.namespace,
                "Loading manifest"
            );
            apply_manifest(&manifest, &mut declarations)
                .map_err(|err| in_manifest(path, err))?;
        }
        info!(
            manifests = files.len(),
            types = declarations.catalog.len(),
            producers = declarations.producers.len(),
            "Declarations loaded"
        );
        Ok(declarations)
    }
}

/// Add one manifest's declarations
pub fn apply_manifest(manifest: &Manifest, declarations: &mut Declarations) -> Result<()> {
    let namespace = manifest.namespace.trim();
    if namespace.is_empty() {
        return Err(Error::manifest("namespace must not be empty"));
    }
    if let Some(package) = manifest.package.as_deref().filter(|p| !p.is_empty()) {
        declarations.catalog.set_package_name(namespace, package);
    }
    for ty in &manifest.types {
        declare_type(namespace, ty, &mut declarations.catalog)?;
    }
    for producer in &manifest.producers {
        add_producer(namespace, producer, declarations)?;
    }
    Ok(())
}

fn declare_type(namespace: &str, decl: &TypeDecl, catalog: &mut TypeCatalog) -> Result<()> {
    let mut fields = Vec::with_capacity(decl.fields.len());
    for field in &decl.fields {
        let parsed = parse_type_expr(&field.ty, namespace)?;
        let mut descriptor = FieldDescriptor::new(&field.name, parsed.descriptor, parsed.ownership);
        descriptor.default = field.default.clone();
        descriptor.validation = field.validation.clone();
        descriptor.json_name = field.json.clone();
        descriptor.comment = field.comment.clone();
        fields.push(descriptor);
    }
    let key = TypeKey::new(namespace, &decl.name);
    catalog.declare(&key, fields)
}

fn add_producer(
    namespace: &str,
    decl: &ProducerDecl,
    declarations: &mut Declarations,
) -> Result<()> {
    let function = &decl.function;
    let returns = parse_type_expr(&decl.returns, namespace)?;
    let output = composite(&returns.descriptor, || {
        let declared = &decl.returns;
        format!("{function} must return a composite type, not {declared}")
    })?;
    declarations.catalog.reference(&returns.descriptor);

    let role = match decl.role {
        RoleDecl::Initiator => ProducerRole::Initiator,
        RoleDecl::Creator => ProducerRole::Creator,
    };
    let mut producer = Producer::new(namespace, function, role, output, returns.ownership);
    if let Some(instance) = &decl.instance {
        producer = producer.named(instance);
    }
    if let Some(receiver) = &decl.receiver {
        let parsed = parse_type_expr(receiver, namespace)?;
        let key = composite(&parsed.descriptor, || {
            format!("receiver of {function} must be a composite type, not {receiver}")
        })?;
        declarations.catalog.reference(&parsed.descriptor);
        producer = producer.on_receiver(key, parsed.ownership);
    }
    for param in &decl.params {
        let parsed = parse_type_expr(&param.ty, namespace)?;
        declarations.catalog.reference(&parsed.descriptor);
        producer = producer.requires(Requirement::new(
            param.name.clone(),
            parsed.descriptor,
            parsed.ownership,
        ));
    }

    declarations.producers.add(producer)?;
    Ok(())
}

fn composite<F>(descriptor: &TypeDescriptor, message: F) -> Result<TypeKey>
where
    F: FnOnce() -> String,
{
    descriptor
        .composite_key()
        .cloned()
        .ok_or_else(|| Error::invalid_declaration(message()))
}

fn is_manifest_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Attach the manifest path to declaration errors that carry only a message
fn in_manifest(path: &Path, err: Error) -> Error {
    match err {
        Error::InvalidDeclaration { message } => {
            Error::invalid_declaration(format!("{}: {message}", path.display()))
        }
        Error::Manifest { message, source } => Error::Manifest {
            message: format!("{}: {message}", path.display()),
            source,
        },
        other => other,
    }
}

