//! Type catalog
//!
//! Registry of every named type a generation run has seen, grouped by
//! namespace. Entries are created once per `(namespace, name)` and never
//! duplicated.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::value_objects::{FieldDescriptor, TypeDescriptor, TypeKey};

/// Structural knowledge about a catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Structure {
    /// Seen as a reference only; its declaration was not scanned
    Referenced,
    /// Declared with the given fields
    Declared(Vec<FieldDescriptor>),
}

/// One named type of the catalog
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Type identity
    pub key: TypeKey,
    /// Structural knowledge
    pub structure: Structure,
}

impl CatalogEntry {
    /// Fields of the type; empty for referenced-only entries
    pub fn fields(&self) -> &[FieldDescriptor] {
        match &self.structure {
            Structure::Declared(fields) => fields,
            Structure::Referenced => &[],
        }
    }

    /// True once the declaration has been seen or forced
    pub fn is_declared(&self) -> bool {
        matches!(self.structure, Structure::Declared(_))
    }
}

#[derive(Debug, Clone, Default)]
struct NamespaceTypes {
    package: Option<String>,
    types: BTreeMap<String, CatalogEntry>,
}

/// Lookup/creation cache mapping qualified type names to their structure
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    namespaces: BTreeMap<String, NamespaceTypes>,
}

impl TypeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the key for `namespace.name`, creating a referenced entry on first use
    pub fn intern(&mut self, namespace: &str, name: &str) -> TypeKey {
        let types = &mut self
            .namespaces
            .entry(namespace.to_string())
            .or_default()
            .types;
        types
            .entry(name.to_string())
            .or_insert_with(|| CatalogEntry {
                key: TypeKey::new(namespace, name),
                structure: Structure::Referenced,
            })
            .key
            .clone()
    }

    /// Intern every composite type a descriptor mentions
    pub fn reference(&mut self, descriptor: &TypeDescriptor) {
        for key in descriptor.referenced_keys() {
            self.intern(&key.namespace, &key.name);
        }
    }

    /// Attach the declared fields of a composite type
    ///
    /// Field types are interned as references. Declaring the same type twice
    /// is an error.
    pub fn declare(&mut self, key: &TypeKey, fields: Vec<FieldDescriptor>) -> Result<()> {
        for field in &fields {
            self.reference(&field.ty);
        }
        self.intern(&key.namespace, &key.name);
        let entry = self
            .entry_mut(key)
            .ok_or_else(|| Error::internal(format!("interned type {key} vanished")))?;
        if entry.is_declared() {
            return Err(Error::invalid_declaration(format!(
                "type {key} is declared more than once"
            )));
        }
        entry.structure = Structure::Declared(fields);
        Ok(())
    }

    /// Look up an entry
    pub fn get(&self, key: &TypeKey) -> Option<&CatalogEntry> {
        self.namespaces.get(&key.namespace)?.types.get(&key.name)
    }

    /// True if the key was ever interned
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.get(key).is_some()
    }

    /// Force structural resolution of a known type
    ///
    /// Referenced-only entries become field-less declared composites.
    /// Returns `None` for a key that was never interned.
    pub fn force_structure(&mut self, key: &TypeKey) -> Option<&[FieldDescriptor]> {
        let entry = self.entry_mut(key)?;
        if let Structure::Referenced = entry.structure {
            entry.structure = Structure::Declared(Vec::new());
        }
        Some(entry.fields())
    }

    /// Fields of a known type (empty for referenced-only entries)
    pub fn fields(&self, key: &TypeKey) -> Option<&[FieldDescriptor]> {
        self.get(key).map(CatalogEntry::fields)
    }

    /// Record the package name used when importing `namespace`
    pub fn set_package_name(&mut self, namespace: &str, package: impl Into<String>) {
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .package = Some(package.into());
    }

    /// Package name of a namespace: the recorded one, else its last path segment
    pub fn package_name(&self, namespace: &str) -> String {
        self.namespaces
            .get(namespace)
            .and_then(|ns| ns.package.clone())
            .unwrap_or_else(|| default_package_name(namespace))
    }

    /// All entries, ordered by namespace then name
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> + '_ {
        self.namespaces.values().flat_map(|ns| ns.types.values())
    }

    /// Number of interned types
    pub fn len(&self) -> usize {
        self.namespaces.values().map(|ns| ns.types.len()).sum()
    }

    /// True if nothing has been interned
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry_mut(&mut self, key: &TypeKey) -> Option<&mut CatalogEntry> {
        self.namespaces
            .get_mut(&key.namespace)?
            .types
            .get_mut(&key.name)
    }
}

/// Last path segment of a namespace, the conventional package name
pub fn default_package_name(namespace: &str) -> String {
    namespace
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(namespace)
        .to_string()
}
