//! Import alias allocation
//!
//! Every generated file gets its own table. A namespace is imported once,
//! under its package name; when two namespaces share a package name the
//! later one gets a numeric suffix (`db`, `db1`, `db2`).

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use servgen_domain::value_objects::{is_builtin_namespace, sanitize_identifier};
use servgen_domain::{Ownership, Qualifier, TypeKey};

/// Alias used when a package name sanitizes to nothing
const FALLBACK_ALIAS: &str = "pkg";

/// One import line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    /// Local alias
    pub alias: String,
    /// Imported namespace
    pub path: String,
}

/// Namespace to alias map of a single generated file
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    aliases: BTreeMap<String, String>,
    taken: BTreeSet<String>,
}

impl ImportTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Import `namespace` and return its alias
    ///
    /// The builtin namespace is never imported and yields `None`.
    pub fn import(&mut self, namespace: &str, package: &str) -> Option<&str> {
        if is_builtin_namespace(namespace) {
            return None;
        }
        if !self.aliases.contains_key(namespace) {
            let alias = self.allocate(package);
            self.taken.insert(alias.clone());
            self.aliases.insert(namespace.to_string(), alias);
        }
        self.aliases.get(namespace).map(String::as_str)
    }

    /// Imports sorted by path
    pub fn imports(&self) -> Vec<Import> {
        self.aliases
            .iter()
            .map(|(path, alias)| Import {
                alias: alias.clone(),
                path: path.clone(),
            })
            .collect()
    }

    /// `alias.Name` for an imported type, the bare name otherwise
    pub fn qualify(&self, key: &TypeKey) -> String {
        match self.alias(&key.namespace) {
            Some(alias) => format!("{alias}.{}", key.name),
            None => key.name.clone(),
        }
    }

    /// Declaration type of a variable holding `key`
    pub fn type_ref(&self, key: &TypeKey, ownership: Ownership) -> String {
        format!("{}{}", ownership.marker(), self.qualify(key))
    }

    /// Number of imported namespaces
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// True if nothing was imported
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    fn allocate(&self, package: &str) -> String {
        let mut base = sanitize_identifier(package);
        if base.is_empty() {
            base = FALLBACK_ALIAS.to_string();
        }
        if !self.taken.contains(&base) {
            return base;
        }
        (1usize..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !self.taken.contains(candidate))
            .unwrap_or(base)
    }
}

impl Qualifier for ImportTable {
    fn alias(&self, namespace: &str) -> Option<&str> {
        self.aliases.get(namespace).map(String::as_str)
    }
}
