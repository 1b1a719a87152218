//! Resolution registry
//!
//! Per produced type, the named instances plus the designated default.
//! Populated while scheduling and frozen inside the resulting
//! [`Schedule`](super::Schedule).

use std::collections::{BTreeMap, HashSet};

use servgen_domain::constants::ROOT_INSTANCE_NAME;
use servgen_domain::{
    Error, InstanceId, NamedInstance, Producer, Result, TypeKey, sanitize_identifier,
};
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct TypeBucket {
    by_name: BTreeMap<String, InstanceId>,
    default: Option<InstanceId>,
}

/// Named instances of every produced type
#[derive(Debug, Clone)]
pub struct ResolutionRegistry {
    prefix: String,
    instances: Vec<NamedInstance>,
    origins: Vec<String>,
    buckets: BTreeMap<TypeKey, TypeBucket>,
    identifiers: HashSet<String>,
}

impl ResolutionRegistry {
    /// Create an empty registry; `prefix` starts every emitted identifier
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            instances: Vec::new(),
            origins: Vec::new(),
            buckets: BTreeMap::new(),
            identifiers: HashSet::new(),
        }
    }

    /// Register the output of `producer` at `level`
    ///
    /// A synthesized name never collides: it takes a numeric suffix when
    /// the plain name is already in use. A declared name displaces a
    /// synthesized instance holding the same name.
    ///
    /// # Errors
    ///
    /// * [`Error::AmbiguousDefault`] when a second unnamed instance of the
    ///   same type is registered
    /// * [`Error::DuplicateName`] when two producers declare the same
    ///   (case-insensitive) name
    pub fn register(&mut self, producer: &Producer, level: usize) -> Result<InstanceId> {
        let type_name = producer.output.to_string();
        let bucket = self.buckets.entry(producer.output.clone()).or_default();

        let (name, name_declared) = match producer.declared_name() {
            Some(declared) => (declared.to_string(), true),
            None => {
                if let Some(current) = bucket.default
                    && !self.instances[current.0].name_declared
                {
                    return Err(Error::ambiguous_default(
                        type_name,
                        self.origins[current.0].clone(),
                        producer.qualified_name(),
                    ));
                }
                let base = synthesized_name(&producer.namespace);
                (free_name(&bucket.by_name, &base), false)
            }
        };

        let lookup_key = name.to_lowercase();
        if let Some(&existing) = bucket.by_name.get(&lookup_key) {
            let holder = &mut self.instances[existing.0];
            if holder.name_declared {
                return Err(Error::duplicate_name(
                    type_name,
                    name,
                    self.origins[existing.0].clone(),
                    producer.qualified_name(),
                ));
            }
            bucket.by_name.remove(&lookup_key);
            holder.name = free_name(&bucket.by_name, &holder.name);
            bucket.by_name.insert(holder.name.to_lowercase(), existing);
            debug!(
                type_name = %type_name,
                name = %holder.name,
                "Renamed synthesized instance"
            );
        }

        let id = InstanceId(self.instances.len());
        bucket.by_name.insert(lookup_key, id);
        if !name_declared || bucket.default.is_none() {
            bucket.default = Some(id);
        }

        let identifier = unique_identifier(
            &mut self.identifiers,
            &format!("{}{}_{}", self.prefix, producer.output.name, name),
        );
        debug!(
            instance = %identifier,
            type_name = %type_name,
            level,
            producer = %producer,
            "Registered instance"
        );
        self.instances.push(NamedInstance {
            id,
            ty: producer.output.clone(),
            name,
            name_declared,
            ownership: producer.output_ownership,
            identifier,
            level,
            producer: producer.id,
        });
        self.origins.push(producer.qualified_name());
        Ok(id)
    }

    /// Instance of `ty` named `name` (case-insensitive), else the default
    pub fn lookup(&self, ty: &TypeKey, name: Option<&str>) -> Option<&NamedInstance> {
        let bucket = self.buckets.get(ty)?;
        let named = name
            .filter(|n| !n.is_empty())
            .and_then(|n| bucket.by_name.get(&n.to_lowercase()));
        let id = named.or(bucket.default.as_ref())?;
        self.get(*id)
    }

    /// Instance of `ty` named exactly `name` (case-insensitive), no fallback
    pub fn named(&self, ty: &TypeKey, name: &str) -> Option<&NamedInstance> {
        self.buckets
            .get(ty)
            .and_then(|bucket| bucket.by_name.get(&name.to_lowercase()))
            .and_then(|id| self.get(*id))
    }

    /// Instance by id
    pub fn get(&self, id: InstanceId) -> Option<&NamedInstance> {
        self.instances.get(id.0)
    }

    /// Default instance of `ty`
    pub fn default_of(&self, ty: &TypeKey) -> Option<&NamedInstance> {
        self.buckets
            .get(ty)
            .and_then(|bucket| bucket.default)
            .and_then(|id| self.get(id))
    }

    /// All instances in registration order
    pub fn instances(&self) -> &[NamedInstance] {
        &self.instances
    }

    /// Qualified name of the producer that registered `id`
    pub fn origin(&self, id: InstanceId) -> Option<&str> {
        self.origins.get(id.0).map(String::as_str)
    }

    /// Identifier prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of registered instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// True if nothing was registered
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Instance name of an unnamed producer, derived from its namespace
pub fn synthesized_name(namespace: &str) -> String {
    let name = sanitize_identifier(namespace);
    if name.is_empty() {
        ROOT_INSTANCE_NAME.to_string()
    } else {
        name
    }
}

fn free_name(by_name: &BTreeMap<String, InstanceId>, base: &str) -> String {
    let mut candidate = base.to_string();
    let mut suffix = 2;
    while by_name.contains_key(&candidate.to_lowercase()) {
        candidate = format!("{base}_{suffix}");
        suffix += 1;
    }
    candidate
}

fn unique_identifier(taken: &mut HashSet<String>, raw: &str) -> String {
    let base = sanitize_identifier(raw);
    let mut candidate = base.clone();
    let mut suffix = 2;
    while taken.contains(&candidate) {
        candidate = format!("{base}_{suffix}");
        suffix += 1;
    }
    taken.insert(candidate.clone());
    candidate
}
