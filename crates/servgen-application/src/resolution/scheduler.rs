//! Dependency scheduler
//!
//! Fixed-point ordering of initiator producers into levels. Each round
//! evaluates every pending producer against the registry as it stood when
//! the round began, then registers all ready producers at once.

use std::collections::{BTreeMap, BTreeSet};

use servgen_domain::{
    Error, InstanceId, Ownership, Producer, ProducerId, ProducerSet, Requirement, Result,
    StuckProducer, TypeCatalog, TypeDescriptor, TypeKey,
};
use tracing::{debug, info};

use super::registry::ResolutionRegistry;

/// One producer placed in the schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledProducer {
    /// Scheduled producer
    pub producer: ProducerId,
    /// Instance it registered
    pub instance: InstanceId,
    /// Round in which it became ready
    pub level: usize,
    /// Receiver instance of method producers
    pub receiver: Option<InstanceId>,
    /// Instance satisfying each requirement, in parameter order
    pub arguments: Vec<InstanceId>,
}

/// All producers scheduled in one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    /// Round number, starting at 1
    pub number: usize,
    /// Producers in registration order
    pub entries: Vec<ScheduledProducer>,
}

/// A converged schedule and the frozen registry it produced
#[derive(Debug, Clone)]
pub struct Schedule {
    levels: Vec<Level>,
    registry: ResolutionRegistry,
}

impl Schedule {
    /// Levels in ascending order
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Every scheduled producer in level order
    pub fn entries(&self) -> impl Iterator<Item = &ScheduledProducer> + '_ {
        self.levels.iter().flat_map(|level| level.entries.iter())
    }

    /// Frozen registry
    pub fn registry(&self) -> &ResolutionRegistry {
        &self.registry
    }

    /// Number of levels
    pub fn depth(&self) -> usize {
        self.levels.len()
    }
}

/// Orders initiator producers and populates the registry
pub struct DependencyScheduler<'a> {
    catalog: &'a mut TypeCatalog,
    producers: &'a ProducerSet,
    registry: ResolutionRegistry,
    // Lower-cased names some initiator declares, per output type
    declared: BTreeMap<TypeKey, BTreeSet<String>>,
}

/// Instances satisfying a ready producer
struct Satisfied {
    receiver: Option<InstanceId>,
    arguments: Vec<InstanceId>,
}

impl<'a> DependencyScheduler<'a> {
    /// Create a scheduler over one run's declarations
    pub fn new(
        catalog: &'a mut TypeCatalog,
        producers: &'a ProducerSet,
        variable_prefix: &str,
    ) -> Self {
        let mut declared: BTreeMap<TypeKey, BTreeSet<String>> = BTreeMap::new();
        for producer in producers.initiators() {
            if let Some(name) = producer.declared_name() {
                declared
                    .entry(producer.output.clone())
                    .or_default()
                    .insert(name.to_lowercase());
            }
        }
        Self {
            catalog,
            producers,
            registry: ResolutionRegistry::new(variable_prefix),
            declared,
        }
    }

    /// Run rounds until every initiator is scheduled
    ///
    /// # Errors
    ///
    /// * [`Error::MissingStructure`] when a requirement names a type the
    ///   catalog has never seen
    /// * [`Error::Unsatisfiable`] when a round resolves nothing while
    ///   producers remain pending
    /// * registration errors from [`ResolutionRegistry::register`]
    pub fn run(mut self) -> Result<Schedule> {
        let producers = self.producers;
        let mut pending: Vec<&Producer> = producers.initiators().collect();
        pending.sort_by(|a, b| a.order_key().cmp(&b.order_key()));

        let mut levels = Vec::new();
        let mut round = 1;
        while !pending.is_empty() {
            let mut ready = Vec::new();
            let mut waiting = Vec::new();
            for producer in pending {
                match self.evaluate(producer)? {
                    Some(satisfied) => ready.push((producer, satisfied)),
                    None => waiting.push(producer),
                }
            }

            if ready.is_empty() {
                return Err(self.unsatisfiable(&waiting));
            }

            let mut entries = Vec::with_capacity(ready.len());
            for (producer, satisfied) in ready {
                let instance = self.registry.register(producer, round)?;
                entries.push(ScheduledProducer {
                    producer: producer.id,
                    instance,
                    level: round,
                    receiver: satisfied.receiver,
                    arguments: satisfied.arguments,
                });
            }
            debug!(
                round,
                scheduled = entries.len(),
                pending = waiting.len(),
                "Scheduling round complete"
            );
            levels.push(Level {
                number: round,
                entries,
            });

            pending = waiting;
            round += 1;
        }

        info!(
            levels = levels.len(),
            instances = self.registry.len(),
            "Initiator schedule converged"
        );
        Ok(Schedule {
            levels,
            registry: self.registry,
        })
    }

    /// Instances satisfying every dependency of `producer`, if all exist
    fn evaluate(&mut self, producer: &Producer) -> Result<Option<Satisfied>> {
        let receiver = match producer.receiver() {
            Some(key) => {
                let requirement = Requirement::composite(key.clone(), Ownership::Value);
                self.satisfy(producer, &requirement)?
            }
            None => None,
        };
        let mut arguments = Vec::with_capacity(producer.requirements.len());
        let mut complete = producer.receiver().is_none() || receiver.is_some();
        for requirement in &producer.requirements {
            match self.satisfy(producer, requirement)? {
                Some(id) => arguments.push(id),
                None => complete = false,
            }
        }
        Ok(complete.then_some(Satisfied {
            receiver,
            arguments,
        }))
    }

    fn satisfy(
        &mut self,
        producer: &Producer,
        requirement: &Requirement,
    ) -> Result<Option<InstanceId>> {
        let TypeDescriptor::Composite(key) = &requirement.ty else {
            return Ok(None);
        };
        if self.catalog.force_structure(key).is_none() {
            let producer = producer.qualified_name();
            return Err(Error::missing_structure(key.to_string(), producer));
        }
        Ok(self.find(key, requirement.name.as_deref()))
    }

    /// Instance for a (possibly named) requirement on `key`
    ///
    /// A name some initiator declares waits for that exact instance; any
    /// other name falls back to the default.
    fn find(&self, key: &TypeKey, name: Option<&str>) -> Option<InstanceId> {
        let name = name.filter(|n| !n.is_empty());
        let instance = match name {
            Some(name) if self.is_declared(key, name) => self.registry.named(key, name),
            _ => self.registry.lookup(key, name),
        };
        instance.map(|instance| instance.id)
    }

    fn is_declared(&self, key: &TypeKey, name: &str) -> bool {
        self.declared
            .get(key)
            .is_some_and(|names| names.contains(&name.to_lowercase()))
    }

    fn unsatisfiable(&self, waiting: &[&Producer]) -> Error {
        let stuck = waiting
            .iter()
            .map(|producer| StuckProducer {
                producer: producer.function.clone(),
                namespace: producer.namespace.clone(),
                missing: producer
                    .dependencies()
                    .iter()
                    .filter(|requirement| !self.is_available(requirement))
                    .map(ToString::to_string)
                    .collect(),
            })
            .collect();
        Error::Unsatisfiable { stuck }
    }

    fn is_available(&self, requirement: &Requirement) -> bool {
        requirement
            .ty
            .composite_key()
            .and_then(|key| self.find(key, requirement.name.as_deref()))
            .is_some()
    }
}
