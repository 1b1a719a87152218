//! Collected producer declarations

use std::collections::HashMap;

use super::producer::{Producer, ProducerId, ProducerRole};
use crate::error::{Error, Result};
use crate::value_objects::TypeKey;

/// Every producer declaration of a run
///
/// Producer ids are assigned in insertion order. At most one creator may be
/// declared per output type.
#[derive(Debug, Clone, Default)]
pub struct ProducerSet {
    producers: Vec<Producer>,
    creators: HashMap<TypeKey, ProducerId>,
}

impl ProducerSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a producer and return its assigned id
    pub fn add(&mut self, mut producer: Producer) -> Result<ProducerId> {
        if producer.function.is_empty() {
            return Err(Error::invalid_declaration(format!(
                "producer of {} in {} has no function name",
                producer.output, producer.namespace
            )));
        }
        let id = ProducerId(self.producers.len());
        producer.id = id;
        if producer.role == ProducerRole::Creator {
            if let Some(existing) = self.creators.get(&producer.output) {
                let first = &self.producers[existing.0];
                return Err(Error::duplicate_creator(
                    producer.output.to_string(),
                    first.qualified_name(),
                    producer.qualified_name(),
                ));
            }
            self.creators.insert(producer.output.clone(), id);
        }
        self.producers.push(producer);
        Ok(id)
    }

    /// Look up a producer by id
    pub fn get(&self, id: ProducerId) -> Option<&Producer> {
        self.producers.get(id.0)
    }

    /// All producers in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Producer> + '_ {
        self.producers.iter()
    }

    /// Initiator producers in declaration order
    pub fn initiators(&self) -> impl Iterator<Item = &Producer> + '_ {
        self.producers
            .iter()
            .filter(|p| p.role == ProducerRole::Initiator)
    }

    /// The creator registered for `key`, if any
    pub fn creator_for(&self, key: &TypeKey) -> Option<&Producer> {
        self.creators.get(key).and_then(|id| self.get(*id))
    }

    /// Number of registered creators
    pub fn creator_count(&self) -> usize {
        self.creators.len()
    }

    /// Number of producers
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    /// True if no producer was declared
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
}
