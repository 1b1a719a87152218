//! Value binder
//!
//! Decides which expression supplies a value at a consumer site. The
//! resolution order is: creator call, registered instance, inline composite
//! construction. Every path goes through the same pointer/value
//! reconciliation.

use std::collections::BTreeSet;

use servgen_domain::constants::ADDRESS_HELPER;
use servgen_domain::{
    Error, Expr, InstanceId, Invocation, Ownership, Producer, ProducerId, ProducerSet,
    Requirement, Result, TypeCatalog, TypeDescriptor, TypeKey,
};

use super::scheduler::{Schedule, ScheduledProducer};

/// What a consumer site asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindRequest {
    /// Requested type
    pub ty: TypeDescriptor,
    /// Preferred instance name
    pub name: Option<String>,
    /// Requested ownership mode
    pub ownership: Ownership,
}

impl BindRequest {
    /// Request a value of `ty`
    pub fn new(ty: TypeDescriptor, ownership: Ownership) -> Self {
        Self {
            ty,
            name: None,
            ownership,
        }
    }

    /// Request a composite type
    pub fn composite(key: TypeKey, ownership: Ownership) -> Self {
        Self::new(TypeDescriptor::Composite(key), ownership)
    }

    /// Prefer the instance called `name`
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into()).filter(|n| !n.is_empty());
        self
    }
}

impl From<&Requirement> for BindRequest {
    fn from(requirement: &Requirement) -> Self {
        Self {
            ty: requirement.ty.clone(),
            name: requirement.name.clone(),
            ownership: requirement.ownership,
        }
    }
}

/// Which path produced a binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingSource {
    /// Explicit creator call
    Creator(ProducerId),
    /// Reference to a registered instance
    Instance(InstanceId),
    /// Inline composite construction
    Inline(TypeKey),
    /// Initiator call building a scheduled instance
    Initiator(ProducerId),
}

/// The expression supplying a value plus what rendering it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Reconciled expression
    pub expr: Expr,
    /// Path that produced it
    pub source: BindingSource,
    /// Ownership of the value before reconciliation
    pub produced: Ownership,
    /// Namespaces the expression references
    pub imports: BTreeSet<String>,
    /// Helper declarations the generated file must contain
    pub helpers: BTreeSet<&'static str>,
}

impl Binding {
    fn new(expr: Expr, source: BindingSource, produced: Ownership) -> Self {
        let imports = expr.namespaces();
        let mut helpers = BTreeSet::new();
        if expr.requires_address_helper() {
            helpers.insert(ADDRESS_HELPER);
        }
        Self {
            expr,
            source,
            produced,
            imports,
            helpers,
        }
    }
}

/// Expression before reconciliation
struct Produced {
    expr: Expr,
    source: BindingSource,
    ownership: Ownership,
}

/// Binds consumer requests against a converged schedule
///
/// Only constructible from a [`Schedule`], so no binding can be attempted
/// before scheduling has converged.
pub struct ValueBinder<'a> {
    schedule: &'a Schedule,
    catalog: &'a TypeCatalog,
    producers: &'a ProducerSet,
}

impl<'a> ValueBinder<'a> {
    /// Create a binder over a converged schedule
    pub fn new(
        schedule: &'a Schedule,
        catalog: &'a TypeCatalog,
        producers: &'a ProducerSet,
    ) -> Self {
        Self {
            schedule,
            catalog,
            producers,
        }
    }

    /// Bind one consumer request
    ///
    /// # Errors
    ///
    /// * [`Error::Unbindable`] for primitive, array or map requests and for
    ///   creators whose arguments cannot be bound
    /// * [`Error::UnresolvedReceiver`] for a method creator whose receiver
    ///   type has no instance
    pub fn resolve(&self, request: &BindRequest) -> Result<Binding> {
        let mut chain = Vec::new();
        let produced = self
            .bind(&request.ty, request.name.as_deref(), &mut chain)?
            .ok_or_else(|| Error::internal(format!("binding {} made no progress", request.ty)))?;
        Ok(Binding::new(
            reconcile(produced.expr, produced.ownership, request.ownership),
            produced.source,
            produced.ownership,
        ))
    }

    /// The call that initializes a scheduled instance
    ///
    /// Arguments are the instances recorded by the scheduler, reconciled to
    /// each parameter's ownership.
    pub fn initializer(&self, entry: &ScheduledProducer) -> Result<Binding> {
        let producer = self.producer(entry.producer)?;
        let registry = self.schedule.registry();
        let mut args = Vec::with_capacity(entry.arguments.len());
        for (requirement, id) in producer.requirements.iter().zip(&entry.arguments) {
            let instance = registry
                .get(*id)
                .ok_or_else(|| Error::internal(format!("unknown instance {id}")))?;
            args.push(reconcile(
                Expr::Ident(instance.identifier.clone()),
                instance.ownership,
                requirement.ownership,
            ));
        }
        let expr = match &producer.invocation {
            Invocation::Function => Expr::call(&producer.namespace, &producer.function, args),
            Invocation::Method { receiver, .. } => {
                let instance = entry
                    .receiver
                    .and_then(|id| registry.get(id))
                    .ok_or_else(|| Error::UnresolvedReceiver {
                        producer: producer.qualified_name(),
                        receiver: receiver.to_string(),
                    })?;
                let target = Expr::Ident(instance.identifier.clone());
                Expr::method_call(target, &producer.function, args)
            }
        };
        Ok(Binding::new(
            expr,
            BindingSource::Initiator(producer.id),
            producer.output_ownership,
        ))
    }

    /// Bind without reconciliation; `None` means the type is already being
    /// synthesized further up `chain`
    fn bind(
        &self,
        ty: &TypeDescriptor,
        name: Option<&str>,
        chain: &mut Vec<TypeKey>,
    ) -> Result<Option<Produced>> {
        let TypeDescriptor::Composite(key) = ty else {
            let reason = format!("{} values have no inline form", ty.kind());
            return Err(Error::unbindable(ty.to_string(), reason));
        };

        if !chain.contains(key)
            && let Some(creator) = self.producers.creator_for(key)
        {
            return self.call_creator(creator, chain).map(Some);
        }

        if let Some(instance) = self.schedule.registry().lookup(key, name) {
            return Ok(Some(Produced {
                expr: Expr::Ident(instance.identifier.clone()),
                source: BindingSource::Instance(instance.id),
                ownership: instance.ownership,
            }));
        }

        if chain.contains(key) {
            return Ok(None);
        }
        self.synthesize(key, chain).map(Some)
    }

    fn call_creator(&self, creator: &Producer, chain: &mut Vec<TypeKey>) -> Result<Produced> {
        chain.push(creator.output.clone());
        let mut args = Vec::with_capacity(creator.requirements.len());
        for requirement in &creator.requirements {
            let produced = self
                .bind(&requirement.ty, requirement.name.as_deref(), chain)?
                .ok_or_else(|| {
                    Error::unbindable(
                        creator.output.to_string(),
                        format!("creator {creator} requires its own output via {requirement}"),
                    )
                })?;
            args.push(reconcile(produced.expr, produced.ownership, requirement.ownership));
        }
        chain.pop();

        let expr = match &creator.invocation {
            Invocation::Function => Expr::call(&creator.namespace, &creator.function, args),
            Invocation::Method { receiver, .. } => {
                let instance = self
                    .schedule
                    .registry()
                    .default_of(receiver)
                    .ok_or_else(|| Error::UnresolvedReceiver {
                        producer: creator.qualified_name(),
                        receiver: receiver.to_string(),
                    })?;
                let target = Expr::Ident(instance.identifier.clone());
                Expr::method_call(target, &creator.function, args)
            }
        };
        Ok(Produced {
            expr,
            source: BindingSource::Creator(creator.id),
            ownership: creator.output_ownership,
        })
    }

    fn synthesize(&self, key: &TypeKey, chain: &mut Vec<TypeKey>) -> Result<Produced> {
        let Some(fields) = self.catalog.fields(key) else {
            let reason = "type is unknown and has no creator or instance";
            return Err(Error::unbindable(key.to_string(), reason));
        };

        chain.push(key.clone());
        let mut assignments = Vec::new();
        for field in fields {
            if let Some(literal) = &field.default {
                assignments.push((field.name.clone(), Expr::Literal(literal.clone())));
                continue;
            }
            if field.ty.composite_key().is_none() {
                continue;
            }
            if let Some(produced) = self.bind(&field.ty, None, chain)? {
                assignments.push((
                    field.name.clone(),
                    reconcile(produced.expr, produced.ownership, field.ownership),
                ));
            }
        }
        chain.pop();

        Ok(Produced {
            expr: Expr::Composite {
                ty: key.clone(),
                fields: assignments,
            },
            source: BindingSource::Inline(key.clone()),
            ownership: Ownership::Value,
        })
    }

    fn producer(&self, id: ProducerId) -> Result<&'a Producer> {
        self.producers
            .get(id)
            .ok_or_else(|| Error::internal(format!("unknown producer {id}")))
    }
}

/// Wrap `expr` so a value produced as `produced` fits a `requested` slot
pub fn reconcile(expr: Expr, produced: Ownership, requested: Ownership) -> Expr {
    match (produced, requested) {
        (Ownership::Value, Ownership::Pointer) => Expr::address_of(expr),
        (Ownership::Pointer, Ownership::Value) => Expr::deref(expr),
        _ => expr,
    }
}
