//! Producer declarations
//!
//! A producer is a factory function (or method) that builds exactly one
//! composite value. Initiators take part in scheduling; creators override
//! the default construction of their output type at consumer sites.

use std::fmt;

use serde::Serialize;

use crate::value_objects::{Ownership, TypeDescriptor, TypeKey};

/// Index of a producer inside its [`ProducerSet`](super::ProducerSet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProducerId(pub usize);

impl fmt::Display for ProducerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Role of a producer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProducerRole {
    /// Builds a service singleton; scheduled
    Initiator,
    /// Overrides construction of its output type; never scheduled
    Creator,
}

impl fmt::Display for ProducerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initiator => f.write_str("initiator"),
            Self::Creator => f.write_str("creator"),
        }
    }
}

/// How the producer is called
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Invocation {
    /// Package-level function
    Function,
    /// Method on the default instance of `receiver`
    Method {
        /// Receiver type
        receiver: TypeKey,
        /// Whether the method has a pointer receiver
        ownership: Ownership,
    },
}

/// One parameter of a producer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// Parameter name; doubles as the requested instance name
    pub name: Option<String>,
    /// Parameter type
    pub ty: TypeDescriptor,
    /// Value or pointer parameter
    pub ownership: Ownership,
}

impl Requirement {
    /// Create a requirement
    pub fn new(name: Option<String>, ty: TypeDescriptor, ownership: Ownership) -> Self {
        Self {
            name: name.filter(|n| !n.is_empty()),
            ty,
            ownership,
        }
    }

    /// Requirement on a composite type
    pub fn composite(key: TypeKey, ownership: Ownership) -> Self {
        Self::new(None, TypeDescriptor::Composite(key), ownership)
    }

    /// Set the parameter name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into()).filter(|n| !n.is_empty());
        self
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name} ")?;
        }
        write!(f, "{}{}", self.ownership.marker(), self.ty)
    }
}

/// A factory declaration
#[derive(Debug, Clone, Serialize)]
pub struct Producer {
    /// Assigned when added to a producer set
    pub id: ProducerId,
    /// Function or method name
    pub function: String,
    /// Declaring namespace
    pub namespace: String,
    /// Initiator or creator
    pub role: ProducerRole,
    /// Produced type
    pub output: TypeKey,
    /// Whether the function returns a pointer
    pub output_ownership: Ownership,
    /// Declared instance name; empty or absent means unnamed
    pub output_name: Option<String>,
    /// Parameters in declaration order
    pub requirements: Vec<Requirement>,
    /// Call shape
    pub invocation: Invocation,
}

impl Producer {
    /// Create a function producer with no requirements
    pub fn new(
        namespace: impl Into<String>,
        function: impl Into<String>,
        role: ProducerRole,
        output: TypeKey,
        output_ownership: Ownership,
    ) -> Self {
        Self {
            id: ProducerId(0),
            function: function.into(),
            namespace: namespace.into(),
            role,
            output,
            output_ownership,
            output_name: None,
            requirements: Vec::new(),
            invocation: Invocation::Function,
        }
    }

    /// Initiator shorthand
    pub fn initiator(
        namespace: impl Into<String>,
        function: impl Into<String>,
        output: TypeKey,
        output_ownership: Ownership,
    ) -> Self {
        Self::new(
            namespace,
            function,
            ProducerRole::Initiator,
            output,
            output_ownership,
        )
    }

    /// Creator shorthand
    pub fn creator(
        namespace: impl Into<String>,
        function: impl Into<String>,
        output: TypeKey,
        output_ownership: Ownership,
    ) -> Self {
        Self::new(
            namespace,
            function,
            ProducerRole::Creator,
            output,
            output_ownership,
        )
    }

    /// Set the declared instance name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Append a requirement
    pub fn requires(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Make this a method on `receiver`
    pub fn on_receiver(mut self, receiver: TypeKey, ownership: Ownership) -> Self {
        self.invocation = Invocation::Method {
            receiver,
            ownership,
        };
        self
    }

    /// Declared name, `None` when absent or empty
    pub fn declared_name(&self) -> Option<&str> {
        self.output_name.as_deref().filter(|n| !n.is_empty())
    }

    /// Receiver type of a method producer
    pub fn receiver(&self) -> Option<&TypeKey> {
        match &self.invocation {
            Invocation::Method { receiver, .. } => Some(receiver),
            Invocation::Function => None,
        }
    }

    /// Requirements plus the implicit receiver requirement of methods
    pub fn dependencies(&self) -> Vec<Requirement> {
        let mut deps = Vec::with_capacity(self.requirements.len() + 1);
        if let Invocation::Method {
            receiver,
            ownership,
        } = &self.invocation
        {
            deps.push(Requirement::composite(receiver.clone(), *ownership));
        }
        deps.extend(self.requirements.iter().cloned());
        deps
    }

    /// `namespace.function` used in diagnostics
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.function.clone()
        } else {
            format!("{}.{}", self.namespace, self.function)
        }
    }

    /// Deterministic scheduling order key
    pub fn order_key(&self) -> (&str, &str, ProducerId) {
        (&self.namespace, &self.function, self.id)
    }
}

impl fmt::Display for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}
