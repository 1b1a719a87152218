//! Error handling types

use std::fmt;

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// A producer left in the pending set when scheduling stopped making progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StuckProducer {
    /// Producer function name
    pub producer: String,
    /// Namespace that declares the producer
    pub namespace: String,
    /// Requirements that no registered instance satisfies, rendered for humans
    pub missing: Vec<String>,
}

impl fmt::Display for StuckProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.producer, self.namespace)?;
        if !self.missing.is_empty() {
            write!(f, " is missing {}", self.missing.join(", "))?;
        }
        Ok(())
    }
}

fn render_stuck(stuck: &[StuckProducer]) -> String {
    stuck
        .iter()
        .map(|s| format!("  - {s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Main error type for servgen
#[derive(Error, Debug)]
pub enum Error {
    /// Two producers for the same type left their instance name empty
    #[error(
        "{first} and {second} both produce unnamed {type_name}; give one an explicit instance name"
    )]
    AmbiguousDefault {
        /// Produced type
        type_name: String,
        /// Producer registered first
        first: String,
        /// Producer that collided with it
        second: String,
    },

    /// Two producers registered the same (type, name) pair
    #[error("duplicate name '{name}' for {type_name}: {first} and {second}")]
    DuplicateName {
        /// Produced type
        type_name: String,
        /// Colliding instance name
        name: String,
        /// Producer registered first
        first: String,
        /// Producer that collided with it
        second: String,
    },

    /// Scheduling converged with producers still pending
    #[error("unsatisfiable or cyclic initiator dependencies:\n{}", render_stuck(.stuck))]
    Unsatisfiable {
        /// Every producer that could not be scheduled
        stuck: Vec<StuckProducer>,
    },

    /// A required type has no structural information at all
    #[error("unknown type {type_name} required by {producer}")]
    MissingStructure {
        /// The unknown type
        type_name: String,
        /// Producer that requires it
        producer: String,
    },

    /// More than one creator declared for a type
    #[error("duplicate creator for {type_name}: {first} and {second}")]
    DuplicateCreator {
        /// Created type
        type_name: String,
        /// Creator declared first
        first: String,
        /// Creator declared second
        second: String,
    },

    /// A declaration violates the producer contract
    #[error("invalid declaration: {message}")]
    InvalidDeclaration {
        /// Description of the violation
        message: String,
    },

    /// No binding path can produce the requested value
    #[error("cannot bind a value of type {type_name}: {reason}")]
    Unbindable {
        /// Requested type
        type_name: String,
        /// Why every path failed
        reason: String,
    },

    /// A method producer's receiver type has no instance
    #[error("receiver {receiver} of {producer} has no registered instance")]
    UnresolvedReceiver {
        /// Method producer
        producer: String,
        /// Receiver type
        receiver: String,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Manifest file cannot be parsed or is malformed
    #[error("Manifest error: {message}")]
    Manifest {
        /// Description of the manifest error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Template registration or rendering error
    #[error("Template error: {message}")]
    Template {
        /// Description of the template error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Infrastructure failure not covered by a more specific variant
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal invariant broken
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Resolution error creation methods
impl Error {
    /// Create an ambiguous default error
    pub fn ambiguous_default(
        type_name: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::AmbiguousDefault {
            type_name: type_name.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a duplicate name error
    pub fn duplicate_name(
        type_name: impl Into<String>,
        name: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateName {
            type_name: type_name.into(),
            name: name.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a missing structure error
    pub fn missing_structure(type_name: impl Into<String>, producer: impl Into<String>) -> Self {
        Self::MissingStructure {
            type_name: type_name.into(),
            producer: producer.into(),
        }
    }

    /// Create a duplicate creator error
    pub fn duplicate_creator(
        type_name: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateCreator {
            type_name: type_name.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create an invalid declaration error
    pub fn invalid_declaration<S: Into<String>>(message: S) -> Self {
        Self::InvalidDeclaration {
            message: message.into(),
        }
    }

    /// Create an unbindable value error
    pub fn unbindable(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unbindable {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// I/O error creation methods
impl Error {
    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }
}

// Configuration and manifest error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a manifest error
    pub fn manifest<S: Into<String>>(message: S) -> Self {
        Self::Manifest {
            message: message.into(),
            source: None,
        }
    }
}
