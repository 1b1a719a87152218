//! Wiring Service Use Case
//!
//! Turns one run's declarations into a converged schedule and hands out the
//! binder that emitters use for every consumer site.

use servgen_domain::constants::DEFAULT_VARIABLE_PREFIX;
use servgen_domain::{DeclarationSource, Declarations, Error, ProducerSet, Result, TypeCatalog};
use tracing::{debug, info};

use crate::resolution::{DependencyScheduler, Schedule, ValueBinder};

/// Options of a resolution run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionOptions {
    /// Prefix of every emitted instance identifier
    pub variable_prefix: String,
}

impl Default for ResolutionOptions {
    fn default() -> Self {
        Self {
            variable_prefix: DEFAULT_VARIABLE_PREFIX.to_string(),
        }
    }
}

impl ResolutionOptions {
    /// Set the identifier prefix
    pub fn with_variable_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.variable_prefix = prefix.into();
        self
    }
}

/// Result of a successful resolution run
#[derive(Debug, Clone)]
pub struct Wiring {
    catalog: TypeCatalog,
    producers: ProducerSet,
    schedule: Schedule,
}

impl Wiring {
    /// Binder over the converged schedule
    pub fn binder(&self) -> ValueBinder<'_> {
        ValueBinder::new(&self.schedule, &self.catalog, &self.producers)
    }

    /// Catalog after structural resolution
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Declared producers
    pub fn producers(&self) -> &ProducerSet {
        &self.producers
    }

    /// Converged schedule
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
}

/// Resolves declaration sets
#[derive(Debug, Clone, Default)]
pub struct WiringService {
    options: ResolutionOptions,
}

impl WiringService {
    /// Create a service with the given options
    pub fn new(options: ResolutionOptions) -> Self {
        Self { options }
    }

    /// Schedule every initiator of `declarations`
    pub fn resolve(&self, declarations: Declarations) -> Result<Wiring> {
        if self.options.variable_prefix.is_empty() {
            return Err(Error::configuration("variable prefix must not be empty"));
        }
        let Declarations {
            mut catalog,
            producers,
        } = declarations;
        debug!(
            types = catalog.len(),
            producers = producers.len(),
            "Resolving declarations"
        );

        let schedule =
            DependencyScheduler::new(&mut catalog, &producers, &self.options.variable_prefix)
                .run()?;

        info!(
            initiators = schedule.registry().len(),
            levels = schedule.depth(),
            "Wiring resolved"
        );
        Ok(Wiring {
            catalog,
            producers,
            schedule,
        })
    }

    /// Load declarations from `source` and resolve them
    pub fn from_source(&self, source: &dyn DeclarationSource) -> Result<Wiring> {
        let declarations = source.load()?;
        self.resolve(declarations)
    }
}
