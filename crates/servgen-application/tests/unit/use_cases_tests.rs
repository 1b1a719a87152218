//! Tests for the wiring service use case

use servgen_application::{ResolutionOptions, WiringService};
use servgen_domain::{
    DeclarationSource, Declarations, Error, Ownership, Producer, ProducerSet, Result,
    TypeCatalog, TypeKey,
};

struct StaticSource;

impl DeclarationSource for StaticSource {
    fn load(&self) -> Result<Declarations> {
        let mut catalog = TypeCatalog::new();
        let db = catalog.intern("app/db", "DB");
        let mut producers = ProducerSet::new();
        let open = Producer::initiator("app/db", "Open", db, Ownership::Pointer);
        producers.add(open.named("main"))?;
        Ok(Declarations::new(catalog, producers))
    }
}

struct FailingSource;

impl DeclarationSource for FailingSource {
    fn load(&self) -> Result<Declarations> {
        Err(Error::io("manifest directory is missing"))
    }
}

#[test]
fn test_from_source_resolves_loaded_declarations() {
    let wiring = WiringService::default()
        .from_source(&StaticSource)
        .expect("resolve");
    let instance = wiring
        .schedule()
        .registry()
        .default_of(&TypeKey::new("app/db", "DB"))
        .expect("default instance");
    assert_eq!(instance.identifier, "GlobalDB_main");
    assert!(instance.name_declared);
}

#[test]
fn test_custom_variable_prefix() {
    let service =
        WiringService::new(ResolutionOptions::default().with_variable_prefix("Var"));
    let wiring = service.from_source(&StaticSource).expect("resolve");
    let identifiers: Vec<&str> = wiring
        .schedule()
        .registry()
        .instances()
        .iter()
        .map(|instance| instance.identifier.as_str())
        .collect();
    assert_eq!(identifiers, vec!["VarDB_main"]);
}

#[test]
fn test_empty_prefix_is_rejected() {
    let service = WiringService::new(ResolutionOptions::default().with_variable_prefix(""));
    let err = service
        .from_source(&StaticSource)
        .expect_err("empty prefix");
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_source_errors_propagate() {
    let err = WiringService::default()
        .from_source(&FailingSource)
        .expect_err("failing source");
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_empty_declarations_resolve_to_empty_schedule() {
    let wiring = WiringService::default()
        .resolve(Declarations::default())
        .expect("resolve");
    assert_eq!(wiring.schedule().depth(), 0);
    assert!(wiring.schedule().registry().is_empty());
}
