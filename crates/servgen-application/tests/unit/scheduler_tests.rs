//! Tests for the dependency scheduler

use servgen_application::{DependencyScheduler, Schedule};
use servgen_domain::{
    Error, Ownership, Producer, ProducerSet, Requirement, Result, TypeCatalog, TypeDescriptor,
    TypeKey,
};

const NS: &str = "app";

fn key(name: &str) -> TypeKey {
    TypeKey::new(NS, name)
}

fn catalog(names: &[&str]) -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    for name in names {
        catalog
            .declare(&key(name), Vec::new())
            .expect("declare fixture type");
    }
    catalog
}

fn schedule(catalog: &mut TypeCatalog, producers: &ProducerSet) -> Result<Schedule> {
    DependencyScheduler::new(catalog, producers, "Global").run()
}

fn needs(name: &str, param: &str) -> Requirement {
    Requirement::composite(key(name), Ownership::Value).named(param)
}

fn chain_producers() -> ProducerSet {
    let mut producers = ProducerSet::new();
    producers
        .add(
            Producer::initiator(NS, "MakeService", key("Service"), Ownership::Value)
                .requires(needs("Cache", "cache")),
        )
        .expect("service");
    producers
        .add(
            Producer::initiator(NS, "MakeCache", key("Cache"), Ownership::Value)
                .requires(needs("DB", "db")),
        )
        .expect("cache");
    producers
        .add(Producer::initiator(NS, "MakeDB", key("DB"), Ownership::Value))
        .expect("db");
    producers
}

fn level_of(schedule: &Schedule, function: &str, producers: &ProducerSet) -> usize {
    schedule
        .entries()
        .find(|entry| {
            producers
                .get(entry.producer)
                .is_some_and(|p| p.function == function)
        })
        .map(|entry| entry.level)
        .expect("scheduled producer")
}

#[test]
fn test_chain_schedules_one_producer_per_round() {
    let producers = chain_producers();
    let mut catalog = catalog(&["DB", "Cache", "Service"]);
    let schedule = schedule(&mut catalog, &producers).expect("schedule");

    assert_eq!(schedule.depth(), 3);
    assert_eq!(level_of(&schedule, "MakeDB", &producers), 1);
    assert_eq!(level_of(&schedule, "MakeCache", &producers), 2);
    assert_eq!(level_of(&schedule, "MakeService", &producers), 3);
}

#[test]
fn test_arguments_come_from_strictly_lower_levels() {
    let producers = chain_producers();
    let mut catalog = catalog(&["DB", "Cache", "Service"]);
    let schedule = schedule(&mut catalog, &producers).expect("schedule");

    let registry = schedule.registry();
    for entry in schedule.entries() {
        for argument in &entry.arguments {
            let instance = registry.get(*argument).expect("argument instance");
            assert!(instance.level < entry.level);
        }
    }
}

#[test]
fn test_rerun_is_deterministic() {
    let producers = chain_producers();
    let first = schedule(&mut catalog(&["DB", "Cache", "Service"]), &producers).expect("first");
    let second = schedule(&mut catalog(&["DB", "Cache", "Service"]), &producers).expect("second");

    assert_eq!(first.levels(), second.levels());
    assert_eq!(first.registry().instances(), second.registry().instances());
}

#[test]
fn test_cycle_is_unsatisfiable() {
    let mut producers = ProducerSet::new();
    producers
        .add(
            Producer::initiator(NS, "MakeA", key("A"), Ownership::Value)
                .requires(needs("B", "b")),
        )
        .expect("a");
    producers
        .add(
            Producer::initiator(NS, "MakeB", key("B"), Ownership::Value)
                .requires(needs("A", "a")),
        )
        .expect("b");
    let mut catalog = catalog(&["A", "B"]);

    match schedule(&mut catalog, &producers) {
        Err(Error::Unsatisfiable { stuck }) => {
            let names: Vec<&str> = stuck.iter().map(|s| s.producer.as_str()).collect();
            assert_eq!(names, vec!["MakeA", "MakeB"]);
            assert_eq!(stuck[0].missing, vec!["b app.B".to_string()]);
        }
        other => panic!("Expected Unsatisfiable, got {other:?}"),
    }
}

#[test]
fn test_primitive_requirement_is_never_satisfiable() {
    let mut producers = ProducerSet::new();
    producers
        .add(
            Producer::initiator(NS, "MakeServer", key("Server"), Ownership::Pointer).requires(
                Requirement::new(
                    Some("port".into()),
                    TypeDescriptor::primitive("int"),
                    Ownership::Value,
                ),
            ),
        )
        .expect("server");
    let mut catalog = catalog(&["Server"]);

    let err = schedule(&mut catalog, &producers).expect_err("primitive requirement");
    assert!(matches!(err, Error::Unsatisfiable { ref stuck } if stuck.len() == 1));
}

#[test]
fn test_unknown_requirement_type_is_missing_structure() {
    let mut producers = ProducerSet::new();
    producers
        .add(
            Producer::initiator(NS, "MakeServer", key("Server"), Ownership::Pointer)
                .requires(Requirement::composite(TypeKey::new("ghost", "T"), Ownership::Value)),
        )
        .expect("server");
    let mut catalog = catalog(&["Server"]);

    match schedule(&mut catalog, &producers) {
        Err(Error::MissingStructure {
            type_name,
            producer,
        }) => {
            assert_eq!(type_name, "ghost.T");
            assert_eq!(producer, "app.MakeServer");
        }
        other => panic!("Expected MissingStructure, got {other:?}"),
    }
}

#[test]
fn test_referenced_foreign_type_is_forced() {
    let mut catalog = catalog(&["Cache"]);
    let client = catalog.intern("github.com/redis/go-redis", "Client");
    let mut producers = ProducerSet::new();
    producers
        .add(Producer::initiator(NS, "NewClient", client.clone(), Ownership::Pointer))
        .expect("client");
    producers
        .add(
            Producer::initiator(NS, "MakeCache", key("Cache"), Ownership::Value)
                .requires(Requirement::composite(client.clone(), Ownership::Pointer)),
        )
        .expect("cache");

    let schedule = schedule(&mut catalog, &producers).expect("schedule");
    assert_eq!(schedule.depth(), 2);
    let entry = catalog.get(&client).expect("client entry");
    assert!(entry.is_declared());
}

#[test]
fn test_named_requirement_selects_named_instance() {
    let mut producers = ProducerSet::new();
    producers
        .add(Producer::initiator(NS, "MakePrimary", key("DB"), Ownership::Pointer))
        .expect("primary");
    producers
        .add(
            Producer::initiator(NS, "MakeReplica", key("DB"), Ownership::Pointer)
                .named("replica"),
        )
        .expect("replica");
    producers
        .add(
            Producer::initiator(NS, "MakeReport", key("Report"), Ownership::Value)
                .requires(needs("DB", "Replica")),
        )
        .expect("report");
    let mut catalog = catalog(&["DB", "Report"]);

    let schedule = schedule(&mut catalog, &producers).expect("schedule");
    let report = schedule
        .entries()
        .find(|entry| entry.level == 2)
        .expect("report entry");
    let registry = schedule.registry();
    let argument = registry.get(report.arguments[0]).expect("argument");
    assert_eq!(argument.name, "replica");
}

#[test]
fn test_named_requirement_waits_for_deeper_named_instance() {
    let mut producers = ProducerSet::new();
    producers
        .add(Producer::initiator(NS, "MakeDB", key("DB"), Ownership::Pointer))
        .expect("db");
    producers
        .add(Producer::initiator(NS, "MakeCache", key("Cache"), Ownership::Pointer))
        .expect("cache");
    producers
        .add(
            Producer::initiator(NS, "MakeAlt", key("DB"), Ownership::Pointer)
                .named("alt")
                .requires(needs("Cache", "cache")),
        )
        .expect("alt");
    producers
        .add(
            Producer::initiator(NS, "MakeUser", key("User"), Ownership::Pointer)
                .requires(needs("DB", "alt")),
        )
        .expect("user");
    let mut catalog = catalog(&["DB", "Cache", "User"]);

    let schedule = schedule(&mut catalog, &producers).expect("schedule");
    assert_eq!(level_of(&schedule, "MakeAlt", &producers), 2);
    assert_eq!(level_of(&schedule, "MakeUser", &producers), 3);

    let user = schedule
        .entries()
        .find(|entry| entry.level == 3)
        .expect("user entry");
    let registry = schedule.registry();
    let argument = registry.get(user.arguments[0]).expect("argument");
    assert_eq!(argument.name, "alt");
    assert_eq!(argument.identifier, "GlobalDB_alt");
}

#[test]
fn test_undeclared_name_falls_back_to_default() {
    let mut producers = ProducerSet::new();
    producers
        .add(Producer::initiator(NS, "MakeDB", key("DB"), Ownership::Pointer))
        .expect("db");
    producers
        .add(
            Producer::initiator(NS, "MakeUser", key("User"), Ownership::Pointer)
                .requires(needs("DB", "primary")),
        )
        .expect("user");
    let mut catalog = catalog(&["DB", "User"]);

    let schedule = schedule(&mut catalog, &producers).expect("schedule");
    assert_eq!(level_of(&schedule, "MakeUser", &producers), 2);
}

#[test]
fn test_method_producer_waits_for_receiver() {
    let mut producers = ProducerSet::new();
    producers
        .add(
            Producer::initiator(NS, "Handler", key("Handler"), Ownership::Pointer)
                .on_receiver(key("Server"), Ownership::Pointer),
        )
        .expect("handler");
    producers
        .add(Producer::initiator(NS, "NewServer", key("Server"), Ownership::Pointer))
        .expect("server");
    let mut catalog = catalog(&["Server", "Handler"]);

    let schedule = schedule(&mut catalog, &producers).expect("schedule");
    assert_eq!(level_of(&schedule, "Handler", &producers), 2);
    let handler = schedule
        .entries()
        .find(|entry| entry.level == 2)
        .expect("handler entry");
    let receiver = handler
        .receiver
        .and_then(|id| schedule.registry().get(id))
        .expect("receiver instance");
    assert_eq!(receiver.ty, key("Server"));
}

#[test]
fn test_creators_are_not_scheduled() {
    let mut producers = ProducerSet::new();
    producers
        .add(Producer::creator(NS, "NewConfig", key("Config"), Ownership::Value))
        .expect("creator");
    producers
        .add(Producer::initiator(NS, "MakeDB", key("DB"), Ownership::Value))
        .expect("db");
    let mut catalog = catalog(&["Config", "DB"]);

    let schedule = schedule(&mut catalog, &producers).expect("schedule");
    assert_eq!(schedule.entries().count(), 1);
    assert!(schedule.registry().default_of(&key("Config")).is_none());
}

#[test]
fn test_round_registration_is_lexical() {
    let zeta = TypeKey::new("zeta", "Z");
    let alpha = TypeKey::new("alpha", "A");
    let mut producers = ProducerSet::new();
    producers
        .add(Producer::initiator("zeta", "Make", zeta, Ownership::Value))
        .expect("zeta");
    producers
        .add(Producer::initiator("alpha", "Make", alpha, Ownership::Value))
        .expect("alpha");
    let mut catalog = TypeCatalog::new();

    let schedule = schedule(&mut catalog, &producers).expect("schedule");
    let order: Vec<&str> = schedule
        .registry()
        .instances()
        .iter()
        .map(|instance| instance.ty.namespace.as_str())
        .collect();
    assert_eq!(order, vec!["alpha", "zeta"]);
}

#[test]
fn test_ambiguous_default_aborts_scheduling() {
    let mut producers = ProducerSet::new();
    producers
        .add(Producer::initiator(NS, "MakeT1", key("T"), Ownership::Value))
        .expect("t1");
    producers
        .add(Producer::initiator("other", "MakeT2", key("T"), Ownership::Value))
        .expect("t2");
    let mut catalog = catalog(&["T"]);

    let err = schedule(&mut catalog, &producers).expect_err("two unnamed producers");
    assert!(matches!(err, Error::AmbiguousDefault { .. }));
}

#[test]
fn test_naming_one_producer_resolves_ambiguity() {
    let mut producers = ProducerSet::new();
    producers
        .add(Producer::initiator(NS, "MakeT1", key("T"), Ownership::Value))
        .expect("t1");
    producers
        .add(
            Producer::initiator("other", "MakeT2", key("T"), Ownership::Value)
                .named("alt"),
        )
        .expect("t2");
    let mut catalog = catalog(&["T"]);

    let schedule = schedule(&mut catalog, &producers).expect("schedule");
    let default = schedule.registry().default_of(&key("T")).expect("default");
    assert_eq!(default.name, "app");
}
