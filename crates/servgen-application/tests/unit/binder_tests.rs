//! Tests for the value binder

use servgen_application::{BindRequest, BindingSource, ResolutionOptions, Wiring, WiringService};
use servgen_domain::{
    Declarations, Error, FieldDescriptor, Ownership, Producer, ProducerSet, Requirement,
    TypeCatalog, TypeDescriptor, TypeKey, Unqualified,
};

const NS: &str = "app";

fn key(name: &str) -> TypeKey {
    TypeKey::new(NS, name)
}

fn declare(catalog: &mut TypeCatalog, name: &str, fields: Vec<FieldDescriptor>) {
    catalog
        .declare(&key(name), fields)
        .expect("declare fixture type");
}

fn param(name: &str, ty: &str, ownership: Ownership) -> Requirement {
    Requirement::composite(key(ty), ownership).named(name)
}

fn resolve(catalog: TypeCatalog, producers: ProducerSet) -> Wiring {
    WiringService::new(ResolutionOptions::default())
        .resolve(Declarations::new(catalog, producers))
        .expect("resolve")
}

/// `MakeDB() *DB`, `MakeCache(db *DB) Cache`, `MakeService(cache Cache) *Service`
fn service_chain() -> Wiring {
    let mut catalog = TypeCatalog::new();
    for name in ["DB", "Cache", "Service"] {
        declare(&mut catalog, name, Vec::new());
    }
    let mut producers = ProducerSet::new();
    producers
        .add(Producer::initiator(NS, "MakeDB", key("DB"), Ownership::Pointer))
        .expect("db");
    producers
        .add(
            Producer::initiator(NS, "MakeCache", key("Cache"), Ownership::Value)
                .requires(param("db", "DB", Ownership::Pointer)),
        )
        .expect("cache");
    producers
        .add(
            Producer::initiator(NS, "MakeService", key("Service"), Ownership::Pointer)
                .requires(param("cache", "Cache", Ownership::Value)),
        )
        .expect("service");
    resolve(catalog, producers)
}

fn render(wiring: &Wiring, name: &str, ownership: Ownership) -> String {
    wiring
        .binder()
        .resolve(&BindRequest::composite(key(name), ownership))
        .expect("bind")
        .expr
        .render(&Unqualified)
}

#[test]
fn test_end_to_end_service_binding_by_type() {
    let wiring = service_chain();
    let levels: Vec<usize> = wiring.schedule().entries().map(|e| e.level).collect();
    assert_eq!(levels, vec![1, 2, 3]);

    let binding = wiring
        .binder()
        .resolve(&BindRequest::composite(key("Service"), Ownership::Pointer))
        .expect("bind service");
    assert_eq!(binding.expr.render(&Unqualified), "GlobalService_app");
    assert!(matches!(binding.source, BindingSource::Instance(_)));
    assert_eq!(binding.produced, Ownership::Pointer);
}

#[test]
fn test_ownership_reconciliation() {
    let wiring = service_chain();
    // DB instance is a pointer, Cache instance is a value
    assert_eq!(render(&wiring, "DB", Ownership::Value), "*GlobalDB_app");
    assert_eq!(
        render(&wiring, "Cache", Ownership::Pointer),
        "&GlobalCache_app"
    );
    assert_eq!(render(&wiring, "DB", Ownership::Pointer), "GlobalDB_app");
}

#[test]
fn test_initializer_uses_recorded_arguments() {
    let wiring = service_chain();
    let binder = wiring.binder();
    let calls: Vec<String> = wiring
        .schedule()
        .entries()
        .map(|entry| {
            let binding = binder.initializer(entry).expect("initializer");
            binding.expr.render(&Unqualified)
        })
        .collect();
    assert_eq!(
        calls,
        vec![
            "MakeDB()".to_string(),
            "MakeCache(GlobalDB_app)".to_string(),
            "MakeService(GlobalCache_app)".to_string(),
        ]
    );
}

#[test]
fn test_inline_synthesis_with_defaults_and_pointer_fields() {
    let mut catalog = TypeCatalog::new();
    declare(&mut catalog, "User", Vec::new());
    let string = TypeDescriptor::primitive("string");
    let tags = TypeDescriptor::array(string.clone(), Ownership::Value);
    let user = TypeDescriptor::Composite(key("User"));
    declare(
        &mut catalog,
        "Req",
        vec![
            FieldDescriptor::new("Limit", TypeDescriptor::primitive("int"), Ownership::Value)
                .with_default("10"),
            FieldDescriptor::new("Name", string, Ownership::Value),
            FieldDescriptor::new("Tags", tags, Ownership::Value),
            FieldDescriptor::new("Owner", user, Ownership::Pointer),
        ],
    );
    let wiring = resolve(catalog, ProducerSet::new());

    let binding = wiring
        .binder()
        .resolve(&BindRequest::composite(key("Req"), Ownership::Value))
        .expect("bind req");
    assert_eq!(
        binding.expr.render(&Unqualified),
        "Req{Limit: 10, Owner: &User{}}"
    );
    assert_eq!(binding.source, BindingSource::Inline(key("Req")));
    assert_eq!(binding.produced, Ownership::Value);
    assert!(binding.imports.contains(NS));
    assert!(binding.helpers.is_empty());
}

#[test]
fn test_inline_field_uses_registered_instance() {
    let mut catalog = TypeCatalog::new();
    declare(&mut catalog, "DB", Vec::new());
    let db = TypeDescriptor::Composite(key("DB"));
    let field = FieldDescriptor::new("DB", db, Ownership::Pointer);
    declare(&mut catalog, "Handler", vec![field]);
    let mut producers = ProducerSet::new();
    producers
        .add(Producer::initiator(NS, "MakeDB", key("DB"), Ownership::Pointer))
        .expect("db");
    let wiring = resolve(catalog, producers);

    assert_eq!(
        render(&wiring, "Handler", Ownership::Pointer),
        "&Handler{DB: GlobalDB_app}"
    );
}

#[test]
fn test_self_referential_type_is_left_at_zero_value() {
    let mut catalog = TypeCatalog::new();
    let node = TypeDescriptor::Composite(key("Node"));
    let next = FieldDescriptor::new("Next", node, Ownership::Pointer);
    declare(&mut catalog, "Node", vec![next]);
    let wiring = resolve(catalog, ProducerSet::new());

    assert_eq!(render(&wiring, "Node", Ownership::Value), "Node{}");
}

#[test]
fn test_creator_wins_over_instance() {
    let mut catalog = TypeCatalog::new();
    declare(&mut catalog, "DB", Vec::new());
    declare(&mut catalog, "Client", Vec::new());
    let mut producers = ProducerSet::new();
    producers
        .add(Producer::initiator(NS, "MakeDB", key("DB"), Ownership::Pointer))
        .expect("db");
    producers
        .add(Producer::initiator(NS, "MakeClient", key("Client"), Ownership::Value))
        .expect("client initiator");
    producers
        .add(
            Producer::creator(NS, "NewClient", key("Client"), Ownership::Value)
                .requires(Requirement::composite(key("DB"), Ownership::Value)),
        )
        .expect("client creator");
    let wiring = resolve(catalog, producers);

    let binding = wiring
        .binder()
        .resolve(&BindRequest::composite(key("Client"), Ownership::Pointer))
        .expect("bind client");
    assert_eq!(
        binding.expr.render(&Unqualified),
        "getAddr(NewClient(*GlobalDB_app))"
    );
    assert!(matches!(binding.source, BindingSource::Creator(_)));
    assert!(binding.helpers.contains("getAddr"));
}

#[test]
fn test_method_creator_without_receiver_instance() {
    let mut catalog = TypeCatalog::new();
    declare(&mut catalog, "Factory", Vec::new());
    declare(&mut catalog, "Widget", Vec::new());
    let mut producers = ProducerSet::new();
    producers
        .add(
            Producer::creator(NS, "NewWidget", key("Widget"), Ownership::Pointer)
                .on_receiver(key("Factory"), Ownership::Pointer),
        )
        .expect("creator");
    let wiring = resolve(catalog, producers);

    let err = wiring
        .binder()
        .resolve(&BindRequest::composite(key("Widget"), Ownership::Pointer))
        .expect_err("no receiver");
    assert!(matches!(err, Error::UnresolvedReceiver { .. }));
}

#[test]
fn test_method_creator_calls_receiver_default() {
    let mut catalog = TypeCatalog::new();
    declare(&mut catalog, "Factory", Vec::new());
    declare(&mut catalog, "Widget", Vec::new());
    let mut producers = ProducerSet::new();
    producers
        .add(Producer::initiator(NS, "NewFactory", key("Factory"), Ownership::Pointer))
        .expect("factory");
    producers
        .add(
            Producer::creator(NS, "NewWidget", key("Widget"), Ownership::Pointer)
                .on_receiver(key("Factory"), Ownership::Pointer),
        )
        .expect("creator");
    let wiring = resolve(catalog, producers);

    assert_eq!(
        render(&wiring, "Widget", Ownership::Pointer),
        "GlobalFactory_app.NewWidget()"
    );
}

#[test]
fn test_primitive_request_is_unbindable() {
    let wiring = resolve(TypeCatalog::new(), ProducerSet::new());
    let err = wiring
        .binder()
        .resolve(&BindRequest::new(TypeDescriptor::primitive("int"), Ownership::Value))
        .expect_err("primitive");
    let Error::Unbindable { type_name, .. } = &err else {
        panic!("expected an unbindable error, got {err:?}");
    };
    assert_eq!(type_name, "int");
}
