//! Manifest declaration source tests

use std::fs;
use std::path::Path;

use servgen_domain::{
    DeclarationSource, Declarations, Error, Invocation, Ownership, ProducerRole, TypeDescriptor,
    TypeKey,
};
use servgen_infrastructure::adapters::manifest::{Manifest, ManifestSource, apply_manifest};
use tempfile::TempDir;

const DB_MANIFEST: &str = r#"
namespace = "example.com/app/db"
package = "database"

[[types]]
name = "Options"
[[types.fields]]
name = "Limit"
type = "int"
default = "10"
json = "limit"
[[types.fields]]
name = "Owner"
type = "*example.com/app/user.User"
comment = "who opened it"

[[producers]]
function = "Open"
returns = "*DB"
instance = "main"
params = [{ name = "opts", type = "Options" }]
"#;

const CACHE_MANIFEST: &str = r#"{
  "namespace": "example.com/app/cache",
  "producers": [
    {
      "function": "NewCache",
      "returns": "*Cache",
      "params": [{ "type": "*example.com/app/db.DB" }]
    },
    { "function": "Warm", "role": "creator", "returns": "Entry", "receiver": "*Cache" }
  ]
}"#;

fn write(dir: &Path, name: &str, content: &str) {
    if let Some(parent) = dir.join(name).parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(dir.join(name), content).unwrap();
}

fn parse(content: &str) -> Manifest {
    toml::from_str(content).unwrap()
}

#[test]
fn test_manifest_files_are_sorted_and_filtered() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.toml", DB_MANIFEST);
    write(dir.path(), "a.json", CACHE_MANIFEST);
    write(dir.path(), "notes.md", "not a manifest");
    write(dir.path(), ".hidden/x.toml", DB_MANIFEST);
    write(dir.path(), "gen/out.toml", DB_MANIFEST);
    let empty = "namespace = \"example.com/app/empty\"\n";
    write(dir.path(), "nested/c.toml", empty);

    let files = ManifestSource::new(dir.path())
        .excluding(dir.path().join("gen"))
        .manifest_files()
        .unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|path| {
            path.strip_prefix(dir.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(names, vec!["a.json", "b.toml", "nested/c.toml"]);
}

#[test]
fn test_single_file_source() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "db.toml", DB_MANIFEST);
    let files = ManifestSource::new(dir.path().join("db.toml"))
        .manifest_files()
        .unwrap();
    assert_eq!(files, vec![dir.path().join("db.toml")]);
}

#[test]
fn test_missing_path_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = ManifestSource::new(dir.path().join("nowhere"))
        .load()
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_load_builds_catalog_and_producers() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "db.toml", DB_MANIFEST);
    write(dir.path(), "cache.json", CACHE_MANIFEST);

    let declarations = ManifestSource::new(dir.path()).load().unwrap();
    let catalog = &declarations.catalog;

    let options = TypeKey::new("example.com/app/db", "Options");
    let fields = catalog.fields(&options).unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].default.as_deref(), Some("10"));
    assert_eq!(fields[0].json_name.as_deref(), Some("limit"));
    assert_eq!(fields[1].ownership, Ownership::Pointer);
    assert_eq!(fields[1].comment.as_deref(), Some("who opened it"));

    // Referenced but never declared
    let user = TypeKey::new("example.com/app/user", "User");
    assert!(catalog.contains(&user));
    assert!(!catalog.get(&user).unwrap().is_declared());
    assert!(catalog.contains(&TypeKey::new("example.com/app/db", "DB")));

    assert_eq!(catalog.package_name("example.com/app/db"), "database");
    assert_eq!(catalog.package_name("example.com/app/cache"), "cache");

    let producers = &declarations.producers;
    assert_eq!(producers.len(), 3);
    let open = producers
        .iter()
        .find(|producer| producer.function == "Open")
        .unwrap();
    assert_eq!(open.declared_name(), Some("main"));
    assert_eq!(open.output_ownership, Ownership::Pointer);
    assert_eq!(open.requirements[0].name.as_deref(), Some("opts"));

    let entry = TypeKey::new("example.com/app/cache", "Entry");
    let warm = producers.creator_for(&entry).unwrap();
    assert_eq!(warm.role, ProducerRole::Creator);
    assert!(matches!(
        &warm.invocation,
        Invocation::Method { receiver, ownership: Ownership::Pointer }
            if *receiver == TypeKey::new("example.com/app/cache", "Cache")
    ));

    let new_cache = producers
        .iter()
        .find(|producer| producer.function == "NewCache")
        .unwrap();
    assert!(new_cache.requirements[0].name.is_none());
    assert_eq!(
        new_cache.requirements[0].ty,
        TypeDescriptor::composite("example.com/app/db", "DB")
    );
}

#[test]
fn test_primitive_result_is_rejected() {
    let manifest = parse(
        r#"
namespace = "example.com/app/db"
[[producers]]
function = "Port"
returns = "int"
"#,
    );
    let err = apply_manifest(&manifest, &mut Declarations::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidDeclaration { .. }));
}

#[test]
fn test_primitive_receiver_is_rejected() {
    let manifest = parse(
        r#"
namespace = "example.com/app/db"
[[producers]]
function = "Open"
returns = "*DB"
receiver = "string"
"#,
    );
    let err = apply_manifest(&manifest, &mut Declarations::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidDeclaration { .. }));
}

#[test]
fn test_duplicate_type_declaration_across_manifests() {
    let mut declarations = Declarations::default();
    apply_manifest(&parse(DB_MANIFEST), &mut declarations).unwrap();
    let err = apply_manifest(&parse(DB_MANIFEST), &mut declarations).unwrap_err();
    assert!(matches!(err, Error::InvalidDeclaration { .. }));
}

#[test]
fn test_duplicate_creator_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "a.toml",
        r#"
namespace = "example.com/app/cache"
[[producers]]
function = "MakeEntry"
role = "creator"
returns = "Entry"
[[producers]]
function = "OtherEntry"
role = "creator"
returns = "*Entry"
"#,
    );
    let err = ManifestSource::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, Error::DuplicateCreator { .. }));
}

#[test]
fn test_malformed_and_unknown_fields_are_manifest_errors() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bad.json", "{ \"namespace\": ");
    let err = ManifestSource::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, Error::Manifest { .. }));

    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "extra.toml",
        "namespace = \"example.com/x\"\nflavour = \"sweet\"\n",
    );
    let err = ManifestSource::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, Error::Manifest { .. }));
}

#[test]
fn test_empty_namespace_is_rejected() {
    let err = apply_manifest(&parse("namespace = \"  \"\n"), &mut Declarations::default())
        .unwrap_err();
    assert!(matches!(err, Error::Manifest { .. }));
}

#[test]
fn test_declaration_errors_name_the_manifest() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "broken.toml",
        "namespace = \"example.com/x\"\n[[producers]]\nfunction = \"F\"\nreturns = \"**T\"\n",
    );
    let err = ManifestSource::new(dir.path()).load().unwrap_err();
    assert!(err.to_string().contains("broken.toml"));
}
