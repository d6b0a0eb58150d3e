//! Declaration files and INI text end to end

mod common;

use common::{assert_chain, chain_of};
use configlayer::{Catalog, ImportMode, IniDocument, Instance, SchemaKind, Value};

fn catalog() -> Catalog {
    Catalog::from_toml(include_str!("fixtures/servers.toml")).unwrap()
}

#[test]
fn test_catalog_shapes() {
    let catalog = catalog();
    assert_eq!(catalog.names().collect::<Vec<_>>(), ["Server", "Production", "Labels"]);

    let production = catalog.get("Production").unwrap();
    assert_eq!(
        production.names().collect::<Vec<_>>(),
        ["host", "port", "root", "aliases", "replicas"]
    );
    assert_eq!(catalog.get("Labels").unwrap().kind(), SchemaKind::Language);
    assert_ne!(
        catalog.get("Server").unwrap().fingerprint(),
        production.fingerprint()
    );
}

#[test]
fn test_defaults_render_as_ini() {
    let catalog = catalog();
    let mut doc = IniDocument::new();
    for schema in catalog.iter() {
        doc.insert(schema.name(), Instance::defaults_section(schema).unwrap());
    }
    let text = doc.render();
    assert!(text.starts_with("[Server]\nhost = 'localhost'\nport = 8080\nroot = /srv/www\naliases = []\n"));
    assert!(text.contains("[Labels]\ngreeting = 'Hello'\nfarewell = 'Bye'\n"));

    // Rendered defaults read back to the same defaults
    let parsed = IniDocument::parse(&text).unwrap();
    for schema in catalog.iter() {
        let mut instance = Instance::new(std::sync::Arc::clone(schema));
        instance
            .import_from(parsed.section(schema.name()).unwrap(), ImportMode::Strict)
            .unwrap();
        assert!(instance.changed().is_empty(), "{}", schema.name());
    }
}

#[test]
fn test_stored_file_merges_into_defaults() {
    let catalog = catalog();
    let doc = IniDocument::parse(include_str!("fixtures/servers.ini")).unwrap();

    let mut server = Instance::new(catalog.get("Server").unwrap().clone());
    server.import_from(doc.section("Server").unwrap(), ImportMode::Lenient).unwrap();
    assert_eq!(server.changed(), ["host", "port"]);
    assert_eq!(server.text("host"), Some("intranet"));

    let mut production = Instance::new(catalog.get("Production").unwrap().clone());
    production
        .import_from(doc.section("Production").unwrap(), ImportMode::Strict)
        .unwrap();
    assert_eq!(production.get("replicas"), Some(&Value::Int(5)));
    assert_eq!(
        production.get("aliases"),
        Some(&Value::list([Value::from("www.example.org"), Value::from("example.org")]))
    );

    let mut labels = Instance::new(catalog.get("Labels").unwrap().clone());
    labels.import_from(doc.section("Labels").unwrap(), ImportMode::Strict).unwrap();
    assert_eq!(labels.text("greeting"), Some("Hallo"));
    assert_eq!(labels.text("farewell"), Some("Bye"));
}

#[test]
fn test_strict_import_of_stale_key() {
    let catalog = catalog();
    let doc = IniDocument::parse(include_str!("fixtures/servers.ini")).unwrap();
    let mut server = Instance::new(catalog.get("Server").unwrap().clone());
    let err = server
        .import_from(doc.section("Server").unwrap(), ImportMode::Strict)
        .unwrap_err();
    assert_chain(&err, &["InputError(UnknownField)"]);
    assert!(server.changed().is_empty());
}

#[test]
fn test_declaration_errors_are_chained() {
    let err = Catalog::from_toml(
        "[[schema]]\nname = \"Labels\"\nkind = \"language\"\n\n[[schema.field]]\nname = \"count\"\ntype = \"int\"\ndefault = \"1\"\n",
    )
    .unwrap_err();
    assert_chain(&err, &["InitError(Schema)", "InputError(TypeMismatch)"]);

    let err = Catalog::from_toml(
        "[[schema]]\nname = \"S\"\n\n[[schema.field]]\nname = \"port\"\ntype = \"int\"\ndefault = \"'eighty'\"\n",
    )
    .unwrap_err();
    assert_chain(&err, &["InitError(Schema)", "InputError(TypeMismatch)"]);

    let err = Catalog::from_toml("[[schema]]\nname = \"A\"\nextends = \"Missing\"\n").unwrap_err();
    assert_eq!(chain_of(&err), ["DeclError"]);
}
