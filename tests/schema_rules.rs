//! Schema build rules
//!
//! Every invalid declaration fails the build with an `InitError` whose cause
//! names the rule that was broken.

mod common;

use std::sync::Arc;

use common::assert_chain;
use configlayer::{
    Annotation, Declaration, Field, Initial, InputErrorKind, Instance, LazySchema, PathType, Schema,
    SchemaBuilder, SchemaKind, Subtype, Value, ValueType,
};

fn base_config() -> Arc<Schema> {
    SchemaBuilder::config("Config1")
        .field("v_bool", ValueType::Bool, true)
        .field("v_int", ValueType::Int, 65535)
        .field("v_str", ValueType::Str, "some")
        .build()
        .unwrap()
}

// =============================================================================
// Missing pieces
// =============================================================================

#[test]
fn test_missing_type() {
    for position in 0..3 {
        let mut builder = SchemaBuilder::config("NoType");
        for i in 0..3 {
            builder = if i == position {
                builder.declare(Declaration::new("test", None, Some(Initial::Value(Value::Int(1)))))
            } else {
                builder.field(format!("f{}", i), ValueType::Int, 1)
            };
        }
        let err = builder.build().unwrap_err();
        assert_chain(&err, &["InitError(Schema)", "InputError(MissingType)"]);
    }
}

#[test]
fn test_missing_default() {
    let err = SchemaBuilder::config("NoDefault")
        .field("v_int", ValueType::Int, 1)
        .declare(Declaration::new("test", Some(Annotation::Type(ValueType::Str)), None))
        .build()
        .unwrap_err();
    assert_chain(&err, &["InitError(Schema)", "InputError(MissingDefault)"]);
    assert_eq!(err.to_string(), "Cannot init schema 'NoDefault' (field 'test')");
}

#[test]
fn test_unknown_forward_annotation() {
    let err = SchemaBuilder::config("Forward")
        .named("test", "Missing", 1)
        .build()
        .unwrap_err();
    assert_chain(&err, &["InitError(Schema)", "InputError(MissingType)"]);
}

#[test]
fn test_forward_annotation_resolves() {
    let own_int = Subtype::shared("OwnInt", ValueType::Int);
    let schema = SchemaBuilder::config("Forward")
        .register_type(own_int)
        .named("count", "OwnInt", 3)
        .named("root", "Path", "/tmp")
        .named("ratio", " float ", 1)
        .build()
        .unwrap();
    assert_eq!(schema.field("count").unwrap().value_type().name(), "OwnInt");
    assert_eq!(schema.field("root").unwrap().default_value(), &PathType::value("/tmp"));
    assert_eq!(schema.field("ratio").unwrap().default_value(), &Value::Float(1.0));
}

// =============================================================================
// Names
// =============================================================================

#[test]
fn test_reserved_names() {
    for name in ["__dunder__", "__init__", "____", "cfg", "import_from", "export", "str", "dict", "None"] {
        let err = SchemaBuilder::config("Reserved")
            .field(name, ValueType::Int, 1)
            .build()
            .unwrap_err();
        assert_chain(&err, &["InitError(Schema)", "InputError(ReservedName)"]);
    }
}

#[test]
fn test_reserved_name_wins_over_valid_declaration() {
    // Annotation and default are fine, the name alone is rejected
    let err = SchemaBuilder::config("Reserved")
        .field("str", ValueType::Str, "text")
        .build()
        .unwrap_err();
    assert_eq!(err.input_error().map(|e| e.kind), Some(InputErrorKind::ReservedName));
}

#[test]
fn test_single_underscore_is_a_plain_field() {
    let schema = SchemaBuilder::config("Internal")
        .field("_internal", ValueType::Int, 1)
        .field("__half", ValueType::Int, 2)
        .build()
        .unwrap();
    let section = Instance::defaults_section(&schema).unwrap();
    assert_eq!(section.get("_internal"), Some("1"));
    assert_eq!(section.get("__half"), Some("2"));
}

#[test]
fn test_invalid_names() {
    for name in ["", "1st", "with space", "dash-ed"] {
        let err = SchemaBuilder::config("Invalid")
            .field(name, ValueType::Int, 1)
            .build()
            .unwrap_err();
        assert_chain(&err, &["InitError(Schema)", "InputError(InvalidName)"]);
    }
}

// =============================================================================
// Types
// =============================================================================

#[test]
fn test_type_mismatch() {
    let cases: Vec<(ValueType, Initial)> = vec![
        (ValueType::Int, Initial::Value(Value::bytes(&b"1"[..]))),
        (ValueType::Str, Initial::Value(Value::Int(1))),
        (ValueType::Str, Initial::Value(Value::None)),
        (ValueType::List, Initial::Value(Value::tuple([Value::Int(1)]))),
        (ValueType::Int, Initial::Field(Field::new(Value::bytes(&b"1"[..])))),
        (ValueType::Int, Initial::Value(Value::Float(1.0))),
    ];
    for (ty, initial) in cases {
        let err = SchemaBuilder::config("WrongType")
            .declare(Declaration::new("some", Some(Annotation::Type(ty)), Some(initial)))
            .build()
            .unwrap_err();
        assert_chain(&err, &["InitError(Schema)", "InputError(TypeMismatch)"]);
    }
}

#[test]
fn test_subtype_default_accepted() {
    let own_int = Subtype::shared("OwnInt", ValueType::Int);
    let schema = SchemaBuilder::config("Sub")
        .field("v_int", ValueType::Int, Value::custom(own_int, Value::Int(4)))
        .build()
        .unwrap();
    assert_eq!(Instance::defaults_section(&schema).unwrap().get("v_int"), Some("4"));
}

#[test]
fn test_language_rules() {
    let err = SchemaBuilder::language("WrongLang")
        .field("value", ValueType::Int, 1)
        .build()
        .unwrap_err();
    assert_chain(&err, &["InitError(Schema)", "InputError(TypeMismatch)"]);

    let lang = SchemaBuilder::language("Lang1")
        .label("some1", "First some")
        .field("some2", ValueType::Str, "Second some")
        .build()
        .unwrap();
    assert_eq!(lang.kind(), SchemaKind::Language);
    let instance = Instance::new(lang);
    assert_eq!(instance.text("some1"), Some("First some"));
    assert_eq!(instance.text("some2"), Some("Second some"));
}

#[test]
fn test_empty_schemas() {
    assert!(SchemaBuilder::config("EmptyConfig").build().unwrap().is_empty());
    assert!(SchemaBuilder::language("EmptyLang").build().unwrap().is_empty());
    let exported = Instance::new(SchemaBuilder::config("EmptyConfig").build().unwrap()).export().unwrap();
    assert!(exported.is_empty());
}

// =============================================================================
// Inheritance
// =============================================================================

#[test]
fn test_inheritance_order_and_override() {
    let base = base_config();
    let derived = SchemaBuilder::derive("Config2", &base)
        .field("v_new", ValueType::Float, 0.5)
        .field("v_int", ValueType::Int, 7)
        .build()
        .unwrap();

    assert_eq!(derived.names().collect::<Vec<_>>(), ["v_bool", "v_int", "v_str", "v_new"]);
    assert_eq!(derived.field("v_int").unwrap().default_value(), &Value::Int(7));
    assert_eq!(base.field("v_int").unwrap().default_value(), &Value::Int(65535));
}

#[test]
fn test_alias_schema_keeps_everything() {
    let base = base_config();
    let alias = SchemaBuilder::derive("Config1Alias", &base).build().unwrap();
    assert_eq!(alias.names().collect::<Vec<_>>(), base.names().collect::<Vec<_>>());
    assert_eq!(alias.fingerprint(), base.fingerprint());
    assert_eq!(
        Instance::defaults_section(&alias).unwrap(),
        Instance::defaults_section(&base).unwrap()
    );
}

#[test]
fn test_override_must_keep_type() {
    let err = SchemaBuilder::derive("Config2", &base_config())
        .field("v_int", ValueType::Str, "seven")
        .build()
        .unwrap_err();
    assert_chain(&err, &["InitError(Schema)", "InputError(TypeMismatch)"]);
}

#[test]
fn test_bare_override_keeps_inherited_codec() {
    let base = SchemaBuilder::config("Base")
        .field_with(
            "level",
            ValueType::Int,
            Field::new(1).export_with(|v| Ok(format!("L{}", v))),
        )
        .build()
        .unwrap();
    let derived = SchemaBuilder::derive("Derived", &base).field("level", ValueType::Int, 3).build().unwrap();
    assert_eq!(Instance::defaults_section(&derived).unwrap().get("level"), Some("L3"));

    let replaced = SchemaBuilder::derive("Replaced", &base)
        .field_with("level", ValueType::Int, Field::new(4))
        .build()
        .unwrap();
    assert_eq!(Instance::defaults_section(&replaced).unwrap().get("level"), Some("4"));
}

// =============================================================================
// Caching
// =============================================================================

fn declare_limits() -> SchemaBuilder {
    SchemaBuilder::config("Limits")
        .field("retries", ValueType::Int, 3)
        .member("describe")
}

static LIMITS: LazySchema = LazySchema::new(declare_limits);

#[test]
fn test_lazy_schema_is_shared() {
    let first = LIMITS.get().unwrap();
    let second = LIMITS.get().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.names().collect::<Vec<_>>(), ["retries"]);
}
