//! Declaration files
//!
//! Schemas can be declared in TOML instead of code. Defaults are written in
//! the same text form the field is persisted in, so a declaration file and an
//! exported INI section read alike.
//!
//! ```toml
//! [[type]]
//! name = "Port"
//! base = "int"
//!
//! [[schema]]
//! name = "Server"
//!
//! [[schema.field]]
//! name = "host"
//! type = "str"
//! default = "'localhost'"
//!
//! [[schema.field]]
//! name = "port"
//! type = "Port"
//! default = "8080"
//!
//! [[schema]]
//! name = "Labels"
//! kind = "language"
//!
//! [[schema.field]]
//! name = "greeting"
//! default = "'Hello'"
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BoxError, DeclError, Error, InitError, InitTarget};
use crate::literal;
use crate::schema::{Annotation, Declaration, Initial, Schema, SchemaBuilder, SchemaKind};
use crate::types::{Subtype, TypeRegistry, ValueType};
use crate::value::Value;

/// Parsed declaration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclarationFile {
    #[serde(default, rename = "type")]
    pub types: Vec<TypeDecl>,

    #[serde(default, rename = "schema")]
    pub schemas: Vec<SchemaDecl>,
}

/// Named subtype of a built-in type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDecl {
    pub name: String,

    /// Defaults to the kind of `extends`, or `config`
    #[serde(default)]
    pub kind: Option<SchemaKind>,

    /// Name of an earlier schema in the same file
    #[serde(default)]
    pub extends: Option<String>,

    #[serde(default, rename = "field")]
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,

    #[serde(default, rename = "type")]
    pub ty: Option<String>,

    /// Persisted text form of the default
    #[serde(default)]
    pub default: Option<String>,
}

/// Schemas built from a declaration file, in file order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    schemas: Vec<Arc<Schema>>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Parse and build every schema in `text`
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let file: DeclarationFile = toml::from_str(text).map_err(DeclError::from)?;
        Self::build(&file)
    }

    /// Build every schema of an already parsed file
    pub fn build(file: &DeclarationFile) -> Result<Self, Error> {
        let registry = registry_for(&file.types)?;
        let mut catalog = Catalog::default();

        for decl in &file.schemas {
            if catalog.index.contains_key(&decl.name) {
                return Err(DeclError::DuplicateSchema { name: decl.name.clone() }.into());
            }
            let schema = build_schema(&catalog, &registry, decl)?;
            catalog.index.insert(decl.name.clone(), catalog.schemas.len());
            catalog.schemas.push(schema);
        }

        debug!(schemas = catalog.schemas.len(), "declaration file built");
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.index.get(name).map(|&i| &self.schemas[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> + '_ {
        self.schemas.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.schemas.iter().map(|s| s.name())
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn registry_for(types: &[TypeDecl]) -> Result<TypeRegistry, DeclError> {
    let mut registry = TypeRegistry::new();
    for decl in types {
        let base = registry.resolve(&decl.base).ok_or_else(|| DeclError::UnknownBaseType {
            name: decl.name.clone(),
            base: decl.base.clone(),
        })?;
        registry.register(Subtype::shared(decl.name.clone(), base));
    }
    Ok(registry)
}

fn build_schema(catalog: &Catalog, registry: &TypeRegistry, decl: &SchemaDecl) -> Result<Arc<Schema>, Error> {
    let mut builder = match &decl.extends {
        Some(base_name) => {
            let base = catalog.get(base_name).ok_or_else(|| DeclError::UnknownBase {
                schema: decl.name.clone(),
                base: base_name.clone(),
            })?;
            if let Some(kind) = decl.kind.filter(|k| *k != base.kind()) {
                return Err(DeclError::KindMismatch {
                    schema: decl.name.clone(),
                    declared: kind.to_string(),
                    inherited: base.kind().to_string(),
                }
                .into());
            }
            SchemaBuilder::derive(&decl.name, base)
        }
        None => match decl.kind.unwrap_or_default() {
            SchemaKind::Config => SchemaBuilder::config(&decl.name),
            SchemaKind::Language => SchemaBuilder::language(&decl.name),
        },
    };
    builder = builder.registry(registry.clone());

    for field in &decl.fields {
        let initial = match &field.default {
            Some(text) => Some(Initial::Value(parse_default(registry, &decl.name, field, text)?)),
            None => None,
        };
        let annotation = field.ty.as_ref().map(|ty| Annotation::Named(ty.clone()));
        builder = builder.declare(Declaration::new(&field.name, annotation, initial));
    }

    Ok(builder.build()?)
}

/// Custom types read their own text form; everything else is a literal
fn parse_default(registry: &TypeRegistry, schema: &str, field: &FieldDecl, text: &str) -> Result<Value, InitError> {
    let fail = |e: BoxError| InitError::new(InitTarget::Field, schema, format!("default of '{}'", field.name), e);
    match field.ty.as_deref().and_then(|name| registry.resolve(name)) {
        Some(ValueType::Custom(ty)) => {
            let inner = ty.construct(text).map_err(fail)?;
            Ok(Value::custom(ty, inner))
        }
        _ => literal::parse(text).map_err(|e| fail(e.into())),
    }
}
