//! Schemas and the schema builder
//!
//! A schema is declared once, as an ordered list of `(name, type, default,
//! codec overrides)` entries, and built into an immutable [`Schema`] that
//! every instance shares.
//!
//! ```
//! use configlayer::{SchemaBuilder, ValueType};
//!
//! let schema = SchemaBuilder::config("Server")
//!     .field("host", ValueType::Str, "localhost")
//!     .field("port", ValueType::Int, 8080)
//!     .build()
//!     .unwrap();
//! assert_eq!(schema.names().collect::<Vec<_>>(), ["host", "port"]);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::checksum::Fingerprint;
use crate::error::{InitError, InitTarget, InputError, InputErrorKind};
use crate::field::{Field, FieldDef};
use crate::types::{CustomType, TypeRegistry, ValueType};
use crate::validate;
use crate::value::Value;

/// General configuration or restricted language table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// Fields of any type
    #[default]
    Config,
    /// Text fields only, annotation optional
    Language,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Config => f.write_str("config"),
            SchemaKind::Language => f.write_str("language"),
        }
    }
}

// =============================================================================
// Declarations
// =============================================================================

/// Declared type of a field
#[derive(Debug, Clone)]
pub enum Annotation {
    Type(ValueType),
    /// Type spelled as text, resolved through the builder's [`TypeRegistry`]
    Named(String),
}

/// Default of a field, bare or wrapped in a descriptor
#[derive(Debug, Clone)]
pub enum Initial {
    Value(Value),
    Field(Field),
}

/// One entry of a schema body
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub annotation: Option<Annotation>,
    pub initial: Option<Initial>,
    /// Methods and nested definitions, skipped by the builder
    pub member: bool,
}

impl Declaration {
    pub fn new(name: impl Into<String>, annotation: Option<Annotation>, initial: Option<Initial>) -> Self {
        Self { name: name.into(), annotation, initial, member: false }
    }

    /// Non-field member of the declaring type
    pub fn member(name: impl Into<String>) -> Self {
        Self { name: name.into(), annotation: None, initial: None, member: true }
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Validated, ordered field table
#[derive(Debug)]
pub struct Schema {
    name: String,
    kind: SchemaKind,
    base: Option<String>,
    fields: Vec<FieldDef>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// Name of the schema this one was derived from
    pub fn base_name(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.position(name).map(|i| &self.fields[i])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Digest of kind, field names and field types
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of_schema(self)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects declarations and turns them into a [`Schema`]
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    kind: SchemaKind,
    base: Option<Arc<Schema>>,
    registry: TypeRegistry,
    declarations: Vec<Declaration>,
}

impl SchemaBuilder {
    fn with_kind(name: impl Into<String>, kind: SchemaKind) -> Self {
        Self {
            name: name.into(),
            kind,
            base: None,
            registry: TypeRegistry::new(),
            declarations: Vec::new(),
        }
    }

    /// General configuration schema
    pub fn config(name: impl Into<String>) -> Self {
        Self::with_kind(name, SchemaKind::Config)
    }

    /// Language table: text fields only
    pub fn language(name: impl Into<String>) -> Self {
        Self::with_kind(name, SchemaKind::Language)
    }

    /// Schema inheriting every field of `base`, in `base`'s order
    pub fn derive(name: impl Into<String>, base: &Arc<Schema>) -> Self {
        let mut builder = Self::with_kind(name, base.kind);
        builder.base = Some(Arc::clone(base));
        builder
    }

    /// Resolve textual annotations through `registry`
    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn register_type(mut self, ty: Arc<dyn CustomType>) -> Self {
        self.registry.register(ty);
        self
    }

    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Typed field with a bare default
    pub fn field(self, name: impl Into<String>, ty: ValueType, default: impl Into<Value>) -> Self {
        self.declare(Declaration::new(
            name,
            Some(Annotation::Type(ty)),
            Some(Initial::Value(default.into())),
        ))
    }

    /// Typed field with a descriptor carrying codec overrides
    pub fn field_with(self, name: impl Into<String>, ty: ValueType, field: Field) -> Self {
        self.declare(Declaration::new(name, Some(Annotation::Type(ty)), Some(Initial::Field(field))))
    }

    /// Field whose type is spelled as text
    pub fn named(self, name: impl Into<String>, ty: impl Into<String>, default: impl Into<Value>) -> Self {
        self.declare(Declaration::new(
            name,
            Some(Annotation::Named(ty.into())),
            Some(Initial::Value(default.into())),
        ))
    }

    /// Unannotated text entry, the usual shape of a language table
    pub fn label(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.declare(Declaration::new(name, None, Some(Initial::Value(Value::Str(text.into())))))
    }

    /// Non-field member, skipped when building
    pub fn member(self, name: impl Into<String>) -> Self {
        self.declare(Declaration::member(name))
    }

    /// Validate every declaration and finalize the schema
    ///
    /// Fails on the first invalid declaration; no partial schema is produced.
    pub fn build(self) -> Result<Arc<Schema>, InitError> {
        let SchemaBuilder { name, kind, base, registry, declarations } = self;

        let mut fields: Vec<FieldDef> = base.as_ref().map(|b| b.fields.clone()).unwrap_or_default();
        let mut declared: HashSet<String> = HashSet::new();

        for declaration in declarations {
            if declaration.member {
                trace!(schema = %name, member = %declaration.name, "skipping non-field member");
                continue;
            }
            let fail = |e: InputError| {
                InitError::new(InitTarget::Schema, &name, format!("field '{}'", declaration.name), e)
            };

            let (default, descriptor) = match declaration.initial {
                Some(Initial::Value(v)) => (Some(v), None),
                Some(Initial::Field(f)) => (Some(f.default.clone()), Some(f)),
                None => (None, None),
            };
            let (ty, default) = validate::check_declaration(
                kind,
                &declaration.name,
                declaration.annotation.as_ref(),
                default.as_ref(),
                &registry,
            )
            .map_err(fail)?;

            if !declared.insert(declaration.name.clone()) {
                return Err(fail(InputError::new(
                    InputErrorKind::DuplicateName,
                    &declaration.name,
                    "declare",
                    "a name declared once",
                    "second declaration",
                )));
            }

            match fields.iter().position(|f| f.name == declaration.name) {
                Some(pos) => {
                    let inherited = &mut fields[pos];
                    if inherited.ty != ty {
                        return Err(fail(InputError::new(
                            InputErrorKind::TypeMismatch,
                            &declaration.name,
                            "declare",
                            format!("inherited type {}", inherited.ty),
                            ty.name(),
                        )));
                    }
                    match descriptor {
                        Some(mut field) => {
                            field.default = default;
                            inherited.field = field;
                        }
                        None => inherited.field.default = default,
                    }
                    trace!(schema = %name, field = %declaration.name, "inherited default overridden");
                }
                None => {
                    let mut field = descriptor.unwrap_or_else(|| Field::new(Value::None));
                    field.default = default;
                    trace!(schema = %name, field = %declaration.name, ty = %ty, "field accepted");
                    fields.push(FieldDef { name: declaration.name, ty, field });
                }
            }
        }

        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        debug!(schema = %name, kind = %kind, fields = fields.len(), "schema finalized");

        Ok(Arc::new(Schema {
            name,
            kind,
            base: base.map(|b| b.name.clone()),
            fields,
            index,
        }))
    }
}

// =============================================================================
// Per-type cache
// =============================================================================

/// Schema built on first use and shared afterwards
///
/// ```
/// use configlayer::{LazySchema, SchemaBuilder, ValueType};
///
/// fn declare() -> SchemaBuilder {
///     SchemaBuilder::config("Limits").field("retries", ValueType::Int, 3)
/// }
///
/// static LIMITS: LazySchema = LazySchema::new(declare);
/// assert_eq!(LIMITS.get().unwrap().len(), 1);
/// ```
pub struct LazySchema {
    declare: fn() -> SchemaBuilder,
    cell: OnceLock<Arc<Schema>>,
}

impl LazySchema {
    pub const fn new(declare: fn() -> SchemaBuilder) -> Self {
        Self { declare, cell: OnceLock::new() }
    }

    /// The cached schema, building it if this is the first call
    ///
    /// A failed build is not cached and is reported again on the next call.
    pub fn get(&self) -> Result<Arc<Schema>, InitError> {
        if let Some(schema) = self.cell.get() {
            return Ok(Arc::clone(schema));
        }
        let built = (self.declare)().build()?;
        Ok(Arc::clone(self.cell.get_or_init(|| built)))
    }
}

impl fmt::Debug for LazySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySchema")
            .field("built", &self.cell.get().map(|s| s.name()))
            .finish()
    }
}
