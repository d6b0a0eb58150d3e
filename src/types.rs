//! Declared field types
//!
//! A field is declared with a [`ValueType`]: one of the nine built-in tags or
//! a [`CustomType`] supplying its own construction and representation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, LiteralError};
use crate::literal;
use crate::value::Value;

/// Names the built-in tags are spelled with in annotations and diagnostics
pub const BUILTIN_TYPE_NAMES: [&str; 9] =
    ["bool", "str", "int", "float", "bytes", "tuple", "list", "set", "dict"];

// =============================================================================
// Custom types
// =============================================================================

/// Construction/representation contract for types the literal codec cannot
/// express on its own
pub trait CustomType: fmt::Debug + Send + Sync {
    /// Type name, unique within a [`TypeRegistry`]
    fn name(&self) -> &str;

    /// Built-in type this one is a recognized subtype of
    fn base(&self) -> Option<ValueType> {
        None
    }

    /// Text form of a value of this type (`inner` is the wrapped value)
    fn represent(&self, inner: &Value) -> Result<String, BoxError>;

    /// Rebuild the wrapped value from its text form
    fn construct(&self, text: &str) -> Result<Value, BoxError>;

    /// Wrapped value for a default that is not of this type but can be
    /// safely turned into it
    fn coerce(&self, _value: &Value) -> Option<Value> {
        None
    }
}

/// Filesystem path stored as text, represented without quotes
#[derive(Debug, Default, Clone, Copy)]
pub struct PathType;

impl PathType {
    pub fn shared() -> Arc<dyn CustomType> {
        Arc::new(PathType)
    }

    /// A path value
    pub fn value(path: impl Into<String>) -> Value {
        Value::custom(Self::shared(), Value::Str(path.into()))
    }
}

impl CustomType for PathType {
    fn name(&self) -> &str {
        "Path"
    }

    fn represent(&self, inner: &Value) -> Result<String, BoxError> {
        inner
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| format!("Path wraps {}, not str", inner.type_name()).into())
    }

    fn construct(&self, text: &str) -> Result<Value, BoxError> {
        Ok(Value::Str(text.to_string()))
    }

    fn coerce(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Str(s) => Some(Value::Str(s.clone())),
            _ => None,
        }
    }
}

/// Named subtype of a built-in type, e.g. an `OwnInt` over `int`
///
/// Represented and constructed through the literal codec of its base.
#[derive(Debug, Clone)]
pub struct Subtype {
    name: String,
    base: ValueType,
}

impl Subtype {
    pub fn new(name: impl Into<String>, base: ValueType) -> Self {
        Self { name: name.into(), base }
    }

    pub fn shared(name: impl Into<String>, base: ValueType) -> Arc<dyn CustomType> {
        Arc::new(Self::new(name, base))
    }
}

impl CustomType for Subtype {
    fn name(&self) -> &str {
        &self.name
    }

    fn base(&self) -> Option<ValueType> {
        Some(self.base.clone())
    }

    fn represent(&self, inner: &Value) -> Result<String, BoxError> {
        Ok(literal::represent(inner)?)
    }

    fn construct(&self, text: &str) -> Result<Value, BoxError> {
        let parsed = literal::parse(text)?;
        self.base.accept(&parsed).ok_or_else(|| {
            LiteralError::new(
                format!("{} literal expected for {}, got {}", self.base, self.name, parsed.type_name()),
                0,
            )
            .into()
        })
    }

    fn coerce(&self, value: &Value) -> Option<Value> {
        self.base.accept(value)
    }
}

// =============================================================================
// Value types
// =============================================================================

/// Semantic type tag of a declared field
#[derive(Debug, Clone)]
pub enum ValueType {
    Bool,
    Str,
    Int,
    Float,
    Bytes,
    Tuple,
    List,
    Set,
    Dict,
    Custom(Arc<dyn CustomType>),
}

impl ValueType {
    /// Look up a built-in tag by its annotation name
    pub fn builtin(name: &str) -> Option<Self> {
        Some(match name {
            "bool" => ValueType::Bool,
            "str" => ValueType::Str,
            "int" => ValueType::Int,
            "float" => ValueType::Float,
            "bytes" => ValueType::Bytes,
            "tuple" => ValueType::Tuple,
            "list" => ValueType::List,
            "set" => ValueType::Set,
            "dict" => ValueType::Dict,
            _ => return None,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Str => "str",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bytes => "bytes",
            ValueType::Tuple => "tuple",
            ValueType::List => "list",
            ValueType::Set => "set",
            ValueType::Dict => "dict",
            ValueType::Custom(ty) => ty.name(),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ValueType::Custom(_))
    }

    /// Whether `value`'s runtime type is this type or a recognized subtype
    pub fn is_instance(&self, value: &Value) -> bool {
        match value {
            Value::Custom(c) => {
                if let ValueType::Custom(ty) = self {
                    if ty.name() == c.type_name() {
                        return true;
                    }
                }
                let mut base = c.ty.base();
                while let Some(ty) = base {
                    if &ty == self {
                        return true;
                    }
                    base = match ty {
                        ValueType::Custom(parent) => parent.base(),
                        _ => None,
                    };
                }
                false
            }
            other => other.value_type().as_ref() == Some(self),
        }
    }

    /// The value to store for `value` under this type, if it is an instance
    /// of the type or safely constructible as one
    pub fn accept(&self, value: &Value) -> Option<Value> {
        if self.is_instance(value) {
            return Some(value.clone());
        }
        match (self, value) {
            (ValueType::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
            (ValueType::Custom(ty), _) => {
                ty.coerce(value).map(|inner| Value::custom(ty.clone(), inner))
            }
            _ => None,
        }
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueType::Custom(a), ValueType::Custom(b)) => a.name() == b.name(),
            (ValueType::Custom(_), _) | (_, ValueType::Custom(_)) => false,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Resolves textual annotations to types
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, ValueType>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Registry with the built-in tags and [`PathType`]
    pub fn new() -> Self {
        let mut types: HashMap<String, ValueType> = BUILTIN_TYPE_NAMES
            .iter()
            .filter_map(|name| ValueType::builtin(name).map(|ty| (name.to_string(), ty)))
            .collect();
        types.insert("Path".to_string(), ValueType::Custom(PathType::shared()));
        Self { types }
    }

    /// Add or replace a custom type under its own name
    pub fn register(&mut self, ty: Arc<dyn CustomType>) -> &mut Self {
        self.types.insert(ty.name().to_string(), ValueType::Custom(ty));
        self
    }

    pub fn resolve(&self, name: &str) -> Option<ValueType> {
        self.types.get(name.trim()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}
