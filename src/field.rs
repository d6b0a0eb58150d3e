//! Field descriptors
//!
//! A [`Field`] wraps a default value together with optional custom export
//! and import functions. Bare defaults handed to the schema builder are
//! wrapped into a `Field` with neither function, which selects the literal
//! codec.

use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::types::ValueType;
use crate::value::Value;

/// Custom export function: current value to stored text
pub type ExportFn = Arc<dyn Fn(&Value) -> Result<String, BoxError> + Send + Sync>;

/// Custom import function: stored text to value
pub type ImportFn = Arc<dyn Fn(&str) -> Result<Value, BoxError> + Send + Sync>;

/// Default value plus optional codec overrides
#[derive(Clone)]
pub struct Field {
    pub(crate) default: Value,
    pub(crate) export_fn: Option<ExportFn>,
    pub(crate) import_fn: Option<ImportFn>,
}

impl Field {
    pub fn new(default: impl Into<Value>) -> Self {
        Self { default: default.into(), export_fn: None, import_fn: None }
    }

    /// Use `f` instead of the canonical representation on export
    pub fn export_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        self.export_fn = Some(Arc::new(f));
        self
    }

    /// Use `f` instead of the literal parser on import
    ///
    /// The returned value is stored as is, it is not checked against the
    /// declared type.
    pub fn import_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.import_fn = Some(Arc::new(f));
        self
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn has_custom_export(&self) -> bool {
        self.export_fn.is_some()
    }

    pub fn has_custom_import(&self) -> bool {
        self.import_fn.is_some()
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("default", &self.default)
            .field("export_fn", &self.export_fn.as_ref().map(|_| "custom"))
            .field("import_fn", &self.import_fn.as_ref().map(|_| "custom"))
            .finish()
    }
}

/// A validated field inside a finalized schema
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub(crate) name: String,
    pub(crate) ty: ValueType,
    pub(crate) field: Field,
}

impl FieldDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &ValueType {
        &self.ty
    }

    pub fn default_value(&self) -> &Value {
        &self.field.default
    }

    pub fn descriptor(&self) -> &Field {
        &self.field
    }
}
