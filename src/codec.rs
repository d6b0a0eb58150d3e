//! Per-field export/import
//!
//! Custom functions win when present. Otherwise values go through the
//! literal codec, except declared custom types which construct themselves
//! from text.

use crate::error::{ExportError, ExportErrorKind, ImportError, ImportErrorKind, InputError, InputErrorKind};
use crate::field::FieldDef;
use crate::literal;
use crate::types::ValueType;
use crate::value::Value;

/// Text to store for `value` under `def`
pub fn export_value(def: &FieldDef, value: &Value) -> Result<String, ExportError> {
    if let Some(export) = &def.field.export_fn {
        return export(value).map_err(|e| ExportError::new(&def.name, ExportErrorKind::Function, e));
    }
    match value {
        Value::Custom(custom) => custom
            .ty
            .represent(&custom.inner)
            .map_err(|e| ExportError::new(&def.name, ExportErrorKind::Representation, e)),
        other => literal::represent(other)
            .map_err(|e| ExportError::new(&def.name, ExportErrorKind::Representation, e)),
    }
}

/// Value to assign for stored `text` under `def`
pub fn import_value(def: &FieldDef, text: &str) -> Result<Value, ImportError> {
    if let Some(import) = &def.field.import_fn {
        return import(text).map_err(|e| ImportError::new(&def.name, ImportErrorKind::Function, e));
    }
    // Subtypes of a built-in read the base's literal; other custom types parse themselves
    if let ValueType::Custom(ty) = &def.ty {
        if ty.base().is_none() {
            let inner = ty
                .construct(text)
                .map_err(|e| ImportError::new(&def.name, ImportErrorKind::Malformed, e))?;
            return Ok(Value::custom(ty.clone(), inner));
        }
    }

    let parsed = literal::parse(text)
        .map_err(|e| ImportError::new(&def.name, ImportErrorKind::Malformed, e))?;
    def.ty.accept(&parsed).ok_or_else(|| {
        let mismatch = InputError::new(
            InputErrorKind::TypeMismatch,
            &def.name,
            "import",
            format!("a {} literal", def.ty),
            format!("{} {}", parsed.type_name(), text),
        );
        ImportError::new(&def.name, ImportErrorKind::TypeMismatch, mismatch)
    })
}
