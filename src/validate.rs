//! Name/type validation for field declarations
//!
//! Applied once per declared field while a schema is being built. Every
//! rejection is an [`InputError`]; the builder wraps it into an `InitError`.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{InputError, InputErrorKind};
use crate::schema::{Annotation, SchemaKind};
use crate::types::{TypeRegistry, ValueType, BUILTIN_TYPE_NAMES};
use crate::value::Value;

/// Names taken by the instance API and by literal keywords
pub const RESERVED_NAMES: [&str; 14] = [
    "cfg",
    "schema",
    "export",
    "import_from",
    "get",
    "set",
    "text",
    "reset",
    "reset_field",
    "changed",
    "defaults_section",
    "None",
    "True",
    "False",
];

const OPERATION: &str = "declare";

fn identifier() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\p{XID_Start}_]\p{XID_Continue}*$").unwrap())
}

/// `__name__` form
pub fn is_dunder(name: &str) -> bool {
    name.len() >= 4 && name.starts_with("__") && name.ends_with("__")
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name) || BUILTIN_TYPE_NAMES.contains(&name)
}

/// Reject names that can never be fields
pub fn check_name(name: &str) -> Result<(), InputError> {
    if !identifier().is_match(name) {
        return Err(InputError::new(
            InputErrorKind::InvalidName,
            name,
            OPERATION,
            "an identifier",
            format!("{:?}", name),
        ));
    }
    if is_dunder(name) {
        return Err(InputError::new(
            InputErrorKind::ReservedName,
            name,
            OPERATION,
            "not a dunder name",
            name,
        ));
    }
    if is_reserved(name) {
        return Err(InputError::new(
            InputErrorKind::ReservedName,
            name,
            OPERATION,
            format!("not one of {}", reserved_list()),
            name,
        ));
    }
    Ok(())
}

fn reserved_list() -> String {
    RESERVED_NAMES
        .iter()
        .chain(BUILTIN_TYPE_NAMES.iter())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve an annotation to a type
///
/// Language tables infer text when nothing is annotated.
pub fn resolve_type(
    kind: SchemaKind,
    name: &str,
    annotation: Option<&Annotation>,
    registry: &TypeRegistry,
) -> Result<ValueType, InputError> {
    let ty = match annotation {
        Some(Annotation::Type(ty)) => ty.clone(),
        Some(Annotation::Named(text)) => registry.resolve(text).ok_or_else(|| {
            InputError::new(
                InputErrorKind::MissingType,
                name,
                OPERATION,
                "a known type name",
                text.as_str(),
            )
        })?,
        None if kind == SchemaKind::Language => ValueType::Str,
        None => {
            return Err(InputError::new(
                InputErrorKind::MissingType,
                name,
                OPERATION,
                "a type annotation",
                "no annotation",
            ))
        }
    };
    if kind == SchemaKind::Language && ty != ValueType::Str {
        return Err(InputError::new(
            InputErrorKind::TypeMismatch,
            name,
            OPERATION,
            "str (language tables hold text only)",
            ty.name(),
        ));
    }
    Ok(ty)
}

/// Default to store for a field of type `ty`
pub fn check_default(name: &str, ty: &ValueType, default: Option<&Value>) -> Result<Value, InputError> {
    let default = default.ok_or_else(|| {
        InputError::new(
            InputErrorKind::MissingDefault,
            name,
            OPERATION,
            "a default value",
            "no default",
        )
    })?;
    ty.accept(default).ok_or_else(|| {
        InputError::new(
            InputErrorKind::TypeMismatch,
            name,
            OPERATION,
            format!("an instance of {}", ty),
            format!("{} {}", default.type_name(), default),
        )
    })
}

/// Full check of one declaration, returning the resolved type and default
pub fn check_declaration(
    kind: SchemaKind,
    name: &str,
    annotation: Option<&Annotation>,
    default: Option<&Value>,
    registry: &TypeRegistry,
) -> Result<(ValueType, Value), InputError> {
    check_name(name)?;
    let ty = resolve_type(kind, name, annotation, registry)?;
    let default = check_default(name, &ty, default)?;
    Ok((ty, default))
}
