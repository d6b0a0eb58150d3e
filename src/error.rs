//! Error types for schema declaration and field codecs
//!
//! Every error that wraps another keeps it as its `source()`, so a failure at
//! the top of the stack (say, a schema that refuses to build) can be walked
//! down to the field-level reason with [`chain`].

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed error produced by user supplied codec functions and custom types
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type for configlayer operations
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Input errors
// =============================================================================

/// Which precondition an [`InputError`] reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputErrorKind {
    /// Dunder form, a built-in type name, or a name the instance API uses
    ReservedName,
    /// Declaration without a type annotation
    MissingType,
    /// Declaration without a default value
    MissingDefault,
    /// Value does not satisfy the declared type
    TypeMismatch,
    /// Name is not part of the schema
    UnknownField,
    /// Name is not a valid identifier
    InvalidName,
    /// Same name declared twice in one schema body
    DuplicateName,
}

impl fmt::Display for InputErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InputErrorKind::ReservedName => "reserved name",
            InputErrorKind::MissingType => "missing type",
            InputErrorKind::MissingDefault => "missing default",
            InputErrorKind::TypeMismatch => "type mismatch",
            InputErrorKind::UnknownField => "unknown field",
            InputErrorKind::InvalidName => "invalid name",
            InputErrorKind::DuplicateName => "duplicate name",
        };
        f.write_str(text)
    }
}

/// A caller or declarer supplied name/value failed a precondition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation}: {kind} for '{name}' (must be {expected}, received {received})")]
pub struct InputError {
    pub kind: InputErrorKind,
    /// Parameter or field name that was rejected
    pub name: String,
    /// Operation that detected the problem
    pub operation: String,
    /// Constraint the input had to satisfy
    pub expected: String,
    /// What was actually supplied
    pub received: String,
}

impl InputError {
    pub fn new(
        kind: InputErrorKind,
        name: impl Into<String>,
        operation: impl Into<String>,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            operation: operation.into(),
            expected: expected.into(),
            received: received.into(),
        }
    }
}

// =============================================================================
// Construction errors
// =============================================================================

/// Kind of object whose construction failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitTarget {
    Schema,
    Field,
    Instance,
}

impl fmt::Display for InitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitTarget::Schema => f.write_str("schema"),
            InitTarget::Field => f.write_str("field"),
            InitTarget::Instance => f.write_str("instance"),
        }
    }
}

/// Construction of a schema, field or instance failed
#[derive(Error, Debug)]
#[error("Cannot init {target} '{name}' ({detail})")]
pub struct InitError {
    pub target: InitTarget,
    /// Declaring schema name
    pub name: String,
    /// Where inside the declaration the failure happened
    pub detail: String,
    #[source]
    pub source: BoxError,
}

impl InitError {
    pub fn new(
        target: InitTarget,
        name: impl Into<String>,
        detail: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            target,
            name: name.into(),
            detail: detail.into(),
            source: source.into(),
        }
    }

    /// The first [`InputError`] found while walking the cause chain
    pub fn input_error(&self) -> Option<&InputError> {
        chain(self).find_map(|e| e.downcast_ref::<InputError>())
    }
}

// =============================================================================
// Codec errors
// =============================================================================

/// How an export failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorKind {
    /// The canonical representation of the value could not be produced
    Representation,
    /// A custom export function failed
    Function,
}

/// How an import failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportErrorKind {
    /// Stored text is not a literal (or not constructible for a custom type)
    Malformed,
    /// Stored text is a literal of the wrong type
    TypeMismatch,
    /// A custom import function failed
    Function,
}

#[derive(Error, Debug)]
#[error("Cannot export field '{field}' ({kind:?})")]
pub struct ExportError {
    pub field: String,
    pub kind: ExportErrorKind,
    #[source]
    pub source: BoxError,
}

impl ExportError {
    pub fn new(field: impl Into<String>, kind: ExportErrorKind, source: impl Into<BoxError>) -> Self {
        Self { field: field.into(), kind, source: source.into() }
    }
}

#[derive(Error, Debug)]
#[error("Cannot import field '{field}' ({kind:?})")]
pub struct ImportError {
    pub field: String,
    pub kind: ImportErrorKind,
    #[source]
    pub source: BoxError,
}

impl ImportError {
    pub fn new(field: impl Into<String>, kind: ImportErrorKind, source: impl Into<BoxError>) -> Self {
        Self { field: field.into(), kind, source: source.into() }
    }
}

// =============================================================================
// Text level errors
// =============================================================================

/// A literal could not be parsed or represented
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub struct LiteralError {
    pub message: String,
    /// Byte offset into the parsed text
    pub offset: usize,
}

impl LiteralError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self { message: message.into(), offset }
    }
}

/// INI text framing problems
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IniError {
    #[error("line {line}: key outside of any section")]
    KeyOutsideSection { line: usize },

    #[error("line {line}: malformed section header")]
    BadSection { line: usize },

    #[error("line {line}: expected 'key = value'")]
    BadEntry { line: usize },

    #[error("line {line}: duplicate section [{section}]")]
    DuplicateSection { line: usize, section: String },

    #[error("line {line}: duplicate key '{key}' in [{section}]")]
    DuplicateKey { line: usize, section: String, key: String },
}

/// Problems in a declaration file that are not field level
#[derive(Error, Debug)]
pub enum DeclError {
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Schema '{schema}' extends unknown schema '{base}'")]
    UnknownBase { schema: String, base: String },

    #[error("Type '{name}' has unknown base type '{base}'")]
    UnknownBaseType { name: String, base: String },

    #[error("Schema '{name}' declared twice")]
    DuplicateSchema { name: String },

    #[error("Schema '{schema}' is declared as {declared} but extends a {inherited} schema")]
    KindMismatch { schema: String, declared: String, inherited: String },
}

// =============================================================================
// Crate error
// =============================================================================

/// Any configlayer failure
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Init(#[from] InitError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Literal(#[from] LiteralError),

    #[error(transparent)]
    Ini(#[from] IniError),

    #[error(transparent)]
    Decl(#[from] DeclError),
}

// =============================================================================
// Chain walking
// =============================================================================

/// Iterator over an error and all of its causes, outermost first
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

/// Walk `err` and its `source()` links down to the root failure
pub fn chain<'a>(err: &'a (dyn StdError + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// Render the cause chain, one level per line, each level indented once more
pub fn report(err: &(dyn StdError + 'static)) -> String {
    let mut out = String::new();
    for (depth, cause) in chain(err).enumerate() {
        if depth > 0 {
            out.push('\n');
        }
        for _ in 0..depth {
            out.push_str("  ");
        }
        if depth > 0 {
            out.push_str("caused by: ");
        }
        out.push_str(&cause.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> InitError {
        let input = InputError::new(
            InputErrorKind::MissingType,
            "test",
            "declare",
            "a type annotation",
            "nothing",
        );
        InitError::new(InitTarget::Schema, "NoType", "field 'test'", input)
    }

    #[test]
    fn test_chain_walks_to_root() {
        let err = nested();
        let levels: Vec<String> = chain(&err).map(|e| e.to_string()).collect();
        assert_eq!(levels.len(), 2);
        assert!(levels[0].starts_with("Cannot init schema 'NoType'"));
        assert!(levels[1].contains("missing type"));
    }

    #[test]
    fn test_input_error_lookup() {
        let err = nested();
        assert_eq!(err.input_error().map(|e| e.kind), Some(InputErrorKind::MissingType));
    }

    #[test]
    fn test_report_indents_causes() {
        let err = nested();
        let text = report(&err);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("  caused by: declare: missing type"));
    }
}
