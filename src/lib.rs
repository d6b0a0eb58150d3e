//! Configlayer
//!
//! Typed configuration schemas with a text codec per field. A schema is an
//! ordered list of named, typed, defaulted fields, validated once when it is
//! built. Instances export their values to an ordered name to text table and
//! merge such tables back in.
//!
//! ## Features
//!
//! - **Build-time validation**: reserved names, missing types or defaults and
//!   type mismatches fail the schema, never an instance
//! - **Literal codec**: values round-trip through a safe literal syntax; no
//!   code is ever evaluated
//! - **Custom codecs**: per-field export/import functions for values the
//!   literal syntax cannot express
//! - **Language tables**: text-only schemas for labels and translations
//! - **Chained errors**: every failure keeps its cause, see [`error::report`]
//!
//! ## Layers
//!
//! ```text
//! decl (TOML) ──> SchemaBuilder ──> Schema ──> Instance ──> Section ──> ini
//!                      │                          │
//!                  validate                     codec ──> literal
//! ```

pub mod checksum;
pub mod codec;
pub mod config;
pub mod decl;
pub mod error;
pub mod field;
pub mod ini;
pub mod instance;
pub mod literal;
pub mod schema;
pub mod section;
pub mod types;
pub mod validate;
pub mod value;

pub use checksum::Fingerprint;
pub use config::{LayerSettings, OutputFormat};
pub use decl::Catalog;
pub use error::{
    DeclError, Error, ExportError, ExportErrorKind, ImportError, ImportErrorKind, IniError, InitError,
    InitTarget, InputError, InputErrorKind, LiteralError, Result,
};
pub use field::{Field, FieldDef};
pub use ini::IniDocument;
pub use instance::{ImportMode, Instance};
pub use schema::{Annotation, Declaration, Initial, LazySchema, Schema, SchemaBuilder, SchemaKind};
pub use section::Section;
pub use types::{CustomType, PathType, Subtype, TypeRegistry, ValueType};
pub use value::Value;
