//! Shared helpers for integration tests
//!
//! [`assert_chain`] checks an error's whole cause chain at once, level by
//! level, so a test states exactly which failure wrapped which.

#![allow(dead_code)]

use std::error::Error as StdError;

use configlayer::error::{chain, report};
use configlayer::{DeclError, Error, ExportError, ImportError, IniError, InitError, InputError, LiteralError};

/// Short label for one level of an error chain
///
/// Library errors are labelled by type and kind, e.g. `InputError(MissingType)`;
/// anything else by its message.
pub fn describe(err: &(dyn StdError + 'static)) -> String {
    if let Some(e) = err.downcast_ref::<Error>() {
        return match e {
            Error::Input(e) => describe(e),
            Error::Init(e) => describe(e),
            Error::Export(e) => describe(e),
            Error::Import(e) => describe(e),
            Error::Literal(e) => describe(e),
            Error::Ini(e) => describe(e),
            Error::Decl(e) => describe(e),
        };
    }
    if let Some(e) = err.downcast_ref::<InitError>() {
        return format!("InitError({:?})", e.target);
    }
    if let Some(e) = err.downcast_ref::<InputError>() {
        return format!("InputError({:?})", e.kind);
    }
    if let Some(e) = err.downcast_ref::<ExportError>() {
        return format!("ExportError({:?})", e.kind);
    }
    if let Some(e) = err.downcast_ref::<ImportError>() {
        return format!("ImportError({:?})", e.kind);
    }
    if err.is::<LiteralError>() {
        return "LiteralError".to_string();
    }
    if err.is::<IniError>() {
        return "IniError".to_string();
    }
    if err.is::<DeclError>() {
        return "DeclError".to_string();
    }
    err.to_string()
}

/// Labels of every level, outermost first
pub fn chain_of(err: &(dyn StdError + 'static)) -> Vec<String> {
    chain(err).map(describe).collect()
}

/// Assert the cause chain of `err` is exactly `expected`
#[track_caller]
pub fn assert_chain(err: &(dyn StdError + 'static), expected: &[&str]) {
    assert_eq!(chain_of(err), expected, "\n{}", report(err));
}
