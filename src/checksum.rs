//! Schema fingerprints
//!
//! A fingerprint identifies the shape of a schema (kind, field names, field
//! types and their order). Defaults and codec overrides are not part of it,
//! so changing a default keeps files written by the old schema compatible.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::schema::Schema;

/// SHA256 over a schema's shape
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of_schema(schema: &Schema) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(schema.kind().to_string().as_bytes());
        for field in schema.fields() {
            hasher.update(b"\n");
            hasher.update(field.name().as_bytes());
            hasher.update(b":");
            hasher.update(field.value_type().name().as_bytes());
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, enough for comments and logs
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }

    /// Compare against a hex string, full or shortened
    pub fn matches(&self, hex: &str) -> bool {
        let hex = hex.trim();
        !hex.is_empty() && self.0.starts_with(&hex.to_ascii_lowercase())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Self(s)
    }
}
