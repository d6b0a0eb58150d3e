//! Live configuration instances
//!
//! An [`Instance`] holds one value per field of its schema. It exports to a
//! [`Section`] and merges sections back in with [`Instance::import_from`].

use std::sync::Arc;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec;
use crate::error::{Error, ExportError, InitError, InitTarget, InputError, InputErrorKind};
use crate::schema::Schema;
use crate::section::Section;
use crate::value::Value;

/// What to do with keys the schema does not know
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Skip them; persisted files may carry stale keys
    #[default]
    Lenient,
    /// Reject the whole import before touching any field
    Strict,
}

/// One concrete value per schema field
#[derive(Debug, Clone)]
pub struct Instance {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl Instance {
    /// Instance holding every field's default
    pub fn new(schema: Arc<Schema>) -> Self {
        let values = schema.fields().iter().map(|f| f.default_value().clone()).collect();
        Self { schema, values }
    }

    /// Instance with some defaults replaced
    pub fn with_values<I, K, V>(schema: Arc<Schema>, overrides: I) -> Result<Self, InitError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut instance = Self::new(schema);
        for (name, value) in overrides {
            let name = name.as_ref();
            instance.set(name, value).map_err(|e| {
                InitError::new(
                    InitTarget::Instance,
                    instance.schema.name(),
                    format!("override '{}'", name),
                    e,
                )
            })?;
        }
        Ok(instance)
    }

    /// Export of a fresh instance, i.e. the schema's defaults as text
    pub fn defaults_section(schema: &Arc<Schema>) -> Result<Section, ExportError> {
        Self::new(Arc::clone(schema)).export()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).map(|i| &self.values[i])
    }

    /// Text of a field, the natural accessor for language tables
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Field names and current values in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.schema.names().zip(self.values.iter())
    }

    /// Assign a field, checking the value against the declared type
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), InputError> {
        let pos = self.position_of(name, "set")?;
        let def = &self.schema.fields()[pos];
        let value = value.into();
        let accepted = def.value_type().accept(&value).ok_or_else(|| {
            InputError::new(
                InputErrorKind::TypeMismatch,
                name,
                "set",
                format!("an instance of {}", def.value_type()),
                format!("{} {}", value.type_name(), value),
            )
        })?;
        self.values[pos] = accepted;
        Ok(())
    }

    /// Put every field back to its default
    pub fn reset(&mut self) {
        for (slot, def) in self.values.iter_mut().zip(self.schema.fields()) {
            *slot = def.default_value().clone();
        }
    }

    pub fn reset_field(&mut self, name: &str) -> Result<(), InputError> {
        let pos = self.position_of(name, "reset_field")?;
        self.values[pos] = self.schema.fields()[pos].default_value().clone();
        Ok(())
    }

    /// Fields whose value differs from the default
    pub fn changed(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .zip(&self.values)
            .filter(|(def, value)| def.default_value() != *value)
            .map(|(def, _)| def.name())
            .collect()
    }

    /// Text of every field in schema order
    ///
    /// All or nothing: the first failing field aborts the export.
    pub fn export(&self) -> Result<Section, ExportError> {
        let mut section = Section::new();
        for (def, value) in self.schema.fields().iter().zip(&self.values) {
            section.insert(def.name(), codec::export_value(def, value)?);
        }
        Ok(section)
    }

    /// Merge stored text into this instance
    ///
    /// Fields missing from `section` keep their value. Fields are processed
    /// in schema order and a failure leaves earlier fields already updated.
    pub fn import_from(&mut self, section: &Section, mode: ImportMode) -> Result<(), Error> {
        for key in section.keys().filter(|k| !self.schema.contains(k)) {
            match mode {
                ImportMode::Strict => return Err(self.unknown_field(key, "import_from").into()),
                ImportMode::Lenient => {
                    debug!(schema = %self.schema.name(), key = %key, "ignoring unknown key");
                }
            }
        }

        let schema = Arc::clone(&self.schema);
        for (pos, def) in schema.fields().iter().enumerate() {
            if let Some(text) = section.get(def.name()) {
                self.values[pos] = codec::import_value(def, text)?;
            }
        }
        Ok(())
    }

    fn position_of(&self, name: &str, operation: &str) -> Result<usize, InputError> {
        self.schema
            .position(name)
            .ok_or_else(|| self.unknown_field(name, operation))
    }

    fn unknown_field(&self, name: &str, operation: &str) -> InputError {
        let expected = match closest_name(&self.schema, name) {
            Some(candidate) => format!("a field of {} (did you mean '{}'?)", self.schema.name(), candidate),
            None => format!("a field of {}", self.schema.name()),
        };
        InputError::new(InputErrorKind::UnknownField, name, operation, expected, name)
    }
}

/// Best fuzzy match for `name` among the schema's fields
fn closest_name<'a>(schema: &'a Schema, name: &str) -> Option<&'a str> {
    let matcher = SkimMatcherV2::default();
    schema
        .names()
        .filter_map(|candidate| {
            let forward = matcher.fuzzy_match(candidate, name);
            let backward = matcher.fuzzy_match(name, candidate);
            forward.max(backward).map(|score| (score, candidate))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, candidate)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportErrorKind;
    use crate::schema::SchemaBuilder;
    use crate::types::ValueType;

    fn counter() -> Arc<Schema> {
        SchemaBuilder::config("Config")
            .field("count", ValueType::Int, 5)
            .field("label", ValueType::Str, "x")
            .build()
            .unwrap()
    }

    #[test]
    fn test_count_example() {
        let mut cfg = Instance::new(counter());
        let exported = cfg.export().unwrap();
        assert_eq!(exported.get("count"), Some("5"));

        cfg.import_from(&[("count", "7")].into_iter().collect(), ImportMode::Lenient).unwrap();
        assert_eq!(cfg.get("count"), Some(&Value::Int(7)));

        let err = cfg
            .import_from(&[("count", "bad")].into_iter().collect(), ImportMode::Lenient)
            .unwrap_err();
        assert!(matches!(err, Error::Import(ref e) if e.kind == ImportErrorKind::Malformed));
        assert_eq!(cfg.get("count"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_partial_merge() {
        let mut cfg = Instance::new(counter());
        cfg.set("label", "kept").unwrap();
        cfg.import_from(&[("count", "1")].into_iter().collect(), ImportMode::Lenient).unwrap();
        assert_eq!(cfg.text("label"), Some("kept"));
    }

    #[test]
    fn test_strict_rejects_before_mutation() {
        let mut cfg = Instance::new(counter());
        let section: Section = [("count", "9"), ("count_old", "1")].into_iter().collect();
        let err = cfg.import_from(&section, ImportMode::Strict).unwrap_err();
        match err {
            Error::Input(e) => {
                assert_eq!(e.kind, InputErrorKind::UnknownField);
                assert!(e.expected.contains("did you mean 'count'"), "{}", e.expected);
            }
            other => panic!("expected unknown field, got {:?}", other),
        }
        assert_eq!(cfg.get("count"), Some(&Value::Int(5)));

        cfg.import_from(&section, ImportMode::Lenient).unwrap();
        assert_eq!(cfg.get("count"), Some(&Value::Int(9)));
    }

    #[test]
    fn test_set_checks_type() {
        let mut cfg = Instance::new(counter());
        let err = cfg.set("count", "seven").unwrap_err();
        assert_eq!(err.kind, InputErrorKind::TypeMismatch);
        let err = cfg.set("missing", 1).unwrap_err();
        assert_eq!(err.kind, InputErrorKind::UnknownField);
    }

    #[test]
    fn test_changed_and_reset() {
        let mut cfg = Instance::new(counter());
        assert!(cfg.changed().is_empty());
        cfg.set("count", 6).unwrap();
        assert_eq!(cfg.changed(), ["count"]);
        cfg.reset_field("count").unwrap();
        assert!(cfg.changed().is_empty());
        cfg.set("label", "y").unwrap();
        cfg.reset();
        assert_eq!(cfg.text("label"), Some("x"));
    }

    #[test]
    fn test_with_values() {
        let cfg = Instance::with_values(counter(), [("count", 10)]).unwrap();
        assert_eq!(cfg.get("count"), Some(&Value::Int(10)));

        let err = Instance::with_values(counter(), [("count", "ten")]).unwrap_err();
        assert_eq!(err.target, InitTarget::Instance);
        assert_eq!(err.input_error().map(|e| e.kind), Some(InputErrorKind::TypeMismatch));
    }
}
