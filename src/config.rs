//! Settings for the configlayer CLI
//!
//! Supports loading settings from:
//! - Default values
//! - Settings file (configlayer.toml)
//! - Environment variables (CONFIGLAYER__*)
//!
//! ## Example settings file (configlayer.toml):
//! ```toml
//! [import]
//! strict = true
//!
//! [output]
//! format = "json"
//! fingerprint = false
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::instance::ImportMode;

/// Main settings for the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerSettings {
    /// Import settings
    #[serde(default)]
    pub import: ImportSettings,

    /// Output settings
    #[serde(default)]
    pub output: OutputSettings,
}

/// Import settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Reject keys the schema does not know
    #[serde(default)]
    pub strict: bool,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// How exported sections are rendered
    #[serde(default)]
    pub format: OutputFormat,

    /// Write a fingerprint comment above each INI section
    #[serde(default = "default_true")]
    pub fingerprint: bool,
}

/// Rendering of exported sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Ini,
    Json,
}

fn default_true() -> bool {
    true
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Ini,
            fingerprint: true,
        }
    }
}

impl ImportSettings {
    pub fn mode(&self) -> ImportMode {
        if self.strict {
            ImportMode::Strict
        } else {
            ImportMode::Lenient
        }
    }
}

impl LayerSettings {
    /// Load settings from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load settings, with `settings_path` layered over the default locations
    pub fn load_from(settings_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let locations = ["configlayer.toml", ".configlayer.toml", "config/configlayer.toml"];
        for location in locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(dirs) = directories::ProjectDirs::from("dev", "configlayer", "configlayer") {
            let xdg = dirs.config_dir().join("configlayer.toml");
            if xdg.exists() {
                builder = builder.add_source(File::from(xdg).required(false));
            }
        }

        if let Some(path) = settings_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // CONFIGLAYER__IMPORT__STRICT=true
        builder = builder.add_source(
            Environment::with_prefix("CONFIGLAYER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = LayerSettings::default();
        assert!(!settings.import.strict);
        assert_eq!(settings.import.mode(), ImportMode::Lenient);
        assert_eq!(settings.output.format, OutputFormat::Ini);
        assert!(settings.output.fingerprint);
    }

    #[test]
    fn test_serialize_settings() {
        let settings = LayerSettings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        assert!(toml_str.contains("[import]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("format = \"ini\""));
    }

    #[test]
    fn test_save_and_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut settings = LayerSettings::default();
        settings.import.strict = true;
        settings.output.format = OutputFormat::Json;
        settings.save(&path).unwrap();

        let loaded = LayerSettings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.import.mode(), ImportMode::Strict);
        assert_eq!(loaded.output.format, OutputFormat::Json);
        assert!(loaded.output.fingerprint);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[output]\nfingerprint = false\n").unwrap();

        let loaded = LayerSettings::load_from(Some(&path)).unwrap();
        assert!(!loaded.output.fingerprint);
        assert_eq!(loaded.output.format, OutputFormat::Ini);
        assert!(!loaded.import.strict);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LayerSettings::load_from(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
