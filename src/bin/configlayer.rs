//! Configlayer CLI
//!
//! Checks schema declaration files, renders their defaults and validates INI
//! files written from them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use configlayer::{Catalog, ImportMode, IniDocument, Instance, LayerSettings, OutputFormat, Schema, Section};
use serde::ser::{Serialize, Serializer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "configlayer")]
#[command(about = "Check schema declarations and the INI files written from them")]
struct Cli {
    /// Settings file layered over the default locations
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every schema of a declaration file
    Check {
        /// Declaration file (TOML)
        decl: PathBuf,
    },

    /// Render the default values of declared schemas
    Defaults {
        /// Declaration file (TOML)
        decl: PathBuf,

        /// Only this schema
        #[arg(short, long)]
        schema: Option<String>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render as JSON regardless of settings
        #[arg(long)]
        json: bool,
    },

    /// Import an INI file into the declared schemas
    Validate {
        /// Declaration file (TOML)
        decl: PathBuf,

        /// INI file to check
        ini: PathBuf,

        /// Reject keys no schema declares
        #[arg(long)]
        strict: bool,
    },

    /// Show or create settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Show the effective settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a settings file with the defaults
    Init {
        /// Output path
        #[arg(short, long, default_value = "configlayer.toml")]
        output: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        for (depth, cause) in e.chain().enumerate() {
            if depth == 0 {
                eprintln!("Error: {}", cause);
            } else {
                eprintln!("{}caused by: {}", "  ".repeat(depth), cause);
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = LayerSettings::load_from(cli.settings.as_deref()).context("Cannot load settings")?;

    match cli.command {
        Commands::Check { decl } => {
            let catalog = load_catalog(&decl)?;
            println!("🔍 {} schema(s) in {}", catalog.len(), decl.display());
            for schema in catalog.iter() {
                let base = schema
                    .base_name()
                    .map(|b| format!(", extends {}", b))
                    .unwrap_or_default();
                println!(
                    "  ✅ {} ({}, {} fields{}) {}",
                    schema.name(),
                    schema.kind(),
                    schema.len(),
                    base,
                    schema.fingerprint().short()
                );
                for field in schema.fields() {
                    println!("     └─ {}: {}", field.name(), field.value_type());
                }
            }
            Ok(())
        }

        Commands::Defaults { decl, schema, output, json } => {
            let catalog = load_catalog(&decl)?;
            let selected: Vec<&Arc<Schema>> = match &schema {
                Some(name) => match catalog.get(name) {
                    Some(s) => vec![s],
                    None => bail!("No schema named '{}' in {}", name, decl.display()),
                },
                None => catalog.iter().collect(),
            };

            let mut sections = Vec::with_capacity(selected.len());
            for schema in selected {
                let section = Instance::defaults_section(schema)
                    .with_context(|| format!("Cannot export defaults of {}", schema.name()))?;
                sections.push((schema, section));
            }

            let format = if json { OutputFormat::Json } else { settings.output.format };
            let text = match format {
                OutputFormat::Json => {
                    let named = NamedSections(sections.iter().map(|(s, sec)| (s.name(), sec)).collect());
                    serde_json::to_string_pretty(&named)? + "\n"
                }
                OutputFormat::Ini => {
                    let mut doc = IniDocument::new();
                    for (schema, section) in sections {
                        let comment = settings
                            .output
                            .fingerprint
                            .then(|| format!("fingerprint {}", schema.fingerprint().short()));
                        doc.insert_with_comment(schema.name(), comment, section);
                    }
                    doc.render()
                }
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("Cannot write {}", path.display()))?;
                    println!("✅ Wrote defaults to {}", path.display());
                }
                None => print!("{}", text),
            }
            Ok(())
        }

        Commands::Validate { decl, ini, strict } => {
            let catalog = load_catalog(&decl)?;
            let text = std::fs::read_to_string(&ini)
                .with_context(|| format!("Cannot read {}", ini.display()))?;
            let doc = IniDocument::parse(&text).with_context(|| format!("Cannot parse {}", ini.display()))?;

            let mode = if strict { ImportMode::Strict } else { settings.import.mode() };
            info!(mode = ?mode, sections = doc.len(), "validating");

            println!("🔍 Validating {} against {}", ini.display(), decl.display());
            for section in doc.sections() {
                let Some(schema) = catalog.get(&section.name) else {
                    warn!(section = %section.name, "no schema declared for section");
                    if mode == ImportMode::Strict {
                        bail!("Section [{}] has no schema", section.name);
                    }
                    continue;
                };
                let instance = import_section(schema, &section.entries, mode)
                    .with_context(|| format!("Section [{}] is invalid", section.name))?;
                let changed = instance.changed();
                if changed.is_empty() {
                    println!("  ✅ {} - defaults", schema.name());
                } else {
                    println!("  ✅ {} - {} changed", schema.name(), changed.len());
                    for name in changed {
                        println!("     └─ {}", name);
                    }
                }
            }
            Ok(())
        }

        Commands::Settings { command } => match command {
            SettingsCommand::Show { json } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&settings)?);
                } else {
                    println!("📋 Configlayer Settings\n");
                    println!("Import:");
                    println!("  Strict: {}", settings.import.strict);
                    println!("\nOutput:");
                    println!("  Format: {:?}", settings.output.format);
                    println!("  Fingerprint: {}", settings.output.fingerprint);
                }
                Ok(())
            }
            SettingsCommand::Init { output } => {
                LayerSettings::default()
                    .save(&output)
                    .with_context(|| format!("Cannot write {}", output.display()))?;
                println!("✅ Created settings file: {}", output.display());
                Ok(())
            }
        },
    }
}

fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    Catalog::from_toml(&text).with_context(|| format!("Invalid declaration file {}", path.display()))
}

fn import_section(schema: &Arc<Schema>, entries: &Section, mode: ImportMode) -> configlayer::Result<Instance> {
    let mut instance = Instance::new(Arc::clone(schema));
    instance.import_from(entries, mode)?;
    Ok(instance)
}

/// Sections keyed by schema name, serialized in declaration order
struct NamedSections<'a>(Vec<(&'a str, &'a Section)>);

impl Serialize for NamedSections<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, section)| (*name, *section)))
    }
}
