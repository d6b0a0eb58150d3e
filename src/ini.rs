//! INI text framing
//!
//! Turns exported sections into INI text and back. Reading and writing the
//! file itself is left to the caller.
//!
//! ```text
//! ; fingerprint 3f2a9c81d0be
//! [Server]
//! host = 'localhost'
//! port = 8080
//! ```
//!
//! Values spanning several lines continue on indented lines.

use crate::error::IniError;
use crate::section::Section;

/// One `[name]` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    pub name: String,
    /// Comment rendered above the header (not read back)
    pub comment: Option<String>,
    pub entries: Section,
}

/// Ordered set of sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse INI text
    pub fn parse(text: &str) -> Result<Self, IniError> {
        let mut doc = IniDocument::new();
        let mut last_key: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end();
            let trimmed = line.trim_start();

            // Continuation of the previous value, blank and comment-like lines included
            if raw.starts_with(char::is_whitespace) {
                if let (Some(key), Some(section)) = (&last_key, doc.sections.last_mut()) {
                    if let Some(current) = section.entries.get(key) {
                        let joined = format!("{}\n{}", current, trimmed);
                        section.entries.insert(key.clone(), joined);
                        continue;
                    }
                }
            }

            if trimmed.is_empty() {
                last_key = None;
                continue;
            }
            if trimmed.starts_with(';') || trimmed.starts_with('#') {
                continue;
            }

            if trimmed.starts_with('[') {
                let name = trimmed
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or(IniError::BadSection { line: line_no })?;
                if doc.section(name).is_some() {
                    return Err(IniError::DuplicateSection { line: line_no, section: name.to_string() });
                }
                doc.sections.push(IniSection {
                    name: name.to_string(),
                    comment: None,
                    entries: Section::new(),
                });
                last_key = None;
                continue;
            }

            let split = trimmed
                .find(&['=', ':'][..])
                .ok_or(IniError::BadEntry { line: line_no })?;
            let key = trimmed[..split].trim();
            let value = trimmed[split + 1..].trim();
            if key.is_empty() {
                return Err(IniError::BadEntry { line: line_no });
            }
            let section = doc
                .sections
                .last_mut()
                .ok_or(IniError::KeyOutsideSection { line: line_no })?;
            if section.entries.contains_key(key) {
                return Err(IniError::DuplicateKey {
                    line: line_no,
                    section: section.name.clone(),
                    key: key.to_string(),
                });
            }
            section.entries.insert(key, value);
            last_key = Some(key.to_string());
        }

        Ok(doc)
    }

    /// Render as INI text, one blank line between sections
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if let Some(comment) = &section.comment {
                for line in comment.lines() {
                    out.push_str("; ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
            out.push('[');
            out.push_str(&section.name);
            out.push_str("]\n");
            for (key, value) in section.entries.iter() {
                out.push_str(key);
                out.push_str(" = ");
                let mut lines = value.split('\n');
                if let Some(first) = lines.next() {
                    out.push_str(first);
                }
                for next in lines {
                    out.push_str("\n\t");
                    out.push_str(next);
                }
                out.push('\n');
            }
        }
        out
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name).map(|s| &s.entries)
    }

    /// Add or replace a section, replacing keeps its position
    pub fn insert(&mut self, name: impl Into<String>, entries: Section) {
        self.insert_with_comment(name, None, entries);
    }

    pub fn insert_with_comment(&mut self, name: impl Into<String>, comment: Option<String>, entries: Section) {
        let name = name.into();
        match self.sections.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                existing.comment = comment;
                existing.entries = entries;
            }
            None => self.sections.push(IniSection { name, comment, entries }),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Section> {
        let pos = self.sections.iter().position(|s| s.name == name)?;
        Some(self.sections.remove(pos).entries)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn sections(&self) -> &[IniSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
