//! File-backed registry: a TOML table of known references and URL templates.
//!
//! ```toml
//! [references]
//! "IEC 60050-151" = "https://webstore.iec.ch/publication/..."
//! "JCGM VIM" = "https://www.bipm.org/en/committees/jc/jcgm/publications"
//!
//! [prefixes]
//! "ITU-T Recommendation" = "https://www.itu.int/rec/T-REC-{ref}"
//! ```
//!
//! Exact entries win over prefixes; among prefixes the longest match wins.
//! `{ref}` in a template is replaced by the percent-encoded reference.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{ResolveError, ResolvedSource, Resolver, registry_key};

#[derive(Debug, Clone, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    references: HashMap<String, String>,
    #[serde(default)]
    prefixes: HashMap<String, String>,
}

/// In-memory registry loaded from a TOML file or string.
#[derive(Debug, Clone, Default)]
pub struct RegistryTable {
    entries: HashMap<String, String>,
    /// Sorted longest prefix first.
    prefixes: Vec<(String, String)>,
}

impl RegistryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a TOML file.
    pub fn open(path: &Path) -> Result<Self, ResolveError> {
        let content = std::fs::read_to_string(path)?;
        let table = Self::from_toml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            entries = table.len(),
            prefixes = table.prefixes.len(),
            "loaded registry table"
        );
        Ok(table)
    }

    /// Parse registry content from a string (useful for testing).
    pub fn from_toml_str(content: &str) -> Result<Self, ResolveError> {
        let file: RegistryFile = toml::from_str(content)?;
        let mut table = Self::new();
        for (reference, url) in file.references {
            table.insert(&reference, url);
        }
        for (prefix, template) in file.prefixes {
            table.insert_prefix(&prefix, template);
        }
        Ok(table)
    }

    pub fn insert(&mut self, reference: &str, url: impl Into<String>) {
        self.entries.insert(registry_key(reference), url.into());
    }

    pub fn insert_prefix(&mut self, prefix: &str, template: impl Into<String>) {
        self.prefixes.push((registry_key(prefix), template.into()));
        self.prefixes
            .sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
    }

    /// Number of exact entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.prefixes.is_empty()
    }

    fn lookup(&self, reference: &str) -> Option<String> {
        let key = registry_key(reference);
        if let Some(url) = self.entries.get(&key) {
            return Some(url.clone());
        }
        self.prefixes
            .iter()
            .find(|(prefix, _)| key.starts_with(prefix.as_str()))
            .map(|(_, template)| template.replace("{ref}", &urlencoding::encode(&key)))
    }
}

impl Resolver for RegistryTable {
    fn name(&self) -> &str {
        "registry-table"
    }

    fn resolve(&self, reference: &str) -> Result<Option<ResolvedSource>, ResolveError> {
        let found = self.lookup(reference).map(ResolvedSource::new);
        tracing::trace!(reference, found = found.is_some(), "registry lookup");
        Ok(found)
    }
}
