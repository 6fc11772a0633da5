use serde::{Deserialize, Serialize};

pub mod config_file;
pub mod resolver;

pub use resolver::cache::CachedResolver;
pub use resolver::registry::RegistryTable;
pub use resolver::{ResolveError, ResolvedSource, Resolver};

/// One structured citation extracted from a dictionary entry's source field.
///
/// Records are created fresh for every parsed field and carry no identity
/// beyond their position in the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRecord {
    /// Canonical document identifier (e.g. `"IEC 60050-151"`), or the cleaned
    /// segment text when no identifier grammar matched. Never empty.
    pub reference: String,
    /// Pinpoint locator within the referenced document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause: Option<String>,
    /// URL returned by the registry, when one was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub relationship: Relationship,
    /// The segment text exactly as it appeared in the field.
    pub original: String,
}

/// How the dictionary entry relates to the cited source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    /// Free-text description of the modification (e.g. "wording simplified").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modification: Option<String>,
}

impl Relationship {
    pub fn new(kind: RelationshipType) -> Self {
        Self {
            kind,
            modification: None,
        }
    }
}

impl Default for Relationship {
    fn default() -> Self {
        Self::new(RelationshipType::Identical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    #[default]
    Identical,
    Modified,
    Similar,
    NotEqual,
    Related,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identical => "identical",
            Self::Modified => "modified",
            Self::Similar => "similar",
            Self::NotEqual => "not_equal",
            Self::Related => "related",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal problem noticed while parsing a field.
///
/// Diagnostics never prevent a record from being emitted; they are reported
/// alongside the records and also logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No identifier grammar matched; the record echoes the segment text.
    UnmatchedReference { segment: String },
    /// The resolver returned an error; the record has no link.
    ResolverFailure { reference: String, message: String },
}

/// Result of parsing one source field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSource {
    /// One record per segment, in field order. The first is the primary source.
    pub records: Vec<CitationRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedSource {
    /// The first record, which names the primary source of the entry.
    pub fn primary(&self) -> Option<&CitationRecord> {
        self.records.first()
    }

    /// Number of segments whose reference fell back to the raw text.
    pub fn unmatched_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::UnmatchedReference { .. }))
            .count()
    }
}
