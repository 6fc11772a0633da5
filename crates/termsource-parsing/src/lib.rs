use thiserror::Error;

pub mod clause;
pub mod config;
pub mod normalize;
pub mod parser;
pub mod reference;
pub mod relationship;
pub mod sanitize;
pub mod split;

pub use clause::{ClauseCandidate, extract_clause};
pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use normalize::{Substitution, normalize_segment};
pub use parser::CitationParser;
pub use reference::{ExtractedReference, ReferenceFamily, extract_reference};
pub use relationship::classify_relationship;
pub use sanitize::sanitize_field;
pub use split::split_source_field;
// Re-export domain types from core (canonical definitions live there)
pub use termsource_core::{
    CitationRecord, Diagnostic, ParsedSource, Relationship, RelationshipType,
};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("source field is empty")]
    EmptyField,
}

/// Parse a terminology source field into citation records.
///
/// Pipeline, per field:
/// 1. Split the field into citation segments
/// 2. Classify each segment's relationship on its raw text
/// 3. Normalize abbreviations
/// 4. Extract the reference identifier (first matching grammar)
/// 5. Extract the clause (earliest, then longest, locator)
///
/// No resolver is attached, so records carry no links.
pub fn parse_source(field: &str) -> Result<ParsedSource, ParsingError> {
    CitationParser::new().parse(field)
}
