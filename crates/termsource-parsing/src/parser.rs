use std::sync::Arc;

use termsource_core::{CitationRecord, Diagnostic, ParsedSource, Resolver};

use crate::config::ParsingConfig;
use crate::{ParsingError, clause, normalize, reference, relationship, sanitize, split};

/// A configurable source-field parsing pipeline.
///
/// Holds a [`ParsingConfig`] and an optional [`Resolver`], and exposes each
/// pipeline step as a method. Without a resolver no links are produced.
pub struct CitationParser {
    config: ParsingConfig,
    resolver: Option<Arc<dyn Resolver>>,
}

impl Default for CitationParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CitationParser {
    /// Create a parser with default configuration and no resolver.
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
            resolver: None,
        }
    }

    /// Create a parser with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self {
            config,
            resolver: None,
        }
    }

    /// Attach the registry used to turn references into links.
    pub fn with_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Split a field into citation segments (step 1).
    pub fn split(&self, field: &str) -> Vec<String> {
        split::split_source_field(field)
    }

    /// Canonicalize one segment (step 2).
    pub fn normalize(&self, segment: &str) -> String {
        normalize::normalize_segment_with_config(segment, &self.config)
    }

    /// Parse a whole source field into one record per segment.
    pub fn parse(&self, field: &str) -> Result<ParsedSource, ParsingError> {
        if field.trim().is_empty() {
            return Err(ParsingError::EmptyField);
        }

        let sanitized;
        let field = if self.config.sanitize() {
            sanitized = sanitize::sanitize_field(field);
            if sanitized.is_empty() {
                return Err(ParsingError::EmptyField);
            }
            sanitized.as_str()
        } else {
            field
        };

        let segments = self.split(field);
        tracing::debug!(segments = segments.len(), "split source field");

        let mut diagnostics = Vec::new();
        let records = segments
            .iter()
            .map(|segment| self.parse_segment(segment, &mut diagnostics))
            .collect();

        Ok(ParsedSource {
            records,
            diagnostics,
        })
    }

    /// Parse one segment into a record. Problems are pushed onto
    /// `diagnostics`; a record is always returned.
    pub fn parse_segment(&self, segment: &str, diagnostics: &mut Vec<Diagnostic>) -> CitationRecord {
        let relationship = relationship::classify_relationship(segment);
        let normalized = self.normalize(segment);

        let extracted = reference::extract_reference(&normalized);
        if !extracted.is_matched() {
            diagnostics.push(Diagnostic::UnmatchedReference {
                segment: extracted.reference.clone(),
            });
        }

        let clause = clause::extract_clause(&normalized);

        let link = if extracted.is_matched() && self.config.resolve_links() {
            self.resolve_link(&extracted.reference, diagnostics)
        } else {
            None
        };

        CitationRecord {
            reference: extracted.reference,
            clause,
            link,
            relationship,
            original: segment.to_string(),
        }
    }

    fn resolve_link(&self, reference: &str, diagnostics: &mut Vec<Diagnostic>) -> Option<String> {
        let resolver = self.resolver.as_ref()?;
        match resolver.resolve(reference) {
            Ok(Some(source)) => Some(source.url),
            Ok(None) => {
                tracing::debug!(resolver = resolver.name(), reference, "no registry entry");
                None
            }
            Err(e) => {
                tracing::warn!(
                    resolver = resolver.name(),
                    reference,
                    error = %e,
                    "reference lookup failed"
                );
                diagnostics.push(Diagnostic::ResolverFailure {
                    reference: reference.to_string(),
                    message: e.to_string(),
                });
                None
            }
        }
    }
}
