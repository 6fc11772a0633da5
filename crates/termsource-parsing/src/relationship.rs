use once_cell::sync::Lazy;
use regex::Regex;

use termsource_core::{Relationship, RelationshipType};

static SEE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?i:see|voir)\b").unwrap());

static MODIFIED_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bMOD\b|ИЗМ|(?i:\bmodifi(?:ed|é|ée|és|ées)\b)").unwrap()
});

static DERIVED_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?i:from|d'après)\b|(?i:\bdefinition\s+\S+\s+of\b|\bdéfinition\s+\S+\s+de la\b)")
        .unwrap()
});

/// `MOD IEC 60050-...`: the marker names the source, no explanation follows.
static MOD_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:MOD|ИЗМ)\s+(?:\d|(?:IEC|ISO|ITU|IEV|CEI|UIT|VEI)\b)").unwrap()
});

static MODIFICATION_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\bMOD\b|ИЗМ|(?i:\bmodifi\w*))\s*[-–—]\s*(.+)$").unwrap()
});

/// Classify how a dictionary entry relates to the cited segment.
///
/// Must see the segment before normalization: the `≈` / `≠` glyphs are
/// removed by the normalizer.
pub fn classify_relationship(segment: &str) -> Relationship {
    let kind = if segment.contains('≠') {
        RelationshipType::NotEqual
    } else if segment.contains('≈') {
        RelationshipType::Similar
    } else if SEE_PREFIX.is_match(segment) {
        RelationshipType::Related
    } else if MODIFIED_MARKER.is_match(segment) {
        RelationshipType::Modified
    } else if DERIVED_FROM.is_match(segment) {
        RelationshipType::Identical
    } else {
        RelationshipType::default()
    };

    Relationship {
        kind,
        modification: extract_modification(segment),
    }
}

fn extract_modification(segment: &str) -> Option<String> {
    if MOD_IDENTIFIER.is_match(segment) {
        return None;
    }
    MODIFICATION_TEXT
        .captures(segment)
        .map(|caps| caps[1].trim().to_string())
        .filter(|text| !text.is_empty())
}
