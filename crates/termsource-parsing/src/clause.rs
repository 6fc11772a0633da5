//! Pinpoint locators (clause, figure, item, annex) within a cited document.
//!
//! Unlike reference extraction this is not a first-match cascade. A segment
//! often matches several locator grammars at once, so every pattern runs
//! over the whole text and the earliest match is chosen, ties going to the
//! longest captured text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// One locator match and where it starts in the prepared segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseCandidate {
    /// Byte offset of the start of the whole match.
    pub offset: usize,
    pub clause: String,
}

struct ClausePattern {
    pattern: Regex,
    render: fn(&Captures) -> String,
}

fn first_group(caps: &Captures) -> String {
    caps[1].to_string()
}

fn pattern(pattern: &str) -> ClausePattern {
    rendered(pattern, first_group)
}

fn rendered(pattern: &str, render: fn(&Captures) -> String) -> ClausePattern {
    ClausePattern {
        pattern: Regex::new(pattern).unwrap(),
        render,
    }
}

static CLAUSE_PATTERNS: Lazy<Vec<ClausePattern>> = Lazy::new(|| {
    vec![
        pattern(r"\bRR (\d+(?:\.\d+)*)"),
        pattern(r"\bVIM,?\s+(\d+(?:\.\d+)*)"),
        pattern(r"\b(?i:item)\s+(\d+(?:\.\d+)*)"),
        // item 3.2 b): a lettered sub-item of an item or clause
        pattern(r"\b(?i:item|clause|article)\s+(\d+(?:\.\d+)*\s?[a-z]\))"),
        pattern(r"\b(?i:d[ée]finition)\s+(\d+(?:\.\d+)*)"),
        pattern(r"\b(?i:clause|article)\s+(\d+(?:\.\d+)*)"),
        rendered(r"\b(?i:figure|fig\.)\s*(\d+(?:\.\d+)*)", |c| {
            format!("figure {}", &c[1])
        }),
        pattern(r"\bIEV (\d{3}-\d{2}-\d{2})\b"),
        pattern(r"\b(\d{3}-\d{2}-\d{2})\b"),
        // 845 03 55, when it reaches here without normalization
        rendered(r"\b(\d{3}) (\d{2}) (\d{2})\b", |c| {
            format!("{}-{}-{}", &c[1], &c[2], &c[3])
        }),
        pattern(r",\s?(\d+(?:\.\d+)+)"),
        pattern(r"\d{4},\s*((?:Appendix|Annexe|Annex) \d+)"),
        pattern(r"\bNo\. (\d+) of the Annex"),
        pattern(r"N° (\d+) 1012 de l'Annexe"),
        pattern(r"\(https?://[^\s)]*?(\d{7})/?\)"),
        pattern(r"\((\d+(?:\.\d+)+)\)(?:\s?MOD)?"),
        // The trailing boundary keeps a clause from ending inside "151-12-05".
        pattern(r"ISO/IEC Guide \d+:\d{4},? (\d+(?:\.\d+)*)\b(?:[^-]|$)"),
        pattern(r"\bISO \d+(?:-\d+)*:\s?\d{4},? (\d+(?:\.\d+)*)\b(?:[^-]|$)"),
        pattern(r"\b(?i:section)\s+(\d+(?:\.\d+)*)"),
    ]
});

/// Remove the parts of a segment that must never yield a locator: a
/// trailing `modified – explanation` tail and a leading `see fig. N` phrase.
pub fn prepare_clause_text(segment: &str) -> String {
    static MODIFICATION_TAIL: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"[,\s]*(?:(?i:modifi\w*)|MOD|ИЗМ)\s*[-–—]\s*.*$").unwrap()
    });
    static SEE_FIGURE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^(?i:see|voir)\s+(?i:fig(?:\.|ure))\s*[\d.-]+,?\s*").unwrap()
    });

    let text = MODIFICATION_TAIL.replace(segment, "");
    SEE_FIGURE.replace(text.trim(), "").trim().to_string()
}

/// Run every locator pattern over `text` and collect all matches.
pub fn collect_clause_candidates(text: &str) -> Vec<ClauseCandidate> {
    let mut candidates = Vec::new();
    for clause_pattern in CLAUSE_PATTERNS.iter() {
        for caps in clause_pattern.pattern.captures_iter(text) {
            let clause = (clause_pattern.render)(&caps);
            if clause.trim().is_empty() {
                continue;
            }
            let offset = caps.get(0).map_or(0, |m| m.start());
            candidates.push(ClauseCandidate { offset, clause });
        }
    }
    candidates
}

/// Earliest candidate wins; at equal offsets the longer text wins. Exact
/// ties keep the pattern listed first.
pub fn select_clause(candidates: &[ClauseCandidate]) -> Option<&ClauseCandidate> {
    candidates.iter().min_by(|a, b| {
        a.offset
            .cmp(&b.offset)
            .then_with(|| b.clause.chars().count().cmp(&a.clause.chars().count()))
    })
}

/// Extract the pinpoint locator from a normalized segment, if any.
pub fn extract_clause(segment: &str) -> Option<String> {
    let text = prepare_clause_text(segment);
    let candidates = collect_clause_candidates(&text);
    let chosen = select_clause(&candidates).map(|c| c.clause.clone());
    tracing::trace!(
        candidates = candidates.len(),
        clause = chosen.as_deref().unwrap_or(""),
        "clause search"
    );
    chosen
}
