use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

/// One rewrite of the normalizer table: every match of `pattern` is replaced
/// by `replacement` (`${1}`-style group references allowed).
#[derive(Debug, Clone)]
pub struct Substitution {
    pub(crate) pattern: Regex,
    pub(crate) replacement: String,
}

impl Substitution {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.to_string(),
        })
    }

    fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, self.replacement.as_str())
            .into_owned()
    }
}

/// Built-in table mapping French, transliterated and legacy spellings onto
/// the canonical vocabulary. Applied top to bottom.
pub(crate) static BUILTIN_SUBSTITUTIONS: Lazy<Vec<Substitution>> = Lazy::new(|| {
    [
        (r"\bCEI\b", "IEC"),
        (r"\bVEI\b", "IEV"),
        (r"\bUIT\b", "ITU"),
        (r"\bGuide ISO/IEC\b", "ISO/IEC Guide"),
        (r"\bGuide IEC\b", "IEC Guide"),
        (r"\bGuide ISO\b", "ISO Guide"),
        // "Recommandation UIT-T" has already become "Recommandation ITU-T"
        (r"\bRecomm[ae]ndation (ITU-[TR])\b", "${1} Recommendation"),
        (r"ИЗМ", "MOD"),
        // ITU-T F.791:2015
        (
            r"\bITU-T ([A-Z]\.\d+(?:\.\d+)*):(\d{4})\b",
            "ITU-T Recommendation ${1} (${2})",
        ),
        (r"\bITU-T ([A-Z]\.\d+)", "ITU-T Recommendation ${1}"),
        (r"\bITU-R Rec\.\s*(\d+)", "ITU-R Recommendation ${1}"),
        // 845 03 55
        (r"\b(\d{3}) (\d{2}) (\d{2})\b", "${1}-${2}-${3}"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| Substitution::new(pattern, replacement).unwrap())
    .collect()
});

/// Relation glyphs are read by the relationship classifier before this runs.
static RELATION_GLYPHS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[≈≠]\s*").unwrap());

/// Rewrite abbreviation variants in one segment to the canonical vocabulary.
///
/// - `"CEI 60050-151"` → `"IEC 60050-151"`
/// - `"VEI 845 03 55"` → `"IEV 845-03-55"`
/// - `"UIT-T G.800:2016"` → `"ITU-T Recommendation G.800 (2016)"`
/// - `"≈ IEC 60050-121"` → `"IEC 60050-121"`
///
/// Applying it twice gives the same text as applying it once.
pub fn normalize_segment(segment: &str) -> String {
    normalize_segment_with_config(segment, &ParsingConfig::default())
}

/// Config-aware version of [`normalize_segment`].
pub(crate) fn normalize_segment_with_config(segment: &str, config: &ParsingConfig) -> String {
    let table = config.substitutions.resolve(&BUILTIN_SUBSTITUTIONS);
    let rewritten = table
        .iter()
        .fold(segment.to_string(), |text, sub| sub.apply(&text));
    RELATION_GLYPHS
        .replace_all(&rewritten, "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParsingConfigBuilder;

    #[test]
    fn test_french_acronyms() {
        assert_eq!(normalize_segment("CEI 60050-151"), "IEC 60050-151");
        assert_eq!(normalize_segment("VEI 151-12-05"), "IEV 151-12-05");
        assert_eq!(
            normalize_segment("UIT-R Rec. 592 MOD"),
            "ITU-R Recommendation 592 MOD"
        );
    }

    #[test]
    fn test_acronyms_inside_words_untouched() {
        assert_eq!(normalize_segment("RECEIVED"), "RECEIVED");
        assert_eq!(normalize_segment("SUITE 1"), "SUITE 1");
    }

    #[test]
    fn test_guide_reordering() {
        assert_eq!(normalize_segment("Guide ISO/CEI 99:2007"), "ISO/IEC Guide 99:2007");
        assert_eq!(normalize_segment("Guide CEI 104"), "IEC Guide 104");
        assert_eq!(normalize_segment("Guide ISO 73"), "ISO Guide 73");
    }

    #[test]
    fn test_cyrillic_mod() {
        assert_eq!(normalize_segment("702-01-02 ИЗМ"), "702-01-02 MOD");
    }

    #[test]
    fn test_itu_t_dated_symbol() {
        assert_eq!(
            normalize_segment("ITU-T F.791:2015, 3.14"),
            "ITU-T Recommendation F.791 (2015), 3.14"
        );
        assert_eq!(
            normalize_segment("UIT-T G.800 (02/2016)"),
            "ITU-T Recommendation G.800 (02/2016)"
        );
        assert_eq!(
            normalize_segment("Recommandation UIT-T X.800"),
            "ITU-T Recommendation X.800"
        );
    }

    #[test]
    fn test_legacy_space_triplet() {
        assert_eq!(normalize_segment("845 03 55"), "845-03-55");
        assert_eq!(normalize_segment("IEC 60050 2001"), "IEC 60050 2001");
    }

    #[test]
    fn test_glyphs_stripped() {
        assert_eq!(normalize_segment("≈ IEC 60050-121"), "IEC 60050-121");
        assert_eq!(normalize_segment("≠IEC 60050-121"), "IEC 60050-121");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "CEI 60050-151:2001, 151-12-05, modifié – texte",
            "UIT-T F.791:2015, 3.14",
            "ITU-R Rec. 431 MOD",
            "Guide ISO/CEI 99:2007, 1.26",
            "≈ VEI 845 03 55",
            "Recommandation UIT-R 592",
            "702-01-02 ИЗМ",
        ];
        for input in inputs {
            let once = normalize_segment(input);
            assert_eq!(normalize_segment(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_extended_table() {
        let config = ParsingConfigBuilder::new()
            .add_substitution(r"\bNF C\b", "NFC")
            .build()
            .unwrap();
        assert_eq!(
            normalize_segment_with_config("CEI 1, NF C 15-100", &config),
            "IEC 1, NFC 15-100"
        );
    }

    #[test]
    fn test_replaced_table() {
        let config = ParsingConfigBuilder::new()
            .set_substitutions(vec![])
            .build()
            .unwrap();
        assert_eq!(normalize_segment_with_config("≈ CEI 1", &config), "CEI 1");
    }
}
