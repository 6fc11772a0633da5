use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Marker inserted between citations before the final split. A control
/// character, so it can never collide with editor-entered punctuation.
const SPLIT_MARKER: char = '\u{1F}';

/// Split a sanitized source field into independent citation segments.
///
/// Commas and periods cannot be used as separators directly because single
/// citations contain them (`"IEC 62047-22:2014, 3.1.1, modified"`). Instead
/// a fixed sequence of targeted rewrites marks the separator contexts that
/// do start a new citation:
///
/// 1. `MOD,` / `MOD.` followed by a capital pair or digit
/// 2. `modified and IEC` / `modifiée et CEI`
/// 3. `, ITU`
/// 4. two `NNN-NN-NN` entries separated only by a comma
/// 5. `, see N` / `, voir N` (the keyword stays with the new segment)
/// 6. `;` followed by a capital pair
///
/// Returns at least one segment for a non-blank field.
pub fn split_source_field(field: &str) -> Vec<String> {
    // 702-01-02 MOD,ITU-R Rec. 431 MOD
    static MOD_SEPARATOR: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(MOD|ИЗМ)[,.]\s*([A-Z]{2}|\d)").unwrap());
    // IEC 60050-351 modified and IEC 61508-4
    static MODIFIED_AND: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(modified|modifiée?s?)\s+(?:and|et)\s+(ISO|IEC|CEI|ITU|UIT|CISPR)\b").unwrap()
    });
    static COMMA_ITU: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*ITU\b").unwrap());
    // 161-03-01, 161-03-02
    static ADJACENT_TRIPLETS: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\b(\d{3}-\d{2}-\d{2}),\s*(\d{3}-\d{2}-\d{2})\b").unwrap()
    });
    static COMMA_SEE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r",\s*((?i:see|voir))\s+(\d)").unwrap());
    static SEMICOLON: Lazy<Regex> = Lazy::new(|| Regex::new(r";\s*([A-Z]{2})").unwrap());

    let text = MOD_SEPARATOR.replace_all(field, |caps: &Captures| {
        format!("{}{SPLIT_MARKER}{}", &caps[1], &caps[2])
    });
    let text = MODIFIED_AND.replace_all(&text, |caps: &Captures| {
        format!("{}{SPLIT_MARKER}{}", &caps[1], &caps[2])
    });
    let text = COMMA_ITU.replace_all(&text, format!("{SPLIT_MARKER}ITU").as_str());

    // A run of three or more triplets needs several passes: each match
    // consumes the triplet the next pair starts with.
    let mut text = text.into_owned();
    loop {
        let next = ADJACENT_TRIPLETS
            .replace_all(&text, |caps: &Captures| {
                format!("{}{SPLIT_MARKER}{}", &caps[1], &caps[2])
            })
            .into_owned();
        if next == text {
            break;
        }
        text = next;
    }

    let text = COMMA_SEE.replace_all(&text, |caps: &Captures| {
        format!("{SPLIT_MARKER}{} {}", &caps[1], &caps[2])
    });
    let text = SEMICOLON.replace_all(&text, |caps: &Captures| {
        format!("{SPLIT_MARKER}{}", &caps[1])
    });

    let segments: Vec<String> = text
        .split(SPLIT_MARKER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if segments.is_empty() {
        vec![field.trim().to_string()]
    } else {
        segments
    }
}
