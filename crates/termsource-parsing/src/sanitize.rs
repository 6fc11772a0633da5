use once_cell::sync::Lazy;
use regex::Regex;

/// Decode HTML entities and drop markup from an exported source field.
///
/// Line breaks (`<br>`) become spaces and runs of whitespace, including
/// non-breaking spaces, collapse to one space.
pub fn sanitize_field(field: &str) -> String {
    static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
    static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

    let field = LINE_BREAK.replace_all(field, " ");
    let fragment = scraper::Html::parse_fragment(&field);
    let text: String = fragment.root_element().text().collect();
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}
