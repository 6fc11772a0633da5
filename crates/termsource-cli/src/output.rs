use std::io::Write;

use owo_colors::OwoColorize;
use termsource_core::{CitationRecord, Diagnostic, ParsedSource, RelationshipType};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print one field as a single line of JSON: `{"source": ..., "records": [...]}`.
pub fn print_json(w: &mut dyn Write, field: &str, parsed: &ParsedSource) -> std::io::Result<()> {
    let mut doc = serde_json::json!({
        "source": field,
        "records": parsed.records,
    });
    if !parsed.diagnostics.is_empty() {
        doc["diagnostics"] = serde_json::json!(parsed.diagnostics);
    }
    serde_json::to_writer(&mut *w, &doc)?;
    writeln!(w)
}

/// Print one field and its records in a human-readable layout.
pub fn print_text(
    w: &mut dyn Write,
    field: &str,
    parsed: &ParsedSource,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", field.bold())?;
    } else {
        writeln!(w, "{}", field)?;
    }

    for (i, record) in parsed.records.iter().enumerate() {
        print_record(w, i + 1, record, color)?;
    }

    for diagnostic in &parsed.diagnostics {
        let message = match diagnostic {
            Diagnostic::UnmatchedReference { segment } => {
                format!("no reference grammar matched \"{}\"", segment)
            }
            Diagnostic::ResolverFailure { reference, message } => {
                format!("could not resolve {}: {}", reference, message)
            }
        };
        if color.enabled() {
            writeln!(w, "  {} {}", "WARNING:".yellow(), message)?;
        } else {
            writeln!(w, "  WARNING: {}", message)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

fn print_record(
    w: &mut dyn Write,
    index: usize,
    record: &CitationRecord,
    color: ColorMode,
) -> std::io::Result<()> {
    let kind = record.relationship.kind;
    if color.enabled() {
        let label = match kind {
            RelationshipType::Identical => kind.as_str().green().to_string(),
            RelationshipType::Modified => kind.as_str().yellow().to_string(),
            RelationshipType::Similar | RelationshipType::Related => {
                kind.as_str().cyan().to_string()
            }
            RelationshipType::NotEqual => kind.as_str().red().to_string(),
        };
        writeln!(w, "  [{}] {} ({})", index, record.reference.bold(), label)?;
    } else {
        writeln!(w, "  [{}] {} ({})", index, record.reference, kind)?;
    }

    if let Some(clause) = &record.clause {
        writeln!(w, "      Clause: {}", clause)?;
    }
    if let Some(modification) = &record.relationship.modification {
        writeln!(w, "      Modification: {}", modification)?;
    }
    if let Some(link) = &record.link {
        if color.enabled() {
            writeln!(w, "      Link: {}", link.dimmed())?;
        } else {
            writeln!(w, "      Link: {}", link)?;
        }
    }
    Ok(())
}

/// Print the closing totals of a text run.
pub fn print_summary(
    w: &mut dyn Write,
    fields: usize,
    unmatched: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Parsed {} field(s)", fields)?;
    if unmatched > 0 {
        let line = format!("{} segment(s) fell back to raw text", unmatched);
        if color.enabled() {
            writeln!(w, "{}", line.yellow())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    }
    Ok(())
}

/// Print a field's segments next to their normalized form.
pub fn print_normalized(
    w: &mut dyn Write,
    field: &str,
    segments: &[(String, String)],
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", field.bold())?;
    } else {
        writeln!(w, "{}", field)?;
    }
    for (segment, normalized) in segments {
        if segment == normalized {
            writeln!(w, "  {}", segment)?;
        } else if color.enabled() {
            writeln!(w, "  {} -> {}", segment.dimmed(), normalized.green())?;
        } else {
            writeln!(w, "  {} -> {}", segment, normalized)?;
        }
    }
    Ok(())
}
