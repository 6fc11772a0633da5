use crate::normalize::Substitution;

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Configuration for the source-field parsing pipeline.
///
/// Only the normalizer's substitution table is configurable; the splitter,
/// reference cascade and clause patterns are order-sensitive and fixed.
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    /// Abbreviation substitutions applied by the normalizer, in order.
    pub(crate) substitutions: ListOverride<Substitution>,
    /// Ask the resolver for a link for every matched reference (default: true).
    pub(crate) resolve_links: bool,
    /// Decode HTML entities and strip markup before splitting (default: false).
    pub(crate) sanitize: bool,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            substitutions: ListOverride::Default,
            resolve_links: true,
            sanitize: false,
        }
    }
}

impl ParsingConfig {
    pub fn resolve_links(&self) -> bool {
        self.resolve_links
    }

    pub fn sanitize(&self) -> bool {
        self.sanitize
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    substitutions: SubstitutionOverrideBuilder,
    resolve_links: Option<bool>,
    sanitize: Option<bool>,
}

/// Helper for building `ListOverride<Substitution>` from string pairs.
#[derive(Debug, Clone, Default)]
enum SubstitutionOverrideBuilder {
    #[default]
    Default,
    Replace(Vec<(String, String)>),
    Extend(Vec<(String, String)>),
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Substitutions ──

    /// Replace the built-in substitution table entirely.
    pub fn set_substitutions(mut self, substitutions: Vec<(String, String)>) -> Self {
        self.substitutions = SubstitutionOverrideBuilder::Replace(substitutions);
        self
    }

    /// Append one substitution after the built-in table.
    pub fn add_substitution(mut self, pattern: &str, replacement: &str) -> Self {
        let entry = (pattern.to_string(), replacement.to_string());
        match &mut self.substitutions {
            SubstitutionOverrideBuilder::Extend(v) | SubstitutionOverrideBuilder::Replace(v) => {
                v.push(entry)
            }
            SubstitutionOverrideBuilder::Default => {
                self.substitutions = SubstitutionOverrideBuilder::Extend(vec![entry])
            }
        }
        self
    }

    // ── Scalars ──

    pub fn resolve_links(mut self, enabled: bool) -> Self {
        self.resolve_links = Some(enabled);
        self
    }

    pub fn sanitize(mut self, enabled: bool) -> Self {
        self.sanitize = Some(enabled);
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile = |pairs: Vec<(String, String)>| -> Result<Vec<Substitution>, regex::Error> {
            pairs
                .iter()
                .map(|(pattern, replacement)| Substitution::new(pattern, replacement))
                .collect()
        };

        let substitutions = match self.substitutions {
            SubstitutionOverrideBuilder::Default => ListOverride::Default,
            SubstitutionOverrideBuilder::Replace(pairs) => ListOverride::Replace(compile(pairs)?),
            SubstitutionOverrideBuilder::Extend(pairs) => ListOverride::Extend(compile(pairs)?),
        };

        Ok(ParsingConfig {
            substitutions,
            resolve_links: self.resolve_links.unwrap_or(true),
            sanitize: self.sanitize.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParsingConfig::default();
        assert!(config.resolve_links);
        assert!(!config.sanitize);
        assert!(matches!(config.substitutions, ListOverride::Default));
    }

    #[test]
    fn test_builder_basic() {
        let config = ParsingConfigBuilder::new()
            .resolve_links(false)
            .sanitize(true)
            .build()
            .unwrap();
        assert!(!config.resolve_links());
        assert!(config.sanitize());
    }

    #[test]
    fn test_builder_extend_substitutions() {
        let config = ParsingConfigBuilder::new()
            .add_substitution(r"\bNF C\b", "NFC")
            .add_substitution(r"\bDIN EN\b", "EN")
            .build()
            .unwrap();
        match config.substitutions {
            ListOverride::Extend(v) => assert_eq!(v.len(), 2),
            other => panic!("expected Extend, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_replace_then_add() {
        let config = ParsingConfigBuilder::new()
            .set_substitutions(vec![("CEI".into(), "IEC".into())])
            .add_substitution("VEI", "IEV")
            .build()
            .unwrap();
        match config.substitutions {
            ListOverride::Replace(v) => assert_eq!(v.len(), 2),
            other => panic!("expected Replace, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = ParsingConfigBuilder::new()
            .add_substitution(r"[invalid", "x")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
