use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub registry: Option<RegistryConfig>,
    pub parsing: Option<ParsingSection>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Path to a registry table (see [`RegistryTable`](crate::RegistryTable)).
    pub path: Option<String>,
    /// Memoize registry answers for the lifetime of the process.
    pub cache: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingSection {
    pub resolve_links: Option<bool>,
    pub sanitize: Option<bool>,
    /// Extra normalizer substitutions, applied after the built-in table.
    pub substitutions: Option<Vec<SubstitutionEntry>>,
    /// Drop the built-in substitution table and use only `substitutions`.
    pub replace_builtin_substitutions: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionEntry {
    pub pattern: String,
    pub replacement: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// "json" or "text".
    pub format: Option<String>,
    pub color: Option<bool>,
}

/// Platform config directory path: `<config_dir>/termsource/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("termsource").join("config.toml"))
}

/// Load config by cascading CWD `.termsource.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".termsource.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        registry: Some(RegistryConfig {
            path: overlay
                .registry
                .as_ref()
                .and_then(|r| r.path.clone())
                .or_else(|| base.registry.as_ref().and_then(|r| r.path.clone())),
            cache: overlay
                .registry
                .as_ref()
                .and_then(|r| r.cache)
                .or_else(|| base.registry.as_ref().and_then(|r| r.cache)),
        }),
        parsing: Some(ParsingSection {
            resolve_links: overlay
                .parsing
                .as_ref()
                .and_then(|p| p.resolve_links)
                .or_else(|| base.parsing.as_ref().and_then(|p| p.resolve_links)),
            sanitize: overlay
                .parsing
                .as_ref()
                .and_then(|p| p.sanitize)
                .or_else(|| base.parsing.as_ref().and_then(|p| p.sanitize)),
            substitutions: overlay
                .parsing
                .as_ref()
                .and_then(|p| p.substitutions.clone())
                .or_else(|| base.parsing.as_ref().and_then(|p| p.substitutions.clone())),
            replace_builtin_substitutions: overlay
                .parsing
                .as_ref()
                .and_then(|p| p.replace_builtin_substitutions)
                .or_else(|| {
                    base.parsing
                        .as_ref()
                        .and_then(|p| p.replace_builtin_substitutions)
                }),
        }),
        output: Some(OutputConfig {
            format: overlay
                .output
                .as_ref()
                .and_then(|o| o.format.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.format.clone())),
            color: overlay
                .output
                .as_ref()
                .and_then(|o| o.color)
                .or_else(|| base.output.as_ref().and_then(|o| o.color)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_path_round_trip_toml() {
        let config = ConfigFile {
            registry: Some(RegistryConfig {
                path: Some("/tmp/registry.toml".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.registry.unwrap().path.unwrap(),
            "/tmp/registry.toml"
        );
    }

    #[test]
    fn substitutions_deserialize() {
        let toml_str = r#"
[parsing]
resolve_links = false

[[parsing.substitutions]]
pattern = "NF C"
replacement = "NFC"
"#;
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let parsing = parsed.parsing.unwrap();
        assert_eq!(parsing.resolve_links, Some(false));
        assert_eq!(
            parsing.substitutions.unwrap(),
            vec![SubstitutionEntry {
                pattern: "NF C".into(),
                replacement: "NFC".into()
            }]
        );
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            registry: Some(RegistryConfig {
                path: Some("/base/registry.toml".to_string()),
                cache: Some(true),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            registry: Some(RegistryConfig {
                path: Some("/overlay/registry.toml".to_string()),
                cache: None,
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let registry = merged.registry.unwrap();
        assert_eq!(registry.path.unwrap(), "/overlay/registry.toml");
        assert_eq!(registry.cache, Some(true));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            output: Some(OutputConfig {
                format: Some("text".to_string()),
                color: Some(false),
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        let output = merged.output.unwrap();
        assert_eq!(output.format.unwrap(), "text");
        assert_eq!(output.color, Some(false));
    }

    #[test]
    fn load_from_missing_path_is_none() {
        assert!(load_from_path(Path::new("/nonexistent/termsource.toml")).is_none());
    }
}
