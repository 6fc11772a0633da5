use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use termsource_core::config_file::{self, ConfigFile};
use termsource_core::{CachedResolver, RegistryTable, Resolver};
use termsource_parsing::{CitationParser, ParsingConfig, ParsingConfigBuilder, sanitize_field};
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

/// Terminology source parser - Turn dictionary "source" fields into structured citations
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse source fields into citation records
    Parse {
        /// Source fields to parse (one citation field per argument)
        fields: Vec<String>,

        /// Read fields from a file, one per line (stdin when no fields are given)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Path to a registry table used to resolve links
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Do not resolve links, even when a registry is configured
        #[arg(long)]
        no_links: bool,

        /// Skip HTML entity decoding and markup stripping
        #[arg(long)]
        raw: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show how fields are split and normalized, without extraction
    Normalize {
        /// Source fields to normalize
        fields: Vec<String>,

        /// Read fields from a file, one per line (stdin when no fields are given)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let config = config_file::load_config();

    match cli.command {
        Command::Parse {
            fields,
            file,
            format,
            registry,
            no_links,
            raw,
            no_color,
        } => parse(
            &config,
            ParseArgs {
                fields,
                file,
                format,
                registry,
                no_links,
                raw,
                no_color,
            },
        ),
        Command::Normalize {
            fields,
            file,
            no_color,
        } => normalize(&config, fields, file, no_color),
    }
}

/// Log to stderr so JSON on stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

struct ParseArgs {
    fields: Vec<String>,
    file: Option<PathBuf>,
    format: Option<OutputFormat>,
    registry: Option<PathBuf>,
    no_links: bool,
    raw: bool,
    no_color: bool,
}

fn parse(config: &ConfigFile, args: ParseArgs) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > config file > defaults
    let format = match args.format {
        Some(format) => format,
        None => match config.output.as_ref().and_then(|o| o.format.as_deref()) {
            None | Some("json") => OutputFormat::Json,
            Some("text") => OutputFormat::Text,
            Some(other) => anyhow::bail!("Unknown output format in config: {other:?}"),
        },
    };
    let color = ColorMode(
        format == OutputFormat::Text && !args.no_color && config_color(config).unwrap_or(true),
    );

    let registry_path = args
        .registry
        .or_else(|| std::env::var("TERMSOURCE_REGISTRY").ok().map(PathBuf::from))
        .or_else(|| {
            config
                .registry
                .as_ref()
                .and_then(|r| r.path.as_ref())
                .map(PathBuf::from)
        });

    let parsing_config = build_parsing_config(config, args.no_links, args.raw)?;
    let mut parser = CitationParser::with_config(parsing_config);
    if let Some(path) = registry_path.filter(|_| !args.no_links) {
        parser = parser.with_resolver(open_registry(config, &path)?);
    }

    let fields = collect_fields(args.fields, args.file.as_deref())?;
    let stdout = std::io::stdout();
    let mut writer = stdout.lock();

    let totals = write_fields(&mut writer, &parser, &fields, format, color)?;
    if format == OutputFormat::Text {
        output::print_summary(&mut writer, totals.parsed, totals.unmatched, color)?;
    }
    writer.flush()?;
    Ok(())
}

/// Counts for the closing summary of a `parse` run.
#[derive(Debug, Default, PartialEq, Eq)]
struct RunTotals {
    /// Fields that produced records; skipped fields are not counted.
    parsed: usize,
    unmatched: usize,
}

fn write_fields(
    w: &mut dyn Write,
    parser: &CitationParser,
    fields: &[String],
    format: OutputFormat,
    color: ColorMode,
) -> std::io::Result<RunTotals> {
    let mut totals = RunTotals::default();
    for field in fields {
        let parsed = match parser.parse(field) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(field = field.as_str(), error = %e, "skipping field");
                continue;
            }
        };
        totals.parsed += 1;
        totals.unmatched += parsed.unmatched_count();
        match format {
            OutputFormat::Json => output::print_json(w, field, &parsed)?,
            OutputFormat::Text => output::print_text(w, field, &parsed, color)?,
        }
    }
    Ok(totals)
}

fn normalize(
    config: &ConfigFile,
    fields: Vec<String>,
    file: Option<PathBuf>,
    no_color: bool,
) -> anyhow::Result<()> {
    let color = ColorMode(!no_color && config_color(config).unwrap_or(true));
    let parser = CitationParser::with_config(build_parsing_config(config, true, false)?);

    let fields = collect_fields(fields, file.as_deref())?;
    let stdout = std::io::stdout();
    let mut writer = stdout.lock();

    for field in &fields {
        let sanitized = if parser.config().sanitize() {
            sanitize_field(field)
        } else {
            field.clone()
        };
        let segments: Vec<(String, String)> = parser
            .split(&sanitized)
            .into_iter()
            .map(|segment| {
                let normalized = parser.normalize(&segment);
                (segment, normalized)
            })
            .collect();
        output::print_normalized(&mut writer, field, &segments, color)?;
    }
    writer.flush()?;
    Ok(())
}

fn config_color(config: &ConfigFile) -> Option<bool> {
    config.output.as_ref().and_then(|o| o.color)
}

/// Combine the config file's `[parsing]` section with CLI switches.
fn build_parsing_config(
    config: &ConfigFile,
    no_links: bool,
    raw: bool,
) -> anyhow::Result<ParsingConfig> {
    let section = config.parsing.clone().unwrap_or_default();
    let mut builder = ParsingConfigBuilder::new()
        .resolve_links(!no_links && section.resolve_links.unwrap_or(true))
        .sanitize(!raw && section.sanitize.unwrap_or(true));

    let substitutions = section.substitutions.unwrap_or_default();
    if section.replace_builtin_substitutions.unwrap_or(false) {
        builder = builder.set_substitutions(
            substitutions
                .into_iter()
                .map(|s| (s.pattern, s.replacement))
                .collect(),
        );
    } else {
        for s in &substitutions {
            builder = builder.add_substitution(&s.pattern, &s.replacement);
        }
    }

    builder
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid substitution pattern in config: {e}"))
}

fn open_registry(config: &ConfigFile, path: &Path) -> anyhow::Result<Arc<dyn Resolver>> {
    if !path.exists() {
        anyhow::bail!("Registry table not found at {}", path.display());
    }
    let table = RegistryTable::open(path)?;
    if table.is_empty() {
        tracing::warn!(path = %path.display(), "registry table has no entries");
    }

    let cache = config
        .registry
        .as_ref()
        .and_then(|r| r.cache)
        .unwrap_or(true);
    if cache {
        Ok(Arc::new(CachedResolver::new(table)))
    } else {
        Ok(Arc::new(table))
    }
}

/// Fields from arguments, else from `--file`, else from stdin; blank lines skipped.
fn collect_fields(fields: Vec<String>, file: Option<&Path>) -> anyhow::Result<Vec<String>> {
    if !fields.is_empty() {
        return Ok(fields);
    }

    let lines: Vec<String> = match file {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                anyhow::anyhow!("Failed to read {}: {e}", path.display())
            })?;
            content.lines().map(String::from).collect()
        }
        None => std::io::stdin().lock().lines().collect::<Result<_, _>>()?,
    };

    Ok(lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect())
}
