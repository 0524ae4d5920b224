//! # Check Subcommand
//!
//! Validates a single candidate document, read from a file or stdin, the
//! way a potion author would while editing. Schemas come from the local
//! tree or, with `--schema-url`, from a deployed site.
//!
//! Without `--category` the category is taken from the document's
//! `$schema` URL or `category` field.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use potion_schema::{
    FsSchemaSource, HttpSchemaSource, HttpSourceConfig, SchemaSource, SchemaValidator,
    ValidationOutcome,
};

use crate::config::PotionConfig;

/// Output format for `potion check`.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable issue list.
    #[default]
    Text,
    /// The outcome as JSON: `{"valid", "errors": [{"path", "message", "schemaPath"}]}`.
    Json,
}

/// Arguments for the `potion check` subcommand.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Document to check. Reads stdin when absent or `-`.
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Category key (components, layouts, features, patterns, tooling).
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Fetch schemas from this URL instead of the local tree.
    #[arg(long, value_name = "URL", conflicts_with = "schemas_dir")]
    pub schema_url: Option<String>,

    /// Local schema tree.
    #[arg(long, value_name = "DIR")]
    pub schemas_dir: Option<PathBuf>,

    /// Origin under which schemas declare their `$id`s.
    #[arg(long, value_name = "URL")]
    pub site_origin: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl CheckArgs {
    /// Apply command-line overrides on top of loaded configuration.
    pub fn apply(&self, config: &PotionConfig) -> PotionConfig {
        let mut merged = config.clone();
        if let Some(url) = &self.schema_url {
            merged.schema_url = Some(url.clone());
        }
        if let Some(dir) = &self.schemas_dir {
            merged.schemas_dir = dir.clone();
            merged.schema_url = None;
        }
        if let Some(origin) = &self.site_origin {
            merged.site_origin = origin.clone();
        }
        merged
    }

    fn reads_stdin(&self) -> bool {
        self.path.as_deref().map_or(true, |p| p == Path::new("-"))
    }
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when the document is valid, 1 otherwise.
pub fn run_check(args: &CheckArgs, config: &PotionConfig, cwd: &Path) -> Result<u8> {
    let config = args.apply(config);
    let candidate = read_candidate(args, cwd)?;

    let outcome = match &config.schema_url {
        Some(url) => check_remote(url, &config, args.category.as_deref(), &candidate)?,
        None => {
            let root = cwd.join(&config.schemas_dir);
            tracing::info!(schemas = %root.display(), "checking against local schemas");
            check_candidate(
                &SchemaValidator::with_rules(FsSchemaSource::new(root), config.ref_rules()),
                args.category.as_deref(),
                &candidate,
            )
        }
    };

    let stdout = io::stdout();
    render_outcome(&mut stdout.lock(), &outcome, args.format)?;
    Ok(if outcome.valid { 0 } else { 1 })
}

/// Validate `candidate` against the schemas served under `base_url`.
///
/// Must be called from a thread that is not already inside a Tokio
/// runtime: a multi-threaded runtime is started and entered here so the
/// blocking HTTP source can drive its requests.
pub fn check_remote(
    base_url: &str,
    config: &PotionConfig,
    category: Option<&str>,
    candidate: &str,
) -> Result<ValidationOutcome> {
    let source = HttpSchemaSource::new(HttpSourceConfig {
        base_url: base_url.to_string(),
        timeout_secs: config.http_timeout_secs,
    })
    .context("invalid --schema-url")?;
    tracing::info!(base_url = %source.base_url(), "checking against remote schemas");

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let _guard = rt.enter();
    Ok(check_candidate(
        &SchemaValidator::with_rules(source, config.ref_rules()),
        category,
        candidate,
    ))
}

/// Validate `candidate` as `category`, or as whatever category it declares.
pub fn check_candidate<S: SchemaSource>(
    validator: &SchemaValidator<S>,
    category: Option<&str>,
    candidate: &str,
) -> ValidationOutcome {
    match category {
        Some(key) => validator.validate_document(key, candidate),
        None => validator.validate_detected(candidate),
    }
}

/// Write one outcome in the requested format.
pub fn render_outcome(
    out: &mut impl Write,
    outcome: &ValidationOutcome,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, outcome)
                .context("failed to serialize outcome")?;
            writeln!(out)?;
        }
        OutputFormat::Text if outcome.valid => {
            writeln!(out, "✓ valid")?;
        }
        OutputFormat::Text => {
            writeln!(out, "✗ invalid: {} error(s)", outcome.error_count())?;
            for (index, issue) in outcome.errors.iter().enumerate() {
                writeln!(out, "  {}. {issue}", index + 1)?;
                if !issue.schema_path.is_empty() {
                    writeln!(out, "     Schema: {}", issue.schema_path)?;
                }
            }
        }
    }
    Ok(())
}

fn read_candidate(args: &CheckArgs, cwd: &Path) -> Result<String> {
    match args.path.as_deref() {
        Some(path) if !args.reads_stdin() => {
            let path = cwd.join(path);
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read document from stdin")?;
            Ok(text)
        }
    }
}
