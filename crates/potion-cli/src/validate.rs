//! # Validate Subcommand
//!
//! Build-time check of the whole catalog: every potion under the potions
//! directory is validated against the schema of the folder it sits in, and
//! the run fails if any document is invalid or none were found.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use potion_schema::{FsSchemaSource, SchemaSource, SchemaValidator, ValidationOutcome};

use crate::config::PotionConfig;
use crate::discover::{discover_potions, PotionFile};
use crate::report::ValidationReport;

/// Arguments for the `potion validate` subcommand.
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Potions directory (one subfolder per category).
    #[arg(long, value_name = "DIR")]
    pub potions_dir: Option<PathBuf>,

    /// Local schema tree.
    #[arg(long, value_name = "DIR")]
    pub schemas_dir: Option<PathBuf>,

    /// Origin under which schemas declare their `$id`s.
    #[arg(long, value_name = "URL")]
    pub site_origin: Option<String>,
}

impl ValidateArgs {
    /// Apply command-line overrides on top of loaded configuration.
    pub fn apply(&self, config: &PotionConfig) -> PotionConfig {
        let mut merged = config.clone();
        if let Some(dir) = &self.potions_dir {
            merged.potions_dir = dir.clone();
        }
        if let Some(dir) = &self.schemas_dir {
            merged.schemas_dir = dir.clone();
        }
        if let Some(origin) = &self.site_origin {
            merged.site_origin = origin.clone();
        }
        merged
    }
}

/// Execute the validate subcommand.
///
/// Relative directories are taken from `cwd`. The report goes to stdout.
/// Returns exit code: 0 when every potion is valid, 1 when any fails or
/// none were found.
pub fn run_validate(args: &ValidateArgs, config: &PotionConfig, cwd: &Path) -> Result<u8> {
    let config = args.apply(config);
    let potions_dir = cwd.join(&config.potions_dir);
    let schemas_dir = cwd.join(&config.schemas_dir);

    tracing::info!(
        potions = %potions_dir.display(),
        schemas = %schemas_dir.display(),
        "validating potion catalog"
    );

    let validator = SchemaValidator::with_rules(FsSchemaSource::new(schemas_dir), config.ref_rules());
    let report = validate_tree(&validator, &potions_dir);

    let stdout = std::io::stdout();
    report.render(&mut stdout.lock(), cwd)?;

    tracing::info!(
        total = report.total(),
        invalid = report.invalid_count(),
        errors = report.total_errors(),
        "catalog validation finished"
    );
    Ok(report.exit_code())
}

/// Validate every potion under `potions_dir` with `validator`.
pub fn validate_tree<S: SchemaSource>(
    validator: &SchemaValidator<S>,
    potions_dir: &Path,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    for potion in discover_potions(potions_dir) {
        let outcome = validate_file(validator, &potion);
        report.push(potion, outcome);
    }
    report
}

fn validate_file<S: SchemaSource>(
    validator: &SchemaValidator<S>,
    potion: &PotionFile,
) -> ValidationOutcome {
    match std::fs::read_to_string(&potion.path) {
        Ok(text) => validator.validate_document(potion.category.as_str(), &text),
        Err(e) => {
            tracing::warn!(path = %potion.path.display(), error = %e, "failed to read potion");
            ValidationOutcome::rejected(format!("Cannot read {}: {e}", potion.path.display()))
        }
    }
}
