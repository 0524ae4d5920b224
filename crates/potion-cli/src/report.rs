//! # Validation Report
//!
//! Aggregates per-document outcomes from a `potion validate` run and
//! renders the human-readable report written to stdout.

use std::io::{self, Write};
use std::path::Path;

use potion_schema::ValidationOutcome;

use crate::discover::PotionFile;

const RULE_WIDTH: usize = 60;

/// Outcomes for every discovered potion, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    results: Vec<(PotionFile, ValidationOutcome)>,
}

impl ValidationReport {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for one document.
    pub fn push(&mut self, potion: PotionFile, outcome: ValidationOutcome) {
        self.results.push((potion, outcome));
    }

    /// Recorded results, in the order they were pushed.
    pub fn results(&self) -> &[(PotionFile, ValidationOutcome)] {
        &self.results
    }

    /// Number of documents checked.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of documents that passed.
    pub fn valid_count(&self) -> usize {
        self.results.iter().filter(|(_, o)| o.valid).count()
    }

    /// Number of documents that failed.
    pub fn invalid_count(&self) -> usize {
        self.total() - self.valid_count()
    }

    /// Issues across all failed documents.
    pub fn total_errors(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, o)| !o.valid)
            .map(|(_, o)| o.error_count())
            .sum()
    }

    /// True when at least one document was checked and none failed.
    pub fn is_success(&self) -> bool {
        self.total() > 0 && self.invalid_count() == 0
    }

    /// Process exit code: 0 on success, 1 when nothing was found or any
    /// document failed.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// Write the full report. Paths are shown relative to `base` when they
    /// live under it.
    pub fn render(&self, out: &mut impl Write, base: &Path) -> io::Result<()> {
        writeln!(out, "🔍 Validating all potions...\n")?;

        if self.results.is_empty() {
            writeln!(out, "❌ No potions found to validate.")?;
            return Ok(());
        }

        writeln!(out, "Found {} potion(s) to validate:\n", self.total())?;

        for (potion, outcome) in &self.results {
            let shown = potion.path.strip_prefix(base).unwrap_or(&potion.path);
            if outcome.valid {
                writeln!(out, "✓ {}", shown.display())?;
                continue;
            }

            writeln!(out, "\n✗ {}", shown.display())?;
            writeln!(out, "  Validation Failed")?;
            writeln!(out, "  Found {} error(s):\n", outcome.error_count())?;
            for (index, issue) in outcome.errors.iter().enumerate() {
                writeln!(out, "  {}. Path: {}", index + 1, issue.path)?;
                writeln!(out, "     Error: {}", issue.message)?;
                if !issue.schema_path.is_empty() {
                    writeln!(out, "     Schema: {}", issue.schema_path)?;
                }
                writeln!(out)?;
            }
        }

        let rule = "=".repeat(RULE_WIDTH);
        writeln!(out, "\n{rule}")?;
        writeln!(out, "Summary:")?;
        writeln!(out, "  Total potions: {}", self.total())?;
        writeln!(out, "  ✓ Valid: {}", self.valid_count())?;
        writeln!(out, "  ✗ Invalid: {}", self.invalid_count())?;
        writeln!(out, "  Total errors: {}", self.total_errors())?;
        writeln!(out, "{rule}")?;

        if self.is_success() {
            writeln!(out, "\n✅ All potions are valid!\n")?;
        } else {
            writeln!(out, "\n❌ Validation failed. Please fix the errors above.\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use potion_core::Category;
    use potion_schema::ValidationIssue;
    use std::path::PathBuf;

    fn potion(rel: &str) -> PotionFile {
        PotionFile {
            category: Category::Components,
            path: PathBuf::from("/site").join(rel),
        }
    }

    fn render(report: &ValidationReport) -> String {
        let mut buf = Vec::new();
        report.render(&mut buf, Path::new("/site")).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_report_fails() {
        let report = ValidationReport::new();
        assert_eq!(report.exit_code(), 1);
        assert!(!report.is_success());
        assert!(render(&report).contains("No potions found to validate."));
    }

    #[test]
    fn all_valid_succeeds() {
        let mut report = ValidationReport::new();
        report.push(potion("potions/components/button.json"), ValidationOutcome::passed());
        report.push(potion("potions/components/tabs.json"), ValidationOutcome::passed());

        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.total_errors(), 0);
        let text = render(&report);
        assert!(text.contains("✓ potions/components/button.json"));
        assert!(text.contains("Total potions: 2"));
        assert!(text.contains("All potions are valid!"));
    }

    #[test]
    fn failures_are_counted_and_listed() {
        let mut report = ValidationReport::new();
        report.push(potion("potions/components/button.json"), ValidationOutcome::passed());
        report.push(
            potion("potions/components/dialog.json"),
            ValidationOutcome::failed(vec![
                ValidationIssue {
                    path: "/".into(),
                    message: "\"name\" is a required property (missingProperty: \"name\")".into(),
                    schema_path: "/allOf/0/required".into(),
                },
                ValidationIssue::at_root("second"),
            ]),
        );

        assert_eq!(report.total(), 2);
        assert_eq!(report.valid_count(), 1);
        assert_eq!(report.invalid_count(), 1);
        assert_eq!(report.total_errors(), 2);
        assert_eq!(report.exit_code(), 1);

        let text = render(&report);
        assert!(text.contains("✗ potions/components/dialog.json"));
        assert!(text.contains("Found 2 error(s):"));
        assert!(text.contains("  1. Path: /"));
        assert!(text.contains("     Schema: /allOf/0/required"));
        assert!(text.contains("  2. Path: /"));
        assert!(text.contains("✗ Invalid: 1"));
        assert!(text.contains("Total errors: 2"));
        assert!(text.contains("Validation failed."));
    }

    #[test]
    fn issue_without_schema_path_omits_schema_line() {
        let mut report = ValidationReport::new();
        report.push(
            potion("potions/components/broken.json"),
            ValidationOutcome::rejected("JSON parse error: EOF while parsing"),
        );
        let text = render(&report);
        assert!(text.contains("Error: JSON parse error: EOF while parsing"));
        assert!(!text.contains("Schema:"));
    }

    #[test]
    fn paths_outside_base_are_shown_in_full() {
        let mut report = ValidationReport::new();
        report.push(
            PotionFile {
                category: Category::Tooling,
                path: PathBuf::from("/elsewhere/tooling/x.json"),
            },
            ValidationOutcome::passed(),
        );
        assert!(render(&report).contains("✓ /elsewhere/tooling/x.json"));
    }
}
