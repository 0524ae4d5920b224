//! # Validation Outcome
//!
//! The result of validating one candidate document: a validity flag plus
//! an ordered list of issues. Serialises as
//! `{"valid": bool, "errors": [{"path", "message", "schemaPath"}]}`.
//!
//! Issue messages carry the evaluator's message followed by the failed
//! constraint's parameters, e.g.
//! `"size" is not one of ["sm","md"] (allowed values: ["sm","md"])`.

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One reason a document was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// JSON Pointer to the offending value; `/` for the document root.
    pub path: String,
    /// Human-readable description, with constraint parameters appended.
    pub message: String,
    /// JSON Pointer within the schema that rejected the value. Empty for
    /// issues raised before evaluation (parse errors, unknown category).
    pub schema_path: String,
}

impl ValidationIssue {
    /// Issue at the document root with no schema location.
    pub fn at_root(message: impl Into<String>) -> Self {
        Self {
            path: "/".to_string(),
            message: message.into(),
            schema_path: String::new(),
        }
    }

    pub(crate) fn from_error(error: &ValidationError<'_>) -> Self {
        let path = error.instance_path.to_string();
        Self {
            path: if path.is_empty() { "/".to_string() } else { path },
            message: with_params(error.to_string(), &constraint_params(&error.kind)),
            schema_path: error.schema_path.to_string(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validity plus the issues found, in evaluator order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// True when the document satisfies its category schema.
    pub valid: bool,
    /// Empty when `valid` is true.
    pub errors: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    /// A passing outcome.
    pub fn passed() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// A failing outcome. An empty `errors` list still means invalid.
    pub fn failed(errors: Vec<ValidationIssue>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }

    /// A failing outcome with a single root-level issue.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::failed(vec![ValidationIssue::at_root(message)])
    }

    /// Number of issues.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Parameters of the failed constraint, named the way schema authors see
/// them in other validators' output.
fn constraint_params(kind: &ValidationErrorKind) -> Vec<(&'static str, Value)> {
    match kind {
        ValidationErrorKind::Enum { options, .. } => vec![("allowedValues", options.clone())],
        ValidationErrorKind::Constant { expected_value, .. } => {
            vec![("allowedValue", expected_value.clone())]
        }
        ValidationErrorKind::Required { property, .. } => {
            vec![("missingProperty", property.clone())]
        }
        ValidationErrorKind::AdditionalProperties { unexpected, .. } => unexpected
            .iter()
            .map(|name| ("additionalProperty", Value::String(name.clone())))
            .collect(),
        ValidationErrorKind::Pattern { pattern, .. } => {
            vec![("pattern", Value::String(pattern.clone()))]
        }
        ValidationErrorKind::Format { format, .. } => {
            vec![("format", Value::String(format.clone()))]
        }
        ValidationErrorKind::MinLength { limit, .. }
        | ValidationErrorKind::MaxLength { limit, .. }
        | ValidationErrorKind::MinItems { limit, .. }
        | ValidationErrorKind::MaxItems { limit, .. } => vec![("limit", Value::from(*limit))],
        ValidationErrorKind::Minimum { limit, .. } | ValidationErrorKind::Maximum { limit, .. } => {
            vec![("limit", limit.clone())]
        }
        _ => Vec::new(),
    }
}

/// Append `(key: value, ...)` to `message`. An enumeration renders as
/// `allowed values: [...]`.
fn with_params(message: String, params: &[(&str, Value)]) -> String {
    if params.is_empty() {
        return message;
    }
    let details = params
        .iter()
        .map(|(key, value)| {
            if *key == "allowedValues" {
                format!("allowed values: {value}")
            } else {
                format!("{key}: {value}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{message} ({details})")
}
