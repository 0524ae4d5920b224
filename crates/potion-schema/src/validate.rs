//! # Potion Validation
//!
//! Validates candidate potion documents against their category schema
//! (JSON Schema Draft 2020-12, format assertions on).
//!
//! ## Pass Isolation
//!
//! Every call runs one pass with a fresh [`Resolver`]: the base and
//! contract schemas are loaded and resolved first, then the category
//! schema, then the category schema is compiled against the registry the
//! pass built. The registry, resolution state, and document cache are
//! dropped when the call returns, so nothing leaks between documents and
//! concurrent calls never share mutable state.
//!
//! ## Failure Reporting
//!
//! Document-level failures never escape [`SchemaValidator::validate_document`]
//! as errors. Parse failures, unknown categories, malformed schemas, and
//! compile failures all come back as a failed [`ValidationOutcome`] with a
//! single root-level issue.

use jsonschema::Validator;
use potion_core::{Category, RefRules};
use serde_json::Value;

use crate::error::SchemaError;
use crate::outcome::{ValidationIssue, ValidationOutcome};
use crate::registry::SchemaRegistry;
use crate::resolve::Resolver;
use crate::source::SchemaSource;

/// Validates potion documents using schemas from a [`SchemaSource`].
///
/// `SchemaValidator` is `Send + Sync` whenever its source is.
#[derive(Debug, Clone)]
pub struct SchemaValidator<S> {
    source: S,
    rules: RefRules,
}

impl<S: SchemaSource> SchemaValidator<S> {
    /// Validator over `source`, with references under the public site origin.
    pub fn new(source: S) -> Self {
        Self::with_rules(source, RefRules::default())
    }

    /// Validator over `source` with custom reference rules.
    pub fn with_rules(source: S, rules: RefRules) -> Self {
        Self { source, rules }
    }

    /// Validate raw JSON text against the schema for `category_key`.
    ///
    /// The text is parsed before any schema is touched. Never fails: every
    /// problem is reported inside the outcome.
    pub fn validate_document(&self, category_key: &str, candidate: &str) -> ValidationOutcome {
        let instance = match parse_candidate(candidate) {
            Ok(instance) => instance,
            Err(outcome) => return outcome,
        };

        match category_key.parse::<Category>() {
            Ok(category) => self.validate_or_report(category, &instance),
            Err(e) => ValidationOutcome::rejected(e.to_string()),
        }
    }

    /// Validate raw JSON text, working out the category from the
    /// document's `$schema` or `category` field.
    pub fn validate_detected(&self, candidate: &str) -> ValidationOutcome {
        let instance = match parse_candidate(candidate) {
            Ok(instance) => instance,
            Err(outcome) => return outcome,
        };

        match Category::detect(&instance) {
            Ok(category) => self.validate_or_report(category, &instance),
            Err(e) => ValidationOutcome::rejected(e.to_string()),
        }
    }

    /// Validate a parsed document against a category schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when a schema is malformed, the category
    /// schema itself cannot be loaded, or compilation fails. Constraint
    /// violations are not errors; they are in the returned outcome.
    pub fn validate_value(
        &self,
        category: Category,
        instance: &Value,
    ) -> Result<ValidationOutcome, SchemaError> {
        let (schema, registry) = self.prepare(category)?;
        let validator = compile(category, &schema, &registry)?;

        let errors: Vec<ValidationIssue> = validator
            .iter_errors(instance)
            .map(|e| ValidationIssue::from_error(&e))
            .collect();

        tracing::debug!(
            category = %category,
            registered = registry.len(),
            errors = errors.len(),
            "validation pass complete"
        );

        if errors.is_empty() {
            Ok(ValidationOutcome::passed())
        } else {
            Ok(ValidationOutcome::failed(errors))
        }
    }

    /// Run the resolution half of a pass: required schemas, then the
    /// category schema. Returns the category schema with merged `$defs`
    /// and the registry built for it.
    pub fn prepare(&self, category: Category) -> Result<(Value, SchemaRegistry), SchemaError> {
        let mut resolver = Resolver::new(&self.source, &self.rules);
        resolver.resolve_required()?;

        let mut schema = resolver.load(category.schema_location())?;
        resolver.resolve_schema(&mut schema)?;

        Ok((schema, resolver.into_registry()))
    }

    fn validate_or_report(&self, category: Category, instance: &Value) -> ValidationOutcome {
        self.validate_value(category, instance).unwrap_or_else(|e| {
            tracing::error!(category = %category, error = %e, "validation pass aborted");
            ValidationOutcome::rejected(format!("Validation error: {e}"))
        })
    }
}

fn parse_candidate(candidate: &str) -> Result<Value, ValidationOutcome> {
    serde_json::from_str(candidate.trim())
        .map_err(|e| ValidationOutcome::rejected(format!("JSON parse error: {e}")))
}

fn compile(
    category: Category,
    schema: &Value,
    registry: &SchemaRegistry,
) -> Result<Validator, SchemaError> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.should_validate_formats(true);
    opts.with_retriever(registry.retriever());

    opts.build(schema).map_err(|e| SchemaError::Compile {
        schema_id: schema
            .get("$id")
            .and_then(Value::as_str)
            .unwrap_or(category.schema_location())
            .to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use serde_json::json;
    use std::collections::HashMap;

    const ORIGIN: &str = "https://uipotion.com/schema/";

    struct MapSource(HashMap<&'static str, &'static str>);

    impl SchemaSource for MapSource {
        fn load(&self, location: &str) -> Result<Value, SourceError> {
            let raw = self.0.get(location).ok_or_else(|| SourceError::NotFound {
                location: location.to_string(),
            })?;
            serde_json::from_str(raw).map_err(|e| SourceError::Malformed {
                location: location.to_string(),
                reason: e.to_string(),
            })
        }
    }

    fn tooling_only(schema: &'static str) -> SchemaValidator<MapSource> {
        SchemaValidator::new(MapSource(HashMap::from([(
            "categories/tooling.schema.json",
            schema,
        )])))
    }

    #[test]
    fn parse_error_short_circuits_before_category_lookup() {
        let validator = tooling_only("{}");
        let outcome = validator.validate_document("widgets", "{ not json");
        assert!(!outcome.valid);
        assert_eq!(outcome.errors.len(), 1);
        assert!(
            outcome.errors[0].message.starts_with("JSON parse error: "),
            "{:?}",
            outcome.errors
        );
        assert_eq!(outcome.errors[0].path, "/");
        assert_eq!(outcome.errors[0].schema_path, "");
    }

    #[test]
    fn unknown_category_is_a_single_issue() {
        let validator = tooling_only("{}");
        let outcome = validator.validate_document("widgets", "{}");
        assert_eq!(outcome, ValidationOutcome::rejected("Unknown category: widgets"));
    }

    #[test]
    fn missing_category_schema_is_reported_not_raised() {
        let validator = tooling_only("{}");
        let outcome = validator.validate_document("layouts", "{}");
        assert!(!outcome.valid);
        assert_eq!(outcome.errors.len(), 1);
        assert!(
            outcome.errors[0].message.starts_with("Validation error: "),
            "{:?}",
            outcome.errors
        );
    }

    #[test]
    fn malformed_category_schema_is_reported_not_raised() {
        let validator = tooling_only("{ \"type\": ");
        let outcome = validator.validate_document("tooling", "{}");
        assert!(!outcome.valid);
        assert!(outcome.errors[0].message.contains("not valid JSON"));
    }

    #[test]
    fn category_schema_without_base_still_validates() {
        let validator = tooling_only(
            r#"{
                "$id": "https://uipotion.com/schema/categories/tooling.schema.json",
                "type": "object",
                "required": ["tool"]
            }"#,
        );
        assert!(validator.validate_document("tooling", r#"{"tool": "eslint"}"#).valid);
        assert!(!validator.validate_document("tooling", "{}").valid);
    }

    #[test]
    fn unresolved_reference_is_never_satisfiable() {
        let validator = tooling_only(
            r#"{
                "$id": "https://uipotion.com/schema/categories/tooling.schema.json",
                "type": "object",
                "properties": {
                    "config": { "$ref": "https://uipotion.com/schema/contracts/missing.schema.json" }
                }
            }"#,
        );
        assert!(validator.validate_document("tooling", "{}").valid);
        let outcome = validator.validate_document("tooling", r#"{"config": {}}"#);
        assert!(!outcome.valid);
        assert_eq!(outcome.errors[0].path, "/config");
    }

    #[test]
    fn detected_category_uses_schema_field() {
        let validator = tooling_only(
            r#"{
                "$id": "https://uipotion.com/schema/categories/tooling.schema.json",
                "required": ["tool"]
            }"#,
        );
        let doc = json!({ "$schema": format!("{ORIGIN}categories/tooling.schema.json") });
        let outcome = validator.validate_detected(&doc.to_string());
        assert!(!outcome.valid);
        assert!(outcome.errors[0].message.contains("tool"));

        let outcome = validator.validate_detected("{}");
        assert_eq!(
            outcome,
            ValidationOutcome::rejected(
                "Could not determine category. Missing $schema or category field."
            )
        );
    }

    #[test]
    fn prepare_returns_merged_category_schema() {
        let validator = tooling_only(
            r##"{
                "$id": "https://uipotion.com/schema/categories/tooling.schema.json",
                "allOf": [{ "$defs": { "rule": { "type": "string" } } }],
                "properties": { "rules": { "items": { "$ref": "#/$defs/rule" } } }
            }"##,
        );
        let (schema, registry) = validator.prepare(Category::Tooling).unwrap();
        assert_eq!(schema["$defs"]["rule"], json!({ "type": "string" }));
        assert!(registry.contains(&format!("{ORIGIN}categories/tooling.schema.json")));

        assert!(validator.validate_document("tooling", r#"{"rules": ["a"]}"#).valid);
        assert!(!validator.validate_document("tooling", r#"{"rules": [1]}"#).valid);
    }

    #[test]
    fn embedded_resource_defs_resolve_through_referenced_schema() {
        let validator = SchemaValidator::new(MapSource(HashMap::from([
            (
                "ext.schema.json",
                r##"{
                    "$id": "https://uipotion.com/schema/ext.schema.json",
                    "properties": {
                        "inner": {
                            "$id": "https://uipotion.com/schema/inner.schema.json",
                            "allOf": [{ "$defs": { "n": { "type": "number" } } }],
                            "properties": { "x": { "$ref": "#/$defs/n" } }
                        }
                    }
                }"##,
            ),
            (
                "categories/tooling.schema.json",
                r#"{
                    "$id": "https://uipotion.com/schema/categories/tooling.schema.json",
                    "allOf": [{ "$ref": "https://uipotion.com/schema/ext.schema.json" }]
                }"#,
            ),
        ])));

        let outcome = validator.validate_document("tooling", r#"{"inner": {"x": 1}}"#);
        assert_eq!(outcome, ValidationOutcome::passed());

        let outcome = validator.validate_document("tooling", r#"{"inner": {"x": "one"}}"#);
        assert!(!outcome.valid);
        assert_eq!(outcome.errors[0].path, "/inner/x");
    }

    #[test]
    fn validator_is_send_and_sync_over_fs_source() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaValidator<crate::source::FsSchemaSource>>();
        assert_send_sync::<SchemaValidator<crate::source::HttpSchemaSource>>();
    }
}
