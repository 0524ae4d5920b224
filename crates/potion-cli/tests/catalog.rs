//! Integration test: run the catalog validation over a potion tree on disk,
//! using the schema fixtures shared with `potion-schema`.

use std::path::{Path, PathBuf};

use potion_cli::check::check_candidate;
use potion_cli::config::PotionConfig;
use potion_cli::validate::{run_validate, validate_tree, ValidateArgs};
use potion_core::Category;
use potion_schema::{FsSchemaSource, SchemaValidator};
use serde_json::json;

fn schema_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../potion-schema/tests/fixtures/schemas")
}

fn validator() -> SchemaValidator<FsSchemaSource> {
    SchemaValidator::new(FsSchemaSource::new(schema_dir()))
}

fn write_potion(root: &Path, rel: &str, body: &serde_json::Value) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_vec_pretty(body).unwrap()).unwrap();
}

fn button() -> serde_json::Value {
    json!({
        "id": "button",
        "name": "Button",
        "category": "components",
        "version": "1.0.0",
        "accessibility": { "keyboardNavigation": true }
    })
}

fn dashboard() -> serde_json::Value {
    json!({
        "id": "dashboard",
        "name": "Dashboard",
        "category": "layouts",
        "version": "1.2.0",
        "regions": ["header", "main"]
    })
}

#[test]
fn valid_catalog_passes() {
    let dir = tempfile::tempdir().unwrap();
    write_potion(dir.path(), "components/button.json", &button());
    write_potion(dir.path(), "layouts/dashboard.json", &dashboard());

    let report = validate_tree(&validator(), dir.path());
    assert_eq!(report.total(), 2);
    assert_eq!(report.invalid_count(), 0, "{:?}", report.results());
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn folder_category_wins_over_document_field() {
    let dir = tempfile::tempdir().unwrap();
    // A layout document filed under components is checked as a component.
    write_potion(dir.path(), "components/dashboard.json", &dashboard());

    let report = validate_tree(&validator(), dir.path());
    let (potion, outcome) = &report.results()[0];
    assert_eq!(potion.category, Category::Components);
    assert!(!outcome.valid);
    assert!(
        outcome.errors.iter().any(|e| e.message.contains("accessibility")),
        "{:?}",
        outcome.errors
    );
}

#[test]
fn broken_documents_are_reported_individually() {
    let dir = tempfile::tempdir().unwrap();
    write_potion(dir.path(), "components/button.json", &button());
    std::fs::write(dir.path().join("components/truncated.json"), b"{\"id\": ").unwrap();
    write_potion(dir.path(), "tooling/empty.json", &json!({}));

    let report = validate_tree(&validator(), dir.path());
    assert_eq!(report.total(), 3);
    assert_eq!(report.valid_count(), 1);
    assert_eq!(report.invalid_count(), 2);
    assert_eq!(report.exit_code(), 1);

    let truncated = &report.results()[1].1;
    assert_eq!(truncated.errors.len(), 1);
    assert!(truncated.errors[0].message.starts_with("JSON parse error: "));

    let empty = &report.results()[2].1;
    assert!(empty.errors.iter().any(|e| e.path == "/"));
    assert!(report.total_errors() >= 2);
}

#[test]
fn run_validate_resolves_directories_from_cwd() {
    let dir = tempfile::tempdir().unwrap();
    write_potion(dir.path(), "site/potions/components/button.json", &button());

    let config = PotionConfig {
        potions_dir: PathBuf::from("site/potions"),
        schemas_dir: schema_dir(),
        ..PotionConfig::default()
    };
    let code = run_validate(&ValidateArgs::default(), &config, dir.path()).unwrap();
    assert_eq!(code, 0);

    let args = ValidateArgs {
        potions_dir: Some(PathBuf::from("site/none")),
        ..ValidateArgs::default()
    };
    assert_eq!(run_validate(&args, &config, dir.path()).unwrap(), 1);
}

#[test]
fn check_detects_category_when_not_given() {
    let validator = validator();
    let outcome = check_candidate(&validator, None, &dashboard().to_string());
    assert!(outcome.valid, "{:?}", outcome.errors);

    let outcome = check_candidate(&validator, Some("components"), &dashboard().to_string());
    assert!(!outcome.valid);

    let outcome = check_candidate(&validator, None, r#"{"id": "x"}"#);
    assert_eq!(
        outcome.errors[0].message,
        "Could not determine category. Missing $schema or category field."
    );
}
