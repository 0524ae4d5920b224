//! # Potion Category — Closed Set of Catalog Groupings
//!
//! Defines the `Category` enum and the fixed schema layout. Each category
//! owns exactly one schema under `categories/`, composed via `allOf` from
//! the base contract and the capability contracts in [`REQUIRED_SCHEMAS`].
//!
//! Category schemas reference the base and contract schemas by `$id`, so
//! the required set must be registered before any category schema is
//! compiled.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::error::CategoryError;

/// Location of the base potion contract, relative to the schema root.
pub const BASE_SCHEMA: &str = "potion.base.schema.json";

/// Locations of the capability contracts, relative to the schema root.
pub const CONTRACT_SCHEMAS: [&str; 3] = [
    "contracts/accessibility.contract.schema.json",
    "contracts/state.contract.schema.json",
    "contracts/interactions.contract.schema.json",
];

/// Schemas loaded and resolved before any category schema, in this order.
pub const REQUIRED_SCHEMAS: [&str; 4] = [
    BASE_SCHEMA,
    CONTRACT_SCHEMAS[0],
    CONTRACT_SCHEMAS[1],
    CONTRACT_SCHEMAS[2],
];

/// One of the five potion groupings. Each has its own JSON Schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Self-contained widgets (buttons, dialogs, tabs).
    Components,
    /// Page-level arrangement (dashboards, split views).
    Layouts,
    /// Multi-component product features (search, onboarding).
    Features,
    /// Cross-cutting interaction patterns (infinite scroll, undo).
    Patterns,
    /// Developer tooling conventions (theming, linting).
    Tooling,
}

impl Category {
    /// All categories, in the order potion folders are scanned.
    pub fn all() -> &'static [Category] {
        &[
            Self::Components,
            Self::Features,
            Self::Layouts,
            Self::Patterns,
            Self::Tooling,
        ]
    }

    /// The key used in folder names, `$schema` URLs and `category` fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Components => "components",
            Self::Layouts => "layouts",
            Self::Features => "features",
            Self::Patterns => "patterns",
            Self::Tooling => "tooling",
        }
    }

    /// Location of this category's schema, relative to the schema root.
    pub fn schema_location(&self) -> &'static str {
        match self {
            Self::Components => "categories/components.schema.json",
            Self::Layouts => "categories/layouts.schema.json",
            Self::Features => "categories/features.schema.json",
            Self::Patterns => "categories/patterns.schema.json",
            Self::Tooling => "categories/tooling.schema.json",
        }
    }

    /// Work out which category a parsed potion document belongs to.
    ///
    /// A `$schema` URL naming `categories/<key>.schema.json` wins; otherwise
    /// the top-level `category` string is used. A key that is present but
    /// not one of the five categories is reported as
    /// [`CategoryError::Unknown`] so the caller sees what was written.
    pub fn detect(document: &Value) -> Result<Self, CategoryError> {
        let from_schema = document
            .get("$schema")
            .and_then(Value::as_str)
            .and_then(category_key_in_schema_uri);

        let key = match from_schema {
            Some(key) => key,
            None => document
                .get("category")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .ok_or(CategoryError::Undetermined)?,
        };

        key.parse()
    }
}

/// Extract `<key>` from a URI containing `categories/<key>.schema.json`,
/// where `<key>` is made of word characters.
fn category_key_in_schema_uri(uri: &str) -> Option<&str> {
    let mut rest = uri;
    while let Some(idx) = rest.find("categories/") {
        let after = &rest[idx + "categories/".len()..];
        let key_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if key_len > 0 && after[key_len..].starts_with(".schema.json") {
            return Some(&after[..key_len]);
        }
        rest = after;
    }
    None
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "components" => Ok(Self::Components),
            "layouts" => Ok(Self::Layouts),
            "features" => Ok(Self::Features),
            "patterns" => Ok(Self::Patterns),
            "tooling" => Ok(Self::Tooling),
            other => Err(CategoryError::Unknown(other.to_string())),
        }
    }
}
