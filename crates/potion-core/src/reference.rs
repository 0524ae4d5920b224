//! # Schema Reference Classification
//!
//! Maps a `$ref` string to a location relative to the schema root. The same
//! rules serve the filesystem and HTTP schema sources: a location such as
//! `contracts/state.contract.schema.json` is joined onto a directory or a
//! base URL by whoever loads it.
//!
//! Recognised forms, checked in order:
//!
//! | reference | location |
//! |---|---|
//! | `https://json-schema.org/...` | never loaded |
//! | `<site origin><path>` | `<path>` |
//! | `http://localhost:<port>/schema/<path>` | `<path>` |
//! | `http://127.0.0.1:<port>/schema/<path>` | `<path>` |
//! | `/schema/<path>` | `<path>` |
//! | `schemas/<path>` | `<path>` |
//!
//! Anything else (same-document fragments, foreign hosts, bare relative
//! paths) is [`SchemaRef::Unmapped`]. A trailing `#fragment` is dropped
//! from the location.

/// Prefix of the public JSON Schema meta-schema namespace.
pub const META_SCHEMA_PREFIX: &str = "https://json-schema.org/";

/// Public origin under which potion schemas declare their `$id`s.
pub const DEFAULT_SITE_ORIGIN: &str = "https://uipotion.com/schema/";

const LOOPBACK_PREFIXES: [&str; 2] = ["http://localhost:", "http://127.0.0.1:"];

/// Outcome of classifying a `$ref` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaRef {
    /// Points into the JSON Schema meta-schema namespace. Never loaded.
    MetaSchema,
    /// Loadable schema at this location relative to the schema root.
    Local(String),
    /// No prefix rule applies.
    Unmapped,
}

/// Prefix rules translating references into schema-root-relative locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefRules {
    site_origin: String,
}

impl Default for RefRules {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_ORIGIN)
    }
}

impl RefRules {
    /// Rules for schemas published under `site_origin`. A missing trailing
    /// slash is added.
    pub fn new(site_origin: impl Into<String>) -> Self {
        let mut site_origin = site_origin.into();
        if !site_origin.ends_with('/') {
            site_origin.push('/');
        }
        Self { site_origin }
    }

    /// The site origin, always ending in `/`.
    pub fn site_origin(&self) -> &str {
        &self.site_origin
    }

    /// Classify a reference string.
    pub fn classify(&self, reference: &str) -> SchemaRef {
        if reference.starts_with(META_SCHEMA_PREFIX) {
            return SchemaRef::MetaSchema;
        }

        let path = if let Some(rest) = reference.strip_prefix(self.site_origin.as_str()) {
            Some(rest)
        } else if LOOPBACK_PREFIXES.iter().any(|p| reference.starts_with(p)) {
            reference
                .strip_prefix("http://")
                .and_then(|authority_and_path| authority_and_path.split_once('/'))
                .and_then(|(_, path)| path.strip_prefix("schema/"))
        } else if let Some(rest) = reference.strip_prefix("/schema/") {
            Some(rest)
        } else {
            reference.strip_prefix("schemas/")
        };

        match path.map(strip_fragment) {
            Some(location) if !location.is_empty() => SchemaRef::Local(location.to_string()),
            _ => SchemaRef::Unmapped,
        }
    }
}

fn strip_fragment(path: &str) -> &str {
    path.split_once('#').map_or(path, |(before, _)| before)
}
