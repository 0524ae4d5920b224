//! # Schema Registry
//!
//! Holds the schemas registered during one validation pass, keyed by their
//! declared `$id`. After resolution the registry is handed to the
//! `jsonschema` evaluator through [`RegistryRetriever`], so cross-schema
//! `$ref`s are answered from memory and never trigger a network request.

use std::collections::HashMap;

use jsonschema::{Retrieve, Uri};
use potion_core::META_SCHEMA_PREFIX;
use serde_json::{json, Value};

/// Schemas registered under their `$id` for the current pass.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Value>,
}

impl SchemaRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema` under `id`. Returns `false`, leaving the existing
    /// entry untouched, when `id` is already registered.
    pub fn register(&mut self, id: impl Into<String>, schema: Value) -> bool {
        match self.schemas.entry(id.into()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(schema);
                true
            }
        }
    }

    /// Whether a schema is registered under exactly this key.
    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    /// Look up a registered schema.
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.schemas.get(id)
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered ids, sorted alphabetically.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Snapshot of the registry for the evaluator.
    pub(crate) fn retriever(&self) -> RegistryRetriever {
        RegistryRetriever {
            schemas: self.schemas.clone(),
        }
    }
}

/// Answers the evaluator's `$ref` lookups from a registry snapshot.
///
/// A URI that was never registered resolves to a schema no instance can
/// satisfy, so the document fails at the referencing location instead of
/// the whole pass aborting. Meta-schema URIs resolve to the empty schema.
pub(crate) struct RegistryRetriever {
    schemas: HashMap<String, Value>,
}

impl Retrieve for RegistryRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let key = uri_str.strip_suffix('#').unwrap_or(uri_str);

        if let Some(value) = self.schemas.get(key) {
            return Ok(value.clone());
        }

        if key.starts_with(META_SCHEMA_PREFIX) {
            return Ok(json!({}));
        }

        tracing::warn!(
            uri = key,
            "reference was not resolved before compilation; treating it as unsatisfiable"
        );
        Ok(json!({ "not": {} }))
    }
}
