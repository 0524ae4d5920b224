//! # Schema Reference Resolution
//!
//! Walks a schema document and loads every schema it transitively
//! references, so the registry is complete before the root is compiled.
//!
//! ## Traversal
//!
//! For a schema document:
//!
//! 1. If it declares an `$id` (or legacy `id`) not yet seen this pass, mark
//!    the id and merge the `$defs` of every `allOf` entry into its own
//!    `$defs` (later entries win). Same-document pointers such as
//!    `#/$defs/breakpointSpec` then resolve after composition.
//! 2. Visit `allOf`, `anyOf`, `oneOf` entries in order, then every
//!    `properties` value, then `items` and `additionalProperties` when they
//!    are objects. A sub-schema that is a `{"$ref": ...}` wrapper is resolved
//!    as a reference; any other object is walked as a schema.
//! 3. Register the schema marked in step 1. The registered copy is taken
//!    after the walk, so embedded resources with their own `$id` carry
//!    their merged `$defs` too.
//!
//! For a reference: meta-schema, already-registered, unmapped, and
//! already-followed references are skipped. Otherwise the schema is loaded
//! through the pass's document cache, the reference is marked as followed,
//! and the loaded schema is walked.
//!
//! ## Failure Policy
//!
//! A schema that cannot be found or read is logged and skipped; whatever
//! depends on it will fail at evaluation time. A schema that is not valid
//! JSON aborts the pass.

use std::collections::{HashMap, HashSet};

use potion_core::{RefRules, SchemaRef, REQUIRED_SCHEMAS};
use serde_json::{Map, Value};

use crate::error::{SchemaError, SourceError};
use crate::registry::SchemaRegistry;
use crate::source::SchemaSource;

const COMPOSITION_KEYWORDS: [&str; 3] = ["allOf", "anyOf", "oneOf"];
const NESTED_SCHEMA_KEYWORDS: [&str; 2] = ["items", "additionalProperties"];

/// What has already been processed in the current pass.
///
/// Schema ids and followed reference strings are tracked separately: a
/// reference string is often identical to the `$id` of the schema it
/// loads, and marking the reference must not stop that schema from being
/// registered.
#[derive(Debug, Clone, Default)]
pub struct ResolutionState {
    ids: HashSet<String>,
    references: HashSet<String>,
}

impl ResolutionState {
    /// Fresh state for a new pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a schema id. Returns `false` if it was already recorded.
    pub fn mark_id(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    /// Record a followed reference. Returns `false` if it was already recorded.
    pub fn mark_reference(&mut self, reference: &str) -> bool {
        self.references.insert(reference.to_string())
    }

    /// Whether a schema with this id has been processed.
    #[cfg(test)]
    pub(crate) fn has_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Whether this reference string has been followed.
    pub fn has_reference(&self, reference: &str) -> bool {
        self.references.contains(reference)
    }

    /// Number of schema ids processed.
    #[cfg(test)]
    pub(crate) fn id_count(&self) -> usize {
        self.ids.len()
    }
}

/// One resolution pass: registry, state, and document cache over a source.
///
/// Dropping the resolver discards everything it loaded.
pub struct Resolver<'a, S: ?Sized> {
    source: &'a S,
    rules: &'a RefRules,
    registry: SchemaRegistry,
    state: ResolutionState,
    cache: HashMap<String, Value>,
}

impl<'a, S: SchemaSource + ?Sized> Resolver<'a, S> {
    /// Start a pass over `source`, translating references with `rules`.
    pub fn new(source: &'a S, rules: &'a RefRules) -> Self {
        Self {
            source,
            rules,
            registry: SchemaRegistry::new(),
            state: ResolutionState::new(),
            cache: HashMap::new(),
        }
    }

    /// Schemas registered so far.
    #[cfg(test)]
    pub(crate) fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Resolution state so far.
    #[cfg(test)]
    pub(crate) fn state(&self) -> &ResolutionState {
        &self.state
    }

    /// End the pass, keeping only the registry.
    pub fn into_registry(self) -> SchemaRegistry {
        self.registry
    }

    /// Load a schema by location, at most once per pass.
    pub fn load(&mut self, location: &str) -> Result<Value, SourceError> {
        if let Some(schema) = self.cache.get(location) {
            return Ok(schema.clone());
        }
        tracing::debug!(location = %self.source.describe(location), "loading schema");
        let schema = self.source.load(location)?;
        self.cache.insert(location.to_string(), schema.clone());
        Ok(schema)
    }

    /// Load and resolve the base and contract schemas every category
    /// schema depends on. Missing ones are logged and skipped.
    pub fn resolve_required(&mut self) -> Result<(), SchemaError> {
        for location in REQUIRED_SCHEMAS {
            match self.load(location) {
                Ok(mut schema) => self.resolve_schema(&mut schema)?,
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => tracing::warn!(
                    location = %self.source.describe(location),
                    error = %e,
                    "could not load required schema"
                ),
            }
        }
        Ok(())
    }

    /// Register `schema` (if it declares a new `$id`) and everything it
    /// references. `schema` itself receives the merged `$defs`.
    pub fn resolve_schema(&mut self, schema: &mut Value) -> Result<(), SchemaError> {
        let Some(obj) = schema.as_object_mut() else {
            return Ok(());
        };

        let id = obj
            .get("$id")
            .or_else(|| obj.get("id"))
            .and_then(Value::as_str)
            .map(str::to_owned);

        // Marked before the walk so cycles stop here; registered after it so
        // the stored copy carries `$defs` merged into nested resources.
        let register_as = id.filter(|id| self.state.mark_id(id));
        if register_as.is_some() {
            merge_all_of_defs(obj);
        }

        for keyword in COMPOSITION_KEYWORDS {
            if let Some(Value::Array(entries)) = obj.get_mut(keyword) {
                for entry in entries.iter_mut() {
                    self.resolve_subschema(entry)?;
                }
            }
        }

        if let Some(Value::Object(properties)) = obj.get_mut("properties") {
            for property in properties.values_mut() {
                if property.is_object() {
                    self.resolve_subschema(property)?;
                }
            }
        }

        for keyword in NESTED_SCHEMA_KEYWORDS {
            if let Some(nested) = obj.get_mut(keyword) {
                if nested.is_object() {
                    self.resolve_subschema(nested)?;
                }
            }
        }

        if let Some(id) = register_as {
            if self.registry.register(id.clone(), Value::Object(obj.clone())) {
                tracing::debug!(id = %id, "registered schema");
            }
        }

        Ok(())
    }

    /// Load and resolve the schema a `$ref` string points at, unless it is
    /// a meta-schema, already registered, unmapped, or already followed.
    pub fn resolve_reference(&mut self, reference: &str) -> Result<(), SchemaError> {
        let location = match self.rules.classify(reference) {
            SchemaRef::MetaSchema => return Ok(()),
            SchemaRef::Unmapped => {
                tracing::trace!(reference, "reference has no schema location; skipping");
                return Ok(());
            }
            SchemaRef::Local(location) => location,
        };

        if self.registry.contains(reference) || self.state.has_reference(reference) {
            return Ok(());
        }

        match self.load(&location) {
            Ok(mut schema) => {
                self.state.mark_reference(reference);
                self.resolve_schema(&mut schema)
            }
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                tracing::warn!(
                    reference,
                    tried = %self.source.describe(&location),
                    error = %e,
                    "could not resolve reference"
                );
                Ok(())
            }
        }
    }

    fn resolve_subschema(&mut self, schema: &mut Value) -> Result<(), SchemaError> {
        match schema.get("$ref").and_then(Value::as_str) {
            Some(reference) => {
                let reference = reference.to_owned();
                self.resolve_reference(&reference)
            }
            None => self.resolve_schema(schema),
        }
    }
}

/// Fold every `allOf[*].$defs` into the schema's own `$defs`, left to right.
fn merge_all_of_defs(schema: &mut Map<String, Value>) {
    let Some(Value::Array(entries)) = schema.get("allOf") else {
        return;
    };

    let mut merged = match schema.get("$defs") {
        Some(Value::Object(defs)) => defs.clone(),
        _ => Map::new(),
    };
    for entry in entries {
        if let Some(Value::Object(defs)) = entry.get("$defs") {
            for (name, def) in defs {
                merged.insert(name.clone(), def.clone());
            }
        }
    }

    if !merged.is_empty() {
        schema.insert("$defs".to_string(), Value::Object(merged));
    }
}
