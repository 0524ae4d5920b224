//! # potion-schema — Reference Resolution & Validation
//!
//! Validates potion documents against their category schema. Category
//! schemas are composed from a base contract and capability contracts via
//! `allOf` and `$ref`, so every referenced schema has to be loaded and
//! registered before the category schema can be compiled.
//!
//! ## Layers
//!
//! - [`source`]: the [`SchemaSource`] capability: "load the schema at this
//!   location". [`FsSchemaSource`] reads a local schema tree (build path);
//!   [`HttpSchemaSource`] fetches from a served site (interactive path).
//! - [`resolve`]: the [`Resolver`]: walks a schema, loads each transitively
//!   referenced schema once, merges `allOf` `$defs`, and fills a
//!   [`SchemaRegistry`].
//! - [`registry`]: the per-pass [`SchemaRegistry`] and the retriever that
//!   serves it to the `jsonschema` evaluator.
//! - [`validate`]: the [`SchemaValidator`] entry point, one isolated pass
//!   per call.
//! - [`outcome`]: [`ValidationOutcome`] and its user-facing messages.
//!
//! ## Crate Policy
//!
//! - Depends only on `potion-core` internally.
//! - Nothing is shared between validation calls. Each call builds its own
//!   registry, resolution state, and document cache and drops them on
//!   return.
//! - A missing schema is a warning; a malformed one fails the call.

pub mod error;
pub mod outcome;
pub mod registry;
pub mod resolve;
pub mod source;
pub mod validate;

pub use error::{SchemaError, SourceError};
pub use outcome::{ValidationIssue, ValidationOutcome};
pub use registry::SchemaRegistry;
pub use resolve::{ResolutionState, Resolver};
pub use source::{FsSchemaSource, HttpSchemaSource, HttpSourceConfig, SchemaSource};
pub use validate::SchemaValidator;
