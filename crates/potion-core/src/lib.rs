//! # potion-core — Foundational Types for the Potion Schema Toolkit
//!
//! Every other crate in the workspace depends on `potion-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Single `Category` enum.** The five potion groupings are a closed set.
//!    Each variant carries its schema location, so looking up the schema for
//!    a category is an exhaustive `match`, not a string-keyed table. String
//!    keys are parsed once, at the edge, with [`Category::from_str`].
//!
//! 2. **Fixed schema layout.** The base contract and the three capability
//!    contracts live at fixed locations relative to the schema root
//!    ([`REQUIRED_SCHEMAS`]); category schemas live under `categories/`.
//!
//! 3. **`$ref` classification is pure.** [`RefRules::classify`] maps a
//!    reference string to a schema-root-relative location without touching
//!    the filesystem or the network. Loading is somebody else's job.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `potion-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//!
//! [`Category::from_str`]: std::str::FromStr::from_str

pub mod category;
pub mod error;
pub mod reference;

pub use category::{Category, BASE_SCHEMA, CONTRACT_SCHEMAS, REQUIRED_SCHEMAS};
pub use error::CategoryError;
pub use reference::{RefRules, SchemaRef, DEFAULT_SITE_ORIGIN, META_SCHEMA_PREFIX};
