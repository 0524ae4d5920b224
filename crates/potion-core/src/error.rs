//! # Error Types
//!
//! Errors raised while mapping a potion document to its category. These are
//! reported to users as validation failures, so the `Display` text is the
//! exact message a user sees.

use thiserror::Error;

/// Error determining which category schema applies to a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// The category key is not one of the five known categories.
    #[error("Unknown category: {0}")]
    Unknown(String),

    /// The document carries neither a `$schema` pointing at a category
    /// schema nor a `category` field.
    #[error("Could not determine category. Missing $schema or category field.")]
    Undetermined,
}
