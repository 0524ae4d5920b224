//! # Error Types
//!
//! [`SourceError`] covers loading one schema document; [`SchemaError`]
//! covers a whole validation pass. Only [`SourceError::Malformed`] is
//! fatal during resolution. Missing or unreadable schemas leave a gap and
//! the pass continues.

use thiserror::Error;

/// Error loading a single schema document from a [`SchemaSource`].
///
/// [`SchemaSource`]: crate::source::SchemaSource
#[derive(Error, Debug)]
pub enum SourceError {
    /// Nothing exists at the location.
    #[error("schema not found: {location}")]
    NotFound {
        /// Location relative to the schema root.
        location: String,
    },

    /// The location exists but could not be read or fetched.
    #[error("failed to load schema {location}: {reason}")]
    Unreadable {
        /// Location relative to the schema root.
        location: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// The document was read but is not valid JSON.
    #[error("schema {location} is not valid JSON: {reason}")]
    Malformed {
        /// Location relative to the schema root.
        location: String,
        /// Parser message.
        reason: String,
    },

    /// The HTTP source was configured with a base URL that cannot be used.
    #[error("invalid schema base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// The configured URL.
        url: String,
        /// Human-readable reason.
        reason: String,
    },
}

impl SourceError {
    /// Whether this error must abort the validation pass.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::InvalidBaseUrl { .. })
    }
}

/// Error that aborts a validation pass.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A schema could not be loaded or parsed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The resolved category schema could not be compiled.
    #[error("failed to compile schema {schema_id}: {reason}")]
    Compile {
        /// The schema `$id`, or its location when it has none.
        schema_id: String,
        /// Compiler message.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_malformed_and_config_errors_are_fatal() {
        let not_found = SourceError::NotFound {
            location: "a.json".into(),
        };
        let unreadable = SourceError::Unreadable {
            location: "a.json".into(),
            reason: "permission denied".into(),
        };
        let malformed = SourceError::Malformed {
            location: "a.json".into(),
            reason: "EOF while parsing".into(),
        };
        assert!(!not_found.is_fatal());
        assert!(!unreadable.is_fatal());
        assert!(malformed.is_fatal());
    }

    #[test]
    fn test_schema_error_is_transparent_over_source() {
        let err: SchemaError = SourceError::NotFound {
            location: "categories/components.schema.json".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "schema not found: categories/components.schema.json"
        );
    }
}
