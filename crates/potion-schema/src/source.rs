//! # Schema Sources
//!
//! A [`SchemaSource`] loads one schema document given its location relative
//! to the schema root (for example `categories/components.schema.json`).
//! The resolver is written once against this trait; the build path plugs in
//! [`FsSchemaSource`] and the interactive path plugs in [`HttpSchemaSource`].
//!
//! ## Blocking Contract
//!
//! `SchemaSource::load` is synchronous. The resolver fetches one schema at a
//! time, in traversal order, so `$defs` merge precedence and registration
//! order are deterministic. [`HttpSchemaSource`] drives its async client on
//! the ambient Tokio runtime via `Handle::block_on`. Call it from a blocking
//! context (`spawn_blocking`, or a plain thread that has entered a
//! multi-threaded runtime), never from inside an async task.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::error::SourceError;

/// Capability to load a schema document by location.
pub trait SchemaSource {
    /// Load and parse the schema at `location`.
    fn load(&self, location: &str) -> Result<Value, SourceError>;

    /// Where `location` actually resolves to, for log messages.
    fn describe(&self, location: &str) -> String {
        location.to_string()
    }
}

impl<S: SchemaSource + ?Sized> SchemaSource for &S {
    fn load(&self, location: &str) -> Result<Value, SourceError> {
        (**self).load(location)
    }

    fn describe(&self, location: &str) -> String {
        (**self).describe(location)
    }
}

fn parse_schema(location: &str, content: &str) -> Result<Value, SourceError> {
    serde_json::from_str(content).map_err(|e| SourceError::Malformed {
        location: location.to_string(),
        reason: e.to_string(),
    })
}

// ─── Filesystem ─────────────────────────────────────────────────────────

/// Reads schemas from a local directory tree.
#[derive(Debug, Clone)]
pub struct FsSchemaSource {
    root: PathBuf,
}

impl FsSchemaSource {
    /// Source rooted at `root` (e.g. `src/statics/schemas`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The schema root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SchemaSource for FsSchemaSource {
    fn load(&self, location: &str) -> Result<Value, SourceError> {
        let path = self.root.join(location);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound {
                    location: location.to_string(),
                }
            } else {
                SourceError::Unreadable {
                    location: location.to_string(),
                    reason: format!("cannot read {}: {e}", path.display()),
                }
            }
        })?;
        parse_schema(location, &content)
    }

    fn describe(&self, location: &str) -> String {
        self.root.join(location).display().to_string()
    }
}

// ─── HTTP ───────────────────────────────────────────────────────────────

/// Configuration for [`HttpSchemaSource`].
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// URL of the schema root (e.g. `https://uipotion.com/schemas/`).
    pub base_url: String,
    /// Per-request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl HttpSourceConfig {
    /// Configuration with no request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: None,
        }
    }
}

/// Fetches schemas from a web server.
#[derive(Debug, Clone)]
pub struct HttpSchemaSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSchemaSource {
    /// Build a source from configuration.
    pub fn new(config: HttpSourceConfig) -> Result<Self, SourceError> {
        let mut raw = config.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).map_err(|e| SourceError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| SourceError::InvalidBaseUrl {
            url: config.base_url,
            reason: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self { client, base_url })
    }

    /// The schema root URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, location: &str) -> Result<Url, SourceError> {
        self.base_url
            .join(location)
            .map_err(|e| SourceError::Unreadable {
                location: location.to_string(),
                reason: format!("cannot build URL: {e}"),
            })
    }
}

impl SchemaSource for HttpSchemaSource {
    fn load(&self, location: &str) -> Result<Value, SourceError> {
        let rt = tokio::runtime::Handle::try_current().map_err(|_| SourceError::Unreadable {
            location: location.to_string(),
            reason: "no async runtime available for HTTP request".into(),
        })?;
        let url = self.url_for(location)?;

        rt.block_on(async {
            let resp = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| SourceError::Unreadable {
                    location: location.to_string(),
                    reason: format!("GET {url}: {e}"),
                })?;

            let status = resp.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(SourceError::NotFound {
                    location: location.to_string(),
                });
            }
            if !status.is_success() {
                return Err(SourceError::Unreadable {
                    location: location.to_string(),
                    reason: format!("GET {url}: HTTP {status}"),
                });
            }

            let body = resp.text().await.map_err(|e| SourceError::Unreadable {
                location: location.to_string(),
                reason: format!("GET {url}: failed to read body: {e}"),
            })?;
            parse_schema(location, &body)
        })
    }

    fn describe(&self, location: &str) -> String {
        self.url_for(location)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| location.to_string())
    }
}
