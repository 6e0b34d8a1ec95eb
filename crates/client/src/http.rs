//! Parser backed by a remote parse service.
//!
//! The service answers `GET {base_url}/{name}` with a JSON
//! [`CharacterSnapshot`]. A 404 means the character does not exist; any
//! other non-success status is an upstream failure.

use std::time::Duration;

use armory_core::parser::{ParseError, Parser};
use armory_core::snapshot::CharacterSnapshot;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use url::Url;

/// Configuration for the HTTP parser.
#[derive(Debug, Clone)]
pub struct HttpParserConfig {
    /// Base URL of the parse service.
    pub base_url: String,

    /// User agent string (default: "armory/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,
}

impl HttpParserConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: "armory/0.1".to_string(),
            timeout: Duration::from_millis(20_000),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Fetches snapshots from a parse service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpParser {
    http: Client,
    base: Url,
    max_bytes: usize,
}

impl HttpParser {
    /// Create a new parser with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Upstream` if the base URL is unusable or the
    /// HTTP client cannot be built.
    pub fn new(config: HttpParserConfig) -> Result<Self, ParseError> {
        let base = Url::parse(config.base_url.trim())
            .map_err(|e| ParseError::Upstream(format!("invalid parser url {:?}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ParseError::Upstream(format!("parser url {base} cannot be a base")));
        }

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .build()
            .map_err(|e| ParseError::Upstream(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base, max_bytes: config.max_bytes })
    }

    /// URL of the snapshot for `name`, with the name percent-encoded as a
    /// single path segment.
    pub fn url_for(&self, name: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(name);
        }
        url
    }
}

#[async_trait]
impl Parser for HttpParser {
    async fn parse(&self, name: &str) -> Result<CharacterSnapshot, ParseError> {
        let url = self.url_for(name);

        let response = self
            .http
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ParseError::Upstream(format!("network error: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ParseError::NotFound(name.to_string()));
        }
        if !status.is_success() {
            return Err(ParseError::Upstream(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && !usize::try_from(len).is_ok_and(|len| len <= self.max_bytes)
        {
            return Err(ParseError::Upstream(format!("{len} bytes exceeds {}", self.max_bytes)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ParseError::Upstream(format!("failed to read response: {e}")))?;
        if bytes.len() > self.max_bytes {
            return Err(ParseError::Upstream(format!("{} bytes exceeds {}", bytes.len(), self.max_bytes)));
        }

        let snapshot = serde_json::from_slice(&bytes).map_err(|e| ParseError::Decode(e.to_string()))?;

        tracing::debug!(character = name, %url, bytes = bytes.len(), "fetched snapshot");
        Ok(snapshot)
    }
}
