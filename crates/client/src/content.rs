//! Schema content provider.
//!
//! Resolves a schema URI to its text, revalidating cached copies with
//! `If-None-Match` and falling back to the cache when the network fails:
//!
//! | answer                         | result                                       |
//! |--------------------------------|----------------------------------------------|
//! | 2xx                            | body; cached when the response has an ETag   |
//! | 304, cache readable            | cached body                                  |
//! | 304, cache unreadable          | one unconditional re-fetch, its outcome      |
//! | anything else, cache readable  | cached body                                  |
//! | anything else, nothing cached  | `Error::FetchFailed` with a diagnostic       |

use std::time::Duration;

use reqwest::{StatusCode, header};
use schemabridge_core::{AppConfig, Error, SchemaCacheStore};

use crate::fetch::{
    HttpSettings, ReqwestTransport, SchemaRequest, SchemaResponse, SchemaTransport, TransportError, status_description,
};

/// Configuration for schema fetches.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "yaml-schema-bridge/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Proxy and TLS settings sent with every request
    pub http: HttpSettings,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "yaml-schema-bridge/0.1".to_string(),
            timeout: Duration::from_millis(20_000),
            max_redirects: 5,
            http: HttpSettings::default(),
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
            http: HttpSettings {
                proxy: config.http_proxy.clone(),
                proxy_strict_ssl: config.http_proxy_strict_ssl,
            },
        }
    }
}

/// How a single request ended, from the provider's point of view.
enum Outcome {
    Fresh(SchemaResponse),
    NotModified,
    Failed(Failure),
}

enum Failure {
    Remote { status: StatusCode, body: String },
    Transport(TransportError),
}

impl Failure {
    /// Best available message: remote body, then status description, then the raw error.
    fn diagnostic(&self) -> String {
        match self {
            Failure::Remote { body, .. } if !body.trim().is_empty() => body.clone(),
            Failure::Remote { status, .. } => status_description(status.as_u16())
                .unwrap_or_else(|| format!("unexpected HTTP status {status}")),
            Failure::Transport(err) => err.to_string(),
        }
    }
}

/// Fetches schema documents through a transport and a schema cache.
pub struct SchemaFetcher<T = ReqwestTransport> {
    transport: T,
    config: FetchConfig,
}

impl SchemaFetcher<ReqwestTransport> {
    /// Fetcher backed by reqwest.
    pub fn with_reqwest(config: FetchConfig) -> Self {
        let transport = ReqwestTransport::new(config.user_agent.clone(), config.timeout);
        Self { transport, config }
    }
}

impl<T: SchemaTransport> SchemaFetcher<T> {
    pub fn new(transport: T, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Current content of the schema at `uri`.
    ///
    /// # Errors
    ///
    /// `Error::FetchFailed` when neither the network nor the cache can
    /// produce content. The message is never empty.
    pub async fn fetch_schema_content(&self, uri: &str, cache: &dyn SchemaCacheStore) -> Result<String, Error> {
        let cached_etag = cache.get_etag(uri);

        match self.request(uri, cached_etag.as_deref()).await {
            Outcome::Fresh(response) => Ok(self.remember(uri, response, cache).await),
            Outcome::NotModified => {
                if let Some(content) = cache.get_schema(uri).await {
                    tracing::debug!(uri, "schema not modified, serving cached copy");
                    return Ok(content);
                }

                tracing::warn!(uri, "cannot read cached content, trying to load again");
                match self.request(uri, None).await {
                    Outcome::Fresh(response) => Ok(self.remember(uri, response, cache).await),
                    Outcome::NotModified => Err(Error::FetchFailed(
                        Failure::Remote { status: StatusCode::NOT_MODIFIED, body: String::new() }.diagnostic(),
                    )),
                    Outcome::Failed(failure) => Err(Error::FetchFailed(failure.diagnostic())),
                }
            }
            Outcome::Failed(failure) => {
                if cache.get_etag(uri).is_some()
                    && let Some(content) = cache.get_schema(uri).await
                {
                    tracing::warn!(uri, error = %failure.diagnostic(), "fetch failed, serving cached copy");
                    return Ok(content);
                }
                Err(Error::FetchFailed(failure.diagnostic()))
            }
        }
    }

    async fn request(&self, uri: &str, etag: Option<&str>) -> Outcome {
        let mut headers = header::HeaderMap::new();
        if let Some(etag) = etag.filter(|e| !e.is_empty()) {
            match header::HeaderValue::from_str(etag) {
                Ok(value) => {
                    headers.insert(header::IF_NONE_MATCH, value);
                }
                Err(_) => tracing::warn!(uri, etag, "cached ETag is not a valid header value, fetching unconditionally"),
            }
        }

        let request = SchemaRequest {
            url: uri.to_string(),
            max_redirects: self.config.max_redirects,
            headers,
            settings: self.config.http.clone(),
        };

        match self.transport.get(request).await {
            Ok(response) if response.status.is_success() => Outcome::Fresh(response),
            Ok(response) if response.status == StatusCode::NOT_MODIFIED => Outcome::NotModified,
            Ok(response) => Outcome::Failed(Failure::Remote { status: response.status, body: response.body }),
            Err(err) => Outcome::Failed(Failure::Transport(err)),
        }
    }

    /// Cache a fresh body when the server supports revalidation, then hand it back.
    async fn remember(&self, uri: &str, response: SchemaResponse, cache: &dyn SchemaCacheStore) -> String {
        match response.etag() {
            Some(etag) => {
                if let Err(e) = cache.put_schema(uri, etag, &response.body).await {
                    tracing::warn!(uri, error = %e, "failed to cache schema");
                }
            }
            None => tracing::debug!(uri, "no ETag in response, not caching"),
        }
        response.body
    }
}
