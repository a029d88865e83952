//! HTTP transport for schema documents.
//!
//! ### Requests
//! - `GET` only, redirects capped per request (default: 5)
//! - gzip, deflate and brotli transfer encodings are negotiated by the client
//! - Conditional validators travel in the request headers
//!
//! ### Responses
//! - Every HTTP status, including 304 and 4xx/5xx, comes back as a
//!   [`SchemaResponse`]; only transport failures are [`TransportError`]s.
//! - Bodies must be valid UTF-8. They are never decoded lossily.
//!
//! ### Proxy and TLS
//! - [`HttpSettings`] ride along with each request. [`ReqwestTransport`]
//!   keeps one `reqwest::Client` and rebuilds it when the settings change.

pub mod status;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

pub use status::status_description;

/// Proxy and TLS settings, read from the editor's `http` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Proxy URL applied to every scheme.
    #[serde(default)]
    pub proxy: Option<String>,

    /// Reject invalid TLS certificates (default: true).
    #[serde(default = "default_strict_ssl")]
    pub proxy_strict_ssl: bool,
}

fn default_strict_ssl() -> bool {
    true
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { proxy: None, proxy_strict_ssl: true }
    }
}

/// A single schema GET.
#[derive(Debug, Clone)]
pub struct SchemaRequest {
    pub url: String,
    pub max_redirects: usize,
    pub headers: header::HeaderMap,
    pub settings: HttpSettings,
}

/// Whatever the server answered, whatever the status.
#[derive(Debug, Clone)]
pub struct SchemaResponse {
    pub status: StatusCode,
    pub headers: header::HeaderMap,
    pub body: String,
}

impl SchemaResponse {
    /// Non-empty `ETag` header value, if the server sent one.
    pub fn etag(&self) -> Option<&str> {
        self.headers
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }
}

/// Failure to get any HTTP response at all.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("invalid proxy {proxy}: {reason}")]
    Proxy { proxy: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("response body is not valid UTF-8: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { TransportError::Timeout(err.to_string()) } else { TransportError::Network(err.to_string()) }
    }
}

/// Something that can perform a schema GET.
#[async_trait]
pub trait SchemaTransport: Send + Sync {
    async fn get(&self, request: SchemaRequest) -> Result<SchemaResponse, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ClientKey {
    settings: HttpSettings,
    max_redirects: usize,
}

/// reqwest-backed transport.
pub struct ReqwestTransport {
    user_agent: String,
    timeout: Duration,
    client: Mutex<Option<(ClientKey, Client)>>,
}

impl ReqwestTransport {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self { user_agent: user_agent.into(), timeout, client: Mutex::new(None) }
    }

    /// Client matching `key`, built on first use or when the key changes.
    fn client_for(&self, key: ClientKey) -> Result<Client, TransportError> {
        let mut slot = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((current, client)) = slot.as_ref()
            && *current == key
        {
            return Ok(client.clone());
        }

        let client = self.build_client(&key)?;
        tracing::debug!(
            proxy = key.settings.proxy.as_deref().unwrap_or("none"),
            strict_ssl = key.settings.proxy_strict_ssl,
            max_redirects = key.max_redirects,
            "built schema HTTP client"
        );
        *slot = Some((key, client.clone()));
        Ok(client)
    }

    fn build_client(&self, key: &ClientKey) -> Result<Client, TransportError> {
        let mut builder = Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(key.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .danger_accept_invalid_certs(!key.settings.proxy_strict_ssl);

        if let Some(proxy) = key.settings.proxy.as_deref().filter(|p| !p.is_empty()) {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| TransportError::Proxy { proxy: proxy.to_string(), reason: e.to_string() })?;
            builder = builder.proxy(proxy);
        }

        builder.build().map_err(|e| TransportError::Client(e.to_string()))
    }
}

#[async_trait]
impl SchemaTransport for ReqwestTransport {
    async fn get(&self, request: SchemaRequest) -> Result<SchemaResponse, TransportError> {
        let client =
            self.client_for(ClientKey { settings: request.settings, max_redirects: request.max_redirects })?;

        let response = client.get(&request.url).headers(request.headers).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = String::from_utf8(response.bytes().await?.to_vec())
            .map_err(|e| TransportError::Decode(format!("{}: {e}", request.url)))?;

        tracing::debug!(url = %request.url, status = status.as_u16(), bytes = body.len(), "schema response");

        Ok(SchemaResponse { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header as header_eq, method, path, path_regex};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    fn request(url: String, headers: header::HeaderMap) -> SchemaRequest {
        SchemaRequest { url, max_redirects: 5, headers, settings: HttpSettings::default() }
    }

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new("yaml-schema-bridge/test", Duration::from_secs(5))
    }

    #[test]
    fn test_http_settings_default() {
        let settings = HttpSettings::default();
        assert!(settings.proxy.is_none());
        assert!(settings.proxy_strict_ssl);
    }

    #[test]
    fn test_etag_ignores_empty_header() {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ETAG, header::HeaderValue::from_static(""));
        let response = SchemaResponse { status: StatusCode::OK, headers, body: String::new() };
        assert!(response.etag().is_none());
    }

    #[test]
    fn test_client_is_reused_until_settings_change() {
        let transport = transport();
        let key = ClientKey { settings: HttpSettings::default(), max_redirects: 5 };
        transport.client_for(key.clone()).unwrap();
        transport.client_for(key.clone()).unwrap();
        assert_eq!(transport.client.lock().unwrap().as_ref().map(|(k, _)| k.clone()), Some(key));

        let proxied = ClientKey {
            settings: HttpSettings { proxy: Some("http://127.0.0.1:3128".into()), proxy_strict_ssl: false },
            max_redirects: 5,
        };
        transport.client_for(proxied.clone()).unwrap();
        assert_eq!(transport.client.lock().unwrap().as_ref().map(|(k, _)| k.clone()), Some(proxied));
    }

    #[test]
    fn test_invalid_proxy() {
        let key = ClientKey {
            settings: HttpSettings { proxy: Some("http://[not a host".into()), proxy_strict_ssl: true },
            max_redirects: 5,
        };
        assert!(matches!(transport().client_for(key), Err(TransportError::Proxy { .. })));
    }

    #[tokio::test]
    async fn test_get_returns_body_and_etag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schema.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("ETag", "\"v1\"")
                    .set_body_string(r#"{"type":"object"}"#),
            )
            .mount(&server)
            .await;

        let response = transport()
            .get(request(format!("{}/schema.json", server.uri()), header::HeaderMap::new()))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.etag(), Some("\"v1\""));
        assert_eq!(response.body, r#"{"type":"object"}"#);
    }

    #[tokio::test]
    async fn test_not_modified_is_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schema.json"))
            .and(header_eq("If-None-Match", "\"v1\""))
            .respond_with(ResponseTemplate::new(304))
            .mount(&server)
            .await;

        let mut headers = header::HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, header::HeaderValue::from_static("\"v1\""));
        let response = transport()
            .get(request(format!("{}/schema.json", server.uri()), headers))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::NOT_MODIFIED);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_follows_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old.json"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", format!("{}/new.json", server.uri())))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let response = transport()
            .get(request(format!("{}/old.json", server.uri()), header::HeaderMap::new()))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "{}");
    }

    #[tokio::test]
    async fn test_redirect_loop_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/loop.json"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", format!("{}/loop.json", server.uri())))
            .mount(&server)
            .await;

        let result = transport()
            .get(request(format!("{}/loop.json", server.uri()), header::HeaderMap::new()))
            .await;

        assert!(matches!(result, Err(TransportError::Network(_))));
    }

    #[tokio::test]
    async fn test_error_status_is_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such schema"))
            .mount(&server)
            .await;

        let response = transport()
            .get(request(format!("{}/missing.json", server.uri()), header::HeaderMap::new()))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, "no such schema");
    }

    #[tokio::test]
    async fn test_invalid_utf8_body_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'{', 0xff, 0xfe, b'}']))
            .mount(&server)
            .await;

        let result = transport()
            .get(request(format!("{}/latin1.json", server.uri()), header::HeaderMap::new()))
            .await;

        assert!(matches!(result, Err(TransportError::Decode(_))));
    }

    #[tokio::test]
    async fn test_requests_compressed_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        transport()
            .get(request(format!("{}/schema.json", server.uri()), header::HeaderMap::new()))
            .await
            .unwrap();

        let received = server.received_requests().await.unwrap();
        let accept_encoding = received[0]
            .headers
            .get("accept-encoding")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(accept_encoding.contains("gzip"), "accept-encoding was {accept_encoding:?}");
    }

    /// `/hop/N` redirects to `/hop/N-1`; `/hop/0` is the schema.
    struct RedirectChain {
        base: String,
    }

    impl Respond for RedirectChain {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let hops: u32 = request.url.path().trim_start_matches("/hop/").parse().unwrap();
            if hops == 0 {
                ResponseTemplate::new(200).set_body_string("{}")
            } else {
                ResponseTemplate::new(302).insert_header("Location", format!("{}/hop/{}", self.base, hops - 1))
            }
        }
    }

    #[tokio::test]
    async fn test_redirects_capped_at_five_hops() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/hop/\d+$"))
            .respond_with(RedirectChain { base: server.uri() })
            .mount(&server)
            .await;
        let transport = transport();

        let five = transport
            .get(request(format!("{}/hop/5", server.uri()), header::HeaderMap::new()))
            .await
            .unwrap();
        assert_eq!(five.status, StatusCode::OK);
        assert_eq!(five.body, "{}");

        let six = transport
            .get(request(format!("{}/hop/6", server.uri()), header::HeaderMap::new()))
            .await;
        assert!(matches!(six, Err(TransportError::Network(_))));
    }
}
