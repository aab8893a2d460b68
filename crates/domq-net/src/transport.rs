//! Transport layer
//!
//! The request helper talks to the network only through [`Transport`], so a
//! host can plug in its own primitive. [`HttpTransport`] is the default,
//! backed by reqwest's blocking client run on smol's blocking thread pool.

use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use url::Url;

use crate::{NetError, Request};

/// What a transport reports once a request reaches its terminal state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    /// `None` when no body could be obtained
    pub response_text: Option<String>,
}

impl TransportResponse {
    /// Response with a 200 status and the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            headers: Vec::new(),
            response_text: Some(body.into()),
        }
    }

    pub fn with_status(mut self, status: u16, status_text: &str) -> Self {
        self.status = status;
        self.status_text = status_text.to_string();
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Response without a body
    pub fn empty() -> Self {
        Self {
            response_text: None,
            ..Self::ok("")
        }
    }
}

/// Asynchronous request primitive
pub trait Transport {
    fn send(&self, request: &Request) -> impl Future<Output = Result<TransportResponse, NetError>>;
}

impl<T: Transport> Transport for &T {
    fn send(&self, request: &Request) -> impl Future<Output = Result<TransportResponse, NetError>> {
        (**self).send(request)
    }
}

impl<T: Transport> Transport for Rc<T> {
    fn send(&self, request: &Request) -> impl Future<Output = Result<TransportResponse, NetError>> {
        (**self).send(request)
    }
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    /// Relative request URLs are resolved against this
    pub base_url: String,
    pub default_headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("domq/{}", env!("CARGO_PKG_VERSION")),
            base_url: "about:blank".to_string(),
            default_headers: Vec::new(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn user_agent(mut self, ua: &str) -> Self {
        self.config.user_agent = ua.to_string();
        self
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.config.base_url = url.to_string();
        self
    }

    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        self.config.default_headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Resolve `url` against `base` (absolute URLs pass through)
pub fn resolve_url(base: &str, url: &str) -> Result<Url, NetError> {
    match Url::parse(url) {
        Ok(absolute) => Ok(absolute),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(base)
            .and_then(|base| base.join(url))
            .map_err(|e| NetError::InvalidUrl(format!("{url}: {e}"))),
        Err(e) => Err(NetError::InvalidUrl(format!("{url}: {e}"))),
    }
}

/// Network transport over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new() -> Result<Self, NetError> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, NetError> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| NetError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

fn to_reqwest_method(method: crate::Method) -> reqwest::Method {
    use crate::Method;
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
        Method::Patch => reqwest::Method::PATCH,
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &Request) -> Result<TransportResponse, NetError> {
        let url = resolve_url(&self.config.base_url, &request.url)?;
        tracing::info!("HTTP {} {}", request.method, url);

        let client = self.client.clone();
        let method = to_reqwest_method(request.method);
        let headers: Vec<(String, String)> = self
            .config
            .default_headers
            .iter()
            .cloned()
            .chain(request.headers.iter().map(|(n, v)| (n.clone(), v.clone())))
            .collect();
        let payload = request.payload.clone();

        smol::unblock(move || {
            let mut builder = client.request(method, url);
            for (name, value) in headers {
                builder = builder.header(name, value);
            }
            if let Some(payload) = payload {
                builder = builder.body(payload);
            }

            let response = builder.send().map_err(|e| NetError::Network(e.to_string()))?;
            let status = response.status();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();

            let response_text = match response.text() {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!("Failed to read response body: {}", e);
                    None
                }
            };

            tracing::debug!("HTTP {} {}", status.as_u16(), status_text_of(status));
            Ok(TransportResponse {
                status: status.as_u16(),
                status_text: status_text_of(status).to_string(),
                headers,
                response_text,
            })
        })
        .await
    }
}

fn status_text_of(status: reqwest::StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative() {
        let url = resolve_url("https://example.com/app/index.html", "api/items?x=1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/app/api/items?x=1");

        let url = resolve_url("https://example.com/app/", "/root").unwrap();
        assert_eq!(url.as_str(), "https://example.com/root");
    }

    #[test]
    fn test_resolve_absolute_ignores_base() {
        let url = resolve_url("about:blank", "http://localhost:8080/x").unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
    }

    #[test]
    fn test_resolve_relative_without_usable_base() {
        assert!(matches!(resolve_url("about:blank", "/x"), Err(NetError::InvalidUrl(_))));
        assert!(matches!(resolve_url("about:blank", "http://[bad"), Err(NetError::InvalidUrl(_))));
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::builder()
            .user_agent("test/1.0")
            .base_url("https://example.com/")
            .default_header("X-Requested-With", "XMLHttpRequest")
            .timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.user_agent, "test/1.0");
        assert_eq!(config.default_headers.len(), 1);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_url_fails_before_sending() {
        let transport = HttpTransport::new().unwrap();
        let result = smol::block_on(transport.send(&Request::get("relative/path")));
        assert!(matches!(result, Err(NetError::InvalidUrl(_))));
    }

    #[test]
    fn test_transport_response_helpers() {
        let response = TransportResponse::ok("body")
            .with_status(404, "Not Found")
            .with_header("Content-Type", "text/plain");
        assert_eq!(response.headers, vec![("Content-Type".to_string(), "text/plain".to_string())]);
        assert_eq!(response.status, 404);
        assert!(TransportResponse::empty().response_text.is_none());
    }
}
