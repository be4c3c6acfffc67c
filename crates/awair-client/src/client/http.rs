//! HTTP transport for the Awair REST API
//!
//! Sends requests relative to the configured API endpoint. Idempotent
//! requests (GET, HEAD, OPTIONS) are retried on network failures and 5xx
//! responses with exponential backoff; every other verb is sent once.

use crate::config::TransportConfig;
use crate::error::{AwairError, AwairResult, TransportError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Retry settings for idempotent requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry (doubles with each retry)
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        let transport = TransportConfig::default();
        Self::from_config(&transport)
    }
}

impl RetryPolicy {
    pub fn from_config(config: &TransportConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: config.initial_retry_delay(),
            max_delay: config.max_retry_delay(),
        }
    }

    /// Whether requests with this method may be sent more than once
    pub fn applies_to(method: &Method) -> bool {
        matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
    }
}

/// A single request relative to the API endpoint
#[derive(Debug)]
pub(crate) struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        let mut request = Self::new(Method::PUT, path);
        request.body = Some(body);
        request
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    pub fn query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the Awair API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: &TransportConfig) -> AwairResult<Self> {
        let base_url = config.api_endpoint.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| AwairError::Config(format!("invalid API endpoint {}: {}", base_url, e)))?;

        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AwairError::InvalidHeaderShape(format!("{:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AwairError::InvalidHeaderShape(format!("{:?}: {}", name, e)))?;
            default_headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .default_headers(default_headers)
            .gzip(true)
            .build()
            .map_err(|e| AwairError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            retry: RetryPolicy::from_config(config),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Retry settings for idempotent requests
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and return the body of a 2xx response
    pub(crate) async fn send(&self, request: &ApiRequest) -> AwairResult<Vec<u8>> {
        let retries = if RetryPolicy::applies_to(&request.method) {
            self.retry.max_retries
        } else {
            0
        };

        let mut delay = self.retry.initial_delay;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.send_once(request, attempt).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt <= retries && e.is_transient() => {
                    warn!(
                        "{} {} failed (attempt {}), retrying in {:?}: {}",
                        request.method, request.path, attempt, delay, e
                    );
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, self.retry.max_delay);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn send_once(
        &self,
        request: &ApiRequest,
        attempt: u32,
    ) -> Result<Vec<u8>, TransportError> {
        let url = self.url(&request.path);
        debug!(attempt, method = %request.method, %url, "sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(request.headers.clone());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!(attempt, method = %request.method, %url, %status, "received response");

        if status.is_success() {
            let body = response.bytes().await?;
            Ok(body.to_vec())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(TransportError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(endpoint: &str) -> TransportConfig {
        TransportConfig {
            api_endpoint: endpoint.to_string(),
            initial_retry_delay_ms: 1,
            max_retry_delay_ms: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_trailing_slash_removed() {
        let client = HttpClient::new(&config("https://developer-apis.awair.is/v1/")).unwrap();
        assert_eq!(client.base_url(), "https://developer-apis.awair.is/v1");
        assert_eq!(
            client.url("/users/self"),
            "https://developer-apis.awair.is/v1/users/self"
        );
    }

    #[test]
    fn test_retry_policy_from_config() {
        let transport = TransportConfig {
            max_retries: 5,
            ..config("https://developer-apis.awair.is/v1")
        };
        let client = HttpClient::new(&transport).unwrap();
        assert_eq!(
            client.retry_policy(),
            RetryPolicy {
                max_retries: 5,
                initial_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(4),
            }
        );
        assert_eq!(RetryPolicy::default().max_retries, 3);
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = HttpClient::new(&config("not a url")).unwrap_err();
        assert!(matches!(err, AwairError::Config(_)));
    }

    #[test]
    fn test_retry_applies_to_reads_only() {
        assert!(RetryPolicy::applies_to(&Method::GET));
        assert!(RetryPolicy::applies_to(&Method::HEAD));
        assert!(!RetryPolicy::applies_to(&Method::PUT));
        assert!(!RetryPolicy::applies_to(&Method::POST));
    }

    #[tokio::test]
    async fn test_get_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/users/self"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/users/self"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config(&format!("{}/v1", server.uri()))).unwrap();
        let body = client.send(&ApiRequest::get("users/self")).await.unwrap();
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_get_gives_up_after_max_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("down"))
            .expect(4)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config(&server.uri())).unwrap();
        let err = client.send(&ApiRequest::get("users/self")).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(matches!(
            err,
            AwairError::Transport(TransportError::Status { ref body, .. }) if body == "down"
        ));
    }

    #[tokio::test]
    async fn test_client_errors_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config(&server.uri())).unwrap();
        let err = client.send(&ApiRequest::get("missing")).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_put_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config(&server.uri())).unwrap();
        let request = ApiRequest::put("devices/awair/1/name", serde_json::json!({"name": "x"}));
        let err = client.send(&request).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_network_failure_surfaces_after_retries() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = TransportConfig {
            max_retries: 1,
            ..config(&format!("http://{}", addr))
        };
        let client = HttpClient::new(&transport).unwrap();
        let err = client.send(&ApiRequest::get("users/self")).await.unwrap_err();
        assert!(matches!(
            err,
            AwairError::Transport(TransportError::Network(_))
        ));
    }
}
