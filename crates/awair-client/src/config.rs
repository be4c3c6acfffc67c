//! Client configuration
//!
//! Construction-time defaults for [`AwairClient`](crate::AwairClient). Every
//! field is optional; per-call [`RequestOptions`](crate::RequestOptions)
//! shadow the device identity, token and mock flag stored here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default API origin and version prefix
pub const DEFAULT_API_ENDPOINT: &str = "https://developer-apis.awair.is/v1";

/// Construction options for the Awair client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwairConfig {
    /// Default device type (e.g. `awair-element`)
    pub device_type: Option<String>,

    /// Default numeric device id
    pub device_id: Option<u64>,

    /// Default bearer token
    pub bearer_token: Option<String>,

    /// Serve canned data instead of calling the API
    pub mock_mode: bool,

    /// HTTP transport settings
    pub transport: TransportConfig,
}

/// Transport-level settings shared by every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Base URL the request paths are appended to
    pub api_endpoint: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,

    /// Retries after the first attempt for idempotent requests
    pub max_retries: u32,

    /// First retry delay in milliseconds (doubles with each retry)
    pub initial_retry_delay_ms: u64,

    /// Upper bound for the retry delay in milliseconds
    pub max_retry_delay_ms: u64,

    /// User-Agent header
    pub user_agent: String,

    /// Static headers added to every request
    pub headers: HashMap<String, String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            timeout_ms: 30_000,
            max_retries: 3,
            initial_retry_delay_ms: 200,
            max_retry_delay_ms: 5_000,
            user_agent: format!("awair-client/{}", env!("CARGO_PKG_VERSION")),
            headers: HashMap::new(),
        }
    }
}

impl AwairConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay `AWAIR_*` environment variables onto this config
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("AWAIR_BEARER_TOKEN") {
            self.bearer_token = Some(val);
        }
        if let Ok(val) = std::env::var("AWAIR_DEVICE_TYPE") {
            self.device_type = Some(val);
        }
        if let Ok(val) = std::env::var("AWAIR_DEVICE_ID") {
            if let Ok(id) = val.parse() {
                self.device_id = Some(id);
            }
        }
        if let Ok(val) = std::env::var("AWAIR_MOCK_MODE") {
            self.mock_mode = val.parse().unwrap_or(self.mock_mode);
        }
        if let Ok(val) = std::env::var("AWAIR_API_ENDPOINT") {
            self.transport.api_endpoint = val;
        }
    }

    /// Set the default device identity
    pub fn with_device(mut self, device_type: impl Into<String>, device_id: u64) -> Self {
        self.device_type = Some(device_type.into());
        self.device_id = Some(device_id);
        self
    }

    /// Set the default bearer token
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Enable or disable mock mode
    pub fn with_mock_mode(mut self, enabled: bool) -> Self {
        self.mock_mode = enabled;
        self
    }

    /// Point the client at a different API endpoint
    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.transport.api_endpoint = endpoint.into();
        self
    }
}

impl TransportConfig {
    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get initial retry delay as Duration
    pub fn initial_retry_delay(&self) -> Duration {
        Duration::from_millis(self.initial_retry_delay_ms)
    }

    /// Get max retry delay as Duration
    pub fn max_retry_delay(&self) -> Duration {
        Duration::from_millis(self.max_retry_delay_ms)
    }
}
