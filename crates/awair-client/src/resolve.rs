//! Per-call option resolution
//!
//! Every client operation accepts [`RequestOptions`] that shadow the
//! client's stored defaults for that call only. Each setting resolves in the
//! same order: explicit per-call value, then instance default, then absent.

use crate::error::{AwairError, AwairResult, DeviceField};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use std::collections::HashMap;
use std::time::Duration;

/// Per-call options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Device type for this call
    pub device_type: Option<String>,

    /// Device id for this call
    pub device_id: Option<u64>,

    /// Bearer token for this call
    pub bearer_token: Option<String>,

    /// Mock mode for this call; `None` inherits the client setting
    pub mock_mode: Option<bool>,

    /// Transport settings for this call
    pub transport: TransportOverrides,
}

/// Per-call transport settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOverrides {
    /// Extra headers; `Authorization` is replaced when a token resolves
    pub headers: HashMap<String, String>,

    /// Request timeout for this call
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target a specific device
    pub fn device(mut self, device_type: impl Into<String>, device_id: u64) -> Self {
        self.device_type = Some(device_type.into());
        self.device_id = Some(device_id);
        self
    }

    pub fn device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    pub fn device_id(mut self, device_id: u64) -> Self {
        self.device_id = Some(device_id);
        self
    }

    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn mock_mode(mut self, enabled: bool) -> Self {
        self.mock_mode = Some(enabled);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.transport.headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = Some(timeout);
        self
    }
}

/// Fully resolved device address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub device_type: String,
    pub device_id: u64,
}

/// Long-lived settings held by the client
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Defaults<'a> {
    pub bearer_token: Option<&'a str>,
    pub device_type: Option<&'a str>,
    pub device_id: Option<u64>,
    pub mock_mode: bool,
}

/// Whether an operation addresses a single device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Account,
    Device,
}

/// Settings a single call runs with
#[derive(Debug, Clone)]
pub(crate) struct EffectiveRequestConfig {
    pub headers: HeaderMap,
    pub device: Option<DeviceIdentity>,
    pub mock_mode: bool,
    pub timeout: Option<Duration>,
}

impl EffectiveRequestConfig {
    pub fn resolve(
        defaults: Defaults<'_>,
        options: &RequestOptions,
        scope: Scope,
    ) -> AwairResult<Self> {
        let token = resolve_bearer_token(defaults.bearer_token, options);
        let headers = resolve_headers(token, &options.transport.headers)?;

        let device = match scope {
            Scope::Device => Some(resolve_device(
                defaults.device_type,
                defaults.device_id,
                options,
            )?),
            Scope::Account => None,
        };

        Ok(Self {
            headers,
            device,
            mock_mode: resolve_mock_mode(defaults.mock_mode, options),
            timeout: options.transport.timeout,
        })
    }

    /// Device address of a device-scoped call
    pub fn device(&self) -> AwairResult<&DeviceIdentity> {
        self.device
            .as_ref()
            .ok_or(AwairError::MissingDeviceIdentity(DeviceField::Type))
    }
}

/// Per-call token if given, else the stored one. Empty tokens count as absent.
pub(crate) fn resolve_bearer_token<'a>(
    stored: Option<&'a str>,
    options: &'a RequestOptions,
) -> Option<&'a str> {
    options
        .bearer_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .or_else(|| stored.filter(|t| !t.is_empty()))
}

/// Merge caller headers with the `Authorization` header for `token`
pub(crate) fn resolve_headers(
    token: Option<&str>,
    headers: &HashMap<String, String>,
) -> AwairResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len() + 1);

    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| AwairError::InvalidHeaderShape(format!("{:?}: {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| AwairError::InvalidHeaderShape(format!("{:?}: {}", name, e)))?;
        map.insert(header_name, header_value);
    }

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| AwairError::InvalidHeaderShape(format!("bearer token: {}", e)))?;
        value.set_sensitive(true);
        map.insert(AUTHORIZATION, value);
    }

    Ok(map)
}

/// Per-call device type/id if given, else the stored ones
///
/// An empty type or an id of 0 counts as absent.
pub(crate) fn resolve_device(
    stored_type: Option<&str>,
    stored_id: Option<u64>,
    options: &RequestOptions,
) -> AwairResult<DeviceIdentity> {
    let device_type = options
        .device_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .or_else(|| stored_type.filter(|t| !t.is_empty()))
        .ok_or(AwairError::MissingDeviceIdentity(DeviceField::Type))?;

    let device_id = options
        .device_id
        .filter(|id| *id != 0)
        .or_else(|| stored_id.filter(|id| *id != 0))
        .ok_or(AwairError::MissingDeviceIdentity(DeviceField::Id))?;

    if device_type.contains(['/', '?', '#']) {
        return Err(AwairError::InvalidValue(format!(
            "device type {:?} cannot be used in a request path",
            device_type
        )));
    }

    Ok(DeviceIdentity {
        device_type: device_type.to_string(),
        device_id,
    })
}

/// Per-call mock flag if given, else the stored one
pub(crate) fn resolve_mock_mode(stored: bool, options: &RequestOptions) -> bool {
    options.mock_mode.unwrap_or(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Defaults<'static> {
        Defaults {
            bearer_token: Some("stored"),
            device_type: Some("awair-element"),
            device_id: Some(1234),
            mock_mode: false,
        }
    }

    #[test]
    fn test_per_call_token_wins() {
        let options = RequestOptions::new().bearer_token("call");
        assert_eq!(resolve_bearer_token(Some("stored"), &options), Some("call"));
        assert_eq!(
            resolve_bearer_token(Some("stored"), &RequestOptions::new()),
            Some("stored")
        );
        assert_eq!(resolve_bearer_token(None, &RequestOptions::new()), None);
    }

    #[test]
    fn test_empty_token_is_absent() {
        let options = RequestOptions::new().bearer_token("");
        assert_eq!(resolve_bearer_token(Some("stored"), &options), Some("stored"));
        assert_eq!(resolve_bearer_token(Some(""), &RequestOptions::new()), None);
    }

    #[test]
    fn test_headers_merge_authorization() {
        let options = RequestOptions::new()
            .header("X-Trace", "abc")
            .header("Authorization", "Basic xyz");
        let headers = resolve_headers(Some("T"), &options.transport.headers).unwrap();

        assert_eq!(headers.get("x-trace").unwrap(), "abc");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer T");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_headers_without_token() {
        let options = RequestOptions::new().header("Authorization", "Basic xyz");
        let headers = resolve_headers(None, &options.transport.headers).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Basic xyz");
    }

    #[test]
    fn test_invalid_header_shape() {
        let options = RequestOptions::new().header("bad header", "x");
        let err = resolve_headers(None, &options.transport.headers).unwrap_err();
        assert!(matches!(err, AwairError::InvalidHeaderShape(_)));

        let options = RequestOptions::new().header("X-Ok", "line\nbreak");
        let err = resolve_headers(None, &options.transport.headers).unwrap_err();
        assert!(matches!(err, AwairError::InvalidHeaderShape(_)));
    }

    #[test]
    fn test_device_precedence() {
        let device = resolve_device(Some("awair"), Some(1), &RequestOptions::new()).unwrap();
        assert_eq!(device.device_type, "awair");
        assert_eq!(device.device_id, 1);

        let options = RequestOptions::new().device_id(99);
        let device = resolve_device(Some("awair"), Some(1), &options).unwrap();
        assert_eq!(device.device_type, "awair");
        assert_eq!(device.device_id, 99);

        let options = RequestOptions::new().device("awair-omni", 7);
        let device = resolve_device(None, None, &options).unwrap();
        assert_eq!(
            device,
            DeviceIdentity {
                device_type: "awair-omni".to_string(),
                device_id: 7
            }
        );
    }

    #[test]
    fn test_missing_device_fields() {
        let err = resolve_device(None, Some(1), &RequestOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            AwairError::MissingDeviceIdentity(DeviceField::Type)
        ));

        let err = resolve_device(Some("awair"), None, &RequestOptions::new()).unwrap_err();
        assert!(matches!(err, AwairError::MissingDeviceIdentity(DeviceField::Id)));

        let err = resolve_device(Some(""), Some(0), &RequestOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            AwairError::MissingDeviceIdentity(DeviceField::Type)
        ));
    }

    #[test]
    fn test_device_type_must_be_one_segment() {
        for device_type in ["a/b", "awair?x=1", "awair#frag"] {
            let options = RequestOptions::new().device(device_type, 1);
            let err = resolve_device(None, None, &options).unwrap_err();
            assert!(matches!(err, AwairError::InvalidValue(_)));
        }
        assert!(resolve_device(Some("awair-element"), Some(1), &RequestOptions::new()).is_ok());
    }

    #[test]
    fn test_mock_mode_inherits() {
        assert!(!resolve_mock_mode(false, &RequestOptions::new()));
        assert!(resolve_mock_mode(true, &RequestOptions::new()));
        assert!(resolve_mock_mode(false, &RequestOptions::new().mock_mode(true)));
        assert!(!resolve_mock_mode(true, &RequestOptions::new().mock_mode(false)));
    }

    #[test]
    fn test_resolve_account_scope_skips_device() {
        let config = EffectiveRequestConfig::resolve(
            Defaults::default(),
            &RequestOptions::new(),
            Scope::Account,
        )
        .unwrap();
        assert!(config.device.is_none());
        assert!(config.headers.is_empty());
        assert!(!config.mock_mode);
    }

    #[test]
    fn test_resolve_device_scope() {
        let options = RequestOptions::new()
            .timeout(Duration::from_secs(2))
            .mock_mode(true);
        let config = EffectiveRequestConfig::resolve(defaults(), &options, Scope::Device).unwrap();

        assert_eq!(config.device().unwrap().device_id, 1234);
        assert_eq!(config.headers.get(AUTHORIZATION).unwrap(), "Bearer stored");
        assert_eq!(config.timeout, Some(Duration::from_secs(2)));
        assert!(config.mock_mode);
    }
}
