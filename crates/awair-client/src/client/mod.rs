//! Awair API client
//!
//! [`AwairClient`] exposes one async method per remote operation. Each call
//! resolves its effective settings from the per-call [`RequestOptions`] and
//! the client's defaults, answers from the mock tables when mock mode is on,
//! and otherwise goes through [`HttpClient`].

mod http;

pub use http::{HttpClient, RetryPolicy};

use crate::config::AwairConfig;
use crate::error::{AwairError, AwairResult};
use crate::mock;
use crate::query::AirDataQuery;
use crate::resolve::{Defaults, DeviceIdentity, EffectiveRequestConfig, RequestOptions, Scope};
use crate::types::{
    AirData, Device, DevicePreference, DisplayMode, DisplaySettings, KnockingMode, LedSettings,
    Location, PowerStatus, RoomType, SpaceType, Usage, User,
};
use http::ApiRequest;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Client for the Awair developer API
///
/// `device_type` and `device_id` are the default target for device-scoped
/// calls and may be changed between calls. The token, mock flag and
/// transport are fixed at construction.
#[derive(Debug, Clone)]
pub struct AwairClient {
    /// Default device type
    pub device_type: Option<String>,

    /// Default device id
    pub device_id: Option<u64>,

    bearer_token: Option<String>,
    mock_mode: bool,
    http: HttpClient,
}

#[derive(Deserialize)]
struct DevicesResponse {
    #[serde(default)]
    devices: Vec<Device>,
}

#[derive(Deserialize)]
struct UsagesResponse {
    #[serde(default)]
    usages: Vec<Usage>,
}

#[derive(Deserialize)]
struct AirDataResponse {
    #[serde(default)]
    data: Vec<AirData>,
}

#[derive(Serialize, Deserialize)]
struct ModeBody<M> {
    mode: M,
}

#[derive(Deserialize)]
struct TimezoneResponse {
    timezone: String,
}

#[derive(Serialize)]
struct NameBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct PreferenceBody {
    pref: DevicePreference,
}

#[derive(Serialize)]
struct RoomTypeBody {
    room_type: RoomType,
}

#[derive(Serialize)]
struct SpaceTypeBody {
    space_type: SpaceType,
}

/// Air-data aggregation served by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirDataResolution {
    Raw,
    FiveMinuteAverage,
    FifteenMinuteAverage,
}

impl AirDataResolution {
    fn segment(self) -> &'static str {
        match self {
            AirDataResolution::Raw => "raw",
            AirDataResolution::FiveMinuteAverage => "5-min-avg",
            AirDataResolution::FifteenMinuteAverage => "15-min-avg",
        }
    }
}

fn reject_unknown<T: PartialEq + std::fmt::Debug>(value: T, unknown: T) -> AwairResult<T> {
    if value == unknown {
        return Err(AwairError::InvalidValue(format!(
            "{:?} cannot be sent to the service",
            value
        )));
    }
    Ok(value)
}

fn user_device_path(device: &DeviceIdentity, endpoint: &str) -> String {
    format!(
        "users/self/devices/{}/{}/{}",
        device.device_type, device.device_id, endpoint
    )
}

fn device_path(device: &DeviceIdentity, endpoint: &str) -> String {
    format!(
        "devices/{}/{}/{}",
        device.device_type, device.device_id, endpoint
    )
}

impl AwairClient {
    /// Create a new client
    pub fn new(config: AwairConfig) -> AwairResult<Self> {
        let http = HttpClient::new(&config.transport)?;

        Ok(Self {
            device_type: config.device_type,
            device_id: config.device_id,
            bearer_token: config.bearer_token,
            mock_mode: config.mock_mode,
            http,
        })
    }

    /// Get HTTP client reference
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Default bearer token
    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    /// Whether calls default to mock mode
    pub fn mock_mode(&self) -> bool {
        self.mock_mode
    }

    fn defaults(&self) -> Defaults<'_> {
        Defaults {
            bearer_token: self.bearer_token.as_deref(),
            device_type: self.device_type.as_deref(),
            device_id: self.device_id,
            mock_mode: self.mock_mode,
        }
    }

    fn resolve(&self, options: &RequestOptions, scope: Scope) -> AwairResult<EffectiveRequestConfig> {
        EffectiveRequestConfig::resolve(self.defaults(), options, scope)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        effective: &EffectiveRequestConfig,
        path: String,
        query: Vec<(&'static str, String)>,
    ) -> AwairResult<T> {
        let request = ApiRequest::get(path)
            .query(query)
            .headers(effective.headers.clone())
            .timeout(effective.timeout);
        let body = self.http.send(&request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn put_json<B: Serialize>(
        &self,
        effective: &EffectiveRequestConfig,
        path: String,
        body: &B,
    ) -> AwairResult<()> {
        let body = serde_json::to_value(body).map_err(AwairError::Encode)?;
        let request = ApiRequest::put(path, body)
            .headers(effective.headers.clone())
            .timeout(effective.timeout);
        self.http.send(&request).await?;
        Ok(())
    }

    /// List the devices registered to the account
    pub async fn get_devices(&self, options: &RequestOptions) -> AwairResult<Vec<Device>> {
        let effective = self.resolve(options, Scope::Account)?;
        if effective.mock_mode {
            return Ok(vec![mock::device()]);
        }

        let response: DevicesResponse = self
            .get_json(&effective, "users/self/devices".to_string(), Vec::new())
            .await?;
        Ok(response.devices)
    }

    /// Get the account profile
    pub async fn get_user(&self, options: &RequestOptions) -> AwairResult<User> {
        let effective = self.resolve(options, Scope::Account)?;
        if effective.mock_mode {
            return Ok(mock::user());
        }

        self.get_json(&effective, "users/self".to_string(), Vec::new())
            .await
    }

    /// Get API usage counters for a device
    pub async fn get_device_api_usage(&self, options: &RequestOptions) -> AwairResult<Vec<Usage>> {
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(mock::device_api_usages());
        }

        let path = user_device_path(effective.device()?, "api-usages");
        let response: UsagesResponse = self.get_json(&effective, path, Vec::new()).await?;
        Ok(response.usages)
    }

    /// Get the newest air-data sample, or `None` if the device has none
    pub async fn get_latest_air_data(
        &self,
        fahrenheit: Option<bool>,
        options: &RequestOptions,
    ) -> AwairResult<Option<AirData>> {
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(mock::latest_air_data());
        }

        let query = AirDataQuery {
            fahrenheit,
            ..Default::default()
        };
        let path = user_device_path(effective.device()?, "air-data/latest");
        let response: AirDataResponse = self.get_json(&effective, path, query.to_pairs()).await?;
        Ok(response.data.into_iter().next())
    }

    /// Get air-data samples at the given resolution
    pub async fn get_air_data(
        &self,
        resolution: AirDataResolution,
        query: &AirDataQuery,
        options: &RequestOptions,
    ) -> AwairResult<Vec<AirData>> {
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(mock::air_data());
        }

        let path = user_device_path(
            effective.device()?,
            &format!("air-data/{}", resolution.segment()),
        );
        let response: AirDataResponse = self.get_json(&effective, path, query.to_pairs()).await?;
        Ok(response.data)
    }

    /// Get raw (ten-second) air-data samples
    pub async fn get_raw_air_data(
        &self,
        query: &AirDataQuery,
        options: &RequestOptions,
    ) -> AwairResult<Vec<AirData>> {
        self.get_air_data(AirDataResolution::Raw, query, options)
            .await
    }

    /// Get five-minute averaged air data
    pub async fn get_5_minute_average_air_data(
        &self,
        query: &AirDataQuery,
        options: &RequestOptions,
    ) -> AwairResult<Vec<AirData>> {
        self.get_air_data(AirDataResolution::FiveMinuteAverage, query, options)
            .await
    }

    /// Get fifteen-minute averaged air data
    pub async fn get_15_minute_average_air_data(
        &self,
        query: &AirDataQuery,
        options: &RequestOptions,
    ) -> AwairResult<Vec<AirData>> {
        self.get_air_data(AirDataResolution::FifteenMinuteAverage, query, options)
            .await
    }

    pub async fn get_device_display_mode(
        &self,
        options: &RequestOptions,
    ) -> AwairResult<DisplayMode> {
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(mock::display_mode());
        }

        let path = device_path(effective.device()?, "display");
        let response: ModeBody<DisplayMode> = self.get_json(&effective, path, Vec::new()).await?;
        Ok(response.mode)
    }

    pub async fn set_device_display_mode(
        &self,
        settings: &DisplaySettings,
        options: &RequestOptions,
    ) -> AwairResult<()> {
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(());
        }

        let path = device_path(effective.device()?, "display");
        self.put_json(&effective, path, settings).await
    }

    pub async fn get_device_knocking_mode(
        &self,
        options: &RequestOptions,
    ) -> AwairResult<KnockingMode> {
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(mock::knocking_mode());
        }

        let path = device_path(effective.device()?, "knocking");
        let response: ModeBody<KnockingMode> = self.get_json(&effective, path, Vec::new()).await?;
        Ok(response.mode)
    }

    pub async fn set_device_knocking_mode(
        &self,
        mode: KnockingMode,
        options: &RequestOptions,
    ) -> AwairResult<()> {
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(());
        }

        let path = device_path(effective.device()?, "knocking");
        self.put_json(&effective, path, &ModeBody { mode }).await
    }

    pub async fn get_device_led_mode(&self, options: &RequestOptions) -> AwairResult<LedSettings> {
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(mock::led_settings());
        }

        let path = device_path(effective.device()?, "led");
        self.get_json(&effective, path, Vec::new()).await
    }

    pub async fn set_device_led_mode(
        &self,
        settings: &LedSettings,
        options: &RequestOptions,
    ) -> AwairResult<()> {
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(());
        }

        let path = device_path(effective.device()?, "led");
        self.put_json(&effective, path, settings).await
    }

    pub async fn set_device_location(
        &self,
        location: &Location,
        options: &RequestOptions,
    ) -> AwairResult<()> {
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(());
        }

        let path = device_path(effective.device()?, "location");
        self.put_json(&effective, path, location).await
    }

    pub async fn set_device_name(&self, name: &str, options: &RequestOptions) -> AwairResult<()> {
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(());
        }

        let path = device_path(effective.device()?, "name");
        self.put_json(&effective, path, &NameBody { name }).await
    }

    pub async fn set_device_preference(
        &self,
        preference: DevicePreference,
        options: &RequestOptions,
    ) -> AwairResult<()> {
        let preference = reject_unknown(preference, DevicePreference::Unknown)?;
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(());
        }

        let path = device_path(effective.device()?, "preference");
        self.put_json(&effective, path, &PreferenceBody { pref: preference })
            .await
    }

    pub async fn set_device_room_type(
        &self,
        room_type: RoomType,
        options: &RequestOptions,
    ) -> AwairResult<()> {
        let room_type = reject_unknown(room_type, RoomType::Unknown)?;
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(());
        }

        let path = device_path(effective.device()?, "room-type");
        self.put_json(&effective, path, &RoomTypeBody { room_type })
            .await
    }

    pub async fn set_device_space_type(
        &self,
        space_type: SpaceType,
        options: &RequestOptions,
    ) -> AwairResult<()> {
        let space_type = reject_unknown(space_type, SpaceType::Unknown)?;
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(());
        }

        let path = device_path(effective.device()?, "space-type");
        self.put_json(&effective, path, &SpaceTypeBody { space_type })
            .await
    }

    pub async fn get_device_power_status(
        &self,
        options: &RequestOptions,
    ) -> AwairResult<PowerStatus> {
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(mock::power_status());
        }

        let path = device_path(effective.device()?, "power-status");
        self.get_json(&effective, path, Vec::new()).await
    }

    /// Get the device's IANA timezone name
    pub async fn get_device_timezone(&self, options: &RequestOptions) -> AwairResult<String> {
        let effective = self.resolve(options, Scope::Device)?;
        if effective.mock_mode {
            return Ok(mock::timezone());
        }

        let path = device_path(effective.device()?, "timezone");
        let response: TimezoneResponse = self.get_json(&effective, path, Vec::new()).await?;
        Ok(response.timezone)
    }
}
