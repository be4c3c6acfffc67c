//! Shared types for Awair API communication
//!
//! Response entities use the service's camelCase field names on the wire.
//! Request bodies for the device settings endpoints use snake_case.

use crate::error::AwairError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A physical sensor unit registered to the account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// User-facing device name
    pub name: String,

    /// Hardware MAC address
    pub mac_address: String,

    /// Latitude of the device location
    pub latitude: f64,

    /// Longitude of the device location
    pub longitude: f64,

    /// Air-quality preference profile
    pub preference: DevicePreference,

    /// IANA timezone name
    pub timezone: String,

    /// Kind of room the device is placed in
    pub room_type: RoomType,

    /// Device model identifier (e.g. `awair-element`)
    pub device_type: String,

    /// Kind of space the device is placed in
    pub space_type: SpaceType,

    /// Globally unique device identifier
    #[serde(rename = "deviceUUID")]
    pub device_uuid: String,

    /// Numeric id, unique per device type within the account
    pub device_id: u64,

    /// Human readable location
    pub location_name: String,
}

/// Air-quality preference profile of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DevicePreference {
    General,
    Productivity,
    Sleep,
    Allergy,
    Baby,
    #[serde(other)]
    Unknown,
}

/// Room a device is placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    LivingRoom,
    Nursery,
    Bedroom,
    Kitchen,
    Office,
    Others,
    Basement,
    DiningRoom,
    Hallway,
    Bathroom,
    Patio,
    Garage,
    Attic,
    MeetingRoom,
    Restroom,
    BoardRoom,
    ExecutiveSuite,
    Lounge,
    Lobby,
    Laboratory,
    /// Room type added by the service after this crate was released
    #[serde(other)]
    Unknown,
}

/// Space a device is placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpaceType {
    Home,
    Office,
    Others,
    #[serde(other)]
    Unknown,
}

/// API scope used by usage and quota records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiScope {
    #[serde(alias = "FITEEN_MIN")]
    FifteenMin,
    FiveMin,
    Raw,
    Latest,
    PutPreference,
    PutDisplayMode,
    PutLedMode,
    PutKnockingMode,
    PutTimezone,
    PutDeviceName,
    PutLocation,
    PutRoomType,
    PutSpaceType,
    GetDisplayMode,
    GetLedMode,
    GetKnockingMode,
    GetPowerStatus,
    GetTimezone,
    UserDeviceList,
    UserInfo,
    /// Scope added by the service after this crate was released
    #[serde(other)]
    Unknown,
}

/// Number of calls made against a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub scope: ApiScope,
    pub usage: u64,
}

/// Call quota granted for a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub scope: ApiScope,
    pub quota: u64,
}

/// The authenticated account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Account id
    pub id: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Account email
    pub email: String,

    /// Sex as reported by the service (`UNKNOWN` when not set)
    pub sex: String,

    /// Birth year, if the user provided one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob_year: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob_month: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob_day: Option<u8>,

    /// API tier (e.g. `Hobbyist`)
    pub tier: String,

    /// Calls made per scope
    #[serde(default)]
    pub usages: Vec<Usage>,

    /// Quotas per scope
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Component measured by a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorComponent {
    Temp,
    Humid,
    Co2,
    Voc,
    Pm25,
    Dust,
    Lux,
    SplA,
    /// Component this crate does not know about
    #[serde(other)]
    Unknown,
}

/// Component that carries an air-quality index
///
/// Light and sound levels are measured but never indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexComponent {
    Temp,
    Humid,
    Co2,
    Voc,
    Pm25,
    Dust,
    #[serde(other)]
    Unknown,
}

impl From<IndexComponent> for SensorComponent {
    fn from(comp: IndexComponent) -> Self {
        match comp {
            IndexComponent::Temp => SensorComponent::Temp,
            IndexComponent::Humid => SensorComponent::Humid,
            IndexComponent::Co2 => SensorComponent::Co2,
            IndexComponent::Voc => SensorComponent::Voc,
            IndexComponent::Pm25 => SensorComponent::Pm25,
            IndexComponent::Dust => SensorComponent::Dust,
            IndexComponent::Unknown => SensorComponent::Unknown,
        }
    }
}

/// One sensor measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub comp: SensorComponent,
    pub value: f64,
}

/// One air-quality index value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorIndex {
    pub comp: IndexComponent,
    pub value: f64,
}

/// One sampled air-quality reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirData {
    /// Sample time
    pub timestamp: DateTime<Utc>,

    /// Overall air-quality score
    pub score: f64,

    /// Raw measurements
    #[serde(default)]
    pub sensors: Vec<SensorReading>,

    /// Per-component indices
    #[serde(default)]
    pub indices: Vec<SensorIndex>,
}

impl AirData {
    /// Value measured for a component, if present in this sample
    pub fn sensor(&self, comp: SensorComponent) -> Option<f64> {
        self.sensors.iter().find(|s| s.comp == comp).map(|s| s.value)
    }

    /// Index for a component, if present in this sample
    pub fn index(&self, comp: IndexComponent) -> Option<f64> {
        self.indices.iter().find(|i| i.comp == comp).map(|i| i.value)
    }
}

/// Battery state of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerStatus {
    /// Battery level in percent
    pub percentage: u8,

    /// Whether the device is on external power
    pub plugged: bool,

    /// When the status was recorded
    pub timestamp: DateTime<Utc>,
}

/// What the device display shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[serde(alias = "CLOCK")]
    Clock,
    #[serde(alias = "CO2")]
    Co2,
    #[serde(alias = "DEFAULT")]
    Default,
    #[serde(alias = "HUMID")]
    Humid,
    #[serde(alias = "NIGHTLIGHT")]
    Nightlight,
    #[serde(alias = "OFF")]
    Off,
    #[serde(alias = "PM25")]
    Pm25,
    #[serde(alias = "SCORE")]
    Score,
    #[serde(alias = "STATUS")]
    Status,
    #[serde(alias = "TEMP")]
    Temp,
    #[serde(alias = "TEMP_HUMID_CELSIUS")]
    TempHumidCelsius,
    #[serde(alias = "TEMP_HUMID_FAHRENHEIT")]
    TempHumidFahrenheit,
    #[serde(alias = "VOC")]
    Voc,
}

/// Knock gesture handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnockingMode {
    #[serde(alias = "ON")]
    On,
    #[serde(alias = "OFF")]
    Off,
    #[serde(alias = "SLEEP")]
    Sleep,
}

/// LED behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedMode {
    #[serde(alias = "AUTO")]
    Auto,
    #[serde(alias = "DIM")]
    Dim,
    #[serde(alias = "MANUAL")]
    Manual,
    #[serde(alias = "ON")]
    On,
    #[serde(alias = "SLEEP")]
    Sleep,
}

/// Clock format used in clock display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockMode {
    #[serde(rename = "12hr")]
    TwelveHour,
    #[serde(rename = "24hr")]
    TwentyFourHour,
}

/// Temperature unit shown on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[serde(rename = "c", alias = "C")]
    Celsius,
    #[serde(rename = "f", alias = "F")]
    Fahrenheit,
}

/// Display brightness step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DisplayBrightness {
    Off,
    Twenty,
    Forty,
    Sixty,
    Eighty,
    Full,
}

impl TryFrom<u8> for DisplayBrightness {
    type Error = AwairError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DisplayBrightness::Off),
            20 => Ok(DisplayBrightness::Twenty),
            40 => Ok(DisplayBrightness::Forty),
            60 => Ok(DisplayBrightness::Sixty),
            80 => Ok(DisplayBrightness::Eighty),
            100 => Ok(DisplayBrightness::Full),
            other => Err(AwairError::InvalidValue(format!(
                "display brightness must be one of 0, 20, 40, 60, 80, 100 (got {})",
                other
            ))),
        }
    }
}

impl From<DisplayBrightness> for u8 {
    fn from(brightness: DisplayBrightness) -> Self {
        match brightness {
            DisplayBrightness::Off => 0,
            DisplayBrightness::Twenty => 20,
            DisplayBrightness::Forty => 40,
            DisplayBrightness::Sixty => 60,
            DisplayBrightness::Eighty => 80,
            DisplayBrightness::Full => 100,
        }
    }
}

/// LED brightness, any integer percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LedBrightness(u8);

impl LedBrightness {
    /// Create a brightness, rejecting values above 100
    pub fn new(percent: u8) -> Result<Self, AwairError> {
        if percent > 100 {
            return Err(AwairError::InvalidValue(format!(
                "LED brightness must be between 0 and 100 (got {})",
                percent
            )));
        }
        Ok(Self(percent))
    }

    /// Brightness in percent
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for LedBrightness {
    type Error = AwairError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LedBrightness> for u8 {
    fn from(brightness: LedBrightness) -> Self {
        brightness.0
    }
}

/// Display configuration sent when changing the display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub mode: DisplayMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_mode: Option<ClockMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<DisplayBrightness>,

    #[serde(
        default,
        rename = "temp_unit",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature_unit: Option<TemperatureUnit>,
}

impl DisplaySettings {
    /// Settings that only change the mode
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            mode,
            clock_mode: None,
            brightness: None,
            temperature_unit: None,
        }
    }

    pub fn with_clock_mode(mut self, clock_mode: ClockMode) -> Self {
        self.clock_mode = Some(clock_mode);
        self
    }

    pub fn with_brightness(mut self, brightness: DisplayBrightness) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn with_temperature_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature_unit = Some(unit);
        self
    }
}

/// LED mode and optional brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedSettings {
    pub mode: LedMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<LedBrightness>,
}

impl LedSettings {
    /// LED settings without a brightness
    pub fn new(mode: LedMode) -> Self {
        Self {
            mode,
            brightness: None,
        }
    }

    pub fn with_brightness(mut self, brightness: LedBrightness) -> Self {
        self.brightness = Some(brightness);
        self
    }
}

/// Geographic position of a device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}
