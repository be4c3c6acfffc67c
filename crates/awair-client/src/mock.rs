//! Canned responses served in mock mode
//!
//! Values are fixed and do not depend on the request: the same device, user
//! and samples come back whatever device id, time range or unit is asked for.

use crate::types::{
    AirData, ApiScope, Device, DevicePreference, DisplayMode, IndexComponent, KnockingMode,
    LedBrightness, LedMode, LedSettings, Permission, PowerStatus, RoomType, SensorComponent,
    SensorIndex, SensorReading, SpaceType, Usage, User,
};
use chrono::{DateTime, Utc};

fn timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

/// The single device listed in mock mode
pub fn device() -> Device {
    Device {
        name: "Mock Device".to_string(),
        mac_address: "0123456789AB".to_string(),
        latitude: 43.6542052,
        longitude: -70.2500918,
        preference: DevicePreference::Productivity,
        timezone: "America/New_York".to_string(),
        room_type: RoomType::Bedroom,
        device_type: "awair-element".to_string(),
        space_type: SpaceType::Home,
        device_uuid: "awair-element_1234".to_string(),
        device_id: 1234,
        location_name: "Portland".to_string(),
    }
}

/// Battery state of the mock device
pub fn power_status() -> PowerStatus {
    PowerStatus {
        percentage: 91,
        plugged: true,
        // 2019-05-16T22:21:04.160Z
        timestamp: timestamp(1_558_045_264_160),
    }
}

/// LED settings of the mock device
pub fn led_settings() -> LedSettings {
    LedSettings {
        mode: LedMode::Manual,
        brightness: LedBrightness::new(100).ok(),
    }
}

pub fn display_mode() -> DisplayMode {
    DisplayMode::Score
}

pub fn knocking_mode() -> KnockingMode {
    KnockingMode::Off
}

pub fn timezone() -> String {
    device().timezone
}

/// The account returned in mock mode, on the Hobbyist tier
pub fn user() -> User {
    const UNLIMITED: u64 = 2_147_483_647;

    let quotas = [
        (ApiScope::FifteenMin, 100),
        (ApiScope::FiveMin, 300),
        (ApiScope::Raw, 500),
        (ApiScope::Latest, 300),
        (ApiScope::PutPreference, 300),
        (ApiScope::PutDisplayMode, 300),
        (ApiScope::PutLedMode, 300),
        (ApiScope::PutKnockingMode, 300),
        (ApiScope::PutTimezone, 300),
        (ApiScope::PutDeviceName, 300),
        (ApiScope::PutLocation, 300),
        (ApiScope::PutRoomType, 300),
        (ApiScope::PutSpaceType, 300),
        (ApiScope::GetDisplayMode, 300),
        (ApiScope::GetLedMode, 300),
        (ApiScope::UserDeviceList, UNLIMITED),
        (ApiScope::UserInfo, UNLIMITED),
        (ApiScope::GetKnockingMode, 300),
        (ApiScope::GetPowerStatus, 300),
        (ApiScope::GetTimezone, 300),
    ];

    User {
        id: "8888".to_string(),
        first_name: "Doris".to_string(),
        last_name: "Jones".to_string(),
        email: "jones@example.com".to_string(),
        sex: "UNKNOWN".to_string(),
        dob_year: None,
        dob_month: None,
        dob_day: None,
        tier: "Hobbyist".to_string(),
        usages: vec![
            Usage {
                scope: ApiScope::UserDeviceList,
                usage: 1,
            },
            Usage {
                scope: ApiScope::UserInfo,
                usage: 1,
            },
        ],
        permissions: quotas
            .into_iter()
            .map(|(scope, quota)| Permission { scope, quota })
            .collect(),
    }
}

/// Per-scope call counts for the mock device
pub fn device_api_usages() -> Vec<Usage> {
    [
        (ApiScope::FiveMin, 4),
        (ApiScope::GetDisplayMode, 2),
        (ApiScope::GetKnockingMode, 1),
        (ApiScope::GetLedMode, 2),
        (ApiScope::GetPowerStatus, 1),
        (ApiScope::GetTimezone, 1),
        (ApiScope::Latest, 3),
        (ApiScope::PutDisplayMode, 1),
        (ApiScope::PutLedMode, 5),
        (ApiScope::Raw, 8),
    ]
    .into_iter()
    .map(|(scope, usage)| Usage { scope, usage })
    .collect()
}

fn sample(millis: i64, pm25: f64, voc: f64, co2: f64, humid: f64, temp: f64) -> AirData {
    let sensors = [
        (SensorComponent::Pm25, pm25),
        (SensorComponent::Voc, voc),
        (SensorComponent::Co2, co2),
        (SensorComponent::Humid, humid),
        (SensorComponent::Temp, temp),
    ];
    let indices = [
        (IndexComponent::Voc, 0.0),
        (IndexComponent::Co2, 0.0),
        (IndexComponent::Pm25, 0.0),
        (IndexComponent::Temp, 0.0),
        (IndexComponent::Humid, -2.0),
    ];

    AirData {
        timestamp: timestamp(millis),
        score: 89.0,
        sensors: sensors
            .into_iter()
            .map(|(comp, value)| SensorReading { comp, value })
            .collect(),
        indices: indices
            .into_iter()
            .map(|(comp, value)| SensorIndex { comp, value })
            .collect(),
    }
}

/// Ten-second samples, newest first
pub fn air_data() -> Vec<AirData> {
    vec![
        // 2021-05-16T22:21:25Z
        sample(1_621_203_685_000, 3.0, 165.0, 458.0, 32.720001220703125, 25.43000030517578),
        sample(1_621_203_675_000, 2.0, 172.0, 458.0, 32.709999084472656, 25.40999984741211),
        sample(1_621_203_665_000, 2.0, 167.0, 457.0, 32.599998474121094, 25.40999984741211),
    ]
}

/// Newest mock sample
pub fn latest_air_data() -> Option<AirData> {
    air_data().into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_data_is_newest_first() {
        let samples = air_data();
        assert!(samples.len() >= 3);
        for pair in samples.windows(2) {
            assert!(pair[0].timestamp > pair[1].timestamp);
        }
        assert_eq!(latest_air_data(), samples.into_iter().next());
    }

    #[test]
    fn test_timestamps() {
        assert_eq!(
            air_data()[0].timestamp.to_rfc3339(),
            "2021-05-16T22:21:25+00:00"
        );
        assert_eq!(
            power_status().timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "2019-05-16T22:21:04.160Z"
        );
    }

    #[test]
    fn test_user_table() {
        let user = user();
        assert_eq!(user.id, "8888");
        assert_eq!(user.permissions.len(), 20);
        assert!(user
            .permissions
            .iter()
            .any(|p| p.scope == ApiScope::UserInfo && p.quota == 2_147_483_647));
    }

    #[test]
    fn test_device_matches_timezone() {
        assert_eq!(timezone(), device().timezone);
        assert_eq!(led_settings().brightness.map(LedBrightness::get), Some(100));
        assert_eq!(device_api_usages().len(), 10);
    }
}
