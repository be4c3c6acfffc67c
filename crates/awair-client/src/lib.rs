//! Awair Client - typed access to the Awair developer API
//!
//! This crate wraps the Awair cloud REST API for air-quality sensors.
//!
//! ## Features
//!
//! - **Devices & Account** - List devices, read the user profile and API usage
//! - **Air Data** - Latest, raw, 5-minute and 15-minute averaged samples
//! - **Device Settings** - Display, knocking and LED modes, location, name,
//!   preference, room and space type
//! - **Per-call Overrides** - Token, device and mock mode can be changed per call
//! - **Retries** - Read requests are retried on network and 5xx failures
//! - **Mock Mode** - Canned responses for development without network access
//!
//! ## Quick Start
//!
//! ```no_run
//! use awair_client::{AwairClient, AwairConfig, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AwairConfig::default()
//!         .with_bearer_token("token")
//!         .with_device("awair-element", 1234);
//!
//!     let client = AwairClient::new(config)?;
//!
//!     if let Some(sample) = client.get_latest_air_data(None, &RequestOptions::new()).await? {
//!         println!("Score {} at {}", sample.score, sample.timestamp);
//!     }
//!
//!     // Another device, same client
//!     let other = RequestOptions::new().device("awair-omni", 42);
//!     println!("{}", client.get_device_timezone(&other).await?);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod query;
pub mod resolve;
pub mod types;

// Re-exports for convenience
pub use client::{AirDataResolution, AwairClient, HttpClient, RetryPolicy};
pub use config::{AwairConfig, TransportConfig, DEFAULT_API_ENDPOINT};
pub use error::{AwairError, AwairResult, DeviceField, TransportError};
pub use query::AirDataQuery;
pub use resolve::{DeviceIdentity, RequestOptions, TransportOverrides};
pub use types::{
    AirData, ApiScope, ClockMode, Device, DevicePreference, DisplayBrightness, DisplayMode,
    DisplaySettings, IndexComponent, KnockingMode, LedBrightness, LedMode, LedSettings, Location,
    Permission, PowerStatus, RoomType, SensorComponent, SensorIndex, SensorReading, SpaceType,
    TemperatureUnit, Usage, User,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
