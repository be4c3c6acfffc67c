//! awair - command-line access to the Awair developer API

mod config;

use awair_client::{
    AirDataQuery, AirDataResolution, AwairClient, AwairConfig, ClockMode, DevicePreference,
    DisplayBrightness, DisplayMode, DisplaySettings, KnockingMode, LedBrightness, LedMode,
    LedSettings, Location, RequestOptions, RoomType, SensorComponent, SpaceType, TemperatureUnit,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use config::{CliConfig, ConfigLoader};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "awair")]
#[command(version)]
#[command(about = "Query and configure Awair air-quality monitors", long_about = None)]
struct Cli {
    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "AWAIR_CONFIG")]
    config: Option<PathBuf>,

    /// Bearer token
    #[arg(long, global = true, env = "AWAIR_BEARER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Device type (e.g. awair-element)
    #[arg(long, global = true)]
    device_type: Option<String>,

    /// Device id
    #[arg(long, global = true)]
    device_id: Option<u64>,

    /// Serve canned data instead of calling the API
    #[arg(long, global = true)]
    mock: bool,

    /// API endpoint
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List devices on the account
    Devices,

    /// Show the account profile
    User,

    /// Show API usage for the device
    Usage,

    /// Show the newest air-data sample
    Latest {
        /// Report temperature in Fahrenheit (`--fahrenheit=false` for Celsius)
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        fahrenheit: Option<bool>,
    },

    /// Show air-data samples
    AirData {
        /// Sample resolution
        #[arg(value_enum, default_value = "raw")]
        resolution: Resolution,

        /// Start of the range (RFC 3339)
        #[arg(long)]
        from: Option<DateTime<Utc>>,

        /// End of the range (RFC 3339)
        #[arg(long)]
        to: Option<DateTime<Utc>>,

        /// Maximum number of samples
        #[arg(short, long)]
        limit: Option<u32>,

        /// Newest sample first (`--desc=false` for oldest first)
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        desc: Option<bool>,

        /// Report temperature in Fahrenheit (`--fahrenheit=false` for Celsius)
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        fahrenheit: Option<bool>,
    },

    /// Show or change the display mode
    Display {
        #[command(subcommand)]
        action: Option<DisplayAction>,
    },

    /// Show or change the knocking mode
    Knocking {
        #[command(subcommand)]
        action: Option<KnockingAction>,
    },

    /// Show or change the LED mode
    Led {
        #[command(subcommand)]
        action: Option<LedAction>,
    },

    /// Set the device location
    SetLocation {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },

    /// Rename the device
    SetName { name: String },

    /// Set the air-quality preference (general, productivity, sleep, allergy, baby)
    SetPreference {
        #[arg(value_parser = parse_preference)]
        preference: DevicePreference,
    },

    /// Set the room type (e.g. bedroom, living_room)
    SetRoomType {
        #[arg(value_parser = parse_room_type)]
        room_type: RoomType,
    },

    /// Set the space type (home, office, others)
    SetSpaceType {
        #[arg(value_parser = parse_space_type)]
        space_type: SpaceType,
    },

    /// Show battery state
    PowerStatus,

    /// Show the device timezone
    Timezone,
}

#[derive(Subcommand)]
enum DisplayAction {
    /// Change the display mode
    Set {
        #[arg(value_parser = parse_wire::<DisplayMode>)]
        mode: DisplayMode,

        /// Clock format (12hr, 24hr)
        #[arg(long, value_parser = parse_wire::<ClockMode>)]
        clock_mode: Option<ClockMode>,

        /// Brightness (0, 20, 40, 60, 80, 100)
        #[arg(long, value_parser = parse_display_brightness)]
        brightness: Option<DisplayBrightness>,

        /// Temperature unit (c, f)
        #[arg(long, value_parser = parse_wire::<TemperatureUnit>)]
        temp_unit: Option<TemperatureUnit>,
    },
}

#[derive(Subcommand)]
enum KnockingAction {
    /// Change the knocking mode (on, off, sleep)
    Set {
        #[arg(value_parser = parse_wire::<KnockingMode>)]
        mode: KnockingMode,
    },
}

#[derive(Subcommand)]
enum LedAction {
    /// Change the LED mode (auto, dim, manual, on, sleep)
    Set {
        #[arg(value_parser = parse_wire::<LedMode>)]
        mode: LedMode,

        /// Brightness percentage (0-100)
        #[arg(long, value_parser = parse_led_brightness)]
        brightness: Option<LedBrightness>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Resolution {
    Raw,
    #[value(name = "5-min")]
    FiveMin,
    #[value(name = "15-min")]
    FifteenMin,
}

impl From<Resolution> for AirDataResolution {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Raw => AirDataResolution::Raw,
            Resolution::FiveMin => AirDataResolution::FiveMinuteAverage,
            Resolution::FifteenMin => AirDataResolution::FifteenMinuteAverage,
        }
    }
}

fn wire_spellings(s: &str) -> [String; 3] {
    [s.to_string(), s.to_uppercase(), s.to_lowercase()]
}

/// Parse an API enum from its wire name, in any case
fn parse_wire<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    wire_spellings(s)
        .into_iter()
        .find_map(|candidate| serde_json::from_value(serde_json::Value::String(candidate)).ok())
        .ok_or_else(|| format!("unrecognized value: {}", s))
}

/// Like `parse_wire`, for enums that decode unrecognized names to `unknown`
fn parse_known<T: DeserializeOwned + PartialEq>(s: &str, unknown: T) -> Result<T, String> {
    wire_spellings(s)
        .into_iter()
        .filter_map(|candidate| {
            serde_json::from_value::<T>(serde_json::Value::String(candidate)).ok()
        })
        .find(|value| *value != unknown)
        .ok_or_else(|| format!("unrecognized value: {}", s))
}

fn parse_preference(s: &str) -> Result<DevicePreference, String> {
    parse_known(s, DevicePreference::Unknown)
}

fn parse_room_type(s: &str) -> Result<RoomType, String> {
    parse_known(s, RoomType::Unknown)
}

fn parse_space_type(s: &str) -> Result<SpaceType, String> {
    parse_known(s, SpaceType::Unknown)
}

fn parse_display_brightness(s: &str) -> Result<DisplayBrightness, String> {
    let value: u8 = s.parse().map_err(|e| format!("{}", e))?;
    DisplayBrightness::try_from(value).map_err(|e| e.to_string())
}

fn parse_led_brightness(s: &str) -> Result<LedBrightness, String> {
    let value: u8 = s.parse().map_err(|e| format!("{}", e))?;
    LedBrightness::new(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = ConfigLoader::new().with_cli_path(cli.config.clone()).load()?;

    // CLI verbose flag takes precedence, then config
    let log_level = if cli.verbose > 0 {
        match cli.verbose {
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    } else {
        match file_config.cli.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let client_config = merge_client_config(file_config, &cli);
    let client = AwairClient::new(client_config)?;
    debug!(
        endpoint = %client.http().base_url(),
        retries = client.http().retry_policy().max_retries,
        mock = client.mock_mode(),
        "client configured"
    );

    run(&client, cli.command).await
}

/// Merge CLI flags over the loaded configuration
fn merge_client_config(config: CliConfig, cli: &Cli) -> AwairConfig {
    let mut client = config.client;

    if let Some(token) = &cli.token {
        client.bearer_token = Some(token.clone());
    }
    if let Some(device_type) = &cli.device_type {
        client.device_type = Some(device_type.clone());
    }
    if let Some(device_id) = cli.device_id {
        client.device_id = Some(device_id);
    }
    if cli.mock {
        client.mock_mode = true;
    }
    if let Some(endpoint) = &cli.endpoint {
        client.transport.api_endpoint = endpoint.clone();
    }

    client
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(client: &AwairClient, command: Commands) -> anyhow::Result<()> {
    let options = RequestOptions::new();

    match command {
        Commands::Devices => print_json(&client.get_devices(&options).await?),
        Commands::User => print_json(&client.get_user(&options).await?),
        Commands::Usage => print_json(&client.get_device_api_usage(&options).await?),
        Commands::Latest { fahrenheit } => {
            match client
                .get_latest_air_data(fahrenheit, &options)
                .await?
            {
                Some(sample) => {
                    info!(
                        score = sample.score,
                        temp = ?sample.sensor(SensorComponent::Temp),
                        co2 = ?sample.sensor(SensorComponent::Co2),
                        "latest sample"
                    );
                    print_json(&sample)
                }
                None => {
                    println!("No data");
                    Ok(())
                }
            }
        }
        Commands::AirData {
            resolution,
            from,
            to,
            limit,
            desc,
            fahrenheit,
        } => {
            let query = AirDataQuery {
                from,
                to,
                limit,
                desc,
                fahrenheit,
            };
            let samples = client
                .get_air_data(resolution.into(), &query, &options)
                .await?;
            info!("Fetched {} samples", samples.len());
            print_json(&samples)
        }
        Commands::Display { action: None } => {
            print_json(&client.get_device_display_mode(&options).await?)
        }
        Commands::Display {
            action:
                Some(DisplayAction::Set {
                    mode,
                    clock_mode,
                    brightness,
                    temp_unit,
                }),
        } => {
            let settings = DisplaySettings {
                mode,
                clock_mode,
                brightness,
                temperature_unit: temp_unit,
            };
            client.set_device_display_mode(&settings, &options).await?;
            println!("OK");
            Ok(())
        }
        Commands::Knocking { action: None } => {
            print_json(&client.get_device_knocking_mode(&options).await?)
        }
        Commands::Knocking {
            action: Some(KnockingAction::Set { mode }),
        } => {
            client.set_device_knocking_mode(mode, &options).await?;
            println!("OK");
            Ok(())
        }
        Commands::Led { action: None } => print_json(&client.get_device_led_mode(&options).await?),
        Commands::Led {
            action: Some(LedAction::Set { mode, brightness }),
        } => {
            let settings = LedSettings { mode, brightness };
            client.set_device_led_mode(&settings, &options).await?;
            println!("OK");
            Ok(())
        }
        Commands::SetLocation {
            latitude,
            longitude,
        } => {
            let location = Location {
                latitude,
                longitude,
            };
            client.set_device_location(&location, &options).await?;
            println!("OK");
            Ok(())
        }
        Commands::SetName { name } => {
            client.set_device_name(&name, &options).await?;
            println!("OK");
            Ok(())
        }
        Commands::SetPreference { preference } => {
            client.set_device_preference(preference, &options).await?;
            println!("OK");
            Ok(())
        }
        Commands::SetRoomType { room_type } => {
            client.set_device_room_type(room_type, &options).await?;
            println!("OK");
            Ok(())
        }
        Commands::SetSpaceType { space_type } => {
            client.set_device_space_type(space_type, &options).await?;
            println!("OK");
            Ok(())
        }
        Commands::PowerStatus => print_json(&client.get_device_power_status(&options).await?),
        Commands::Timezone => {
            println!("{}", client.get_device_timezone(&options).await?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_any_case() {
        assert_eq!(parse_room_type("living_room").unwrap(), RoomType::LivingRoom);
        assert_eq!(parse_room_type("LIVING_ROOM").unwrap(), RoomType::LivingRoom);
        assert_eq!(parse_wire::<LedMode>("Manual").unwrap(), LedMode::Manual);
        assert_eq!(
            parse_wire::<ClockMode>("24hr").unwrap(),
            ClockMode::TwentyFourHour
        );
        assert!(parse_wire::<LedMode>("blink").is_err());
        assert_eq!(parse_space_type("office").unwrap(), SpaceType::Office);
        assert!(parse_space_type("garden").is_err());
        assert!(parse_room_type("greenhouse").is_err());
        assert!(parse_preference("unknown").is_err());
    }

    #[test]
    fn test_parse_brightness() {
        assert_eq!(
            parse_display_brightness("80").unwrap(),
            DisplayBrightness::Eighty
        );
        assert!(parse_display_brightness("85").is_err());
        assert_eq!(parse_led_brightness("85").unwrap().get(), 85);
        assert!(parse_led_brightness("101").is_err());
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "awair",
            "--device-type",
            "awair-omni",
            "--device-id",
            "7",
            "--mock",
            "timezone",
        ]);
        let mut file_config = CliConfig::default();
        file_config.client.device_type = Some("awair-element".to_string());
        file_config.client.device_id = Some(1234);
        file_config.client.bearer_token = Some("from-file".to_string());

        let merged = merge_client_config(file_config, &cli);
        assert_eq!(merged.device_type.as_deref(), Some("awair-omni"));
        assert_eq!(merged.device_id, Some(7));
        assert!(merged.mock_mode);
    }

    #[test]
    fn test_parse_display_set() {
        let cli = Cli::parse_from([
            "awair",
            "display",
            "set",
            "clock",
            "--clock-mode",
            "24hr",
            "--brightness",
            "60",
        ]);
        match cli.command {
            Commands::Display {
                action:
                    Some(DisplayAction::Set {
                        mode,
                        clock_mode,
                        brightness,
                        temp_unit,
                    }),
            } => {
                assert_eq!(mode, DisplayMode::Clock);
                assert_eq!(clock_mode, Some(ClockMode::TwentyFourHour));
                assert_eq!(brightness, Some(DisplayBrightness::Sixty));
                assert!(temp_unit.is_none());
            }
            _ => panic!("expected display set"),
        }
    }

    #[test]
    fn test_optional_bool_flags() {
        let cli = Cli::parse_from(["awair", "air-data", "5-min", "--desc=false", "--fahrenheit"]);
        match cli.command {
            Commands::AirData {
                desc, fahrenheit, ..
            } => {
                assert_eq!(desc, Some(false));
                assert_eq!(fahrenheit, Some(true));
            }
            _ => panic!("expected air-data"),
        }

        let cli = Cli::parse_from(["awair", "latest"]);
        assert!(matches!(cli.command, Commands::Latest { fahrenheit: None }));

        let cli = Cli::parse_from(["awair", "latest", "--fahrenheit=false"]);
        assert!(matches!(
            cli.command,
            Commands::Latest {
                fahrenheit: Some(false)
            }
        ));
    }

    #[tokio::test]
    async fn test_run_in_mock_mode() {
        let config = AwairConfig::default()
            .with_mock_mode(true)
            .with_device("awair-element", 1234);
        let client = AwairClient::new(config).unwrap();

        run(&client, Commands::Timezone).await.unwrap();
        run(&client, Commands::Latest { fahrenheit: None })
            .await
            .unwrap();
        run(
            &client,
            Commands::SetRoomType {
                room_type: RoomType::Office,
            },
        )
        .await
        .unwrap();
    }
}
