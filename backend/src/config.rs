//! Configuration management for the Prayer Times Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with PRAYER_ prefix

use chrono_tz::Tz;
use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{parse_time_zone, Coordinate, ValidationError};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Place-name lookup configuration
    pub geocoding: GeocodingConfig,

    /// Fixed location used in place of a device sensor
    #[serde(default)]
    pub location: LocationConfig,

    /// Rendering configuration
    pub display: DisplayConfig,

    /// Solar calculation configuration
    pub ephemeris: EphemerisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingConfig {
    /// Base URL of the LocationIQ-compatible search API
    pub api_endpoint: String,

    /// API key, empty when place lookups are disabled
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    /// IANA zone used to render HH:MM times
    pub timezone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EphemerisConfig {
    /// Observer height above the surrounding terrain in metres
    pub observer_height_m: f64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("PRAYER_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("geocoding.api_endpoint", "https://eu1.locationiq.com/v1")?
            .set_default("geocoding.api_key", "")?
            .set_default("geocoding.timeout_secs", 10)?
            .set_default("display.timezone", "UTC")?
            .set_default("ephemeris.observer_height_m", 0.0)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PRAYER_ prefix)
            .add_source(
                Environment::with_prefix("PRAYER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl GeocodingConfig {
    /// Place lookups need an API key
    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl LocationConfig {
    /// The configured coordinate, if both axes are set and in range
    pub fn coordinate(&self) -> Option<Result<Coordinate, ValidationError>> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        }
    }
}

impl DisplayConfig {
    pub fn zone(&self) -> Result<Tz, ValidationError> {
        parse_time_zone(&self.timezone)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_requires_both_axes() {
        let partial = LocationConfig {
            latitude: Some(51.5),
            longitude: None,
        };
        assert!(partial.coordinate().is_none());

        let full = LocationConfig {
            latitude: Some(51.5),
            longitude: Some(-0.1),
        };
        assert_eq!(
            full.coordinate(),
            Some(Ok(Coordinate {
                latitude: 51.5,
                longitude: -0.1
            }))
        );
    }

    #[test]
    fn test_location_out_of_range() {
        let bad = LocationConfig {
            latitude: Some(123.0),
            longitude: Some(0.0),
        };
        assert!(matches!(bad.coordinate(), Some(Err(_))));
    }

    #[test]
    fn test_geocoding_enabled_only_with_key() {
        let mut geocoding = GeocodingConfig {
            api_endpoint: "https://eu1.locationiq.com/v1".to_string(),
            api_key: "  ".to_string(),
            timeout_secs: 10,
        };
        assert!(!geocoding.is_enabled());
        geocoding.api_key = "pk.test".to_string();
        assert!(geocoding.is_enabled());
    }

    #[test]
    fn test_display_zone() {
        let display = DisplayConfig {
            timezone: "Asia/Jakarta".to_string(),
        };
        assert_eq!(display.zone(), Ok(Tz::Asia__Jakarta));

        let display = DisplayConfig {
            timezone: "Nowhere/Special".to_string(),
        };
        assert!(display.zone().is_err());
    }

    #[test]
    fn test_server_bind_address() {
        assert_eq!(ServerConfig::default().bind_address(), "0.0.0.0:3000");
    }
}
