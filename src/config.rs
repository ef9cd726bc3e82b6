//! Configuration management for the YR weather platform
//!
//! Handles loading the platform configuration from a TOML file and
//! validates all settings before the platform is set up.

use crate::error::WeatherError;
use crate::models::Coordinates;
use anyhow::{Context, Result};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default entity name
pub const DEFAULT_NAME: &str = "YR";

/// Platform configuration as supplied by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Latitude of the forecast location; the host's latitude when omitted
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude of the forecast location; the host's longitude when omitted
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Display name of the weather entity
    #[serde(default = "default_name")]
    pub name: String,
    /// HTTP and throttle settings
    #[serde(default)]
    pub fetcher: FetcherConfig,
}

/// Forecast fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Base URL of the locationforecast endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Minimum seconds between two fetches
    #[serde(default = "default_min_update_interval")]
    pub min_update_interval_seconds: u64,
}

// Default value functions
fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_base_url() -> String {
    "https://api.met.no/weatherapi/locationforecastlts/1.3".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("yr-weather/{}", crate::VERSION)
}

fn default_min_update_interval() -> u64 {
    180
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            min_update_interval_seconds: default_min_update_interval(),
        }
    }
}

impl FetcherConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }

    #[must_use]
    pub fn min_update_interval(&self) -> Duration {
        Duration::from_secs(self.min_update_interval_seconds)
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            name: default_name(),
            fetcher: FetcherConfig::default(),
        }
    }
}

impl PlatformConfig {
    /// Load configuration from a TOML file
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(config_path).format(FileFormat::Toml))
            .build()
            .with_context(|| format!("Failed to read configuration from {}", config_path.display()))?;

        let mut config: PlatformConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.name.trim().is_empty() {
            self.name = default_name();
        }
        if self.fetcher.base_url.is_empty() {
            self.fetcher.base_url = default_base_url();
        }
        if self.fetcher.timeout_seconds == 0 {
            self.fetcher.timeout_seconds = default_timeout();
        }
        if self.fetcher.user_agent.is_empty() {
            self.fetcher.user_agent = default_user_agent();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_location()?;
        self.validate_fetcher()?;
        Ok(())
    }

    fn validate_location(&self) -> Result<()> {
        // Range-check whichever half is present; the other comes from the host.
        let probe = Coordinates {
            latitude: self.latitude.unwrap_or(0.0),
            longitude: self.longitude.unwrap_or(0.0),
        };
        probe.validate().map_err(anyhow::Error::from)
    }

    fn validate_fetcher(&self) -> Result<()> {
        if self.fetcher.timeout_seconds > 300 {
            return Err(WeatherError::config("Fetch timeout cannot exceed 300 seconds").into());
        }

        if !self.fetcher.base_url.starts_with("http://")
            && !self.fetcher.base_url.starts_with("https://")
        {
            return Err(WeatherError::config(
                "Forecast base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = PlatformConfig::default();
        assert_eq!(config.name, "YR");
        assert!(config.latitude.is_none());
        assert!(config.longitude.is_none());
        assert_eq!(
            config.fetcher.base_url,
            "https://api.met.no/weatherapi/locationforecastlts/1.3"
        );
        assert_eq!(config.fetcher.timeout_seconds, 30);
        assert_eq!(config.fetcher.min_update_interval(), Duration::from_secs(180));
        assert!(config.fetcher.user_agent.starts_with("yr-weather/"));
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
latitude = 59.91
longitude = 10.75
name = "Oslo"

[fetcher]
base_url = "http://localhost:8080"
timeout_seconds = 5
min_update_interval_seconds = 600
"#,
        );

        let config = PlatformConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.latitude, Some(59.91));
        assert_eq!(config.longitude, Some(10.75));
        assert_eq!(config.name, "Oslo");
        assert_eq!(config.fetcher.base_url, "http://localhost:8080");
        assert_eq!(config.fetcher.timeout_seconds, 5);
        assert_eq!(config.fetcher.min_update_interval_seconds, 600);
    }

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        let file = write_config("latitude = 60.0\n");

        let config = PlatformConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.latitude, Some(60.0));
        assert_eq!(config.longitude, None);
        assert_eq!(config.name, DEFAULT_NAME);
        assert_eq!(config.fetcher.timeout_seconds, 30);
    }

    #[test]
    fn test_blank_name_falls_back_to_default() {
        let mut config = PlatformConfig {
            name: "  ".to_string(),
            ..PlatformConfig::default()
        };
        config.apply_defaults();
        assert_eq!(config.name, "YR");
    }

    #[test]
    fn test_validation_rejects_out_of_range_latitude() {
        let config = PlatformConfig {
            latitude: Some(95.0),
            ..PlatformConfig::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid coordinates"));
    }

    #[test]
    fn test_validation_numeric_ranges() {
        let mut config = PlatformConfig::default();
        config.fetcher.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_validation_rejects_non_http_base_url() {
        let mut config = PlatformConfig::default();
        config.fetcher.base_url = "ftp://api.met.no".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = PlatformConfig::load_from_path(Path::new("/nonexistent/yr.toml"));
        assert!(result.is_err());
    }
}
