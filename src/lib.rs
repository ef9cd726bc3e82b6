//! `yr-weather` - met.no forecast provider for home automation hosts
//!
//! This library fetches the met.no locationforecast document for one
//! location on a throttled schedule and exposes current conditions and a
//! multi-point forecast through the [`WeatherProvider`] contract.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod platform;
pub mod throttle;
pub mod weather;

// Re-export core types for public API
pub use config::{FetcherConfig, PlatformConfig};
pub use error::WeatherError;
pub use fetcher::{DataFetcher, ForecastSource, MetNoClient, UpdateOutcome};
pub use models::{Coordinates, ForecastEntry, ForecastSnapshot, WeatherCondition};
pub use platform::{EntityRegistry, HostConfig, setup_platform};
pub use throttle::Throttle;
pub use weather::{ATTRIBUTION, ForecastRecord, WeatherProvider, YrWeather};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherError>;
