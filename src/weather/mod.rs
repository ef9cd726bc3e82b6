//! Weather entity backed by the met.no locationforecast
//!
//! [`YrWeather`] is a read-only view over the last snapshot captured from a
//! shared [`DataFetcher`]. Each host refresh asks the fetcher to update and
//! then re-captures its snapshot; property reads never touch the network.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::Result;
use crate::error::WeatherError;
use crate::fetcher::{DataFetcher, UpdateOutcome};
use crate::models::{ForecastEntry, ForecastSnapshot, WeatherCondition};

pub mod metno;

/// Attribution required by the met.no license
pub const ATTRIBUTION: &str =
    "Weather forecast from met.no, delivered by the Norwegian Meteorological Institute.";

/// Unit of every temperature this provider reports
pub const TEMP_CELSIUS: &str = "°C";

/// Convert m/s to km/h, rounded to two decimals
#[must_use]
pub fn mps_to_kmh(mps: f64) -> f64 {
    (mps * 18.0 / 5.0 * 100.0).round() / 100.0
}

/// One point of the forecast list
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastRecord {
    /// End of the forecast window
    pub time: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Precipitation in mm
    pub precipitation: Option<f64>,
    /// Wind speed in km/h
    pub wind_speed: Option<f64>,
    /// Compass name of the wind direction
    pub wind_bearing: Option<String>,
    pub condition: Option<WeatherCondition>,
}

impl From<&ForecastEntry> for ForecastRecord {
    fn from(entry: &ForecastEntry) -> Self {
        Self {
            time: entry.to,
            temperature: entry.temperature,
            precipitation: entry.precipitation,
            wind_speed: entry.wind_speed_mps.map(mps_to_kmh),
            wind_bearing: entry.wind_bearing.clone(),
            condition: entry.condition(),
        }
    }
}

/// Contract a host expects from a weather entity
pub trait WeatherProvider: Send + Sync {
    /// Display name of the entity
    fn name(&self) -> &str;

    fn attribution(&self) -> &str;

    fn temperature_unit(&self) -> &str;

    /// Current temperature
    fn temperature(&self) -> Result<f64>;

    /// Current relative humidity in percent
    fn humidity(&self) -> Result<f64>;

    /// Current air pressure in hPa
    fn pressure(&self) -> Result<f64>;

    /// Current wind speed in km/h
    fn wind_speed(&self) -> Result<f64>;

    /// Current wind direction as a compass name
    fn wind_bearing(&self) -> Result<&str>;

    /// Current weather condition
    fn condition(&self) -> Result<WeatherCondition>;

    /// Forecast points in document order; empty when no data is available
    fn forecast(&self) -> Vec<ForecastRecord>;

    /// Pull fresh data
    fn update(&mut self) -> UpdateOutcome;
}

/// YR weather entity
#[derive(Debug)]
pub struct YrWeather {
    name: String,
    fetcher: Arc<DataFetcher>,
    snapshot: Option<Arc<ForecastSnapshot>>,
}

impl YrWeather {
    /// Create a new entity; it has no data until the first refresh
    pub fn new(name: impl Into<String>, fetcher: Arc<DataFetcher>) -> Self {
        Self {
            name: name.into(),
            fetcher,
            snapshot: None,
        }
    }

    /// Ask the fetcher for new data and capture whatever it now holds
    pub fn refresh(&mut self) -> UpdateOutcome {
        let outcome = self.fetcher.update();
        self.snapshot = self.fetcher.snapshot();
        outcome
    }

    pub fn fetcher(&self) -> &Arc<DataFetcher> {
        &self.fetcher
    }

    fn current(&self) -> Result<&ForecastEntry> {
        self.snapshot
            .as_deref()
            .and_then(ForecastSnapshot::current)
            .ok_or(WeatherError::NoData)
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(WeatherError::MissingField { field })
}

impl WeatherProvider for YrWeather {
    fn name(&self) -> &str {
        &self.name
    }

    fn attribution(&self) -> &str {
        ATTRIBUTION
    }

    fn temperature_unit(&self) -> &str {
        TEMP_CELSIUS
    }

    fn temperature(&self) -> Result<f64> {
        Ok(self.current()?.temperature)
    }

    fn humidity(&self) -> Result<f64> {
        required(self.current()?.humidity, "humidity")
    }

    fn pressure(&self) -> Result<f64> {
        required(self.current()?.pressure, "pressure")
    }

    fn wind_speed(&self) -> Result<f64> {
        required(self.current()?.wind_speed_mps, "wind speed").map(mps_to_kmh)
    }

    fn wind_bearing(&self) -> Result<&str> {
        required(self.current()?.wind_bearing.as_deref(), "wind bearing")
    }

    fn condition(&self) -> Result<WeatherCondition> {
        required(self.current()?.condition(), "symbol")
    }

    fn forecast(&self) -> Vec<ForecastRecord> {
        self.snapshot
            .as_deref()
            .map(|snapshot| snapshot.entries.iter().map(ForecastRecord::from).collect())
            .unwrap_or_default()
    }

    fn update(&mut self) -> UpdateOutcome {
        self.refresh()
    }
}
