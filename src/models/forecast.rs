//! Parsed forecast document and its entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WeatherCondition;

/// One forecast point, with the interval values for its window already resolved
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Start of the forecast window
    pub from: DateTime<Utc>,
    /// End of the forecast window, used as the forecast time
    pub to: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
    /// Air pressure in hPa
    pub pressure: Option<f64>,
    /// Wind speed in m/s
    pub wind_speed_mps: Option<f64>,
    /// Compass name of the wind direction ("N", "SW", ...)
    pub wind_bearing: Option<String>,
    /// Wind direction in degrees
    pub wind_direction_deg: Option<f64>,
    /// Precipitation in mm for the first interval ending at `to`
    pub precipitation: Option<f64>,
    /// Weather symbol number for the first interval ending at `to`
    pub symbol: Option<String>,
}

impl ForecastEntry {
    /// Condition for this entry's window, if a symbol was present
    #[must_use]
    pub fn condition(&self) -> Option<WeatherCondition> {
        self.symbol
            .as_deref()
            .map(WeatherCondition::from_symbol_code)
    }
}

/// Immutable result of one successful fetch
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastSnapshot {
    /// Forecast entries in document order
    pub entries: Vec<ForecastEntry>,
    /// Generation time reported by met.no
    pub created: Option<DateTime<Utc>>,
    /// When this document was fetched
    pub fetched_at: DateTime<Utc>,
}

impl ForecastSnapshot {
    #[must_use]
    pub fn new(entries: Vec<ForecastEntry>, created: Option<DateTime<Utc>>) -> Self {
        Self {
            entries,
            created,
            fetched_at: Utc::now(),
        }
    }

    /// The entry used for present conditions
    #[must_use]
    pub fn current(&self) -> Option<&ForecastEntry> {
        self.entries.first()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
