//! Weather condition labels and the met.no symbol code table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse weather condition exposed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherCondition {
    Sunny,
    #[serde(rename = "partlycloudy")]
    PartlyCloudy,
    Cloudy,
    Rainy,
    SnowyRainy,
    Snowy,
    Pouring,
    LightningRainy,
    Fog,
    /// Any symbol code without a mapping
    Exceptional,
}

impl WeatherCondition {
    /// Map a met.no weather symbol number to a condition.
    ///
    /// See <https://api.met.no/weatherapi/weathericon/1.1/documentation>.
    #[must_use]
    pub fn from_symbol_code(code: &str) -> Self {
        match code {
            "1" => Self::Sunny,
            "2" | "3" => Self::PartlyCloudy,
            "4" => Self::Cloudy,
            "5" | "6" | "9" | "40" | "41" | "46" => Self::Rainy,
            "7" | "12" | "47" | "48" => Self::SnowyRainy,
            "8" | "13" | "49" | "50" => Self::Snowy,
            "10" => Self::Pouring,
            "11" | "22" | "25" | "30" => Self::LightningRainy,
            "15" => Self::Fog,
            _ => Self::Exceptional,
        }
    }

    /// Host-facing label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::PartlyCloudy => "partlycloudy",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::SnowyRainy => "snowy-rainy",
            Self::Snowy => "snowy",
            Self::Pouring => "pouring",
            Self::LightningRainy => "lightning-rainy",
            Self::Fog => "fog",
            Self::Exceptional => "exceptional",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
