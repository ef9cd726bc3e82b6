//! met.no `locationforecastlts` XML structures and conversion utilities

use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::Result;
use crate::error::WeatherError;
use crate::models::{ForecastEntry, ForecastSnapshot};

/// Root `<weatherdata>` element
#[derive(Debug, Deserialize)]
struct WeatherDataXml {
    #[serde(rename = "@created")]
    created: Option<String>,
    product: ProductXml,
}

#[derive(Debug, Deserialize)]
struct ProductXml {
    #[serde(rename = "time", default)]
    times: Vec<TimeXml>,
}

/// A `<time>` node. Instant nodes have `from == to` and carry temperature,
/// wind, humidity and pressure. Interval nodes carry precipitation and symbol.
#[derive(Debug, Deserialize)]
struct TimeXml {
    #[serde(rename = "@datatype")]
    datatype: Option<String>,
    #[serde(rename = "@from")]
    from: String,
    #[serde(rename = "@to")]
    to: String,
    location: Option<LocationXml>,
}

#[derive(Debug, Deserialize)]
struct LocationXml {
    temperature: Option<ValueXml>,
    humidity: Option<ValueXml>,
    pressure: Option<ValueXml>,
    #[serde(rename = "windSpeed")]
    wind_speed: Option<WindSpeedXml>,
    #[serde(rename = "windDirection")]
    wind_direction: Option<WindDirectionXml>,
    precipitation: Option<ValueXml>,
    symbol: Option<SymbolXml>,
}

#[derive(Debug, Deserialize)]
struct ValueXml {
    #[serde(rename = "@value")]
    value: f64,
}

#[derive(Debug, Deserialize)]
struct WindSpeedXml {
    #[serde(rename = "@mps")]
    mps: f64,
}

#[derive(Debug, Deserialize)]
struct WindDirectionXml {
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "@deg")]
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SymbolXml {
    #[serde(rename = "@number")]
    number: String,
}

/// First precipitation and symbol seen for a given `to` timestamp
#[derive(Debug, Default)]
struct WindowValues<'a> {
    precipitation: Option<f64>,
    symbol: Option<&'a str>,
}

/// Parse a locationforecast document into a snapshot.
///
/// Entries are the `datatype="forecast"` nodes that have a temperature, in
/// document order. Precipitation and symbol come from the first node (of any
/// datatype) whose `to` matches the entry's `to` and that carries the value.
pub fn parse_document(body: &str) -> Result<ForecastSnapshot> {
    let document: WeatherDataXml = from_str(body)?;

    let created = document
        .created
        .as_deref()
        .map(parse_timestamp)
        .transpose()?;

    let times = &document.product.times;
    let windows = index_windows(times);

    let mut entries = Vec::new();
    for time in times {
        if time.datatype.as_deref() != Some("forecast") {
            continue;
        }
        let Some(location) = &time.location else {
            continue;
        };
        let Some(temperature) = &location.temperature else {
            continue;
        };

        let window = windows.get(time.to.as_str());
        entries.push(ForecastEntry {
            from: parse_timestamp(&time.from)?,
            to: parse_timestamp(&time.to)?,
            temperature: temperature.value,
            humidity: location.humidity.as_ref().map(|h| h.value),
            pressure: location.pressure.as_ref().map(|p| p.value),
            wind_speed_mps: location.wind_speed.as_ref().map(|w| w.mps),
            wind_bearing: location
                .wind_direction
                .as_ref()
                .and_then(|w| w.name.clone()),
            wind_direction_deg: location.wind_direction.as_ref().and_then(|w| w.deg),
            precipitation: window.and_then(|w| w.precipitation),
            symbol: window.and_then(|w| w.symbol).map(str::to_string),
        });
    }

    debug!(
        "Parsed {} forecast entries from {} time nodes",
        entries.len(),
        times.len()
    );

    Ok(ForecastSnapshot::new(entries, created))
}

fn index_windows(times: &[TimeXml]) -> HashMap<&str, WindowValues<'_>> {
    let mut windows: HashMap<&str, WindowValues<'_>> = HashMap::new();
    for time in times {
        let Some(location) = &time.location else {
            continue;
        };
        let window = windows.entry(time.to.as_str()).or_default();
        if window.precipitation.is_none() {
            window.precipitation = location.precipitation.as_ref().map(|p| p.value);
        }
        if window.symbol.is_none() {
            window.symbol = location.symbol.as_ref().map(|s| s.number.as_str());
        }
    }
    windows
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| WeatherError::parse(format!("Invalid timestamp '{s}': {e}")))
}
