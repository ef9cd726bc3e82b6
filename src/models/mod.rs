//! Data models for the YR weather integration
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates
//! - Condition: Weather condition labels and the symbol code table
//! - Forecast: Parsed forecast snapshot and its entries

pub mod condition;
pub mod forecast;
pub mod location;

// Re-export all public types for convenient access
pub use condition::WeatherCondition;
pub use forecast::{ForecastEntry, ForecastSnapshot};
pub use location::Coordinates;
