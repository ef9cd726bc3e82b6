//! Error types and handling for the YR weather integration

use thiserror::Error;

/// Main error type for the YR weather integration
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Could not reach the forecast service
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// The forecast service answered with a non-success status
    #[error("HTTP error {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The response body was not a valid forecast document
    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// Coordinates outside of the valid latitude/longitude range
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// No forecast data has been fetched, or the last fetch failed
    #[error("No forecast data available")]
    NoData,

    /// The current forecast entry lacks a value
    #[error("Forecast entry has no {field}")]
    MissingField { field: &'static str },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl WeatherError {
    /// Create a new connection error
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Self::ConnectionFailed {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::ConnectionFailed { .. } | WeatherError::Timeout { .. } => {
                "Unable to connect to met.no. Please check your internet connection.".to_string()
            }
            WeatherError::HttpStatus { status, .. } => {
                format!("met.no rejected the forecast request (HTTP {status}).")
            }
            WeatherError::ParseError { .. } => {
                "met.no returned a forecast that could not be read.".to_string()
            }
            WeatherError::InvalidCoordinates {
                latitude,
                longitude,
            } => format!("Invalid location: {latitude}, {longitude}"),
            WeatherError::NoData | WeatherError::MissingField { .. } => {
                "No weather data available yet.".to_string()
            }
            WeatherError::Config { message } => format!("Configuration error: {message}"),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(err.to_string())
        } else if let Some(status) = err.status() {
            Self::HttpStatus {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            Self::parse(err.to_string())
        } else {
            Self::connection(err.to_string())
        }
    }
}

impl From<quick_xml::de::DeError> for WeatherError {
    fn from(err: quick_xml::de::DeError) -> Self {
        Self::parse(format!("Failed to parse forecast XML: {err}"))
    }
}
