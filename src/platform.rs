//! Host platform setup for the YR weather entity

use std::sync::Arc;
use tracing::info;

use crate::Result;
use crate::config::PlatformConfig;
use crate::fetcher::DataFetcher;
use crate::models::Coordinates;
use crate::weather::{WeatherProvider, YrWeather};

/// Location the host itself is configured with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostConfig {
    pub latitude: f64,
    pub longitude: f64,
}

/// Receives the entities a platform creates
pub trait EntityRegistry {
    /// Register entities; `update_before_add` asks the host to refresh them first
    fn add_entities(&mut self, entities: Vec<Box<dyn WeatherProvider>>, update_before_add: bool);
}

/// Resolve the forecast location, falling back to the host's location
pub fn resolve_coordinates(host: &HostConfig, config: &PlatformConfig) -> Result<Coordinates> {
    Coordinates::new(
        config.latitude.unwrap_or(host.latitude),
        config.longitude.unwrap_or(host.longitude),
    )
}

/// Set up the YR weather platform and register its single entity
pub fn setup_platform(
    host: &HostConfig,
    config: &PlatformConfig,
    registry: &mut dyn EntityRegistry,
) -> Result<()> {
    let coordinates = resolve_coordinates(host, config)?;
    let fetcher = DataFetcher::new(coordinates, &config.fetcher)?;

    info!(
        "Setting up YR weather '{}' at {}",
        config.name,
        coordinates.format_coordinates()
    );

    let entity: Box<dyn WeatherProvider> =
        Box::new(YrWeather::new(config.name.clone(), Arc::new(fetcher)));
    registry.add_entities(vec![entity], true);
    Ok(())
}
