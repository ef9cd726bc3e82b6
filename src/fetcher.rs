//! Forecast fetching for met.no
//!
//! `DataFetcher` owns the location, pulls the locationforecast document
//! through a [`ForecastSource`] at most once per throttle interval and keeps
//! the last parsed snapshot.

use parking_lot::{Mutex, RwLock};
use reqwest::blocking::Client;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

use crate::Result;
use crate::config::FetcherConfig;
use crate::error::WeatherError;
use crate::models::{Coordinates, ForecastSnapshot};
use crate::throttle::Throttle;
use crate::weather::metno;

/// Source of raw locationforecast documents
pub trait ForecastSource: Send + Sync {
    /// Fetch the document body for the given coordinates
    fn fetch(&self, coordinates: &Coordinates) -> Result<String>;
}

/// Blocking HTTP client for the met.no locationforecast API
#[derive(Debug)]
pub struct MetNoClient {
    client: Client,
    base_url: String,
}

impl MetNoClient {
    /// Create a new client
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| WeatherError::connection(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the forecast URL for a location
    pub fn forecast_url(&self, coordinates: &Coordinates) -> String {
        format!(
            "{}/?lat={}&lon={}",
            self.base_url, coordinates.latitude, coordinates.longitude
        )
    }
}

impl ForecastSource for MetNoClient {
    #[instrument(skip(self))]
    fn fetch(&self, coordinates: &Coordinates) -> Result<String> {
        let url = self.forecast_url(coordinates);
        debug!(url = %url, "Fetching locationforecast");

        let response = self.client.get(&url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::HttpStatus {
                status: status.as_u16(),
                message: format!("met.no answered {status} for {url}"),
            });
        }

        Ok(response.text()?)
    }
}

/// What a call to [`DataFetcher::update`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A new snapshot replaced the old one
    Updated,
    /// Called again within the throttle interval; nothing changed
    Throttled,
    /// The fetch failed and the snapshot was cleared
    Failed,
}

/// Owns the forecast location and the last parsed forecast
pub struct DataFetcher {
    coordinates: Coordinates,
    source: Box<dyn ForecastSource>,
    throttle: Mutex<Throttle>,
    snapshot: RwLock<Option<Arc<ForecastSnapshot>>>,
}

impl std::fmt::Debug for DataFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFetcher")
            .field("coordinates", &self.coordinates)
            .field("throttle", &self.throttle)
            .field("has_snapshot", &self.snapshot.read().is_some())
            .finish_non_exhaustive()
    }
}

impl DataFetcher {
    /// Create a fetcher backed by the met.no HTTP API
    pub fn new(coordinates: Coordinates, config: &FetcherConfig) -> Result<Self> {
        let source = MetNoClient::new(config)?;
        Ok(Self::with_source(
            coordinates,
            Box::new(source),
            Throttle::new(config.min_update_interval()),
        ))
    }

    /// Create a fetcher with a custom source and throttle
    pub fn with_source(
        coordinates: Coordinates,
        source: Box<dyn ForecastSource>,
        throttle: Throttle,
    ) -> Self {
        Self {
            coordinates,
            source,
            throttle: Mutex::new(throttle),
            snapshot: RwLock::new(None),
        }
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// The last parsed forecast, `None` before the first success or after a failure
    pub fn snapshot(&self) -> Option<Arc<ForecastSnapshot>> {
        self.snapshot.read().clone()
    }

    /// Fetch a new forecast unless the last fetch was within the throttle interval
    pub fn update(&self) -> UpdateOutcome {
        self.update_at(Instant::now())
    }

    /// Same as [`update`](Self::update) with an explicit clock reading
    pub fn update_at(&self, now: Instant) -> UpdateOutcome {
        let mut throttle = self.throttle.lock();
        if !throttle.allow_at(now) {
            debug!(
                "Forecast update throttled, next fetch in {}s",
                throttle.time_until_next_call_at(now).as_secs()
            );
            return UpdateOutcome::Throttled;
        }
        drop(throttle);
        self.refresh_snapshot()
    }

    /// Fetch a new forecast regardless of the throttle
    pub fn force_update(&self) -> UpdateOutcome {
        self.throttle.lock().mark_at(Instant::now());
        self.refresh_snapshot()
    }

    fn refresh_snapshot(&self) -> UpdateOutcome {
        match self.fetch_snapshot() {
            Ok(snapshot) => {
                info!(
                    "Fetched {} forecast entries for {}",
                    snapshot.entries.len(),
                    self.coordinates.format_coordinates()
                );
                *self.snapshot.write() = Some(Arc::new(snapshot));
                UpdateOutcome::Updated
            }
            Err(e) => {
                error!(cause = %e, "{}", e.user_message());
                *self.snapshot.write() = None;
                UpdateOutcome::Failed
            }
        }
    }

    fn fetch_snapshot(&self) -> Result<ForecastSnapshot> {
        let body = self.source.fetch(&self.coordinates)?;
        metno::parse_document(&body)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    pub(crate) const FIXTURE: &str = include_str!("../tests/fixtures/locationforecast.xml");

    /// Replays a fixed sequence of responses, repeating the last one
    pub(crate) struct StubSource {
        responses: Mutex<Vec<Result<String>>>,
        pub(crate) calls: Arc<AtomicUsize>,
    }

    impl StubSource {
        pub(crate) fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub(crate) fn fixture() -> Self {
            Self::new(vec![Ok(FIXTURE.to_string())])
        }
    }

    impl ForecastSource for StubSource {
        fn fetch(&self, _coordinates: &Coordinates) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock();
            if responses.len() > 1 {
                return responses.remove(0);
            }
            match responses.first() {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(e)) => Err(WeatherError::connection(e.to_string())),
                None => Err(WeatherError::connection("no stub response")),
            }
        }
    }

    fn oslo() -> Coordinates {
        Coordinates::new(59.9139, 10.7522).unwrap()
    }

    fn fetcher(source: StubSource) -> (DataFetcher, Arc<AtomicUsize>) {
        let calls = source.calls.clone();
        let fetcher = DataFetcher::with_source(oslo(), Box::new(source), Throttle::default());
        (fetcher, calls)
    }

    #[test]
    fn test_update_stores_snapshot() {
        let (fetcher, calls) = fetcher(StubSource::fixture());
        assert!(fetcher.snapshot().is_none());

        assert_eq!(fetcher.update(), UpdateOutcome::Updated);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let snapshot = fetcher.snapshot().unwrap();
        assert_eq!(snapshot.entries.len(), 3);
        assert_eq!(snapshot.current().unwrap().temperature, 5.0);
    }

    #[test]
    fn test_update_within_interval_is_noop() {
        let (fetcher, calls) = fetcher(StubSource::fixture());
        let start = Instant::now();

        assert_eq!(fetcher.update_at(start), UpdateOutcome::Updated);
        let first = fetcher.snapshot().unwrap();

        assert_eq!(
            fetcher.update_at(start + Duration::from_secs(60)),
            UpdateOutcome::Throttled
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &fetcher.snapshot().unwrap()));
    }

    #[test]
    fn test_update_after_interval_replaces_snapshot() {
        let (fetcher, calls) = fetcher(StubSource::fixture());
        let start = Instant::now();

        fetcher.update_at(start);
        let first = fetcher.snapshot().unwrap();

        assert_eq!(
            fetcher.update_at(start + Duration::from_secs(181)),
            UpdateOutcome::Updated
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!Arc::ptr_eq(&first, &fetcher.snapshot().unwrap()));
    }

    #[test]
    fn test_failed_update_clears_snapshot() {
        let source = StubSource::new(vec![
            Ok(FIXTURE.to_string()),
            Err(WeatherError::connection("connection refused")),
        ]);
        let (fetcher, _) = fetcher(source);
        let start = Instant::now();

        assert_eq!(fetcher.update_at(start), UpdateOutcome::Updated);
        assert!(fetcher.snapshot().is_some());

        assert_eq!(
            fetcher.update_at(start + Duration::from_secs(200)),
            UpdateOutcome::Failed
        );
        assert!(fetcher.snapshot().is_none());
    }

    #[test]
    fn test_malformed_body_clears_snapshot() {
        let (fetcher, _) = fetcher(StubSource::new(vec![Ok("<html>oops".to_string())]));
        assert_eq!(fetcher.update(), UpdateOutcome::Failed);
        assert!(fetcher.snapshot().is_none());
    }

    #[test]
    fn test_failed_update_still_starts_throttle_window() {
        let source = StubSource::new(vec![
            Err(WeatherError::timeout("timed out")),
            Ok(FIXTURE.to_string()),
        ]);
        let (fetcher, calls) = fetcher(source);
        let start = Instant::now();

        assert_eq!(fetcher.update_at(start), UpdateOutcome::Failed);
        assert_eq!(
            fetcher.update_at(start + Duration::from_secs(30)),
            UpdateOutcome::Throttled
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_force_update_bypasses_throttle() {
        let (fetcher, calls) = fetcher(StubSource::fixture());

        assert_eq!(fetcher.update(), UpdateOutcome::Updated);
        assert_eq!(fetcher.update(), UpdateOutcome::Throttled);
        assert_eq!(fetcher.force_update(), UpdateOutcome::Updated);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_forecast_url() {
        let client = MetNoClient::new(&FetcherConfig::default()).unwrap();
        assert_eq!(
            client.forecast_url(&oslo()),
            "https://api.met.no/weatherapi/locationforecastlts/1.3/?lat=59.9139&lon=10.7522"
        );
    }

    #[test]
    fn test_forecast_url_trims_trailing_slash() {
        let config = FetcherConfig {
            base_url: "http://localhost:1234/".to_string(),
            ..FetcherConfig::default()
        };
        let client = MetNoClient::new(&config).unwrap();
        assert_eq!(
            client.forecast_url(&Coordinates::new(1.5, -2.25).unwrap()),
            "http://localhost:1234/?lat=1.5&lon=-2.25"
        );
    }
}
