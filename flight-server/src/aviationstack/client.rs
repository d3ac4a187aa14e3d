//! AviationStack HTTP client.

use std::collections::BTreeSet;
use std::future::Future;

use reqwest::StatusCode;
use tracing::debug;

use crate::domain::Airport;

use super::error::ScheduleError;
use super::types::{FlightsResponse, ScheduledFlight};

/// Default base URL. The free tier only serves plain HTTP.
const DEFAULT_BASE_URL: &str = "http://api.aviationstack.com";

const FLIGHTS_PATH: &str = "/v1/flights";

/// Trait for providing the destinations served from an airport.
pub trait ScheduleProvider: Send + Sync + 'static {
    /// Airports with a flight scheduled to depart from `origin`, sorted and
    /// without duplicates.
    fn get_scheduled_destinations(
        &self,
        origin: Airport,
    ) -> impl Future<Output = Result<Vec<Airport>, ScheduleError>> + Send;
}

/// Configuration for the AviationStack client.
#[derive(Debug, Clone)]
pub struct AviationStackConfig {
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AviationStackConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// AviationStack real-time flights client.
#[derive(Debug, Clone)]
pub struct AviationStackClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AviationStackClient {
    pub fn new(config: AviationStackConfig) -> Result<Self, ScheduleError> {
        if config.base_url.is_empty() {
            return Err(ScheduleError::InvalidConfig("base URL is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    /// Fetch the first page of flights scheduled to leave `origin`.
    ///
    /// Only one page is requested; the free plan allows very few calls.
    pub async fn get_scheduled_flights(
        &self,
        origin: Airport,
    ) -> Result<FlightsResponse, ScheduleError> {
        let url = format!("{}{}", self.base_url, FLIGHTS_PATH);

        debug!(%origin, "requesting scheduled flights");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("access_key", self.api_key.as_str()),
                ("dep_iata", origin.as_str()),
                ("flight_status", "scheduled"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScheduleError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let flights: FlightsResponse =
            serde_json::from_str(&body).map_err(|e| ScheduleError::Json {
                message: e.to_string(),
            })?;

        if flights.pagination.count > 0 && flights.data.is_none() {
            return Err(ScheduleError::MissingFlights);
        }

        debug!(
            %origin,
            count = flights.pagination.count,
            total = flights.pagination.total,
            "received scheduled flights"
        );
        Ok(flights)
    }
}

impl ScheduleProvider for AviationStackClient {
    async fn get_scheduled_destinations(
        &self,
        origin: Airport,
    ) -> Result<Vec<Airport>, ScheduleError> {
        let flights = self.get_scheduled_flights(origin).await?;
        Ok(find_unique_destinations(
            origin,
            flights.data.as_deref().unwrap_or_default(),
        ))
    }
}

/// Distinct arrival airports of the flights that depart from `origin`.
///
/// Flights from any other airport, and flights without a valid arrival code,
/// are skipped.
pub fn find_unique_destinations(origin: Airport, flights: &[ScheduledFlight]) -> Vec<Airport> {
    let destinations: BTreeSet<Airport> = flights
        .iter()
        .filter(|flight| {
            flight
                .departure
                .iata
                .as_deref()
                .and_then(|code| Airport::parse(code).ok())
                == Some(origin)
        })
        .filter_map(|flight| flight.arrival.iata.as_deref())
        .filter_map(|code| Airport::parse(code).ok())
        .collect();

    destinations.into_iter().collect()
}
