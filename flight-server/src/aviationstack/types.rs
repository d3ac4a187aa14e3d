//! AviationStack API response DTOs.

use serde::Deserialize;

/// Response from `GET /v1/flights`.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightsResponse {
    #[serde(default)]
    pub pagination: Pagination,

    /// Absent (not just empty) when the API could not return flight data.
    pub data: Option<Vec<ScheduledFlight>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total: u32,
}

/// A single real-time flight. Only the endpoints are read.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduledFlight {
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
}

/// Airport at one end of a flight.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightEndpoint {
    /// IATA code. Null for some smaller airfields.
    pub iata: Option<String>,
}
