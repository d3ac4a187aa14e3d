//! Amadeus client error types.

use crate::domain::Airport;

/// Errors from the Amadeus HTTP client that are not tied to one route.
#[derive(Debug, thiserror::Error)]
pub enum AmadeusError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token endpoint answered with something other than 200
    #[error("unexpected response code ({status}) getting token")]
    Auth { status: u16 },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Client could not be built from its configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A hard failure while searching one route.
///
/// Rate limiting is retried inside the searcher and only surfaces here once
/// the retry budget is spent.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("getting flights: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response code ({status}) searching for flights to {destination}")]
    Status { destination: Airport, status: u16 },

    #[error("JSON parse error searching for flights to {destination}: {message}")]
    Json {
        destination: Airport,
        message: String,
    },

    #[error("still rate limited after {attempts} attempts searching for flights to {destination}")]
    RateLimitExhausted { destination: Airport, attempts: u32 },

    #[error("search timed out")]
    Timeout,

    #[error("search cancelled at overall deadline")]
    Cancelled,

    #[error("search task failed: {0}")]
    TaskFailed(String),
}
