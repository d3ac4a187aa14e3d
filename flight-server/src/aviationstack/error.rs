//! Schedule API error types.

/// Errors that can occur when fetching scheduled flights.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// HTTP request failed
    #[error("requesting scheduled flights: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("unexpected response code ({status}) getting scheduled flights")]
    Api { status: u16 },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The page claims flights but carries no flight data
    #[error("missing flight info in aviationstack response")]
    MissingFlights,

    /// Client could not be built from its configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
