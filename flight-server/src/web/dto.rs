//! Data transfer objects for web requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{Airport, Currency, FareOffer, Price, SortKey};
use crate::pricing::RouteFailure;
use crate::render::format_price;

/// Query for the cheapest fares from one airport.
///
/// Every field is optional; missing ones use the server's defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PricesRequest {
    /// Origin IATA airport code
    pub origin: Option<String>,

    /// Currency code for prices
    pub currency: Option<String>,

    /// Sort order: price, time or dest
    pub order: Option<String>,
}

/// A fare in search results.
#[derive(Debug, Serialize)]
pub struct OfferResult {
    /// Flight designator (e.g., "SK123")
    pub flight: String,
    pub origin: Airport,
    pub destination: Airport,

    /// Local departure time, if the provider's timestamp was readable
    pub departure: Option<NaiveDateTime>,
    pub arrival: Option<NaiveDateTime>,

    /// Amount as a number
    pub price: Price,
    pub currency: Currency,

    /// Amount formatted for display (e.g., "123 NOK")
    pub display_price: String,
}

/// A destination whose search failed.
#[derive(Debug, Serialize)]
pub struct FailureResult {
    pub destination: Airport,
    pub error: String,
}

/// Response for a fare search.
#[derive(Debug, Serialize)]
pub struct PricesResponse {
    pub origin: Airport,
    pub currency: Currency,
    pub order: SortKey,

    /// Number of destinations searched
    pub destinations: usize,

    /// Cheapest fare per destination, in `order`
    pub offers: Vec<OfferResult>,

    pub failures: Vec<FailureResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl OfferResult {
    /// Create from a domain FareOffer.
    pub fn from_offer(offer: &FareOffer) -> Self {
        Self {
            flight: offer.flight.clone(),
            origin: offer.origin,
            destination: offer.destination,
            departure: offer.departure,
            arrival: offer.arrival,
            price: offer.price,
            currency: offer.currency,
            display_price: format_price(offer.price, offer.currency),
        }
    }
}

impl FailureResult {
    pub fn from_failure(failure: &RouteFailure) -> Self {
        Self {
            destination: failure.destination,
            error: failure.error.to_string(),
        }
    }
}
