//! Amadeus flight-offers client.
//!
//! This module provides an HTTP client for the Amadeus self-service API,
//! used as the fare-search provider.
//!
//! Key characteristics of the API:
//! - Every call needs a bearer token from the OAuth2 client-credentials grant
//! - The test environment rate limits aggressively (HTTP 429), so searches
//!   back off exponentially and retry
//! - Prices arrive as decimal strings, times as timezone-naive local times
//! - A "non-stop" search may still include connecting or nearby-airport
//!   offers, which are filtered out when picking the cheapest fare

mod client;
mod error;
mod evaluate;
mod retry;
mod types;

pub use client::{AmadeusClient, AmadeusConfig};
pub use error::{AmadeusError, RouteError};
pub use evaluate::{DataQualityWarning, Evaluation, select_cheapest};
pub use retry::{Attempt, RetryOutcome, RetryPolicy, retry_on_rate_limit};
pub use types::{
    FlightOffer, FlightOffersResponse, Itinerary, OfferPrice, OffersMeta, Segment,
    SegmentEndpoint, TokenResponse,
};
