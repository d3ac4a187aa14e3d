//! Amadeus API response DTOs.
//!
//! Only the parts of the responses we read are modelled. Fields default to
//! empty values when absent because the sandbox API omits them freely.

use serde::Deserialize;

/// Response from the OAuth2 token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    /// Lifetime of the token in seconds.
    #[serde(default)]
    pub expires_in: u64,
}

/// Response from `GET /v2/shopping/flight-offers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightOffersResponse {
    #[serde(default)]
    pub meta: OffersMeta,

    #[serde(default)]
    pub data: Vec<FlightOffer>,
}

/// General information about the offers returned.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OffersMeta {
    /// Number of offers the provider claims to have returned.
    #[serde(default)]
    pub count: usize,
}

/// A single priced offer. May span several itineraries and segments.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    #[serde(default)]
    pub number_of_bookable_seats: u32,

    pub price: OfferPrice,

    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
}

/// Total price of an offer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPrice {
    /// Decimal amount as a string, e.g. `"1234.50"`.
    pub grand_total: String,

    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// One flight leg.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub departure: SegmentEndpoint,
    pub arrival: SegmentEndpoint,
    pub carrier_code: String,
    pub number: String,
}

/// Airport and local time at one end of a segment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentEndpoint {
    pub iata_code: String,

    /// Local time, `YYYY-MM-DDTHH:MM:SS`.
    pub at: String,
}
