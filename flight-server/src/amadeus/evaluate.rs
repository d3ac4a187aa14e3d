//! Selection of the cheapest usable offer from a flight search response.
//!
//! The search asks for direct flights only, but the provider still returns
//! noise: connecting itineraries, nearby airports (TRF when OSL was asked
//! for), other currencies. Those offers are skipped with a warning rather
//! than failing the route.

use chrono::NaiveDateTime;

use crate::domain::{Airport, Currency, FareOffer, Price};

use super::types::{FlightOffer, FlightOffersResponse, Segment};

/// Timestamp format used by the provider for local departure/arrival times.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A problem with the provider's data that does not fail the search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataQualityWarning {
    #[error("response contained {actual} flight offers, but count was {reported}")]
    CountMismatch { reported: usize, actual: usize },

    #[error("offer {index} is not a single flight ({itineraries} itineraries, {segments} segments)")]
    NotDirect {
        index: usize,
        itineraries: usize,
        segments: usize,
    },

    #[error("offer {index} contained incorrect flight: {from} - {to}")]
    WrongAirports {
        index: usize,
        from: String,
        to: String,
    },

    #[error("offer {index} was in incorrect currency: {currency}")]
    WrongCurrency { index: usize, currency: String },

    #[error("offer {index} has unreadable total price: {value}")]
    UnparseablePrice { index: usize, value: String },

    #[error("unexpected value for {field} time: {value}")]
    UnparseableTime { field: &'static str, value: String },
}

/// Outcome of evaluating one search response.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    /// The cheapest matching offer, if any survived filtering.
    pub offer: Option<FareOffer>,
    pub warnings: Vec<DataQualityWarning>,
}

impl Evaluation {
    pub fn found(&self) -> bool {
        self.offer.is_some()
    }
}

/// Pick the cheapest direct offer from `origin` to `destination` priced in
/// `currency`.
///
/// Offers are read up to the count the provider reports, never past the end
/// of the list. Ties keep the earlier offer.
pub fn select_cheapest(
    response: &FlightOffersResponse,
    origin: Airport,
    destination: Airport,
    currency: Currency,
) -> Evaluation {
    let mut warnings = Vec::new();

    if response.meta.count != response.data.len() {
        warnings.push(DataQualityWarning::CountMismatch {
            reported: response.meta.count,
            actual: response.data.len(),
        });
    }

    let mut cheapest: Option<(Price, &Segment)> = None;

    for (index, offer) in response.data.iter().take(response.meta.count).enumerate() {
        let segment = match direct_segment(offer) {
            Some(segment) => segment,
            None => {
                warnings.push(DataQualityWarning::NotDirect {
                    index,
                    itineraries: offer.itineraries.len(),
                    segments: offer.itineraries.iter().map(|i| i.segments.len()).sum(),
                });
                continue;
            }
        };

        if segment.departure.iata_code != origin.as_str()
            || segment.arrival.iata_code != destination.as_str()
        {
            warnings.push(DataQualityWarning::WrongAirports {
                index,
                from: segment.departure.iata_code.clone(),
                to: segment.arrival.iata_code.clone(),
            });
            continue;
        }

        if offer.price.currency != currency.as_str() {
            warnings.push(DataQualityWarning::WrongCurrency {
                index,
                currency: offer.price.currency.clone(),
            });
            continue;
        }

        let price = match Price::parse(&offer.price.grand_total) {
            Ok(price) => price,
            Err(_) => {
                warnings.push(DataQualityWarning::UnparseablePrice {
                    index,
                    value: offer.price.grand_total.clone(),
                });
                continue;
            }
        };

        if cheapest.is_none_or(|(best, _)| price < best) {
            cheapest = Some((price, segment));
        }
    }

    let offer = cheapest.map(|(price, segment)| FareOffer {
        flight: format!("{}{}", segment.carrier_code, segment.number),
        origin,
        destination,
        departure: parse_time("departure", &segment.departure.at, &mut warnings),
        arrival: parse_time("arrival", &segment.arrival.at, &mut warnings),
        price,
        currency,
    });

    Evaluation { offer, warnings }
}

/// The only segment of an offer with exactly one itinerary of one segment.
fn direct_segment(offer: &FlightOffer) -> Option<&Segment> {
    match offer.itineraries.as_slice() {
        [itinerary] => match itinerary.segments.as_slice() {
            [segment] => Some(segment),
            _ => None,
        },
        _ => None,
    }
}

fn parse_time(
    field: &'static str,
    value: &str,
    warnings: &mut Vec<DataQualityWarning>,
) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(value, TIME_FORMAT) {
        Ok(t) => Some(t),
        Err(_) => {
            warnings.push(DataQualityWarning::UnparseableTime {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}
