//! Purchasable fare offers and their orderings.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{Airport, Currency, Price};

/// A direct flight that can be bought at a known price.
///
/// Departure and arrival are local, timezone-naive times as published by the
/// fare provider. They are `None` when the provider sent a value that could
/// not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FareOffer {
    /// Carrier code followed by flight number, e.g. `SK123`.
    pub flight: String,
    pub origin: Airport,
    pub destination: Airport,
    pub departure: Option<NaiveDateTime>,
    pub arrival: Option<NaiveDateTime>,
    pub price: Price,
    pub currency: Currency,
}

impl FareOffer {
    /// Departure formatted as `HH:MM`, or `--:--` when unknown.
    pub fn departure_hhmm(&self) -> String {
        self.departure
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string())
    }
}

impl fmt::Display for FareOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {}-{} {} -- {}",
            self.flight,
            self.origin,
            self.destination,
            self.departure_hhmm(),
            crate::render::format_price(self.price, self.currency)
        )
    }
}

/// Error returned when parsing an unknown sort key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key {0:?} (expected price, time or dest)")]
pub struct InvalidSortKey(String);

/// Field used to order fare offers. All orderings are ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Price,
    /// Departure time. Unknown departures sort first.
    Time,
    Dest,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Price => "price",
            SortKey::Time => "time",
            SortKey::Dest => "dest",
        }
    }
}

impl FromStr for SortKey {
    type Err = InvalidSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(SortKey::Price),
            "time" => Ok(SortKey::Time),
            "dest" | "destination" => Ok(SortKey::Dest),
            _ => Err(InvalidSortKey(s.to_string())),
        }
    }
}

/// Sort offers in place by the given key.
///
/// The sort is stable, so ties keep their input order.
pub fn sort_offers(offers: &mut [FareOffer], key: SortKey) {
    match key {
        SortKey::Price => offers.sort_by_key(|o| o.price),
        SortKey::Time => offers.sort_by_key(|o| o.departure),
        SortKey::Dest => offers.sort_by_key(|o| o.destination),
    }
}
