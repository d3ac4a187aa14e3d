//! Domain types for the fare search.
//!
//! All types enforce their invariants at construction time, so code that
//! receives these types can trust their validity.

mod airport;
mod currency;
mod offer;
mod price;

pub use airport::{Airport, InvalidAirport};
pub use currency::{Currency, InvalidCurrency};
pub use offer::{FareOffer, InvalidSortKey, SortKey, sort_offers};
pub use price::{InvalidPrice, Price};
