//! Concurrent cheapest-fare search.
//!
//! Given an origin and the destinations served from it, this module fetches
//! one bearer token and then searches every route concurrently, keeping the
//! cheapest direct fare per destination. Failures are collected per
//! destination so callers can choose between all-or-nothing and partial
//! results.

mod config;
mod search;

pub use config::SearchConfig;
pub use search::{
    BearerToken, FareSearcher, FindPricesError, PriceReport, PriceSearch, RouteFailure,
    SearchTask,
};
