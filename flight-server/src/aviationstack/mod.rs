//! AviationStack schedule client.
//!
//! Used to discover which airports can be reached from the origin today.
//! The real-time flights endpoint lists every flight scheduled to leave an
//! airport; the distinct arrival airports become the destinations to price.

mod client;
mod error;
mod types;

pub use client::{
    AviationStackClient, AviationStackConfig, ScheduleProvider, find_unique_destinations,
};
pub use error::ScheduleError;
pub use types::{FlightEndpoint, FlightsResponse, Pagination, ScheduledFlight};
