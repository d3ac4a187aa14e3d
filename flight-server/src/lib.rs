//! Cheapest same-day direct flights.
//!
//! Answers: "Where can I fly directly from here today, and what is the
//! cheapest ticket to each place?" Destinations come from a real-time
//! schedule API, fares from a flight-offers API searched concurrently.

pub mod amadeus;
pub mod aviationstack;
pub mod cache;
pub mod credentials;
pub mod domain;
pub mod pricing;
pub mod render;
pub mod settings;
pub mod web;
