//! Web layer for the flight price finder.
//!
//! Serves the same cheapest-fare search as the command line, as JSON or as
//! an HTML table.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, Defaults, LiveState};
pub use templates::*;
