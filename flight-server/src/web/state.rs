//! Application state for the web layer.

use std::sync::Arc;

use crate::amadeus::AmadeusClient;
use crate::aviationstack::{AviationStackClient, ScheduleProvider};
use crate::cache::CachedScheduleClient;
use crate::domain::{Airport, Currency, SortKey};
use crate::pricing::{FareSearcher, PriceSearch};
use crate::settings::Settings;

/// Values used when a request leaves a field out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    pub origin: Airport,
    pub currency: Currency,
    pub order: SortKey,
}

impl From<&Settings> for Defaults {
    fn from(settings: &Settings) -> Self {
        Self {
            origin: settings.origin,
            currency: settings.currency,
            order: settings.order,
        }
    }
}

/// Shared application state.
///
/// Generic over the upstream providers so handlers can be exercised with
/// in-process fakes.
pub struct AppState<S: ScheduleProvider, F: FareSearcher> {
    /// Destinations served from an airport (normally cached)
    pub schedule: Arc<S>,

    /// Concurrent fare search
    pub prices: Arc<PriceSearch<F>>,

    pub defaults: Defaults,
}

/// State wired to the real APIs.
pub type LiveState = AppState<CachedScheduleClient<AviationStackClient>, AmadeusClient>;

impl<S: ScheduleProvider, F: FareSearcher> AppState<S, F> {
    /// Create a new app state.
    pub fn new(schedule: S, prices: PriceSearch<F>, defaults: Defaults) -> Self {
        Self {
            schedule: Arc::new(schedule),
            prices: Arc::new(prices),
            defaults,
        }
    }
}

impl<S: ScheduleProvider, F: FareSearcher> Clone for AppState<S, F> {
    fn clone(&self) -> Self {
        Self {
            schedule: Arc::clone(&self.schedule),
            prices: Arc::clone(&self.prices),
            defaults: self.defaults,
        }
    }
}
