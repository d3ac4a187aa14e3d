//! Fan-out of route searches and aggregation of their outcomes.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::amadeus::{AmadeusError, RouteError};
use crate::domain::{Airport, Currency, FareOffer};

use super::config::SearchConfig;

/// An OAuth2 bearer token, shared read-only by all searches of one run.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Arc<str>);

impl BearerToken {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

/// One route to price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTask {
    pub origin: Airport,
    pub destination: Airport,
    pub currency: Currency,
    pub departure_date: NaiveDate,
}

impl SearchTask {
    /// A task for flights departing today, in local time.
    pub fn today(origin: Airport, destination: Airport, currency: Currency) -> Self {
        Self {
            origin,
            destination,
            currency,
            departure_date: Local::now().date_naive(),
        }
    }

    /// Query parameters for a one-adult, economy, non-stop search.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("originLocationCode", self.origin.to_string()),
            ("destinationLocationCode", self.destination.to_string()),
            ("departureDate", self.departure_date.format("%Y-%m-%d").to_string()),
            ("adults", "1".to_string()),
            ("travelClass", "ECONOMY".to_string()),
            ("nonStop", "true".to_string()),
            ("currencyCode", self.currency.to_string()),
        ]
    }
}

/// Trait for providing fare searches.
///
/// This abstraction allows the fan-out to be tested without HTTP.
pub trait FareSearcher: Send + Sync + 'static {
    /// Obtain a token to be shared by every search of one run.
    fn get_token(&self) -> impl Future<Output = Result<BearerToken, AmadeusError>> + Send;

    /// Find the cheapest direct fare for one route, if there is one.
    fn search_route(
        &self,
        task: &SearchTask,
        token: &BearerToken,
    ) -> impl Future<Output = Result<Option<FareOffer>, RouteError>> + Send;
}

/// A route search that ended in a hard error.
#[derive(Debug, thiserror::Error)]
#[error("{destination}: {error}")]
pub struct RouteFailure {
    pub destination: Airport,
    #[source]
    pub error: RouteError,
}

/// Error from a price search.
#[derive(Debug, thiserror::Error)]
pub enum FindPricesError {
    /// No token, so nothing was searched
    #[error("getting token: {0}")]
    Auth(#[source] AmadeusError),

    /// At least one route failed
    #[error("finding flight prices: {}", join_failures(.0))]
    Routes(Vec<RouteFailure>),
}

fn join_failures(failures: &[RouteFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Everything one price search produced.
#[derive(Debug, Default)]
pub struct PriceReport {
    /// Cheapest fare per destination that had one, in completion order.
    pub offers: Vec<FareOffer>,

    /// Destinations whose search failed.
    pub failures: Vec<RouteFailure>,
}

impl PriceReport {
    /// Collapse to all-or-nothing: any failure discards every offer.
    pub fn into_result(self) -> Result<Vec<FareOffer>, FindPricesError> {
        if self.failures.is_empty() {
            Ok(self.offers)
        } else {
            Err(FindPricesError::Routes(self.failures))
        }
    }
}

/// Per-destination bookkeeping while the fan-out drains.
struct Aggregate<'a> {
    destinations: &'a [Airport],
    finished: Vec<bool>,
    report: PriceReport,
}

impl<'a> Aggregate<'a> {
    fn new(destinations: &'a [Airport]) -> Self {
        Self {
            destinations,
            finished: vec![false; destinations.len()],
            report: PriceReport::default(),
        }
    }

    fn record(&mut self, index: usize, outcome: Result<Option<FareOffer>, RouteError>) {
        self.finished[index] = true;
        let destination = self.destinations[index];

        match outcome {
            Ok(Some(offer)) if offer.destination == destination => {
                debug!(%destination, flight = %offer.flight, price = %offer.price, "found fare");
                self.report.offers.push(offer);
            }
            Ok(Some(offer)) => {
                warn!(%destination, got = %offer.destination, "discarding fare for another destination");
            }
            Ok(None) => debug!(%destination, "no direct fare"),
            Err(error) => {
                warn!(%destination, %error, "route search failed");
                self.report
                    .failures
                    .push(RouteFailure { destination, error });
            }
        }
    }

    /// Report every destination that never produced an outcome.
    fn finish(mut self, cancelled: bool) -> PriceReport {
        for (index, finished) in self.finished.iter().enumerate() {
            if *finished {
                continue;
            }
            let error = if cancelled {
                RouteError::Cancelled
            } else {
                RouteError::TaskFailed("search task ended without a result".to_string())
            };
            self.report.failures.push(RouteFailure {
                destination: self.destinations[index],
                error,
            });
        }
        self.report
    }
}

/// Runs one concurrent search per destination.
pub struct PriceSearch<S: FareSearcher> {
    searcher: Arc<S>,
    config: SearchConfig,
}

impl<S: FareSearcher> PriceSearch<S> {
    /// Create a new price search.
    pub fn new(searcher: Arc<S>, config: SearchConfig) -> Self {
        Self { searcher, config }
    }

    /// Find the cheapest direct fare to each destination.
    ///
    /// Destinations without a direct fare are omitted. If any search fails,
    /// no offers are returned and the error lists every failed destination.
    /// Offers come back in no particular order.
    pub async fn find_prices(
        &self,
        origin: Airport,
        destinations: &[Airport],
        currency: Currency,
    ) -> Result<Vec<FareOffer>, FindPricesError> {
        self.find_prices_report(origin, destinations, currency)
            .await?
            .into_result()
    }

    /// Like [`find_prices`](Self::find_prices), but keeps the offers that
    /// were found alongside the failures.
    ///
    /// Only a token failure is returned as an error; in that case no
    /// search is attempted.
    pub async fn find_prices_report(
        &self,
        origin: Airport,
        destinations: &[Airport],
        currency: Currency,
    ) -> Result<PriceReport, FindPricesError> {
        let token = self
            .searcher
            .get_token()
            .await
            .map_err(FindPricesError::Auth)?;

        let deadline = Instant::now() + self.config.overall_timeout;
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        let mut tasks = JoinSet::new();

        for (index, &destination) in destinations.iter().enumerate() {
            let task = SearchTask::today(origin, destination, currency);
            let searcher = Arc::clone(&self.searcher);
            let semaphore = Arc::clone(&semaphore);
            let token = token.clone();
            let route_timeout = self.config.route_timeout;

            tasks.spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await;
                let search = searcher.search_route(&task, &token);
                let outcome = match tokio::time::timeout(route_timeout, search).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(RouteError::Timeout),
                };
                (index, outcome)
            });
        }

        let mut aggregate = Aggregate::new(destinations);
        let mut cancelled = false;

        loop {
            let next = match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(next) => next,
                Err(_) => {
                    warn!(remaining = tasks.len(), "overall deadline reached, cancelling searches");
                    tasks.abort_all();
                    cancelled = true;
                    // Keep whatever finished before the abort landed
                    while let Some(joined) = tasks.join_next().await {
                        if let Ok((index, outcome)) = joined {
                            aggregate.record(index, outcome);
                        }
                    }
                    break;
                }
            };

            match next {
                Some(Ok((index, outcome))) => aggregate.record(index, outcome),
                Some(Err(e)) => warn!(error = %e, "search task did not complete"),
                None => break,
            }
        }

        let report = aggregate.finish(cancelled);
        info!(
            %origin,
            destinations = destinations.len(),
            offers = report.offers.len(),
            failures = report.failures.len(),
            "price search finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
