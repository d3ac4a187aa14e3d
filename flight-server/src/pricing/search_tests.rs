//! Unit tests for the price search fan-out.

use super::*;
use crate::domain::Price;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn airport(s: &str) -> Airport {
    Airport::parse(s).unwrap()
}

fn airports(codes: &[&str]) -> Vec<Airport> {
    codes.iter().map(|c| airport(c)).collect()
}

fn nok() -> Currency {
    Currency::parse("NOK").unwrap()
}

#[derive(Clone)]
enum Route {
    Fare(&'static str),
    NoFare,
    Fails(u16),
    /// Answers with a fare for some other airport
    WrongDestination,
    Slow(Duration),
    Hangs,
    Panics,
}

/// Mock fare searcher for testing.
struct MockSearcher {
    routes: HashMap<Airport, Route>,
    token_status: Option<u16>,
    searches: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockSearcher {
    fn new(routes: &[(&str, Route)]) -> Self {
        Self {
            routes: routes
                .iter()
                .map(|(code, route)| (airport(code), route.clone()))
                .collect(),
            token_status: None,
            searches: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn rejecting_token(mut self, status: u16) -> Self {
        self.token_status = Some(status);
        self
    }

    fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    fn offer(task: &SearchTask, destination: Airport, price: &str) -> FareOffer {
        FareOffer {
            flight: format!("SK{}", destination),
            origin: task.origin,
            destination,
            departure: None,
            arrival: None,
            price: Price::parse(price).unwrap(),
            currency: task.currency,
        }
    }
}

impl FareSearcher for MockSearcher {
    async fn get_token(&self) -> Result<BearerToken, AmadeusError> {
        match self.token_status {
            Some(status) => Err(AmadeusError::Auth { status }),
            None => Ok(BearerToken::new("test-token")),
        }
    }

    async fn search_route(
        &self,
        task: &SearchTask,
        token: &BearerToken,
    ) -> Result<Option<FareOffer>, RouteError> {
        assert_eq!(token.as_str(), "test-token");
        self.searches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let route = self.routes.get(&task.destination).cloned().unwrap_or(Route::NoFare);
        let result = match route {
            Route::Fare(price) => Ok(Some(Self::offer(task, task.destination, price))),
            Route::NoFare => Ok(None),
            Route::Fails(status) => Err(RouteError::Status {
                destination: task.destination,
                status,
            }),
            Route::WrongDestination => Ok(Some(Self::offer(task, airport("TRF"), "1"))),
            Route::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(Some(Self::offer(task, task.destination, "100")))
            }
            Route::Hangs => std::future::pending().await,
            Route::Panics => panic!("search blew up"),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn setup(
    searcher: MockSearcher,
    config: SearchConfig,
) -> (PriceSearch<MockSearcher>, Arc<MockSearcher>) {
    let searcher = Arc::new(searcher);
    (PriceSearch::new(Arc::clone(&searcher), config), searcher)
}

fn destinations_of(offers: &[FareOffer]) -> Vec<&str> {
    let mut dests: Vec<&str> = offers.iter().map(|o| o.destination.as_str()).collect();
    dests.sort_unstable();
    dests
}

#[tokio::test]
async fn all_routes_succeed() {
    let (search, searcher) = setup(
        MockSearcher::new(&[
            ("BER", Route::Fare("1200.00")),
            ("CPH", Route::Fare("650.50")),
            ("ARN", Route::NoFare),
        ]),
        SearchConfig::default(),
    );
    let dests = airports(&["BER", "CPH", "ARN"]);

    let offers = search.find_prices(airport("OSL"), &dests, nok()).await.unwrap();

    assert_eq!(destinations_of(&offers), ["BER", "CPH"]);
    assert_eq!(searcher.search_count(), 3);
}

#[tokio::test]
async fn never_returns_offers_outside_input() {
    let (search, _) = setup(
        MockSearcher::new(&[("BER", Route::WrongDestination), ("CPH", Route::Fare("10"))]),
        SearchConfig::default(),
    );
    let dests = airports(&["BER", "CPH"]);

    let offers = search.find_prices(airport("OSL"), &dests, nok()).await.unwrap();

    assert_eq!(destinations_of(&offers), ["CPH"]);
}

#[tokio::test]
async fn one_failure_fails_the_batch() {
    let (search, _) = setup(
        MockSearcher::new(&[
            ("BER", Route::Fare("100")),
            ("CPH", Route::Fails(500)),
            ("ARN", Route::Fare("200")),
        ]),
        SearchConfig::default(),
    );
    let dests = airports(&["BER", "CPH", "ARN"]);

    let err = search
        .find_prices(airport("OSL"), &dests, nok())
        .await
        .unwrap_err();

    match &err {
        FindPricesError::Routes(failures) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].destination, airport("CPH"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("CPH"));
}

#[tokio::test]
async fn every_failure_is_reported() {
    let (search, _) = setup(
        MockSearcher::new(&[("BER", Route::Fails(500)), ("CPH", Route::Fails(400))]),
        SearchConfig::default(),
    );
    let dests = airports(&["BER", "CPH"]);

    let err = search
        .find_prices(airport("OSL"), &dests, nok())
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("finding flight prices: "));
    assert!(message.contains("BER") && message.contains("(500)"));
    assert!(message.contains("CPH") && message.contains("(400)"));
}

#[tokio::test]
async fn report_keeps_partial_results() {
    let (search, _) = setup(
        MockSearcher::new(&[("BER", Route::Fare("100")), ("CPH", Route::Fails(503))]),
        SearchConfig::default(),
    );
    let dests = airports(&["BER", "CPH"]);

    let report = search
        .find_prices_report(airport("OSL"), &dests, nok())
        .await
        .unwrap();

    assert_eq!(destinations_of(&report.offers), ["BER"]);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        RouteError::Status { status: 503, .. }
    ));
}

#[tokio::test]
async fn token_failure_skips_fan_out() {
    let (search, searcher) = setup(
        MockSearcher::new(&[("BER", Route::Fare("100"))]).rejecting_token(401),
        SearchConfig::default(),
    );

    let err = search
        .find_prices(airport("OSL"), &airports(&["BER"]), nok())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FindPricesError::Auth(AmadeusError::Auth { status: 401 })
    ));
    assert_eq!(searcher.search_count(), 0);
}

#[tokio::test]
async fn no_destinations_is_empty_success() {
    let (search, _) = setup(MockSearcher::new(&[]), SearchConfig::default());

    let offers = search.find_prices(airport("OSL"), &[], nok()).await.unwrap();

    assert!(offers.is_empty());
}

#[tokio::test(start_paused = true)]
async fn concurrency_is_bounded() {
    let codes = ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF"];
    let routes: Vec<(&str, Route)> = codes
        .iter()
        .map(|c| (*c, Route::Slow(Duration::from_millis(100))))
        .collect();
    let (search, searcher) = setup(
        MockSearcher::new(&routes),
        SearchConfig::default().with_max_concurrent(2),
    );

    let offers = search
        .find_prices(airport("OSL"), &airports(&codes), nok())
        .await
        .unwrap();

    assert_eq!(offers.len(), 6);
    assert_eq!(searcher.max_in_flight.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_route_times_out() {
    let (search, _) = setup(
        MockSearcher::new(&[("BER", Route::Hangs), ("CPH", Route::Fare("100"))]),
        SearchConfig::default().with_route_timeout(Duration::from_secs(5)),
    );
    let dests = airports(&["BER", "CPH"]);

    let report = search
        .find_prices_report(airport("OSL"), &dests, nok())
        .await
        .unwrap();

    assert_eq!(destinations_of(&report.offers), ["CPH"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].destination, airport("BER"));
    assert!(matches!(report.failures[0].error, RouteError::Timeout));
}

#[tokio::test(start_paused = true)]
async fn overall_deadline_cancels_remaining() {
    let (search, _) = setup(
        MockSearcher::new(&[
            ("BER", Route::Hangs),
            ("CPH", Route::Hangs),
            ("ARN", Route::Fare("100")),
        ]),
        SearchConfig::default()
            .with_route_timeout(Duration::from_secs(600))
            .with_overall_timeout(Duration::from_secs(10)),
    );
    let dests = airports(&["BER", "CPH", "ARN"]);

    let report = search
        .find_prices_report(airport("OSL"), &dests, nok())
        .await
        .unwrap();

    assert_eq!(destinations_of(&report.offers), ["ARN"]);
    let mut cancelled: Vec<&str> = report
        .failures
        .iter()
        .inspect(|f| assert!(matches!(f.error, RouteError::Cancelled)))
        .map(|f| f.destination.as_str())
        .collect();
    cancelled.sort_unstable();
    assert_eq!(cancelled, ["BER", "CPH"]);
}

#[tokio::test]
async fn panicking_search_is_reported() {
    let (search, _) = setup(
        MockSearcher::new(&[("BER", Route::Panics), ("CPH", Route::Fare("100"))]),
        SearchConfig::default(),
    );
    let dests = airports(&["BER", "CPH"]);

    let report = search
        .find_prices_report(airport("OSL"), &dests, nok())
        .await
        .unwrap();

    assert_eq!(destinations_of(&report.offers), ["CPH"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].destination, airport("BER"));
    assert!(matches!(report.failures[0].error, RouteError::TaskFailed(_)));
}

#[test]
fn query_params_match_wire_format() {
    let task = SearchTask {
        origin: airport("OSL"),
        destination: airport("BER"),
        currency: nok(),
        departure_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
    };

    let params = task.query_params();

    assert_eq!(
        params,
        vec![
            ("originLocationCode", "OSL".to_string()),
            ("destinationLocationCode", "BER".to_string()),
            ("departureDate", "2024-05-01".to_string()),
            ("adults", "1".to_string()),
            ("travelClass", "ECONOMY".to_string()),
            ("nonStop", "true".to_string()),
            ("currencyCode", "NOK".to_string()),
        ]
    );
}

#[test]
fn token_debug_hides_value() {
    let token = BearerToken::new("secret");
    assert_eq!(format!("{token:?}"), "BearerToken(..)");
}
