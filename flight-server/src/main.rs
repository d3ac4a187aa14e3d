use std::process::ExitCode;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use flight_server::amadeus::{AmadeusClient, AmadeusConfig, AmadeusError};
use flight_server::aviationstack::{
    AviationStackClient, AviationStackConfig, ScheduleError, ScheduleProvider,
};
use flight_server::cache::{CacheConfig, CachedScheduleClient};
use flight_server::credentials::{Credentials, CredentialsError};
use flight_server::domain::sort_offers;
use flight_server::pricing::{FindPricesError, PriceSearch, SearchConfig};
use flight_server::render::render_table;
use flight_server::settings::{Settings, SettingsError};
use flight_server::web::{AppState, Defaults, LiveState, create_router};

const DEFAULT_LOG_FILTER: &str = "flight_server=info";

/// Anything that stops a run.
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error("creating fare client: {0}")]
    Amadeus(#[from] AmadeusError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Prices(#[from] FindPricesError),

    #[error("serving on {addr}: {source}")]
    Serve {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let serve = std::env::args().skip(1).any(|arg| arg == "--serve");

    match run(serve).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(serve: bool) -> Result<(), RunError> {
    let settings = Settings::from_env()?;
    let credentials = Credentials::load()?;

    // Schedule client, cached per origin
    let schedule_config = AviationStackConfig::new(&credentials.aviationstack_api_key);
    let schedule = CachedScheduleClient::new(
        AviationStackClient::new(schedule_config)?,
        &CacheConfig::default(),
    );

    // Fare search
    let amadeus_config = AmadeusConfig::new(
        &credentials.amadeus_client_id,
        &credentials.amadeus_client_secret,
    );
    let prices = PriceSearch::new(
        Arc::new(AmadeusClient::new(amadeus_config)?),
        SearchConfig::default(),
    );

    if serve {
        serve_http(settings, schedule, prices).await
    } else {
        print_prices(settings, schedule, prices).await
    }
}

/// Search once and print the results as a table.
async fn print_prices(
    settings: Settings,
    schedule: CachedScheduleClient<AviationStackClient>,
    prices: PriceSearch<AmadeusClient>,
) -> Result<(), RunError> {
    println!(
        "Searching for potential destinations from {}...",
        settings.origin
    );
    let destinations = schedule.get_scheduled_destinations(settings.origin).await?;

    let codes: Vec<&str> = destinations.iter().map(|d| d.as_str()).collect();
    println!();
    println!("Searching for flights departing today to:");
    println!("{}", codes.join(","));

    let mut offers = prices
        .find_prices(settings.origin, &destinations, settings.currency)
        .await?;
    sort_offers(&mut offers, settings.order);

    println!();
    println!("Found the following flights");
    print!("{}", render_table(&offers));
    Ok(())
}

/// Serve the search over HTTP until the process is stopped.
async fn serve_http(
    settings: Settings,
    schedule: CachedScheduleClient<AviationStackClient>,
    prices: PriceSearch<AmadeusClient>,
) -> Result<(), RunError> {
    let state: LiveState = AppState::new(schedule, prices, Defaults::from(&settings));
    let app = create_router(state);

    let addr = settings.listen;
    let serve_error = |source: std::io::Error| RunError::Serve { addr, source };
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(serve_error)?;

    info!(%addr, "flight price finder listening");
    println!("Flight price finder listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health  - Health check");
    println!("  GET  /prices  - Cheapest direct fares (?origin=&currency=&order=)");

    axum::serve(listener, app).await.map_err(serve_error)
}
