//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::aviationstack::{ScheduleError, ScheduleProvider};
use crate::domain::{Airport, Currency, SortKey, sort_offers};
use crate::pricing::{FareSearcher, FindPricesError};

use super::dto::*;
use super::state::AppState;
use super::templates::PricesTemplate;

/// Create the application router.
pub fn create_router<S: ScheduleProvider, F: FareSearcher>(state: AppState<S, F>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/prices", get(prices::<S, F>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Blank query values count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Cheapest direct fares from one airport to everywhere it serves today.
async fn prices<S: ScheduleProvider, F: FareSearcher>(
    State(state): State<AppState<S, F>>,
    headers: HeaderMap,
    Query(req): Query<PricesRequest>,
) -> Result<Response, AppError> {
    let origin = match present(&req.origin) {
        Some(code) => Airport::parse_normalized(code).map_err(|_| AppError::BadRequest {
            message: format!("Invalid origin airport: {code}"),
        })?,
        None => state.defaults.origin,
    };

    let currency = match present(&req.currency) {
        Some(code) => Currency::parse_normalized(code).map_err(|_| AppError::BadRequest {
            message: format!("Invalid currency: {code}"),
        })?,
        None => state.defaults.currency,
    };

    let order = match present(&req.order) {
        Some(key) => key.parse::<SortKey>().map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?,
        None => state.defaults.order,
    };

    let destinations = state.schedule.get_scheduled_destinations(origin).await?;

    let mut report = state
        .prices
        .find_prices_report(origin, &destinations, currency)
        .await?;
    sort_offers(&mut report.offers, order);

    // Return HTML or JSON based on Accept header
    if accepts_html(&headers) {
        let template = PricesTemplate::new(
            origin,
            currency,
            order,
            destinations.len(),
            &report.offers,
            &report.failures,
        );
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        let response = PricesResponse {
            origin,
            currency,
            order,
            destinations: destinations.len(),
            offers: report.offers.iter().map(OfferResult::from_offer).collect(),
            failures: report
                .failures
                .iter()
                .map(FailureResult::from_failure)
                .collect(),
        };

        Ok(Json(response).into_response())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    /// An upstream API failed or refused us
    Upstream { message: String },
    Internal { message: String },
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        AppError::Upstream {
            message: format!("getting scheduled destinations: {e}"),
        }
    }
}

impl From<FindPricesError> for AppError {
    fn from(e: FindPricesError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            warn!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
