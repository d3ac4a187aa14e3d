//! Amadeus self-service HTTP client.
//!
//! Provides the two calls the fare search needs: fetching an OAuth2 bearer
//! token and searching flight offers for one route. Rate limiting on the
//! search endpoint is absorbed by the retry loop.

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::domain::FareOffer;
use crate::pricing::{BearerToken, FareSearcher, SearchTask};

use super::error::{AmadeusError, RouteError};
use super::evaluate::select_cheapest;
use super::retry::{Attempt, RetryOutcome, RetryPolicy, retry_on_rate_limit};
use super::types::{FlightOffersResponse, TokenResponse};

/// Default base URL for the Amadeus test environment.
const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const SEARCH_PATH: &str = "/v2/shopping/flight-offers";

/// Configuration for the Amadeus client.
#[derive(Debug, Clone)]
pub struct AmadeusConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Base URL for the API (defaults to the test environment)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Backoff applied when the search endpoint answers 429
    pub retry: RetryPolicy,
}

impl AmadeusConfig {
    /// Create a new config with the given client credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            retry: RetryPolicy::default(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Amadeus API client.
#[derive(Debug, Clone)]
pub struct AmadeusClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    retry: RetryPolicy,
}

impl AmadeusClient {
    /// Create a new Amadeus client with the given configuration.
    pub fn new(config: AmadeusConfig) -> Result<Self, AmadeusError> {
        if config.base_url.is_empty() {
            return Err(AmadeusError::InvalidConfig("base URL is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id,
            client_secret: config.client_secret,
            retry: config.retry,
        })
    }

    /// Request a bearer token with the client-credentials grant.
    ///
    /// Tokens are not cached; every call makes one request.
    pub async fn get_token(&self) -> Result<BearerToken, AmadeusError> {
        let url = format!("{}{}", self.base_url, TOKEN_PATH);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AmadeusError::Auth {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| AmadeusError::Json {
            message: e.to_string(),
            body: None,
        })?;

        debug!(expires_in = token.expires_in, "obtained Amadeus token");
        Ok(BearerToken::new(token.access_token))
    }

    /// Search direct offers for one route and pick the cheapest.
    ///
    /// Returns `Ok(None)` when the provider has no matching offer.
    pub async fn search_route(
        &self,
        task: &SearchTask,
        token: &BearerToken,
    ) -> Result<Option<FareOffer>, RouteError> {
        let offers = self.fetch_offers(task, token).await?;

        let evaluation = select_cheapest(&offers, task.origin, task.destination, task.currency);
        for warning in &evaluation.warnings {
            warn!(
                origin = %task.origin,
                destination = %task.destination,
                "{warning}"
            );
        }

        Ok(evaluation.offer)
    }

    /// Issue the search request, retrying while rate limited.
    async fn fetch_offers(
        &self,
        task: &SearchTask,
        token: &BearerToken,
    ) -> Result<FlightOffersResponse, RouteError> {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let query = task.query_params();
        let (url, query) = (url.as_str(), query.as_slice());

        debug!(destination = %task.destination, "searching flight offers");
        let outcome =
            retry_on_rate_limit(&self.retry, move || self.send_search(url, query, token)).await?;

        let response = match outcome {
            RetryOutcome::Done(response) => response,
            RetryOutcome::Exhausted { attempts } => {
                return Err(RouteError::RateLimitExhausted {
                    destination: task.destination,
                    attempts,
                });
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RouteError::Status {
                destination: task.destination,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RouteError::Json {
            destination: task.destination,
            message: e.to_string(),
        })
    }

    async fn send_search(
        &self,
        url: &str,
        query: &[(&'static str, String)],
        token: &BearerToken,
    ) -> Result<Attempt<reqwest::Response>, RouteError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(token.as_str())
            .query(query)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Ok(Attempt::RateLimited);
        }
        Ok(Attempt::Done(response))
    }
}

impl FareSearcher for AmadeusClient {
    async fn get_token(&self) -> Result<BearerToken, AmadeusError> {
        AmadeusClient::get_token(self).await
    }

    async fn search_route(
        &self,
        task: &SearchTask,
        token: &BearerToken,
    ) -> Result<Option<FareOffer>, RouteError> {
        AmadeusClient::search_route(self, task, token).await
    }
}
