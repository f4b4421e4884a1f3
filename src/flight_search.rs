// Flight-offer search API client
// Wraps the Amadeus self-service flight offers endpoint behind a trait so the
// planner can run against any search backend.

use crate::config::{AmadeusConfig, RetryConfig};
use crate::offer::FlightOffer;
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const FLIGHT_OFFERS_PATH: &str = "/v2/shopping/flight-offers";

// Tokens are refreshed this long before the server says they expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError {
        status_code: u16,
        message: String,
        is_retryable: bool,
    },

    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl ApiError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::NetworkError(_) | ApiError::RateLimitExceeded(_) | ApiError::Timeout(_) => {
                true
            }
            ApiError::ApiResponseError { is_retryable, .. } => *is_retryable,
            ApiError::AuthError(_) | ApiError::DecodeError(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

// Fare classes accepted by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelClass {
    #[default]
    Economy,
    Business,
    First,
}

impl TravelClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelClass::Economy => "ECONOMY",
            TravelClass::Business => "BUSINESS",
            TravelClass::First => "FIRST",
        }
    }
}

impl std::fmt::Display for TravelClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightSearchQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub adults: u32,
    pub travel_class: TravelClass,
    pub currency: String,
    pub max_results: u32,
}

impl FlightSearchQuery {
    // Query-string parameters in the order the endpoint documents them
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("originLocationCode", self.origin.clone()),
            ("destinationLocationCode", self.destination.clone()),
            ("departureDate", self.departure_date.format("%Y-%m-%d").to_string()),
        ];
        if let Some(return_date) = self.return_date {
            params.push(("returnDate", return_date.format("%Y-%m-%d").to_string()));
        }
        params.push(("adults", self.adults.to_string()));
        params.push(("travelClass", self.travel_class.to_string()));
        params.push(("currencyCode", self.currency.clone()));
        params.push(("max", self.max_results.to_string()));
        params
    }
}

// Search backend trait
#[async_trait]
pub trait FlightSearch: Send + Sync {
    async fn search_offers(&self, query: &FlightSearchQuery) -> Result<Vec<FlightOffer>, ApiError>;
}

// Outcome of a search as seen by the planner: either offers, or a reason why
// there are none
#[derive(Debug, Clone, PartialEq)]
pub enum FlightAvailability {
    Offers(Vec<FlightOffer>),
    Unavailable(String),
}

impl FlightAvailability {
    pub fn into_offers(self) -> Vec<FlightOffer> {
        match self {
            FlightAvailability::Offers(offers) => offers,
            FlightAvailability::Unavailable(_) => Vec::new(),
        }
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            FlightAvailability::Offers(_) => None,
            FlightAvailability::Unavailable(reason) => Some(reason),
        }
    }
}

// Runs a search and folds any failure into `Unavailable`
pub async fn fetch_offers(search: &dyn FlightSearch, query: &FlightSearchQuery) -> FlightAvailability {
    match search.search_offers(query).await {
        Ok(offers) => FlightAvailability::Offers(offers),
        Err(e) => {
            warn!(error = %e, origin = %query.origin, destination = %query.destination, "No flight offers available");
            FlightAvailability::Unavailable(e.to_string())
        }
    }
}

// Wire formats

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct FlightOffersResponse {
    #[serde(default)]
    data: Vec<FlightOffer>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<ErrorDetail>,
    // OAuth endpoint reports errors in this shape instead
    error_description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorDetail {
    code: Option<u32>,
    title: String,
    detail: String,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct AmadeusClient {
    http: reqwest::Client,
    config: AmadeusConfig,
    token: Mutex<Option<CachedToken>>,
}

impl AmadeusClient {
    // Missing credentials are not fatal here; searches fail with `AuthError`
    // and planning carries on without flights
    pub fn new(config: AmadeusConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn cached_token(&self) -> Option<String> {
        let token = self.token.lock();
        token
            .as_ref()
            .filter(|t| Instant::now() < t.expires_at)
            .map(|t| t.value.clone())
    }

    async fn access_token(&self) -> Result<String, ApiError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }
        if self.config.client_id.is_empty() || self.config.client_secret.is_empty() {
            return Err(ApiError::AuthError(
                "Amadeus client id and secret are not configured".to_string(),
            ));
        }

        debug!("Requesting Amadeus access token");
        let response = self
            .http
            .post(self.url(TOKEN_PATH))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !(200..300).contains(&status) {
            return Err(match error_from_body(status, &body) {
                ApiError::ApiResponseError { message, .. } if status == 400 || status == 401 => {
                    ApiError::AuthError(message)
                }
                other => other,
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::DecodeError(e.to_string()))?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);

        *self.token.lock() = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    async fn search_once(&self, query: &FlightSearchQuery) -> Result<Vec<FlightOffer>, ApiError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(self.url(FLIGHT_OFFERS_PATH))
            .bearer_auth(token)
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if status == 401 {
            // Token revoked or expired early; the next attempt fetches a new one
            self.token.lock().take();
            return Err(ApiError::ApiResponseError {
                status_code: status,
                message: "access token rejected".to_string(),
                is_retryable: true,
            });
        }
        if !(200..300).contains(&status) {
            return Err(error_from_body(status, &body));
        }

        decode_offers(&body)
    }

    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.config.timeout_ms)
        } else {
            ApiError::NetworkError(e.to_string())
        }
    }

    // Helper to calculate exponential backoff with jitter
    pub fn calculate_backoff(retry_attempt: u32, config: &RetryConfig) -> Duration {
        let base_backoff_ms = (config.initial_backoff_ms as f64
            * config.backoff_multiplier.powf(retry_attempt as f64))
        .min(config.max_backoff_ms as f64);

        let jitter = rand::random::<f64>() * config.jitter_factor * base_backoff_ms;
        let backoff_ms = base_backoff_ms * (1.0 - config.jitter_factor / 2.0) + jitter;

        Duration::from_millis(backoff_ms as u64)
    }
}

#[async_trait]
impl FlightSearch for AmadeusClient {
    async fn search_offers(&self, query: &FlightSearchQuery) -> Result<Vec<FlightOffer>, ApiError> {
        let retry = &self.config.retry_config;
        let mut attempt = 0;

        loop {
            match self.search_once(query).await {
                Ok(offers) => {
                    debug!(count = offers.len(), "Received flight offers");
                    return Ok(offers);
                }
                Err(e) if e.is_retryable() && attempt < retry.max_retries => {
                    let backoff = Self::calculate_backoff(attempt, retry);
                    debug!(error = %e, attempt, backoff_ms = backoff.as_millis() as u64, "Retrying flight search");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn decode_offers(body: &str) -> Result<Vec<FlightOffer>, ApiError> {
    let response: FlightOffersResponse =
        serde_json::from_str(body).map_err(|e| ApiError::DecodeError(e.to_string()))?;
    Ok(response.data)
}

fn error_from_body(status_code: u16, body: &str) -> ApiError {
    let parsed: ErrorResponse = serde_json::from_str(body).unwrap_or_default();

    let message = match (parsed.errors.first(), parsed.error_description) {
        (Some(detail), _) => match detail.code {
            Some(code) => format!("[{}] {}: {}", code, detail.title, detail.detail),
            None => format!("{}: {}", detail.title, detail.detail),
        },
        (None, Some(description)) => description,
        (None, None) if body.trim().is_empty() => "empty response".to_string(),
        (None, None) => body.trim().to_string(),
    };

    if status_code == 429 {
        return ApiError::RateLimitExceeded(message);
    }

    ApiError::ApiResponseError {
        status_code,
        message,
        is_retryable: status_code >= 500,
    }
}
