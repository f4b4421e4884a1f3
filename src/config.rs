// Application configuration, built once at startup and passed by reference
use crate::flight_search::ClientError;
use crate::ranker::DEFAULT_RANK_LIMIT;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const DEFAULT_AMADEUS_BASE_URL: &str = "https://test.api.amadeus.com";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_MAX_RESULTS: u32 = 10;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

#[derive(Clone)]
pub struct AmadeusConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub timeout_ms: u64,
    pub retry_config: RetryConfig,
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_AMADEUS_BASE_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_ms: 15000,
            retry_config: RetryConfig::default(),
        }
    }
}

impl fmt::Debug for AmadeusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmadeusConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &redact(&self.client_id))
            .field("client_secret", &redact(&self.client_secret))
            .field("timeout_ms", &self.timeout_ms)
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub amadeus: AmadeusConfig,
    pub gemini: GeminiConfig,
    pub currency: String,
    pub max_results: u32,
    pub rank_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            amadeus: AmadeusConfig::default(),
            gemini: GeminiConfig::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            rank_limit: DEFAULT_RANK_LIMIT,
        }
    }
}

impl AppConfig {
    // Reads a `.env` file from the working directory (or a parent) into the
    // process environment when present, then builds the configuration from it
    pub fn load() -> Result<Self, ClientError> {
        load_dotenv(dotenvy::dotenv());
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Builds the configuration from any key lookup; `from_env` passes the
    // process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| ClientError::ConfigError(format!("{} is not set", key)))
        };

        let mut config = AppConfig::default();

        config.gemini.api_key = require("GOOGLE_API_KEY")?;
        // Flight search credentials are optional; without them the plan has no flights
        config.amadeus.client_id = get("AMADEUS_CLIENT_ID").unwrap_or_default();
        config.amadeus.client_secret = get("AMADEUS_CLIENT_SECRET").unwrap_or_default();

        if let Some(base_url) = get("AMADEUS_BASE_URL") {
            config.amadeus.base_url = base_url;
        }
        if let Some(model) = get("GEMINI_MODEL") {
            config.gemini.model = model;
        }
        if let Some(currency) = get("TRAVEL_CURRENCY") {
            config.currency = currency.to_uppercase();
        }

        Ok(config)
    }
}

// A missing file is normal; an unreadable one is logged and ignored
fn load_dotenv(result: dotenvy::Result<PathBuf>) -> Option<PathBuf> {
    match result {
        Ok(path) => {
            debug!(path = %path.display(), "Loaded environment file");
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable environment file");
            None
        }
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
