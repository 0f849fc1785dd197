//! HTTP client for The Odds API with a per-sport TTL cache

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::Mutex;

use super::sport_key;
use crate::data::feed::{parse_events, to_listings, FeedEvent};
use crate::data::mock::sample_listings;
use crate::models::GameListing;

const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com";

/// Fetch errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Odds API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode odds response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("THE_ODDS_API_KEY is not set")]
    MissingApiKey,
}

/// Odds feed configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Comma separated bookmaker regions
    pub regions: String,
    /// Comma separated market keys
    pub markets: String,
    pub odds_format: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// How long a fetched sport stays cached, in seconds
    pub cache_ttl_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            regions: "us".to_string(),
            markets: "h2h,spreads,totals".to_string(),
            odds_format: "american".to_string(),
            timeout_secs: 30,
            cache_ttl_secs: 300,
        }
    }
}

impl FeedConfig {
    /// Defaults plus `THE_ODDS_API_KEY` and `ODDS_API_BASE_URL` from the
    /// environment (a `.env` file is read first if present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        config.api_key = std::env::var("THE_ODDS_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        if let Ok(base_url) = std::env::var("ODDS_API_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        config
    }
}

struct CachedEvents {
    fetched_at: Instant,
    events: Vec<FeedEvent>,
}

/// Odds API client
///
/// The cache is owned by the client; dropping the client drops the cache.
pub struct OddsApiClient {
    client: reqwest::Client,
    config: FeedConfig,
    cache: Arc<Mutex<HashMap<String, CachedEvents>>>,
}

impl OddsApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: FeedConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            cache: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Build the odds endpoint URL for a sport key
    fn build_url(&self, sport_key: &str) -> String {
        format!("{}/v4/sports/{}/odds", self.config.base_url, sport_key)
    }

    fn query_params<'a>(&'a self, api_key: &'a str) -> [(&'static str, &'a str); 4] {
        [
            ("apiKey", api_key),
            ("regions", self.config.regions.as_str()),
            ("markets", self.config.markets.as_str()),
            ("oddsFormat", self.config.odds_format.as_str()),
        ]
    }

    /// Cached events for a sport key, if still fresh
    async fn cached(&self, sport_key: &str) -> Option<Vec<FeedEvent>> {
        let ttl = Duration::from_secs(self.config.cache_ttl_secs);
        let cache = self.cache.lock().await;
        cache
            .get(sport_key)
            .filter(|entry| entry.fetched_at.elapsed() < ttl)
            .map(|entry| entry.events.clone())
    }

    async fn store(&self, sport_key: &str, events: Vec<FeedEvent>) {
        let mut cache = self.cache.lock().await;
        cache.insert(
            sport_key.to_string(),
            CachedEvents {
                fetched_at: Instant::now(),
                events,
            },
        );
    }

    /// Drop the cached events for one sport
    pub async fn invalidate(&self, sport: &str) {
        self.cache.lock().await.remove(&sport_key(sport));
    }

    /// Drop every cached sport
    pub async fn invalidate_all(&self) {
        self.cache.lock().await.clear();
    }

    /// Fetch raw feed events for a sport, served from cache while fresh
    pub async fn fetch_events(&self, sport: &str) -> Result<Vec<FeedEvent>, FetchError> {
        let key = sport_key(sport);
        if let Some(events) = self.cached(&key).await {
            tracing::debug!("Serving {} from cache ({} events)", key, events.len());
            return Ok(events);
        }

        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingApiKey)?;
        let url = self.build_url(&key);
        tracing::info!("Fetching odds: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let events = parse_events(&body)?;
        tracing::info!("Fetched {} events for {}", events.len(), key);

        self.store(&key, events.clone()).await;
        Ok(events)
    }

    /// Fetch and validate listings for a sport
    pub async fn fetch_listings(&self, sport: &str) -> Result<Vec<GameListing>, FetchError> {
        Ok(to_listings(self.fetch_events(sport).await?))
    }

    /// Live listings, or the sample listings when the feed is unavailable
    pub async fn fetch_or_sample(&self, sport: &str) -> Vec<GameListing> {
        match self.fetch_listings(sport).await {
            Ok(listings) => listings,
            Err(e) => {
                tracing::warn!("Odds feed unavailable ({}), using sample data", e);
                sample_listings(&sport_key(sport))
            }
        }
    }
}
