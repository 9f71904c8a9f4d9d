//! Brave Search API provider.
//!
//! ### Contract
//!
//! - **Endpoint**: `https://api.search.brave.com/res/v1/web/search`
//! - **Authentication**: Uses `X-Subscription-Token` header.
//! - **Rate Limiting**: at most one request per second (free tier), shared by
//!   clones of the provider.
//! - **Failures**: 401/403, 429 and any other non-success status become
//!   `Error::ProviderFailed`; no retries.

pub mod error;
pub mod request;
pub mod response;

pub use error::BraveError;
pub use request::{SafeSearch, SearchRequest};
pub use response::BraveApiResponse;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use tokio::sync::Mutex;
use websift_core::{Error, SearchParams};

use super::{ProviderResponse, SearchProvider};

/// Default base URL for Brave Search API.
const DEFAULT_BASE_URL: &str = "https://api.search.brave.com/res/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "websift/0.1";

/// Minimum interval between requests for rate limiting (1 second for free tier).
const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Brave provider configuration.
#[derive(Debug, Clone)]
pub struct BraveConfig {
    /// Subscription token.
    pub api_key: String,
    /// Base URL (default: https://api.search.brave.com/res/v1).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for BraveConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self { last_request: Mutex::new(None), min_interval }
    }

    /// Wait until the minimum interval since the previous request has passed.
    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Brave Search API provider.
#[derive(Debug, Clone)]
pub struct BraveProvider {
    http: reqwest::Client,
    config: BraveConfig,
    rate_limiter: Arc<RateLimiter>,
}

impl BraveProvider {
    /// Create a provider; an empty API key is a missing dependency.
    pub fn new(config: BraveConfig) -> Result<Self, BraveError> {
        if config.api_key.is_empty() {
            return Err(BraveError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| BraveError::Network(Arc::new(e)))?;

        Ok(Self { http, config, rate_limiter: Arc::new(RateLimiter::new(MIN_REQUEST_INTERVAL)) })
    }

    /// Execute a web search request.
    pub async fn query(&self, req: &SearchRequest) -> Result<BraveApiResponse, BraveError> {
        req.validate()?;

        self.rate_limiter.acquire().await;

        let start = Instant::now();
        let url = format!("{}/web/search", self.config.base_url);

        tracing::debug!("searching Brave API: query={}", req.q);

        let http_response = self
            .http
            .get(&url)
            .header("X-Subscription-Token", &self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .query(req)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("Brave API response status: {}", status);

        if status == 401 || status == 403 {
            return Err(BraveError::AuthError);
        }

        if status == 429 {
            return Err(BraveError::RateLimited);
        }

        if !status.is_success() {
            return Err(BraveError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let api_response: BraveApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| BraveError::Parse(e.to_string()))?;

        tracing::debug!(
            "search completed in {:?}, {} results",
            start.elapsed(),
            api_response.web.as_ref().map(|w| w.results.len()).unwrap_or(0)
        );

        Ok(api_response)
    }
}

#[async_trait]
impl SearchProvider for BraveProvider {
    async fn search(&self, query: &str, params: &SearchParams) -> Result<ProviderResponse, Error> {
        let req = SearchRequest::from_params(query, params);
        let response = self.query(&req).await?;
        Ok(ProviderResponse::Hits(response.into_hits()))
    }

    fn name(&self) -> &'static str {
        "brave"
    }
}
