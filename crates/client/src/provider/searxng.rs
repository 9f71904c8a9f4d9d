//! SearXNG search provider.
//!
//! Queries a SearXNG instance through its JSON API and answers with one
//! rendered text chunk per result instead of raw hits. Chunks are emitted in
//! rank order until `max_results` chunks or `max_words` words are reached.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use websift_core::{AppConfig, Error, SearchParams};

use super::{ProviderResponse, SearchProvider};
use crate::budget;
use crate::extract::format_link;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct SearXngResponse {
    #[serde(default)]
    results: Vec<SearXngResult>,
}

#[derive(Debug, Deserialize)]
struct SearXngResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl SearXngResult {
    fn render(&self) -> String {
        let mut chunk = String::new();
        if !self.title.is_empty() {
            chunk.push_str(&self.title);
            chunk.push('\n');
        }
        if !self.content.is_empty() {
            chunk.push_str(&self.content);
            chunk.push('\n');
        }
        if !self.url.is_empty() {
            let label = if self.title.is_empty() { &self.url } else { &self.title };
            chunk.push_str(&format!("Source: {}\n", format_link(&self.url, label)));
        }
        chunk
    }
}

/// SearXNG JSON API provider.
///
/// Chunks are always built from the instance's own result summaries; pages
/// are never fetched, so `SearchParams::add_text` has no effect here.
#[derive(Debug, Clone)]
pub struct SearXngProvider {
    client: Client,
    base_url: String,
}

impl SearXngProvider {
    pub fn new(base_url: &str, config: &AppConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::MissingDependency(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }
}

/// `us-en` becomes `en-US`; `wt-wt` and malformed regions mean no preference.
fn language_for(region: &str) -> Option<String> {
    let (country, lang) = region.split_once('-')?;
    if country.eq_ignore_ascii_case("wt") || country.len() != 2 || lang.len() != 2 {
        return None;
    }
    Some(format!("{}-{}", lang.to_lowercase(), country.to_uppercase()))
}

/// Keep rendered chunks in order while both limits allow.
fn take_chunks(results: &[SearXngResult], max_results: usize, max_words: usize) -> Vec<String> {
    budget::fit_chunks(results.iter().map(SearXngResult::render), max_results, max_words).0
}

#[async_trait]
impl SearchProvider for SearXngProvider {
    async fn search(&self, query: &str, params: &SearchParams) -> Result<ProviderResponse, Error> {
        let mut request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("time_range", "year")]);
        if let Some(language) = language_for(&params.region) {
            request = request.query(&[("language", language)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::ProviderFailed(format!("searxng: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::ProviderFailed(format!("searxng: status {}", status.as_u16())));
        }

        let body: SearXngResponse = response
            .json()
            .await
            .map_err(|e| Error::ProviderFailed(format!("searxng: invalid response: {e}")))?;

        let chunks = take_chunks(&body.results, params.max_results, params.max_words);
        tracing::debug!("searxng returned {} of {} results for '{}'", chunks.len(), body.results.len(), query);

        Ok(ProviderResponse::Chunks(chunks))
    }

    fn name(&self) -> &'static str {
        "searxng"
    }
}
