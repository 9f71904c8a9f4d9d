//! Brave Search API request types and validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use websift_core::SearchParams;

use super::BraveError;

/// Largest page Brave serves in one request.
pub const MAX_COUNT: u8 = 20;

static DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("invalid regex"));

/// Search request parameters for Brave Web Search API.
///
/// Based on Brave Web Search API documentation:
/// https://api-dashboard.search.brave.com/app/documentation/web-search/get-started
#[derive(Debug, Clone, Serialize, Default)]
pub struct SearchRequest {
    /// Search query (required, max 400 chars / 50 words).
    pub q: String,

    /// Number of results (1-20, default 20).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u8>,

    /// Freshness filter: pd|pw|pm|py or YYYY-MM-DDtoYYYY-MM-DD.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freshness: Option<String>,

    /// Safe search: off|moderate|strict (default moderate).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safesearch: Option<SafeSearch>,

    /// Country code (ISO 3166-1 alpha-2, e.g., "US").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Content language (ISO 639-1, e.g., "en").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_lang: Option<String>,
}

/// Safe search filtering levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    Off,
    Moderate,
    Strict,
}

impl SearchRequest {
    /// Build a request for `query` from pipeline options.
    ///
    /// Results are limited to the past year. A `country-language` region such
    /// as `us-en` sets `country=US` and `search_lang=en`; `wt-wt` sets neither.
    pub fn from_params(query: &str, params: &SearchParams) -> Self {
        let (country, search_lang) = split_region(&params.region);
        Self {
            q: query.to_string(),
            count: Some(params.max_results.clamp(1, MAX_COUNT as usize) as u8),
            freshness: Some("py".to_string()),
            safesearch: None,
            country,
            search_lang,
        }
    }

    /// Validate the search request parameters.
    ///
    /// Returns an error if any parameters are out of range or malformed.
    pub fn validate(&self) -> Result<(), BraveError> {
        if self.q.is_empty() {
            return Err(BraveError::InvalidQuery("query cannot be empty".to_string()));
        }

        if self.q.len() > 400 {
            return Err(BraveError::InvalidQuery(format!("query too long: {} chars (max 400)", self.q.len())));
        }

        let word_count = self.q.split_whitespace().count();
        if word_count > 50 {
            return Err(BraveError::InvalidQuery(format!("query too long: {} words (max 50)", word_count)));
        }

        if let Some(count) = self.count
            && !(1..=MAX_COUNT).contains(&count)
        {
            return Err(BraveError::InvalidCount);
        }

        if let Some(freshness) = &self.freshness {
            Self::validate_freshness(freshness)?;
        }

        Ok(())
    }

    fn validate_freshness(freshness: &str) -> Result<(), BraveError> {
        const VALID_PRESETS: &[&str] = &["pd", "pw", "pm", "py"];

        if VALID_PRESETS.contains(&freshness) {
            return Ok(());
        }

        if let Some((from, to)) = freshness.split_once("to")
            && DATE.is_match(from)
            && DATE.is_match(to)
        {
            return Ok(());
        }

        Err(BraveError::InvalidFreshness(freshness.to_string()))
    }
}

fn split_region(region: &str) -> (Option<String>, Option<String>) {
    match region.split_once('-') {
        Some((country, lang))
            if country.len() == 2 && lang.len() == 2 && !country.eq_ignore_ascii_case("wt") =>
        {
            (Some(country.to_uppercase()), Some(lang.to_lowercase()))
        }
        _ => (None, None),
    }
}
