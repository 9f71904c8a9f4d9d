//! Search tuning options.

use std::fmt;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Search providers the pipeline knows how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ProviderKind {
    /// DuckDuckGo HTML/lite endpoints. Needs no credentials.
    #[serde(rename = "ddg", alias = "DDG", alias = "duckduckgo")]
    DuckDuckGo,
    /// Brave Web Search API. Needs an API key.
    #[serde(rename = "brave", alias = "Brave")]
    Brave,
    /// A SearXNG instance answering in JSON.
    #[serde(rename = "searxng", alias = "SearXNG")]
    SearXng,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::DuckDuckGo => "ddg",
            ProviderKind::Brave => "brave",
            ProviderKind::SearXng => "searxng",
        };
        f.write_str(name)
    }
}

/// Options recognized by a search call.
///
/// Every field takes part in the query cache key, so two calls that differ in
/// any option are cached separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Upper bound on returned entries.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Word budget shared by all returned entries.
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// Provider backend selector (`auto`, `html`, `lite` for DuckDuckGo).
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Fetch each result page and attach its extracted text.
    #[serde(default = "default_true")]
    pub add_text: bool,

    /// Per-page fetch timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Region code in `country-language` form, `wt-wt` for no region.
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default = "default_provider")]
    pub provider: ProviderKind,
}

fn default_max_results() -> usize {
    5
}

fn default_max_words() -> usize {
    2500
}

fn default_backend() -> String {
    "auto".into()
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    5
}

fn default_region() -> String {
    "wt-wt".into()
}

fn default_provider() -> ProviderKind {
    ProviderKind::DuckDuckGo
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            max_words: default_max_words(),
            backend: default_backend(),
            add_text: true,
            timeout: default_timeout(),
            region: default_region(),
            provider: default_provider(),
        }
    }
}

impl SearchParams {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Word budget handed to each page fetch.
    ///
    /// A fixed split over `max_results - 1` decided before fetching. The
    /// result budgeter trims any overshoot afterwards.
    pub fn per_page_words(&self) -> usize {
        self.max_words / self.max_results.saturating_sub(1).max(1)
    }
}
