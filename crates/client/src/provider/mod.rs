//! Search provider capability.
//!
//! A provider turns a query into raw hits (`{title, url, snippet}`) or, for
//! providers that answer with prose, a list of text chunks. Providers are
//! constructed once from [`AppConfig`] and looked up by [`ProviderKind`];
//! asking for one that is not installed fails with
//! [`Error::MissingDependency`] before any network activity.

pub mod brave;
pub mod duckduckgo;
pub mod searxng;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use websift_core::{AppConfig, Error, ProviderKind, SearchParams};

use crate::fetch::{host_has_labels, host_of};

pub use brave::{BraveConfig, BraveError, BraveProvider};
pub use duckduckgo::DuckDuckGoProvider;
pub use searxng::SearXngProvider;

/// One unranked hit as returned by a provider; order carries the rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl RawHit {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self { title: title.into(), url: url.into(), snippet: snippet.into() }
    }
}

/// What a provider answered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResponse {
    /// Ranked hits to be fetched and budgeted.
    Hits(Vec<RawHit>),
    /// Pre-rendered text chunks, used as-is.
    Chunks(Vec<String>),
}

/// Trait for implementing search providers.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run `query` with the region and backend in `params`.
    ///
    /// Hit lists may be longer than `params.max_results`; the caller filters
    /// and caps them.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProviderFailed` when the provider rejects or fails the query.
    async fn search(&self, query: &str, params: &SearchParams) -> Result<ProviderResponse, Error>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Installed providers, keyed by kind.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn SearchProvider>>,
    hints: HashMap<ProviderKind, String>,
}

impl ProviderRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install every provider `config` has the prerequisites for.
    ///
    /// DuckDuckGo is always installed. Brave needs an API key and SearXNG a
    /// base URL; when absent, the reason is kept for the error raised on lookup.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let mut registry = Self::new().with(ProviderKind::DuckDuckGo, Arc::new(DuckDuckGoProvider::new(config)?));

        match config.require_brave_api_key() {
            Ok(key) => {
                let brave = BraveProvider::new(BraveConfig {
                    api_key: key.to_string(),
                    user_agent: config.user_agent.clone(),
                    ..Default::default()
                })?;
                registry = registry.with(ProviderKind::Brave, Arc::new(brave));
            }
            Err(e) => {
                registry.hints.insert(ProviderKind::Brave, e.to_string());
            }
        }

        match config.require_searxng_url() {
            Ok(base_url) => {
                registry = registry.with(ProviderKind::SearXng, Arc::new(SearXngProvider::new(base_url, config)?));
            }
            Err(e) => {
                registry.hints.insert(ProviderKind::SearXng, e.to_string());
            }
        }

        Ok(registry)
    }

    /// Install `provider` under `kind`, replacing any previous one.
    pub fn with(mut self, kind: ProviderKind, provider: Arc<dyn SearchProvider>) -> Self {
        self.hints.remove(&kind);
        self.providers.insert(kind, provider);
        self
    }

    /// Look up the provider for `kind`.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingDependency` if no such provider is installed.
    pub fn get(&self, kind: ProviderKind) -> Result<Arc<dyn SearchProvider>, Error> {
        self.providers.get(&kind).cloned().ok_or_else(|| {
            let hint = self.hints.get(&kind).map(String::as_str).unwrap_or("not installed");
            Error::MissingDependency(format!("search provider '{kind}' is unavailable: {hint}"))
        })
    }

    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }
}

/// Drop hits on excluded hosts and cap the list at `max_results`.
///
/// Hits whose URL has no parseable host are kept.
pub fn filter_hits(hits: Vec<RawHit>, excluded_domains: &[String], max_results: usize) -> Vec<RawHit> {
    hits.into_iter()
        .filter(|hit| match host_of(&hit.url) {
            Some(host) => !excluded_domains.iter().any(|d| host_has_labels(&host, d)),
            None => true,
        })
        .take(max_results)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticProvider;

    #[async_trait]
    impl SearchProvider for StaticProvider {
        async fn search(&self, query: &str, _params: &SearchParams) -> Result<ProviderResponse, Error> {
            Ok(ProviderResponse::Hits(vec![RawHit::new(format!("Result for {query}"), "https://example.com", "")]))
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }

    #[test]
    fn test_registry_from_default_config() {
        let registry = ProviderRegistry::from_config(&AppConfig::default()).unwrap();
        assert!(registry.contains(ProviderKind::DuckDuckGo));
        assert!(!registry.contains(ProviderKind::Brave));
        assert!(!registry.contains(ProviderKind::SearXng));
    }

    #[test]
    fn test_registry_missing_provider_names_hint() {
        let registry = ProviderRegistry::from_config(&AppConfig::default()).unwrap();
        let err = registry.get(ProviderKind::Brave).err().unwrap();
        assert!(matches!(err, Error::MissingDependency(_)));
        assert!(err.to_string().contains("WEBSIFT_BRAVE_API_KEY"));
    }

    #[test]
    fn test_registry_with_api_key() {
        let config = AppConfig { brave_api_key: Some("key".into()), ..Default::default() };
        let registry = ProviderRegistry::from_config(&config).unwrap();
        assert!(registry.contains(ProviderKind::Brave));
    }

    #[tokio::test]
    async fn test_registry_with_custom_provider() {
        let registry = ProviderRegistry::new().with(ProviderKind::DuckDuckGo, Arc::new(StaticProvider));
        let provider = registry.get(ProviderKind::DuckDuckGo).unwrap();
        assert_eq!(provider.name(), "static");

        let response = provider.search("rust", &SearchParams::default()).await.unwrap();
        assert!(matches!(response, ProviderResponse::Hits(hits) if hits[0].title == "Result for rust"));

        let err = registry.get(ProviderKind::SearXng).err().unwrap();
        assert!(err.to_string().contains("not installed"));
    }

    #[test]
    fn test_filter_hits() {
        let hits = vec![
            RawHit::new("Google", "https://www.google.com/search?q=x", ""),
            RawHit::new("A", "https://a.example/1", ""),
            RawHit::new("Maps", "https://maps.google.co.uk/", ""),
            RawHit::new("B", "https://b.example/2", ""),
            RawHit::new("C", "https://c.example/3", ""),
        ];

        let filtered = filter_hits(hits, &["google".to_string()], 2);
        let titles: Vec<_> = filtered.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_filter_keeps_unparseable_urls() {
        let hits = vec![RawHit::new("Chunk", "", "text")];
        assert_eq!(filter_hits(hits, &["google".to_string()], 5).len(), 1);
    }
}
