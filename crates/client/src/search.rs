//! Search orchestration: provider query, concurrent page fetches, budgeting.

use std::sync::Arc;

use tokio::task::JoinSet;
use websift_core::{AppConfig, Error, PageCache, QueryCache, SearchParams, SearchResultEntry, SearchResultSet};

use crate::budget;
use crate::fetch::{FetchConfig, PageFetcher};
use crate::provider::{ProviderRegistry, ProviderResponse, RawHit, filter_hits};

/// The search pipeline, built once and shared across calls.
#[derive(Clone)]
pub struct WebSearch {
    registry: Arc<ProviderRegistry>,
    fetcher: PageFetcher,
    query_cache: QueryCache,
    excluded_domains: Vec<String>,
    defaults: SearchParams,
}

impl WebSearch {
    /// Build the pipeline over `registry` with caches under `config.cache_dir`.
    pub fn new(config: &AppConfig, registry: ProviderRegistry) -> Result<Self, Error> {
        let fetcher = PageFetcher::new(FetchConfig::from(config), PageCache::new(&config.cache_dir))?;
        Ok(Self::with_fetcher(config, registry, fetcher))
    }

    /// Build the pipeline with every provider `config` allows.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(config, ProviderRegistry::from_config(config)?)
    }

    pub fn with_fetcher(config: &AppConfig, registry: ProviderRegistry, fetcher: PageFetcher) -> Self {
        Self {
            registry: Arc::new(registry),
            fetcher,
            query_cache: QueryCache::new(&config.cache_dir),
            excluded_domains: config.excluded_domains.clone(),
            defaults: config.search.clone(),
        }
    }

    /// Search options used when a caller does not supply its own.
    pub fn defaults(&self) -> &SearchParams {
        &self.defaults
    }

    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    pub fn query_cache(&self) -> &QueryCache {
        &self.query_cache
    }

    /// Query the selected provider and assemble a budgeted result set.
    ///
    /// When `params.add_text` is set, every hit's page is fetched concurrently
    /// with `params.per_page_words()` words each; fetch failures leave the
    /// entry with empty text. Entry order always follows provider rank.
    ///
    /// # Errors
    ///
    /// `Error::MissingDependency` if the provider is not installed (checked
    /// before any network activity), or whatever the provider fails with.
    pub async fn search(&self, query: &str, params: &SearchParams) -> Result<SearchResultSet, Error> {
        let provider = self.registry.get(params.provider)?;
        tracing::debug!("searching '{}' with {}", query, provider.name());

        match provider.search(query, params).await? {
            ProviderResponse::Hits(hits) => {
                let hits = filter_hits(hits, &self.excluded_domains, params.max_results);
                let mut entries: Vec<SearchResultEntry> =
                    hits.into_iter().map(|RawHit { title, url, snippet }| SearchResultEntry::new(title, url, snippet)).collect();

                if params.add_text {
                    self.attach_texts(&mut entries, params).await;
                }

                let (results, used_words) = budget::apply(entries, params.max_words);
                Ok(SearchResultSet::new(results, used_words))
            }
            ProviderResponse::Chunks(chunks) => Ok(from_chunks(chunks, params.max_results, params.max_words)),
        }
    }

    async fn attach_texts(&self, entries: &mut [SearchResultEntry], params: &SearchParams) {
        let per_page = params.per_page_words();
        let timeout = params.timeout();

        let mut tasks = JoinSet::new();
        for (idx, entry) in entries.iter().enumerate() {
            let fetcher = self.fetcher.clone();
            let url = entry.url.clone();
            tasks.spawn(async move { (idx, fetcher.fetch(&url, per_page, timeout).await) });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, text)) => entries[idx].text = Some(text),
                Err(e) => tracing::warn!("page fetch task failed: {}", e),
            }
        }

        // a task that died leaves its entry with empty text
        for entry in entries.iter_mut().filter(|e| e.text.is_none()) {
            entry.text = Some(String::new());
        }
    }
}

/// Wrap text chunks as untitled entries `Result 1`, `Result 2`, ...
///
/// Chunks are budgeted by their own word count only.
fn from_chunks(chunks: Vec<String>, max_results: usize, max_words: usize) -> SearchResultSet {
    let (chunks, used_words) = budget::fit_chunks(chunks, max_results, max_words);
    let results = chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| SearchResultEntry {
            title: format!("Result {}", i + 1),
            url: String::new(),
            snippet: chunk.clone(),
            text: Some(chunk),
        })
        .collect();
    SearchResultSet::new(results, used_words)
}
