//! Page fetching with write-through text caching.
//!
//! ### Contract
//! - `fetch(url, max_words, timeout)` never fails: any transport error,
//!   timeout, non-200 status or oversized body yields an empty string.
//! - A readable page cache entry for (URL, today) is returned verbatim
//!   without touching the network.
//! - Only successful extractions are cached, so a failed page can succeed
//!   on a later call.
//!
//! ### Request
//! - One shared `reqwest` client; the per-call timeout bounds the whole request.
//! - Bodies are decoded permissively: invalid UTF-8 is replaced, never fatal.

pub mod url;

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode, header};
use websift_core::{AppConfig, Error, PageCache, cache};

use crate::extract::{ExtractOptions, Extractor, ScrapeExtractor};

pub use self::url::{UrlError, canonicalize, host_has_labels, host_of};

/// Configuration for the page fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Append the canonical source line to extracted text (default: false)
    pub include_source_link: bool,

    /// Maximum image links per page (default: 2)
    pub max_images: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "websift/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            max_redirects: 5,
            include_source_link: false,
            max_images: 2,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            include_source_link: config.include_source_link,
            max_images: config.max_images,
            ..Default::default()
        }
    }
}

/// Fetches pages, extracts their text, and writes through the page cache.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct PageFetcher {
    http: Client,
    config: FetchConfig,
    cache: PageCache,
    extractor: Arc<dyn Extractor>,
}

impl PageFetcher {
    /// Create a fetcher with the default extractor.
    pub fn new(config: FetchConfig, cache: PageCache) -> Result<Self, Error> {
        Self::with_extractor(config, cache, Arc::new(ScrapeExtractor::new()))
    }

    /// Create a fetcher with a custom extraction capability.
    pub fn with_extractor(config: FetchConfig, cache: PageCache, extractor: Arc<dyn Extractor>) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::MissingDependency(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config, cache, extractor })
    }

    /// Fetch `url` and return up to `max_words` words of extracted text.
    ///
    /// Returns an empty string on any failure.
    pub async fn fetch(&self, url: &str, max_words: usize, timeout: Duration) -> String {
        let today = cache::today();

        if let Some(text) = self.cache.get(url, today).await {
            return text;
        }

        match self.fetch_uncached(url, max_words, timeout).await {
            Ok(text) => {
                if let Err(e) = self.cache.put(url, today, &text).await {
                    tracing::warn!("failed to cache page {}: {}", url, e);
                }
                text
            }
            Err(e) => {
                tracing::debug!("fetch failed for {}: {}", url, e);
                String::new()
            }
        }
    }

    async fn fetch_uncached(&self, url: &str, max_words: usize, timeout: Duration) -> Result<String, Error> {
        let start = Instant::now();
        let target = canonicalize(url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(target.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let bytes = response.bytes().await.map_err(|e| classify(e, timeout))?;
        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let html = String::from_utf8_lossy(&bytes);
        let options = ExtractOptions {
            max_words: Some(max_words),
            include_source_link: self.config.include_source_link,
            max_images: self.config.max_images,
        };
        let text = self.extractor.extract(&html, &options).concat();

        tracing::debug!(
            "fetched {} in {}ms ({} bytes, {} words)",
            target,
            start.elapsed().as_millis(),
            bytes.len(),
            text.split_whitespace().count()
        );

        Ok(text)
    }

    /// The page cache this fetcher writes through.
    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(format!("no response within {}ms", timeout.as_millis()))
    } else {
        Error::HttpError(format!("network error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"
        <html><body><main>
            <h1>Release notes</h1>
            <p>Version two adds streaming support.</p>
        </main></body></html>
    "#;

    fn fetcher(root: &std::path::Path) -> PageFetcher {
        PageFetcher::new(FetchConfig::default(), PageCache::new(root)).unwrap()
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "websift/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.max_redirects, 5);
        assert!(!config.include_source_link);
        assert_eq!(config.max_images, 2);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig { max_bytes: 1024, include_source_link: true, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.max_bytes, 1024);
        assert!(config.include_source_link);
        assert_eq!(config.user_agent, app.user_agent);
    }

    #[tokio::test]
    async fn test_fetch_extracts_and_caches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let root = tempfile::tempdir().unwrap();
        let fetcher = fetcher(root.path());
        let url = format!("{}/notes", server.uri());

        let first = fetcher.fetch(&url, 100, Duration::from_secs(5)).await;
        assert_eq!(first, "Release notes\nVersion two adds streaming support.\n");

        let second = fetcher.fetch(&url, 100, Duration::from_secs(5)).await;
        assert_eq!(second, first);

        let cached = fetcher.cache().get(&url, cache::today()).await;
        assert_eq!(cached.as_deref(), Some(first.as_str()));
    }

    #[tokio::test]
    async fn test_non_200_is_empty_and_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string(PAGE))
            .expect(2)
            .mount(&server)
            .await;

        let root = tempfile::tempdir().unwrap();
        let fetcher = fetcher(root.path());
        let url = format!("{}/missing", server.uri());

        assert_eq!(fetcher.fetch(&url, 100, Duration::from_secs(5)).await, "");
        assert!(fetcher.cache().get(&url, cache::today()).await.is_none());
        // a retry reaches the network again
        assert_eq!(fetcher.fetch(&url, 100, Duration::from_secs(5)).await, "");
    }

    #[tokio::test]
    async fn test_timeout_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let root = tempfile::tempdir().unwrap();
        let fetcher = fetcher(root.path());
        let url = format!("{}/slow", server.uri());

        let text = fetcher.fetch(&url, 100, Duration::from_millis(200)).await;
        assert_eq!(text, "");
        assert!(fetcher.cache().get(&url, cache::today()).await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let server = MockServer::start().await;
        let mut body = b"<html><body><p>caf".to_vec();
        body.push(0xff);
        body.extend_from_slice(b" au lait</p></body></html>");
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&server)
            .await;

        let root = tempfile::tempdir().unwrap();
        let text = fetcher(root.path()).fetch(&format!("{}/menu", server.uri()), 100, Duration::from_secs(5)).await;
        assert_eq!(text, "caf\u{FFFD} au lait\n");
    }

    #[tokio::test]
    async fn test_body_over_limit_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let root = tempfile::tempdir().unwrap();
        let config = FetchConfig { max_bytes: 16, ..Default::default() };
        let fetcher = PageFetcher::new(config, PageCache::new(root.path())).unwrap();
        assert_eq!(fetcher.fetch(&format!("{}/big", server.uri()), 100, Duration::from_secs(5)).await, "");
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let root = tempfile::tempdir().unwrap();
        let fetcher = fetcher(root.path());
        let url = "http://127.0.0.1:9/never-requested";
        fetcher.cache().put(url, cache::today(), "cached text\n").await.unwrap();

        assert_eq!(fetcher.fetch(url, 100, Duration::from_secs(1)).await, "cached text\n");
    }

    #[tokio::test]
    async fn test_unparseable_url_is_empty() {
        let root = tempfile::tempdir().unwrap();
        assert_eq!(fetcher(root.path()).fetch("ftp://example.com/x", 100, Duration::from_secs(1)).await, "");
    }

    #[tokio::test]
    async fn test_word_budget_applies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let root = tempfile::tempdir().unwrap();
        let text = fetcher(root.path()).fetch(&format!("{}/notes", server.uri()), 4, Duration::from_secs(5)).await;
        assert_eq!(text, "Release notes\n");
    }
}
