//! DuckDuckGo search provider.
//!
//! Scrapes the no-JavaScript endpoints, so no API key is needed. The `html`
//! backend (also used for `auto`) reads `html.duckduckgo.com`; `lite` reads
//! the table layout of `lite.duckduckgo.com`. Results are limited to the past
//! year and returned in page order, one page per query.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use websift_core::{AppConfig, Error, SearchParams};

use super::{ProviderResponse, RawHit, SearchProvider};

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const DDG_LITE_URL: &str = "https://lite.duckduckgo.com/lite/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

static RESULT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.result").expect("invalid selector"));
static RESULT_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.result__a").expect("invalid selector"));
static RESULT_SNIPPET: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result__snippet").expect("invalid selector"));
static LITE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.result-link").expect("invalid selector"));
static LITE_SNIPPET: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.result-snippet").expect("invalid selector"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Html,
    Lite,
}

impl Backend {
    fn parse(value: &str) -> Result<Self, Error> {
        match value {
            "auto" | "html" => Ok(Backend::Html),
            "lite" => Ok(Backend::Lite),
            other => Err(Error::InvalidInput(format!("unknown DuckDuckGo backend '{other}' (expected auto, html or lite)"))),
        }
    }
}

/// DuckDuckGo search provider (no API key required).
#[derive(Debug, Clone)]
pub struct DuckDuckGoProvider {
    client: Client,
    html_url: String,
    lite_url: String,
}

impl DuckDuckGoProvider {
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        Self::with_endpoints(config, DDG_HTML_URL, DDG_LITE_URL)
    }

    /// Create a provider that queries the given HTML and lite endpoints.
    pub fn with_endpoints(config: &AppConfig, html_url: &str, lite_url: &str) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::MissingDependency(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, html_url: html_url.to_string(), lite_url: lite_url.to_string() })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(&self, query: &str, params: &SearchParams) -> Result<ProviderResponse, Error> {
        let backend = Backend::parse(&params.backend)?;
        let endpoint = match backend {
            Backend::Html => &self.html_url,
            Backend::Lite => &self.lite_url,
        };

        let response = self
            .client
            .post(endpoint)
            .form(&[("q", query), ("kl", params.region.as_str()), ("df", "y")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::ProviderFailed(format!("duckduckgo: no response within {}s", DEFAULT_TIMEOUT.as_secs()))
                } else {
                    Error::ProviderFailed(format!("duckduckgo: {e}"))
                }
            })?;

        // 202 is how DuckDuckGo signals rate limiting
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::ProviderFailed(format!("duckduckgo: status {}", status.as_u16())));
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::ProviderFailed(format!("duckduckgo: {e}")))?;

        let hits = match backend {
            Backend::Html => parse_html(&html),
            Backend::Lite => parse_lite(&html),
        };
        tracing::debug!("duckduckgo returned {} hits for '{}'", hits.len(), query);

        Ok(ProviderResponse::Hits(hits))
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}

fn collapse(element: &ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Resolve a result href to the target URL.
///
/// Result links go through `//duckduckgo.com/l/?uddg=<target>`; direct
/// http(s) links are kept as-is and anything else is dropped.
fn unwrap_redirect(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") { format!("https:{href}") } else { href.to_string() };
    let parsed = url::Url::parse(&absolute).ok()?;

    if parsed.host_str().is_some_and(|h| h.ends_with("duckduckgo.com"))
        && let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "uddg")
    {
        return Some(target.into_owned());
    }

    matches!(parsed.scheme(), "http" | "https").then_some(absolute)
}

fn parse_html(html: &str) -> Vec<RawHit> {
    let document = Html::parse_document(html);

    document
        .select(&RESULT)
        .filter(|result| !result.value().classes().any(|c| c == "result--ad"))
        .filter_map(|result| {
            let link = result.select(&RESULT_LINK).next()?;
            let url = unwrap_redirect(link.value().attr("href")?)?;
            let title = collapse(&link);
            let snippet = result.select(&RESULT_SNIPPET).next().map(|s| collapse(&s)).unwrap_or_default();
            (!title.is_empty()).then(|| RawHit { title, url, snippet })
        })
        .collect()
}

fn parse_lite(html: &str) -> Vec<RawHit> {
    let document = Html::parse_document(html);
    let mut snippets = document.select(&LITE_SNIPPET).map(|s| collapse(&s));

    // links and snippets alternate row by row
    document
        .select(&LITE_LINK)
        .filter_map(|link| {
            let snippet = snippets.next().unwrap_or_default();
            let url = unwrap_redirect(link.value().attr("href")?)?;
            let title = collapse(&link);
            (!title.is_empty()).then(|| RawHit { title, url, snippet })
        })
        .collect()
}
