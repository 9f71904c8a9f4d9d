//! web_fetch tool implementation.
//!
//! Fetches one page through the page cache and returns its extracted text.

use std::time::Duration;

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use websift_client::WebSearch;
use websift_client::fetch::canonicalize;
use websift_core::Error;

/// Input parameters for web_fetch tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebFetchParams {
    /// The URL to fetch.
    pub url: String,

    /// Maximum words of extracted text (default: the configured word budget).
    #[serde(default)]
    pub max_words: Option<usize>,

    /// Request timeout in seconds (default: the configured timeout).
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// Output structure for web_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebFetchOutput {
    /// The URL requested.
    pub url: String,
    /// Extracted text; empty when the page could not be fetched.
    pub text: String,
    /// Whitespace-delimited words in `text`.
    pub words: usize,
}

/// Implementation of the web_fetch tool.
pub async fn fetch_impl(search: &WebSearch, params: WebFetchParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    canonicalize(&params.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

    let defaults = search.defaults();
    let max_words = params.max_words.unwrap_or(defaults.max_words);
    let timeout = Duration::from_secs(params.timeout.unwrap_or(defaults.timeout));

    let text = search.fetcher().fetch(&params.url, max_words, timeout).await;
    let words = text.split_whitespace().count();
    let output = WebFetchOutput { url: params.url, text, words };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use websift_core::{AppConfig, cache};

    fn pipeline(root: &std::path::Path) -> WebSearch {
        WebSearch::from_config(&AppConfig { cache_dir: root.to_path_buf(), ..Default::default() }).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_empty_url() {
        let root = tempfile::tempdir().unwrap();
        let result = fetch_impl(&pipeline(root.path()), WebFetchParams::default()).await;
        assert_eq!(result.unwrap_err().code.0, -32602);
    }

    #[tokio::test]
    async fn test_fetch_unsupported_scheme() {
        let root = tempfile::tempdir().unwrap();
        let params = WebFetchParams { url: "file:///etc/hosts".into(), ..Default::default() };
        let result = fetch_impl(&pipeline(root.path()), params).await;
        assert_eq!(result.unwrap_err().code.0, -32003);
    }

    #[tokio::test]
    async fn test_fetch_served_from_page_cache() {
        let root = tempfile::tempdir().unwrap();
        let search = pipeline(root.path());
        let url = "http://127.0.0.1:9/cached";
        search.fetcher().cache().put(url, cache::today(), "cached page text\n").await.unwrap();

        let params = WebFetchParams { url: url.into(), timeout: Some(1), ..Default::default() };
        let result = fetch_impl(&search, params).await.unwrap();
        let text = result.content[0].as_text().unwrap().text.clone();
        let output: WebFetchOutput = serde_json::from_str(&text).unwrap();

        assert_eq!(output.text, "cached page text\n");
        assert_eq!(output.words, 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_empty_text() {
        let root = tempfile::tempdir().unwrap();
        let params = WebFetchParams { url: "http://127.0.0.1:9/closed".into(), timeout: Some(1), ..Default::default() };
        let result = fetch_impl(&pipeline(root.path()), params).await.unwrap();
        let text = result.content[0].as_text().unwrap().text.clone();
        let output: WebFetchOutput = serde_json::from_str(&text).unwrap();

        assert_eq!(output.text, "");
        assert_eq!(output.words, 0);
    }
}
