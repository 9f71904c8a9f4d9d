//! Brave Search API response types.

use serde::Deserialize;

use crate::provider::RawHit;

/// Raw response from Brave Web Search API.
#[derive(Debug, Deserialize)]
pub struct BraveApiResponse {
    pub query: QueryInfo,
    #[serde(default)]
    pub web: Option<WebResults>,
}

/// Query metadata from Brave response.
#[derive(Debug, Deserialize)]
pub struct QueryInfo {
    pub original: String,
    #[serde(default)]
    #[serde(alias = "moreResultsAvailable")]
    pub more_results_available: bool,
}

/// Web search results container.
#[derive(Debug, Deserialize)]
pub struct WebResults {
    pub results: Vec<WebResult>,
}

/// Individual web search result from Brave.
#[derive(Debug, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

impl BraveApiResponse {
    /// Hits in rank order. A response without a `web` section has none.
    pub fn into_hits(self) -> Vec<RawHit> {
        self.web
            .map(|w| w.results.into_iter().map(|r| RawHit::new(r.title, r.url, r.description)).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"{
        "query": {
            "original": "test query",
            "moreResultsAvailable": true
        },
        "web": {
            "results": [
                {
                    "title": "Example Domain",
                    "url": "https://example.com",
                    "description": "This domain is for use in illustrative examples",
                    "extra_snippets": ["First snippet"]
                },
                {
                    "title": "Test Page",
                    "url": "https://test.com"
                }
            ]
        }
    }"#;

    #[test]
    fn test_deserialize_brave_response() {
        let response: BraveApiResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert_eq!(response.query.original, "test query");
        assert!(response.query.more_results_available);
        assert_eq!(response.web.as_ref().map(|w| w.results.len()), Some(2));
    }

    #[test]
    fn test_into_hits_keeps_rank_order() {
        let response: BraveApiResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        let hits = response.into_hits();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], RawHit::new("Example Domain", "https://example.com", "This domain is for use in illustrative examples"));
        assert_eq!(hits[1].snippet, "");
    }

    #[test]
    fn test_no_web_section() {
        let response: BraveApiResponse = serde_json::from_str(r#"{"query": {"original": "test"}}"#).unwrap();
        assert!(response.into_hits().is_empty());
    }
}
