//! web_search tool implementation.
//!
//! Prepends cached web search results to a prompt.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use websift_client::WebSearch;
use websift_core::{Error, ProviderKind, SearchParams, Sources};

/// Input parameters for web_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    /// The user prompt to augment (required).
    pub prompt: String,

    /// Search query. Defaults to the first line of the prompt.
    #[serde(default)]
    pub query: Option<String>,

    /// Instructions placed before the user request. An empty string omits them.
    #[serde(default)]
    pub instructions: Option<String>,

    /// Maximum number of results (1-50).
    #[serde(default)]
    pub max_results: Option<usize>,

    /// Word budget shared by all results.
    #[serde(default)]
    pub max_words: Option<usize>,

    /// DuckDuckGo backend: auto, html or lite.
    #[serde(default)]
    pub backend: Option<String>,

    /// Fetch each result page and include its text.
    #[serde(default)]
    pub add_text: Option<bool>,

    /// Per-page fetch timeout in seconds (1-300).
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Region code such as "us-en", or "wt-wt" for none.
    #[serde(default)]
    pub region: Option<String>,

    /// Search provider: ddg, brave or searxng.
    #[serde(default)]
    pub provider: Option<ProviderKind>,
}

impl WebSearchParams {
    /// Search options with unset fields taken from `defaults`.
    pub fn resolve(&self, defaults: &SearchParams) -> SearchParams {
        SearchParams {
            max_results: self.max_results.unwrap_or(defaults.max_results),
            max_words: self.max_words.unwrap_or(defaults.max_words),
            backend: self.backend.clone().unwrap_or_else(|| defaults.backend.clone()),
            add_text: self.add_text.unwrap_or(defaults.add_text),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            region: self.region.clone().unwrap_or_else(|| defaults.region.clone()),
            provider: self.provider.unwrap_or(defaults.provider),
        }
    }
}

/// Output structure for web_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchOutput {
    /// The prompt with search results prepended, or the original prompt.
    pub prompt: String,
    /// Cited sources; index `i` matches the `[[i]]` markers in the prompt.
    pub sources: Sources,
}

fn check(params: &SearchParams) -> Result<(), Error> {
    if !(1..=50).contains(&params.max_results) {
        return Err(Error::InvalidInput(format!("max_results must be 1-50, got {}", params.max_results)));
    }
    if params.max_words == 0 {
        return Err(Error::InvalidInput("max_words must be greater than 0".into()));
    }
    if !(1..=300).contains(&params.timeout) {
        return Err(Error::InvalidInput(format!("timeout must be 1-300 seconds, got {}", params.timeout)));
    }
    Ok(())
}

/// Implementation of the web_search tool.
pub async fn search_impl(search: &WebSearch, params: WebSearchParams) -> Result<CallToolResult, McpError> {
    if params.prompt.trim().is_empty() && params.query.is_none() {
        return Err(Error::InvalidInput("prompt cannot be empty".into()).into());
    }

    let options = params.resolve(search.defaults());
    check(&options)?;

    let instructions = params.instructions.as_deref().unwrap_or(websift_client::DEFAULT_INSTRUCTIONS);
    let (prompt, sources) = search
        .do_search(&params.prompt, params.query.as_deref(), instructions, &options)
        .await?;

    let output = WebSearchOutput { prompt, sources: sources.unwrap_or_default() };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}
