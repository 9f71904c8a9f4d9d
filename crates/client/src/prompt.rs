//! Prompt augmentation: cached search results spliced in front of a prompt.

use websift_core::{Error, SearchParams, SearchResultSet, Sources, cache};

use crate::search::WebSearch;

/// Instructions placed between the results and the user request.
pub const DEFAULT_INSTRUCTIONS: &str = "
Using the provided web search results, to write a comprehensive reply to the user request.
Make sure to add the sources of cites using [[Number]](Url) notation after the reference. Example: [[0]](http://google.com)
";

/// Options for [`WebSearch::get_search_message`].
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    /// Search query; defaults to the first line of the prompt.
    pub query: Option<String>,
    /// Instructions block; `None` uses [`DEFAULT_INSTRUCTIONS`], an empty string omits it.
    pub instructions: Option<String>,
    /// Search options; `None` uses the configured defaults.
    pub params: Option<SearchParams>,
}

impl PromptOptions {
    pub fn instructions(&self) -> &str {
        self.instructions.as_deref().unwrap_or(DEFAULT_INSTRUCTIONS)
    }
}

fn render(results: &SearchResultSet, instructions: &str, prompt: &str) -> String {
    let text = if instructions.is_empty() {
        format!("\n{results}\n\n{prompt}\n")
    } else {
        format!("\n{results}\n\nInstruction: {instructions}\n\nUser request:\n{prompt}\n")
    };
    text.trim().to_string()
}

impl WebSearch {
    /// Prepend search results for `query` (or the prompt's first line) to `prompt`.
    ///
    /// Returns the prompt unchanged and no sources when it already carries
    /// `instructions`, when it opens with `##` and no query was given, or when
    /// it is blank. Result sets are cached per query, options and day; only
    /// non-empty sets are stored.
    ///
    /// # Errors
    ///
    /// Propagates `Error::MissingDependency` and `Error::ProviderFailed` from
    /// the search. Cache failures only degrade to a miss or a skipped write.
    pub async fn do_search(
        &self,
        prompt: &str,
        query: Option<&str>,
        instructions: &str,
        params: &SearchParams,
    ) -> Result<(String, Option<Sources>), Error> {
        if !instructions.is_empty() && prompt.contains(instructions) {
            return Ok((prompt.to_string(), None));
        }

        if query.is_none() && prompt.starts_with("##") {
            return Ok((prompt.to_string(), None));
        }

        let query = match query {
            Some(q) => q.to_string(),
            None => match prompt.trim().lines().next() {
                Some(line) => line.to_string(),
                None => return Ok((prompt.to_string(), None)),
            },
        };

        let params_json = serde_json::to_value(params)?;
        let path = self.query_cache().path_for(&query, &params_json, cache::today());

        let results = match self.query_cache().load(&path).await {
            Some(set) => {
                tracing::debug!("query cache hit: {}", path.display());
                set
            }
            None => {
                let set = self.search(&query, params).await?;
                if !set.is_empty()
                    && let Err(e) = self.query_cache().store(&path, &set).await
                {
                    tracing::warn!("failed to cache results for '{}': {}", query, e);
                }
                set
            }
        };

        let preview: String = query.trim().chars().take(50).collect();
        tracing::info!("Web search: '{}...'", preview);
        tracing::info!("with {} Results {} Words", results.len(), results.used_words);

        Ok((render(&results, instructions, prompt), Some(results.sources())))
    }

    /// Blocking form of [`WebSearch::do_search`] that never lets a search
    /// failure break the caller.
    ///
    /// Missing providers and provider failures are returned only when
    /// `raise_on_error` is set; otherwise they are logged and the prompt comes
    /// back unchanged.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` when called from inside a Tokio runtime (await
    /// `do_search` there instead) and `Error::Runtime` if the runtime cannot
    /// be created.
    pub fn get_search_message(&self, prompt: &str, raise_on_error: bool, options: &PromptOptions) -> Result<String, Error> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(Error::InvalidInput(
                "get_search_message cannot block inside an async runtime; await do_search instead".into(),
            ));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Runtime(e.to_string()))?;

        let params = options.params.as_ref().unwrap_or(self.defaults());
        let outcome =
            runtime.block_on(self.do_search(prompt, options.query.as_deref(), options.instructions(), params));

        match outcome {
            Ok((text, _)) => Ok(text),
            Err(e) if e.is_search_failure() && !raise_on_error => {
                tracing::error!("Couldn't do web search: {}", e);
                Ok(prompt.to_string())
            }
            Err(e) => Err(e),
        }
    }
}
