//! Search result data model.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single search hit, optionally carrying the extracted page text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResultEntry {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// Extracted page text. `None` until fetched; empty when the fetch failed.
    #[serde(default)]
    pub text: Option<String>,
}

impl SearchResultEntry {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self { title: title.into(), url: url.into(), snippet: snippet.into(), text: None }
    }

    /// Page text when present and non-empty, otherwise the provider snippet.
    pub fn body(&self) -> &str {
        match self.text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => &self.snippet,
        }
    }
}

/// Ordered, budget-trimmed search results.
///
/// Order is the provider's relevance rank. `used_words` never exceeds the
/// word budget the set was assembled under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResultSet {
    pub results: Vec<SearchResultEntry>,
    pub used_words: usize,
}

impl SearchResultSet {
    pub fn new(results: Vec<SearchResultEntry>, used_words: usize) -> Self {
        Self { results, used_words }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResultEntry> {
        self.results.iter()
    }

    /// Citation list numbered like the `[[i]]` markers in the rendered text.
    pub fn sources(&self) -> Sources {
        Sources(
            self.results
                .iter()
                .map(|r| Source { url: r.url.clone(), title: r.title.clone() })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a SearchResultSet {
    type Item = &'a SearchResultEntry;
    type IntoIter = std::slice::Iter<'a, SearchResultEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl fmt::Display for SearchResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, result) in self.results.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n\n\n")?;
            }
            write!(f, "Title: {}\n\n{}\n\nSource: [[{}]]({})", result.title, result.body(), idx, result.url)?;
        }
        Ok(())
    }
}

/// A cited source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Source {
    pub url: String,
    pub title: String,
}

/// Sources in entry order; position `i` matches citation `[[i]]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Sources(pub Vec<Source>);

impl Sources {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Source> {
        self.0.iter()
    }
}

impl fmt::Display for Sources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_str("\n\n## Sources\n")?;
        for (idx, source) in self.0.iter().enumerate() {
            write!(f, "\n- [[{idx}]]({}) {}", source.url, source.title)?;
        }
        Ok(())
    }
}
