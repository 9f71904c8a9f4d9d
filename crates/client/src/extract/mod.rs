//! Readable text extraction from HTML.
//!
//! Provides a stable extraction abstraction that can be swapped later.
//!
//! ### Default Algorithm
//! - Narrow to the main content container when one of the known selectors matches.
//! - Walk headings, paragraphs, preformatted blocks, and paragraph-free tables and lists.
//! - Emit whitespace-normalized, de-duplicated lines until the word cap is reached.
//! - Substitute a bounded number of content images with Markdown image links.
//!
//! ### Stable Abstraction
//! - Uses the `Extractor` trait so the fetcher does not depend on the parsing engine.

pub mod scrape;

pub use scrape::ScrapeExtractor;

/// Word cost charged for each emitted image link.
pub const IMAGE_WORD_COST: i64 = 10;

/// Options for a single extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Word cap for emitted text. `None` means unbounded.
    pub max_words: Option<usize>,

    /// Append a `Source: [host](canonical)` line when the page declares one.
    pub include_source_link: bool,

    /// Maximum number of image links to emit.
    pub max_images: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { max_words: None, include_source_link: true, max_images: 2 }
    }
}

/// Stable extractor trait for content extraction.
///
/// Implementations must respect `max_words` and may append a trailing
/// canonical-source line when `include_source_link` is set.
pub trait Extractor: Send + Sync {
    /// Extract text fragments from HTML. Each fragment ends with a newline,
    /// except the optional trailing source line.
    fn extract(&self, html: &str, options: &ExtractOptions) -> Vec<String>;
}

/// Extract text from HTML with the default extractor and join the fragments.
pub fn extract_text(html: &str, options: &ExtractOptions) -> String {
    ScrapeExtractor::new().extract(html, options).concat()
}

/// Render a Markdown link, escaping brackets in the label.
pub fn format_link(url: &str, title: &str) -> String {
    let label = title.replace('[', "\\[").replace(']', "\\]");
    format!("[{label}]({url})")
}
