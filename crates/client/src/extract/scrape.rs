//! `scraper`-based implementation of [`Extractor`].

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{ExtractOptions, Extractor, IMAGE_WORD_COST, format_link};

/// Containers tried in order to narrow extraction to the main content.
const SCOPE_SELECTORS: &[&str] = &[
    "main",
    ".main-content-wrapper",
    ".main-content",
    ".emt-container-inner",
    ".content-wrapper",
    "#content",
    "#mainContent",
];

static SCOPES: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    SCOPE_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("invalid selector"))
        .collect()
});

static REMOVED: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".c-globalDisclosure").expect("invalid selector"));

static BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6, p, pre, table, ul, a").expect("invalid selector"));

static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").expect("invalid selector"));

static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("invalid selector"));

static CANONICAL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"link[rel="canonical"][href]"#).expect("invalid selector"));

/// Default extractor built on `scraper`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrapeExtractor;

impl ScrapeExtractor {
    pub fn new() -> Self {
        Self
    }
}

/// An `img` worth linking: non-empty alt, absolute http(s) src, not an avatar,
/// and no explicit width (which usually marks icons and spacers).
fn is_content_image(img: &ElementRef<'_>) -> bool {
    let el = img.value();
    el.attr("alt").is_some_and(|alt| !alt.is_empty())
        && el.attr("src").is_some_and(|src| src.starts_with("http"))
        && !el.classes().any(|c| c == "avatar")
        && el.attr("width").is_none()
}

fn content_image<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.select(&IMAGE).find(is_content_image)
}

/// Whether a matched block should be walked at all.
fn is_block_candidate(element: &ElementRef<'_>) -> bool {
    match element.value().name() {
        "table" | "ul" => element.select(&PARAGRAPH).next().is_none(),
        "a" => content_image(element).is_some(),
        _ => true,
    }
}

fn canonical_source(document: &Html) -> Option<String> {
    let href = document.select(&CANONICAL).next()?.value().attr("href")?;
    let host = url::Url::parse(href).ok()?.host_str()?.to_string();
    Some(format!("\nSource: [{host}]({href})"))
}

impl Extractor for ScrapeExtractor {
    fn extract(&self, html: &str, options: &ExtractOptions) -> Vec<String> {
        let document = Html::parse_document(html);

        let scope = SCOPES
            .iter()
            .find_map(|sel| document.select(sel).next())
            .unwrap_or_else(|| document.root_element());

        let removed = scope.select(&REMOVED).next().map(|el| el.id());
        let inside_removed = |el: &ElementRef<'_>| {
            removed.is_some_and(|id| el.id() == id || el.ancestors().any(|a| a.id() == id))
        };

        let mut budget = options.max_words.map(|w| w as i64);
        let mut images_left = options.max_images;
        let mut seen: HashSet<String> = HashSet::new();
        let mut out = Vec::new();

        'blocks: for element in scope.select(&BLOCKS) {
            if inside_removed(&element) || !is_block_candidate(&element) {
                continue;
            }

            if images_left > 0
                && let Some(img) = content_image(&element)
            {
                let title = match element.value().attr("title") {
                    Some(t) => t.trim().to_string(),
                    None => element.text().collect::<String>().trim().to_string(),
                };
                if !title.is_empty()
                    && let Some(src) = img.value().attr("src")
                {
                    out.push(format!("!{}\n", format_link(src, &title)));
                    if let Some(b) = budget.as_mut() {
                        *b -= IMAGE_WORD_COST;
                    }
                    images_left -= 1;
                }
                continue;
            }

            let text = element.text().collect::<Vec<_>>().join(" ");
            for line in text.lines() {
                let words: Vec<&str> = line.split_whitespace().collect();
                if words.is_empty() {
                    continue;
                }
                let joined = words.join(" ");
                if seen.contains(&joined) {
                    continue;
                }
                if let Some(b) = budget.as_mut() {
                    *b -= words.len() as i64;
                    if *b <= 0 {
                        break 'blocks;
                    }
                }
                out.push(format!("{joined}\n"));
                seen.insert(joined);
            }
        }

        if options.include_source_link
            && let Some(source) = canonical_source(&document)
        {
            out.push(source);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(max_words: Option<usize>) -> ExtractOptions {
        ExtractOptions { max_words, include_source_link: false, max_images: 2 }
    }

    #[test]
    fn test_basic_blocks_in_order() {
        let html = r#"
            <html><body>
                <h1>Main   Heading</h1>
                <p>First paragraph.</p>
                <pre>code line</pre>
            </body></html>
        "#;
        let lines = ScrapeExtractor::new().extract(html, &opts(None));
        assert_eq!(lines, vec!["Main Heading\n", "First paragraph.\n", "code line\n"]);
    }

    #[test]
    fn test_narrows_to_main() {
        let html = r#"
            <html><body>
                <nav><p>Navigation noise</p></nav>
                <main><p>Article body</p></main>
                <footer><p>Footer noise</p></footer>
            </body></html>
        "#;
        let lines = ScrapeExtractor::new().extract(html, &opts(None));
        assert_eq!(lines, vec!["Article body\n"]);
    }

    #[test]
    fn test_skips_disclosure_block() {
        let html = r#"
            <html><body><div id="content">
                <div class="c-globalDisclosure"><p>Affiliate disclosure</p></div>
                <p>Real content</p>
            </div></body></html>
        "#;
        let lines = ScrapeExtractor::new().extract(html, &opts(None));
        assert_eq!(lines, vec!["Real content\n"]);
    }

    #[test]
    fn test_deduplicates_lines() {
        let html = "<html><body><p>Repeated</p><p>Repeated</p><p>Unique</p></body></html>";
        let lines = ScrapeExtractor::new().extract(html, &opts(None));
        assert_eq!(lines, vec!["Repeated\n", "Unique\n"]);
    }

    #[test]
    fn test_lists_with_paragraphs_are_skipped() {
        let html = r#"
            <html><body>
                <ul><li>plain item</li></ul>
                <ul><li><p>para item</p></li></ul>
            </body></html>
        "#;
        let lines = ScrapeExtractor::new().extract(html, &opts(None));
        assert!(lines.iter().any(|l| l.contains("plain item")));
        // the paragraph itself is still walked once
        assert_eq!(lines.iter().filter(|l| l.contains("para item")).count(), 1);
    }

    #[test]
    fn test_word_cap_stops_before_overflowing_line() {
        let html = "<html><body><p>one two three</p><p>four five six</p><p>seven</p></body></html>";
        let lines = ScrapeExtractor::new().extract(html, &opts(Some(5)));
        assert_eq!(lines, vec!["one two three\n"]);
    }

    #[test]
    fn test_word_cap_exact_exhaustion_drops_line() {
        let html = "<html><body><p>one two three</p></body></html>";
        let lines = ScrapeExtractor::new().extract(html, &opts(Some(3)));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_image_links() {
        let html = r#"
            <html><body>
                <a href="/gallery" title="A cat"><img alt="cat" src="https://img.example/cat.png"></a>
                <a href="/me"><img alt="me" class="avatar" src="https://img.example/me.png"></a>
                <a href="/icon"><img alt="icon" width="16" src="https://img.example/icon.png"></a>
                <p>Caption text</p>
            </body></html>
        "#;
        let lines = ScrapeExtractor::new().extract(html, &opts(None));
        assert_eq!(lines, vec!["![A cat](https://img.example/cat.png)\n", "Caption text\n"]);
    }

    #[test]
    fn test_image_limit_and_cost() {
        let html = r#"
            <html><body>
                <a title="one"><img alt="1" src="https://img.example/1.png"></a>
                <a title="two"><img alt="2" src="https://img.example/2.png"></a>
                <p>alpha beta</p>
            </body></html>
        "#;
        let options = ExtractOptions { max_words: Some(13), include_source_link: false, max_images: 1 };
        let lines = ScrapeExtractor::new().extract(html, &options);
        // one image costs 10 words, leaving 3 for text
        assert_eq!(lines, vec!["![one](https://img.example/1.png)\n", "alpha beta\n"]);
    }

    #[test]
    fn test_canonical_source_line() {
        let html = r#"
            <html>
            <head><link rel="canonical" href="https://docs.example.com/guide"></head>
            <body><p>Guide text</p></body>
            </html>
        "#;
        let options = ExtractOptions { include_source_link: true, ..opts(None) };
        let lines = ScrapeExtractor::new().extract(html, &options);
        assert_eq!(lines.last().unwrap(), "\nSource: [docs.example.com](https://docs.example.com/guide)");

        let without = ScrapeExtractor::new().extract(html, &opts(None));
        assert_eq!(without, vec!["Guide text\n"]);
    }

    #[test]
    fn test_not_html() {
        let lines = ScrapeExtractor::new().extract("", &opts(None));
        assert!(lines.is_empty());
    }
}
