//! Global word budget over a ranked result list.

use websift_core::SearchResultEntry;

/// Fixed cost charged per entry for its title line and citation.
pub const ENTRY_OVERHEAD: usize = 5;

pub fn words_in(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Words an entry consumes: title plus overhead, plus fetched text or, when
/// that is missing or empty, the snippet.
pub fn entry_cost(entry: &SearchResultEntry) -> usize {
    words_in(&entry.title) + ENTRY_OVERHEAD + words_in(entry.body())
}

/// Keep the longest prefix of `entries` that fits in `max_words`.
///
/// Stops at the first entry that does not fit, even if a later one would.
/// Returns the kept entries and the words they consume.
pub fn apply(entries: Vec<SearchResultEntry>, max_words: usize) -> (Vec<SearchResultEntry>, usize) {
    let mut left = max_words;
    let mut kept = Vec::with_capacity(entries.len());

    for entry in entries {
        let cost = entry_cost(&entry);
        if cost > left {
            break;
        }
        left -= cost;
        kept.push(entry);
    }

    (kept, max_words - left)
}

/// Keep the longest prefix of `chunks` within `max_results` chunks and
/// `max_words` words, skipping chunks with no words.
///
/// Same stop-at-first-overflow rule as [`apply`]. Returns the kept chunks and
/// the words they consume.
pub fn fit_chunks(
    chunks: impl IntoIterator<Item = String>, max_results: usize, max_words: usize,
) -> (Vec<String>, usize) {
    let mut left = max_words;
    let mut kept = Vec::new();

    for chunk in chunks {
        if kept.len() >= max_results {
            break;
        }
        let words = words_in(&chunk);
        if words == 0 {
            continue;
        }
        if words > left {
            break;
        }
        left -= words;
        kept.push(chunk);
    }

    (kept, max_words - left)
}
