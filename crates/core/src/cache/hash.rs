//! Content-addressed cache key generation.
//!
//! Keys are SHA-256 digests over normalized request parameters. The calendar
//! day is part of every file path, which bounds an entry's lifetime to the day
//! it was written.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

const PAGE_SLUG_CHARS: usize = 48;
const PAGE_DIGEST_CHARS: usize = 16;
const QUERY_SLUG_CHARS: usize = 20;
/// Byte caps on encoded prefixes; file names must stay under 255 bytes.
const PAGE_SLUG_BYTES: usize = 3 * PAGE_SLUG_CHARS;
const QUERY_SLUG_BYTES: usize = 3 * QUERY_SLUG_CHARS;

/// Hex-encoded SHA-256 of `bytes`.
pub fn digest_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Form-urlencode a string the way query strings encode it (spaces become `+`).
pub fn quote_plus(input: &str) -> String {
    url::form_urlencoded::byte_serialize(input.as_bytes()).collect()
}

/// [`quote_plus`] of `input`, cut after the last whole character that fits
/// in `max_bytes`. Percent escapes are never split.
fn quote_plus_capped(input: &str, max_bytes: usize) -> String {
    let mut out = String::new();
    let mut buf = [0u8; 4];
    for c in input.chars() {
        let piece = quote_plus(c.encode_utf8(&mut buf));
        if out.len() + piece.len() > max_bytes {
            break;
        }
        out.push_str(&piece);
    }
    out
}

/// Readable prefix of a page URL: host and path without scheme or query,
/// slashes turned into spaces, truncated to 48 characters.
fn page_slug(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or(url);
    let without_scheme = without_query.split_once("//").map_or(without_query, |(_, rest)| rest);
    let spaced: String = without_scheme.replace('/', " ").chars().take(PAGE_SLUG_CHARS).collect();
    quote_plus_capped(&spaced, PAGE_SLUG_BYTES)
}

/// File name of the page cache entry for `url` on `date`.
///
/// Format: `<slug>.<YYYY-MM-DD>.<digest[..16]>.cache`
pub fn page_cache_file_name(url: &str, date: NaiveDate) -> String {
    let digest = digest_hex(url.as_bytes());
    format!("{}.{}.{}.cache", page_slug(url), date.format("%Y-%m-%d"), &digest[..PAGE_DIGEST_CHARS])
}

/// Rebuild `value` with every object's keys in sorted order.
///
/// Rebuilding keeps the output sorted whether or not serde_json preserves
/// insertion order.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered: BTreeMap<&String, Value> = map.iter().map(|(k, v)| (k, sorted(v))).collect();
            let mut out = Map::new();
            for (k, v) in ordered {
                out.insert(k.clone(), v);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

/// Canonical JSON document for a query and its parameters.
///
/// `params` must be a JSON object; its fields are merged with `query` and
/// every key is sorted, so logically identical requests serialize identically.
pub fn canonical_query_json(query: &str, params: &Value) -> String {
    let mut merged = Map::new();
    if let Value::Object(fields) = params {
        for (k, v) in fields {
            merged.insert(k.clone(), v.clone());
        }
    }
    merged.insert("query".into(), Value::String(query.to_string()));
    sorted(&Value::Object(merged)).to_string()
}

/// Compute the query cache key: digest over the canonical query document.
pub fn query_cache_key(query: &str, params: &Value) -> String {
    digest_hex(canonical_query_json(query, params).as_bytes())
}

/// File name of the query cache entry: `<urlencoded query[..20]>.<key>.cache`.
pub fn query_cache_file_name(query: &str, key: &str) -> String {
    let prefix: String = query.chars().take(QUERY_SLUG_CHARS).collect();
    format!("{}.{}.cache", quote_plus_capped(&prefix, QUERY_SLUG_BYTES), key)
}
