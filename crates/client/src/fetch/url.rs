//! URL canonicalization and host matching for fetches and result filtering.

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Canonicalize a URL string before requesting it.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = url::Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str().map(str::to_lowercase) {
        parsed
            .set_host(Some(&host))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Lowercased host of `input`, if it parses as an http(s) URL.
pub fn host_of(input: &str) -> Option<String> {
    canonicalize(input).ok()?.host_str().map(str::to_string)
}

/// Whether `host` contains `domain` as a run of whole labels.
///
/// `google` matches `www.google.com` and `google.co.uk`; `example.com`
/// matches `example.com` and `docs.example.com` but not `notexample.com`.
pub fn host_has_labels(host: &str, domain: &str) -> bool {
    let domain = domain.trim_matches('.').to_lowercase();
    if domain.is_empty() {
        return false;
    }
    format!(".{host}.").contains(&format!(".{domain}."))
}
