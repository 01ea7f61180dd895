//! Validation of submitted target URLs.

use url::Url;

/// Returns `true` if `raw_url` can be used as a redirect target.
///
/// # Rules
///
/// 1. Input must not be empty
/// 2. Input must not contain ASCII control characters or surrounding
///    whitespace
/// 3. Input must parse as an absolute URL
/// 4. Scheme must be `http` or `https`
/// 5. Host must be present and non-empty
///
/// The input is never rewritten: a valid URL is stored and redirected to
/// exactly as submitted. `Url::parse` silently drops tabs, newlines and
/// surrounding whitespace, so rule 2 runs first; otherwise a URL could pass
/// here and still be unusable as a `Location` header.
///
/// # Examples
///
/// ```ignore
/// assert!(is_valid_url("https://example.com/page"));
/// assert!(!is_valid_url("ftp://example.com/file"));
/// assert!(!is_valid_url("not-a-url"));
/// ```
pub fn is_valid_url(raw_url: &str) -> bool {
    if raw_url.is_empty() {
        return false;
    }

    if raw_url.trim() != raw_url || raw_url.bytes().any(|b| b.is_ascii_control()) {
        return false;
    }

    let Ok(url) = Url::parse(raw_url) else {
        return false;
    };

    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    url.host_str().is_some_and(|host| !host.is_empty())
}
