//! Link extraction from raw page content
//!
//! Scans every element carrying an `href` attribute and keeps the values that
//! look like absolute http(s) URLs, dropping known asset extensions. The kept
//! strings are returned as written in the page, minus wrapping quotes and
//! whitespace; no normalization is applied.

use scraper::{Html, Selector};
use url::Url;

/// Extracts candidate page links from HTML content
///
/// # Filtering Rules
///
/// **Include:**
/// - `href` values that parse as absolute `http://` or `https://` URLs with a host
///
/// **Exclude:**
/// - Relative links, fragments, `javascript:`, `mailto:`, `tel:`, `data:`
/// - URLs whose path ends in one of `excluded_extensions` (case-insensitive)
/// - Values with embedded control characters such as line breaks or tabs
///
/// Malformed content or a page without links yields an empty vector.
///
/// # Example
///
/// ```
/// use sumi_fanout::crawler::extract_links;
///
/// let html = r#"<a href="https://example.com/page">Page</a><a href="https://example.com/app.js">JS</a>"#;
/// let excluded = vec!["js".to_string()];
/// assert_eq!(extract_links(html, &excluded), vec!["https://example.com/page"]);
/// ```
pub fn extract_links(html: &str, excluded_extensions: &[String]) -> Vec<String> {
    let selector = match Selector::parse("[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let document = Html::parse_document(html);

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| accept_href(href, excluded_extensions))
        .collect()
}

/// Returns the cleaned href if it should be reported, None otherwise
fn accept_href(href: &str, excluded_extensions: &[String]) -> Option<String> {
    let cleaned = strip_wrapping(href);
    if cleaned.is_empty() || cleaned.chars().any(|c| c.is_control()) {
        return None;
    }

    let parsed = Url::parse(cleaned).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }
    if parsed.host_str().is_none() {
        return None;
    }

    if has_excluded_extension(parsed.path(), excluded_extensions) {
        return None;
    }

    Some(cleaned.to_string())
}

/// Strips surrounding whitespace and stray quote characters
fn strip_wrapping(href: &str) -> &str {
    href.trim().trim_matches(|c: char| c == '"' || c == '\'').trim()
}

/// True if the last path segment ends in `.ext` for a denylisted `ext`
fn has_excluded_extension(path: &str, excluded_extensions: &[String]) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or("");
    let extension = match last_segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => return false,
    };

    excluded_extensions
        .iter()
        .any(|excluded| excluded.eq_ignore_ascii_case(extension))
}
