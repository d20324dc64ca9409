//! Same-origin link scoping.
//!
//! Pure functions deciding which raw hrefs stay inside a traversal. No
//! deduplication happens here; the frontier owns that.

use url::Url;

/// Scheme-plus-host prefix for a page, e.g. `https://example.com` or
/// `http://127.0.0.1:8080`. The port belongs to the origin when present.
pub fn origin_of(page_url: &str) -> Option<String> {
    let parsed = Url::parse(page_url).ok()?;
    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{}://{}:{}", parsed.scheme(), host, port)),
        None => Some(format!("{}://{}", parsed.scheme(), host)),
    }
}

/// Qualify a raw href against a page origin, keeping only same-origin URLs.
///
/// Origin-relative hrefs (`/path`) are prefixed with the origin and always
/// kept. Absolute `http(s)` hrefs are kept only when they are the origin
/// itself or extend it at a path boundary. Everything else — protocol-relative
/// `//`, fragments, `mailto:`, `javascript:`, bare-relative paths — is
/// silently dropped.
pub fn resolve(origin: &str, href: &str) -> Option<String> {
    if href.starts_with("//") {
        return None;
    }
    if href.starts_with('/') {
        return Some(format!("{origin}{href}"));
    }
    if href.starts_with("http") && same_origin(origin, href) {
        return Some(href.to_string());
    }
    None
}

// A plain prefix test would also match `https://h.community/x` against the
// origin `https://h.com`, so the character after the origin must be a path
// boundary.
fn same_origin(origin: &str, href: &str) -> bool {
    match href.strip_prefix(origin) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}
