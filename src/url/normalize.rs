use crate::url::domain::{url_key, SiteOrigin};
use url::Url;

/// Normalizes a discovered link into a URL key, or drops it
///
/// # Normalization Steps
///
/// 1. Trim whitespace; drop empty references
/// 2. Resolve the reference against the URL of the page it was found on
/// 3. Drop anything that is not HTTP(S) (`mailto:`, `javascript:`, ...)
/// 4. Drop anything outside the archived site, silently
/// 5. Remove the fragment (everything after `#`)
/// 6. Remove a single trailing slash
///
/// Query strings are kept here; deciding whether a query is stripped or
/// mapped onto a path happens when the key is planned for fetching.
///
/// # Examples
///
/// ```
/// use site_archiver::url::{normalize_link, SiteOrigin};
/// use url::Url;
///
/// let origin = SiteOrigin::new("https://ex.com").unwrap();
/// let page = Url::parse("https://ex.com/p").unwrap();
///
/// assert_eq!(
///     normalize_link("/q/#top", &page, &origin),
///     Some("https://ex.com/q".to_string())
/// );
/// assert_eq!(normalize_link("https://other.com/x", &page, &origin), None);
/// ```
pub fn normalize_link(href: &str, page_url: &Url, origin: &SiteOrigin) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = page_url.join(href).ok()?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    if !origin.contains(&resolved) {
        return None;
    }

    Some(url_key(&resolved))
}
