use crate::{UrlError, UrlResult};
use url::Url;

/// The scope of the archived site: one scheme/host/port plus the top page's path
///
/// Every URL key the crawler stores is the serialized URL with its fragment
/// removed and a single trailing slash stripped, so the top page
/// `https://example.com/` is keyed as `https://example.com`.
#[derive(Debug, Clone)]
pub struct SiteOrigin {
    top: Url,
    top_key: String,
}

impl SiteOrigin {
    /// Builds the site scope from the configured top page URL
    ///
    /// # Examples
    ///
    /// ```
    /// use site_archiver::url::SiteOrigin;
    ///
    /// let origin = SiteOrigin::new("https://Example.com/").unwrap();
    /// assert_eq!(origin.top_key(), "https://example.com");
    /// ```
    pub fn new(top_page_url: &str) -> UrlResult<Self> {
        let top = Url::parse(top_page_url).map_err(|e| UrlError::Parse(e.to_string()))?;

        if top.scheme() != "http" && top.scheme() != "https" {
            return Err(UrlError::InvalidScheme(top.scheme().to_string()));
        }
        if top.host_str().is_none() {
            return Err(UrlError::MissingDomain);
        }

        let top_key = url_key(&top);
        Ok(Self { top, top_key })
    }

    /// The top page as a parsed URL
    pub fn top_url(&self) -> &Url {
        &self.top
    }

    /// The top page's key
    pub fn top_key(&self) -> &str {
        &self.top_key
    }

    /// Returns true when `url` shares the top page's scheme, host and port and
    /// lives under its path
    pub fn contains(&self, url: &Url) -> bool {
        url.scheme() == self.top.scheme()
            && extract_domain(url) == extract_domain(&self.top)
            && url.port_or_known_default() == self.top.port_or_known_default()
            && url.path().starts_with(self.top.path())
    }

    /// Parses `raw` and returns its key if it belongs to the site
    pub fn key_of(&self, raw: &str) -> UrlResult<String> {
        let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        if !self.contains(&url) {
            return Err(UrlError::OffSite(raw.trim().to_string()));
        }
        Ok(url_key(&url))
    }

    /// Returns the part of `key` after the top page key, e.g. `/a/b?x=1`
    ///
    /// Returns `None` when the key is not under the top page. The match ends
    /// on a segment boundary, so `https://ex.company` is not under
    /// `https://ex.com`.
    pub fn relative<'a>(&self, key: &'a str) -> Option<&'a str> {
        let rest = key.strip_prefix(self.top_key.as_str())?;
        match rest.chars().next() {
            None | Some('/') | Some('?') => Some(rest),
            Some(_) => None,
        }
    }
}

/// Serializes a URL into its comparable key form
pub fn url_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    let serialized = url.to_string();
    match serialized.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => serialized,
    }
}

/// Extracts the lowercase host from a URL
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
