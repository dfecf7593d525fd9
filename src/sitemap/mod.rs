//! Sitemap feed handling
//!
//! This module loads the site's sitemap feed (which seeds the non-recursive
//! second pass of a crawl) and regenerates a feed covering everything the run
//! archived, for re-indexing of the mirror.

mod builder;
mod loader;

pub use builder::{build_output_entries, render_sitemap, write_output_sitemap, OutputEntry};
pub use loader::{load_sitemap, parse_lastmod, parse_sitemap};

use chrono::{DateTime, FixedOffset};
use thiserror::Error;
use url::Url;

/// Namespace of both the consumed and the produced feed
pub const SITEMAP_NAMESPACE: &str = "http://www.google.com/schemas/sitemap/0.84";

/// Change frequency emitted for every entry, whatever the feed says
pub const CHANGE_FREQUENCY: &str = "never";

/// Priority given to every loaded entry and to every non-top output entry
pub const DEFAULT_PRIORITY: f32 = 0.5;

/// Priority of the top page in the regenerated feed
pub const TOP_PAGE_PRIORITY: f32 = 0.8;

/// Timestamp layout of `<lastmod>` in the regenerated feed
pub const LASTMOD_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Errors that can occur while loading or writing a sitemap feed
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("HTTP error fetching sitemap {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Sitemap {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed sitemap XML: {0}")]
    Xml(String),

    #[error("Sitemap {0} contains no entries")]
    Empty(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mirror error: {0}")]
    Mirror(#[from] crate::mirror::MirrorError),
}

/// One `<url>` record of a loaded feed
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub location: String,
    pub last_modified: Option<DateTime<FixedOffset>>,
    pub change_frequency: &'static str,
    pub priority: f32,
}

impl SitemapEntry {
    /// Creates an entry with the fixed change frequency and priority
    pub fn new(location: impl Into<String>, last_modified: Option<DateTime<FixedOffset>>) -> Self {
        Self {
            location: location.into(),
            last_modified,
            change_frequency: CHANGE_FREQUENCY,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// The comparable URL key of this entry's location
    ///
    /// Falls back to the raw location when it does not parse as a URL.
    pub fn key(&self) -> String {
        Url::parse(&self.location)
            .map(|url| crate::url::url_key(&url))
            .unwrap_or_else(|_| self.location.clone())
    }
}
