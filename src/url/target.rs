//! Planning where a URL key is fetched from and where it lands on disk

use crate::config::join_url_path;
use crate::url::domain::SiteOrigin;
use std::path::{Path, PathBuf};

/// Query-parameterized tag pages that are mapped onto a path segment
const TAGCLOUD_QUERY: &str = "/tagcloud?tag=";

/// Path form of the tag pages
const TAGCLOUD_PATH: &str = "/tagcloud/";

/// Extensions that are archived as pages even though the path has an extension
const PAGE_EXTENSIONS: &[&str] = &["html", "htm"];

/// How a URL is downloaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Parsed, rewritten and scanned for links
    Page,
    /// Stored byte-for-byte
    Asset,
}

/// A URL key resolved into a fetch URL and a local destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// The URL actually fetched; also the key recorded as processed
    pub url: String,
    /// Where the object is written
    pub local_path: PathBuf,
    /// Page or raw asset
    pub kind: TargetKind,
    /// The pre-truncation key when a query string was dropped
    pub skipped_original: Option<String>,
}

/// Returns true for keys of the form `<top>/tagcloud?tag=<name>`
pub fn is_tagcloud(key: &str, origin: &SiteOrigin) -> bool {
    origin
        .relative(key)
        .map(|rel| rel.starts_with(TAGCLOUD_QUERY))
        .unwrap_or(false)
}

/// Rewrites the query form of tag pages into their path form
///
/// Applied both to saved page content and to locations written to the
/// regenerated sitemap.
pub fn rewrite_tagcloud(text: &str) -> String {
    text.replace(TAGCLOUD_QUERY, TAGCLOUD_PATH)
}

/// Resolves a URL key into a [`CrawlTarget`]
///
/// # Rules
///
/// - Tag pages keep their query for fetching but are stored under
///   `tagcloud/<name>/<index>`; they are never treated as query duplicates.
/// - Any other query string is dropped: the truncated URL is fetched and the
///   original key is reported in `skipped_original`.
/// - A path whose last segment has an extension is stored at that exact path;
///   `.html`/`.htm` are pages, everything else is an asset.
/// - Extension-less paths are pages stored as `<path>/<index_file_name>`.
///
/// Returns `None` for keys outside the archived site.
pub fn plan_target(
    key: &str,
    origin: &SiteOrigin,
    mirror_root: &Path,
    index_file_name: &str,
) -> Option<CrawlTarget> {
    let relative = origin.relative(key)?;

    if is_tagcloud(key, origin) {
        let local_path = join_url_path(mirror_root, &rewrite_tagcloud(relative)).join(index_file_name);
        return Some(CrawlTarget {
            url: key.to_string(),
            local_path,
            kind: TargetKind::Page,
            skipped_original: None,
        });
    }

    let (url, relative, skipped_original) = match key.split_once('?') {
        Some((base, _)) => {
            let base = base.strip_suffix('/').unwrap_or(base);
            let relative = relative.split('?').next().unwrap_or_default();
            (base.to_string(), relative, Some(key.to_string()))
        }
        None => (key.to_string(), relative, None),
    };

    let location = join_url_path(mirror_root, relative);
    let extension = last_segment_extension(relative);

    let (local_path, kind) = match extension {
        Some(ext) if PAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
            (location, TargetKind::Page)
        }
        Some(_) => (location, TargetKind::Asset),
        None => (location.join(index_file_name), TargetKind::Page),
    };

    Some(CrawlTarget {
        url,
        local_path,
        kind,
        skipped_original,
    })
}

fn last_segment_extension(relative: &str) -> Option<&str> {
    let segment = relative.trim_end_matches('/').rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}
