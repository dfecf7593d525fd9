//! Link discovery in archived pages
//!
//! Candidate URLs come from two places:
//! - `<a href="...">`
//! - `<img src="...">`
//!
//! Every candidate goes through [`normalize_link`], so off-site links and
//! non-HTTP schemes never leave this module.

use crate::url::{normalize_link, SiteOrigin};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::OnceLock;
use url::Url;

/// Element/attribute pairs scanned for links
const LINK_SOURCES: &[(&str, &str)] = &[("a[href]", "href"), ("img[src]", "src")];

fn link_selectors() -> &'static [(Selector, &'static str)] {
    static SELECTORS: OnceLock<Vec<(Selector, &'static str)>> = OnceLock::new();
    SELECTORS.get_or_init(|| {
        LINK_SOURCES
            .iter()
            .filter_map(|(css, attr)| Selector::parse(css).ok().map(|s| (s, *attr)))
            .collect()
    })
}

/// Extracts the URL keys of every same-site link and image in the document
///
/// # Arguments
///
/// * `document` - The parsed (and possibly already rewritten) page
/// * `page_url` - The URL the page was fetched from, for resolving relative references
/// * `origin` - The archived site
pub fn extract_links(document: &Html, page_url: &Url, origin: &SiteOrigin) -> BTreeSet<String> {
    let mut links = BTreeSet::new();

    for (selector, attr) in link_selectors() {
        for element in document.select(selector) {
            if let Some(reference) = element.value().attr(attr) {
                if let Some(key) = normalize_link(reference, page_url, origin) {
                    links.insert(key);
                }
            }
        }
    }

    links
}

/// Convenience function for extracting links straight from HTML text
pub fn extract_links_from_html(html: &str, page_url: &Url, origin: &SiteOrigin) -> BTreeSet<String> {
    extract_links(&Html::parse_document(html), page_url, origin)
}
