//! Regenerating a sitemap feed for the archived URLs

use crate::mirror::write_metadata;
use crate::sitemap::{
    SitemapEntry, SitemapError, CHANGE_FREQUENCY, DEFAULT_PRIORITY, LASTMOD_FORMAT,
    SITEMAP_NAMESPACE, TOP_PAGE_PRIORITY,
};
use crate::url::rewrite_tagcloud;
use chrono::{DateTime, FixedOffset};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashMap;
use std::path::Path;

/// Content type declared for the regenerated feed
const SITEMAP_CONTENT_TYPE: &str = "application/xml";

/// One `<url>` record of the regenerated feed
#[derive(Debug, Clone, PartialEq)]
pub struct OutputEntry {
    pub location: String,
    pub last_modified: String,
    pub priority: f32,
}

/// Builds the regenerated feed's entries
///
/// `urls` are emitted in sorted order. The top page gets priority 0.8, every
/// other URL 0.5. `<lastmod>` comes from the loaded feed entry with the same key
/// when one exists, otherwise from `now`. Tag pages are listed in their path
/// form.
pub fn build_output_entries<'a, I>(
    urls: I,
    top_key: &str,
    loaded: &[SitemapEntry],
    now: DateTime<FixedOffset>,
) -> Vec<OutputEntry>
where
    I: IntoIterator<Item = &'a String>,
{
    let by_key: HashMap<String, &SitemapEntry> =
        loaded.iter().map(|entry| (entry.key(), entry)).collect();
    let fallback = now.format(LASTMOD_FORMAT).to_string();

    let mut urls: Vec<&String> = urls.into_iter().collect();
    urls.sort();
    urls.dedup();

    urls.into_iter()
        .map(|url| {
            let last_modified = by_key
                .get(url.as_str())
                .and_then(|entry| entry.last_modified)
                .map(|ts| ts.format(LASTMOD_FORMAT).to_string())
                .unwrap_or_else(|| fallback.clone());

            OutputEntry {
                location: rewrite_tagcloud(url),
                last_modified,
                priority: if url == top_key {
                    TOP_PAGE_PRIORITY
                } else {
                    DEFAULT_PRIORITY
                },
            }
        })
        .collect()
}

/// Serializes entries as a feed indented by two spaces, without an XML declaration
pub fn render_sitemap(entries: &[OutputEntry]) -> Result<String, SitemapError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    writer.write_event(Event::Start(urlset)).map_err(xml_error)?;

    for entry in entries {
        writer
            .write_event(Event::Start(BytesStart::new("url")))
            .map_err(xml_error)?;
        write_text_element(&mut writer, "loc", &entry.location)?;
        write_text_element(&mut writer, "lastmod", &entry.last_modified)?;
        write_text_element(&mut writer, "changefreq", CHANGE_FREQUENCY)?;
        write_text_element(&mut writer, "priority", &entry.priority.to_string())?;
        writer
            .write_event(Event::End(BytesEnd::new("url")))
            .map_err(xml_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("urlset")))
        .map_err(xml_error)?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| SitemapError::Xml(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

/// Writes the feed and its `application/xml` metadata sidecar
pub fn write_output_sitemap(path: &Path, entries: &[OutputEntry]) -> Result<(), SitemapError> {
    let xml = render_sitemap(entries)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, xml)?;
    write_metadata(path, SITEMAP_CONTENT_TYPE)?;

    tracing::info!(
        "Wrote sitemap {} with {} entries",
        path.display(),
        entries.len()
    );
    Ok(())
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), SitemapError> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(text))
        .map_err(xml_error)?;
    Ok(())
}

fn xml_error<E: std::fmt::Display>(e: E) -> SitemapError {
    SitemapError::Xml(e.to_string())
}
