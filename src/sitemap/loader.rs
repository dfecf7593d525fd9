//! Fetching and parsing the site's sitemap feed

use crate::sitemap::{SitemapEntry, SitemapError};
use chrono::{DateTime, FixedOffset};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;

/// Fetches and parses the sitemap feed at `url`
///
/// The result is sorted by location. A non-2xx response, malformed XML, or a
/// feed without any entry is an error: the crawl cannot be seeded without it.
/// Whether redirects are followed is up to `client`.
pub async fn load_sitemap(client: &Client, url: &str) -> Result<Vec<SitemapEntry>, SitemapError> {
    tracing::info!("Loading sitemap from {}", url);

    let response = client.get(url).send().await.map_err(|source| {
        tracing::error!("Failed to fetch sitemap {}: {}", url, source);
        SitemapError::Http {
            url: url.to_string(),
            source,
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("Sitemap {} returned HTTP {}", url, status.as_u16());
        return Err(SitemapError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| SitemapError::Http {
        url: url.to_string(),
        source,
    })?;

    let entries = parse_sitemap(&body).map_err(|e| {
        tracing::error!("Failed to parse sitemap {}: {}", url, e);
        e
    })?;

    if entries.is_empty() {
        tracing::error!("Sitemap {} has no <url> entries", url);
        return Err(SitemapError::Empty(url.to_string()));
    }

    tracing::info!("Loaded {} sitemap entries", entries.len());
    Ok(entries)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Loc,
    LastMod,
}

/// Parses sitemap XML into entries sorted by location
///
/// Elements are matched by local name. Change frequency and priority in the
/// feed are ignored in favour of the fixed values of [`SitemapEntry::new`].
/// A `<url>` without `<loc>` is skipped; an unparseable `<lastmod>` is treated
/// as absent.
pub fn parse_sitemap(xml: &str) -> Result<Vec<SitemapEntry>, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut in_url = false;
    let mut field: Option<Field> = None;
    let mut loc = String::new();
    let mut lastmod = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"url" => {
                    in_url = true;
                    loc.clear();
                    lastmod.clear();
                }
                b"loc" if in_url => field = Some(Field::Loc),
                b"lastmod" if in_url => field = Some(Field::LastMod),
                _ => field = None,
            },
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| SitemapError::Xml(e.to_string()))?;
                push_field(field, &text, &mut loc, &mut lastmod);
            }
            Ok(Event::CData(c)) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                push_field(field, &text, &mut loc, &mut lastmod);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"url" => {
                    in_url = false;
                    field = None;
                    let location = loc.trim();
                    if location.is_empty() {
                        tracing::warn!("Skipping sitemap <url> without <loc>");
                        continue;
                    }
                    entries.push(SitemapEntry::new(location, parse_lastmod(lastmod.trim())));
                }
                _ => field = None,
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SitemapError::Xml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    entries.sort_by(|a, b| a.location.cmp(&b.location));
    Ok(entries)
}

fn push_field(field: Option<Field>, text: &str, loc: &mut String, lastmod: &mut String) {
    match field {
        Some(Field::Loc) => loc.push_str(text),
        Some(Field::LastMod) => lastmod.push_str(text),
        None => {}
    }
}

/// Parses a `<lastmod>` value into a timezone-aware timestamp
///
/// Accepts RFC 3339 (`2024-05-01T10:00:00+09:00`) and the offset-without-colon
/// form (`2024-05-01T10:00:00+0900`). Anything else yields `None`.
pub fn parse_lastmod(value: &str) -> Option<DateTime<FixedOffset>> {
    if value.is_empty() {
        return None;
    }

    let parsed = DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"));

    match parsed {
        Ok(timestamp) => Some(timestamp),
        Err(e) => {
            tracing::warn!("Ignoring unparseable lastmod '{}': {}", value, e);
            None
        }
    }
}
