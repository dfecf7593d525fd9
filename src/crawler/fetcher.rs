//! HTTP fetcher implementation
//!
//! This module handles every object download of a run:
//! - Building the HTTP client (user agent, timeouts, no redirect following)
//! - Attempting a fetch up to the configured retry count with linear backoff
//! - Treating any 3xx answer as a redirect that is skipped, never saved
//! - Rewriting and saving pages in their own encoding, writing sidecars
//! - Saving assets, and pages answered with a non-HTML type, byte-for-byte
//! - Extracting further links from pages fetched recursively

use crate::config::Config;
use crate::crawler::charset::{decode_page, detect_encoding, encode_page};
use crate::crawler::parser::extract_links;
use crate::crawler::rewriter::PageRewriter;
use crate::mirror::DownloadedObject;
use crate::url::{CrawlTarget, SiteOrigin, TargetKind};
use crate::ArchiveError;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client, ClientBuilder, Response};
use scraper::Html;
use std::collections::BTreeSet;
use std::time::Duration;
use url::Url;

/// Redirect hops followed when loading the sitemap feed
const MAX_FEED_REDIRECTS: usize = 10;

/// Content type recorded for pages served without one
pub const DEFAULT_PAGE_CONTENT_TYPE: &str = "text/html";

/// Content type recorded for assets served without one
pub const DEFAULT_ASSET_CONTENT_TYPE: &str = "application/octet-stream";

/// Result of a fetch operation
///
/// Every variant is final for this dispatch: the driver decides what each one
/// means for the worklist, the URL sets and the retry ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The object and its sidecar were written
    Saved {
        /// Same-site links found in the page; empty for assets and non-recursive fetches
        links: BTreeSet<String>,
        /// Content type written to the sidecar
        content_type: String,
    },

    /// The server answered with a redirect; nothing was written
    Redirected {
        status: u16,
        location: Option<String>,
    },

    /// Retry mode and the URL is not in the ledger; no request was made
    Gated,

    /// Every attempt failed
    Failed { attempts: u32, error: String },
}

impl FetchOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// What a single successful round-trip produced
enum Attempt {
    Saved {
        links: BTreeSet<String>,
        content_type: String,
    },
    Redirected {
        status: u16,
        location: Option<String>,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are not followed: a 3xx response is how a redirected URL is
/// recognised and skipped.
///
/// # Example
///
/// ```no_run
/// use site_archiver::config::load_config;
/// use site_archiver::crawler::build_http_client;
/// use std::path::Path;
///
/// let config = load_config(Path::new("archive.toml")).unwrap();
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    client_builder(config).redirect(Policy::none()).build()
}

/// Builds the client the sitemap feed is loaded with
///
/// Unlike [`build_http_client`] it follows redirects: a moved feed is still
/// the feed.
pub fn build_feed_client(config: &Config) -> Result<Client, reqwest::Error> {
    client_builder(config)
        .redirect(Policy::limited(MAX_FEED_REDIRECTS))
        .build()
}

fn client_builder(config: &Config) -> ClientBuilder {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.fetch.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.fetch.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
}

/// Downloads one planned target at a time
///
/// Shared between fetch tasks behind an `Arc`; it holds no per-run state.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    rewriter: PageRewriter,
    origin: SiteOrigin,
    retry_count: u32,
    backoff: Duration,
}

impl Fetcher {
    pub fn new(client: Client, rewriter: PageRewriter, origin: SiteOrigin, config: &Config) -> Self {
        Self {
            client,
            rewriter,
            origin,
            retry_count: config.fetch.retry_count.max(1),
            backoff: Duration::from_millis(config.fetch.retry_backoff_ms),
        }
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Fetches `target`, retrying transport, status and write failures
    ///
    /// Attempt `n` that fails is followed by a pause of `backoff * n`. Links
    /// are only extracted from pages when `recursive` is set.
    pub async fn fetch(&self, target: &CrawlTarget, recursive: bool) -> FetchOutcome {
        let mut last_error = String::new();

        for attempt in 1..=self.retry_count {
            match self.attempt(target, recursive).await {
                Ok(Attempt::Saved {
                    links,
                    content_type,
                }) => {
                    tracing::info!(
                        "Downloaded {} to {}",
                        target.url,
                        target.local_path.display()
                    );
                    return FetchOutcome::Saved {
                        links,
                        content_type,
                    };
                }
                Ok(Attempt::Redirected { status, location }) => {
                    tracing::info!(
                        "{} was redirected (HTTP {}); skipping",
                        target.url,
                        status
                    );
                    return FetchOutcome::Redirected { status, location };
                }
                Err(e) => {
                    tracing::error!(
                        "Error downloading {} (attempt {}/{}): {}",
                        target.url,
                        attempt,
                        self.retry_count,
                        e
                    );
                    last_error = e.to_string();
                    if attempt < self.retry_count && !self.backoff.is_zero() {
                        tokio::time::sleep(self.backoff * attempt).await;
                    }
                }
            }
        }

        FetchOutcome::Failed {
            attempts: self.retry_count,
            error: last_error,
        }
    }

    async fn attempt(&self, target: &CrawlTarget, recursive: bool) -> Result<Attempt, ArchiveError> {
        let response = self
            .client
            .get(&target.url)
            .send()
            .await
            .map_err(|source| ArchiveError::Http {
                url: target.url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            return Ok(Attempt::Redirected {
                status: status.as_u16(),
                location,
            });
        }
        if !status.is_success() {
            return Err(ArchiveError::Status {
                url: target.url.clone(),
                status: status.as_u16(),
            });
        }

        match target.kind {
            TargetKind::Page if is_html_response(&response) => {
                self.save_page(target, response, recursive).await
            }
            TargetKind::Page => {
                tracing::debug!("{} is not HTML; storing it unmodified", target.url);
                self.save_asset(target, response).await
            }
            TargetKind::Asset => self.save_asset(target, response).await,
        }
    }

    async fn save_page(
        &self,
        target: &CrawlTarget,
        response: Response,
        recursive: bool,
    ) -> Result<Attempt, ArchiveError> {
        let content_type = header_content_type(&response, DEFAULT_PAGE_CONTENT_TYPE);
        let body = read_body(&target.url, response).await?;
        let page_url = Url::parse(&target.url)?;

        let (content, links) = self.process_page(&body, &content_type, &page_url, recursive);
        DownloadedObject::new(content, content_type.clone()).persist(&target.local_path)?;

        Ok(Attempt::Saved {
            links,
            content_type,
        })
    }

    async fn save_asset(&self, target: &CrawlTarget, response: Response) -> Result<Attempt, ArchiveError> {
        let content_type = header_content_type(&response, DEFAULT_ASSET_CONTENT_TYPE);
        let body = read_body(&target.url, response).await?;

        DownloadedObject::new(body, content_type.clone()).persist(&target.local_path)?;

        Ok(Attempt::Saved {
            links: BTreeSet::new(),
            content_type,
        })
    }

    /// Rewrites a page and collects its links
    ///
    /// Kept synchronous: the parsed document must not live across an await.
    fn process_page(
        &self,
        body: &[u8],
        content_type: &str,
        page_url: &Url,
        recursive: bool,
    ) -> (Vec<u8>, BTreeSet<String>) {
        let (text, encoding) = decode_page(body, detect_encoding(Some(content_type), body));
        let mut document = Html::parse_document(&text);
        self.rewriter.apply(&mut document);
        let content = encode_page(&self.rewriter.serialize(&document), encoding);

        let links = if recursive {
            extract_links(&document, page_url, &self.origin)
        } else {
            BTreeSet::new()
        };

        (content, links)
    }
}

/// A missing Content-Type counts as HTML
fn is_html_response(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(is_html_content_type)
        .unwrap_or(true)
}

fn is_html_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.is_empty() || essence == "text/html" || essence == "application/xhtml+xml"
}

fn header_content_type(response: &Response, default: &str) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

async fn read_body(url: &str, response: Response) -> Result<Vec<u8>, ArchiveError> {
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|source| ArchiveError::Http {
            url: url.to_string(),
            source,
        })
}
