//! Crawler module for mirroring the site
//!
//! This module contains the core archiving logic, including:
//! - HTTP fetching with retry logic and redirect detection
//! - Decoding and re-encoding pages in their declared character set
//! - Structural HTML rewriting before pages are saved
//! - Link and image source extraction
//! - Overall run coordination

mod charset;
mod coordinator;
mod fetcher;
mod parser;
mod rewriter;

pub use coordinator::{run_archive, Coordinator};
pub use fetcher::{
    build_feed_client, build_http_client, FetchOutcome, Fetcher, DEFAULT_ASSET_CONTENT_TYPE,
    DEFAULT_PAGE_CONTENT_TYPE,
};
pub use parser::{extract_links, extract_links_from_html};
pub use rewriter::{PageRewriter, RewriteRule};
