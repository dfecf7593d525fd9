//! Site-Archiver: mirrors a CMS-driven website to a local directory tree
//!
//! This crate crawls a single same-origin site starting from its top page and its
//! sitemap feed, rewrites a few fixed HTML fragments, and stores every object next
//! to a `.metadata` sidecar so the mirror can later be uploaded to an object store
//! unchanged. A retry ledger lets a failed run resume without re-downloading
//! everything.

pub mod config;
pub mod crawler;
pub mod ledger;
pub mod mirror;
pub mod output;
pub mod sitemap;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Archiver operations
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] sitemap::SitemapError),

    #[error("Retry ledger error: {0}")]
    Ledger(#[from] ledger::LedgerError),

    #[error("Mirror error: {0}")]
    Mirror(#[from] mirror::MirrorError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTML rewrite rule error: {0}")]
    Rewrite(String),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("URL {0} is outside the archived site")]
    OffSite(String),
}

/// Result type alias for Site-Archiver operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_archive, Coordinator, FetchOutcome};
pub use ledger::RetryLedger;
pub use output::CrawlReport;
pub use state::{CrawlPhase, CrawlState};
pub use url::{normalize_link, SiteOrigin};
