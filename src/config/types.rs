use serde::Deserialize;

/// Main configuration structure for Site-Archiver
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub rewrite: RewriteConfig,
}

/// The site being archived
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Origin of the archived site, e.g. `https://example.com`
    #[serde(rename = "top-page-url")]
    pub top_page_url: String,

    /// Path of the sitemap feed, relative to the top page
    #[serde(rename = "sitemap-url-path")]
    pub sitemap_url_path: String,

    /// Name given to the index document of extension-less paths
    #[serde(rename = "index-file-name", default = "default_index_file_name")]
    pub index_file_name: String,
}

/// Where the mirror and the run bookkeeping files are written
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory of the mirror tree
    #[serde(rename = "mirror-root")]
    pub mirror_root: String,

    /// Directory holding the run log, URL logs and the retry ledger
    #[serde(rename = "state-dir", default = "default_state_dir")]
    pub state_dir: String,

    /// Prefix of the bookkeeping file names (defaults to the mirror root's name)
    #[serde(rename = "file-prefix", default)]
    pub file_prefix: Option<String>,
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Attempts per URL before it is written to the retry ledger
    #[serde(rename = "retry-count", default = "default_retry_count")]
    pub retry_count: u32,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Base delay between attempts (milliseconds), multiplied by the attempt number
    #[serde(rename = "retry-backoff-ms", default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-fetches", default = "default_max_concurrent")]
    pub max_concurrent_fetches: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            retry_backoff_ms: default_retry_backoff(),
            max_concurrent_fetches: default_max_concurrent(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Parameters of the structural HTML edits applied to every archived page
#[derive(Debug, Clone, Deserialize)]
pub struct RewriteConfig {
    /// `<h3>` text identifying the ranking widget to drop
    #[serde(rename = "ranking-widget-heading", default = "default_ranking_heading")]
    pub ranking_widget_heading: String,

    /// id of the mobile-view list item to drop
    #[serde(rename = "mobile-view-item-id", default = "default_mobile_view_id")]
    pub mobile_view_item_id: String,

    /// id of the banner element carrying the archive notice
    #[serde(rename = "banner-id", default = "default_banner_id")]
    pub banner_id: String,

    /// id of the container the banner is inserted before when absent
    #[serde(rename = "banner-anchor-id", default = "default_banner_anchor_id")]
    pub banner_anchor_id: String,

    /// Text of the archive notice
    #[serde(rename = "archive-notice", default = "default_archive_notice")]
    pub archive_notice: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            ranking_widget_heading: default_ranking_heading(),
            mobile_view_item_id: default_mobile_view_id(),
            banner_id: default_banner_id(),
            banner_anchor_id: default_banner_anchor_id(),
            archive_notice: default_archive_notice(),
        }
    }
}

fn default_index_file_name() -> String {
    "index.html".to_string()
}

fn default_state_dir() -> String {
    ".".to_string()
}

fn default_retry_count() -> u32 {
    3
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_retry_backoff() -> u64 {
    500
}

fn default_max_concurrent() -> u32 {
    1
}

fn default_crawler_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_ranking_heading() -> String {
    "人気記事ランキング".to_string()
}

fn default_mobile_view_id() -> String {
    "view_sp".to_string()
}

fn default_banner_id() -> String {
    "headerBanner".to_string()
}

fn default_banner_anchor_id() -> String {
    "bodyGrid".to_string()
}

fn default_archive_notice() -> String {
    "\u{3000}\u{3000}本ページはアーカイブです。\u{3000}\u{3000}".to_string()
}
