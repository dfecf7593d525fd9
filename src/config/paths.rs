use crate::config::types::Config;
use std::path::{Path, PathBuf};

/// Every location a run reads from or writes to, derived once from the config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePaths {
    /// Top page URL without a trailing slash
    pub top_page_url: String,
    /// URL of the sitemap feed
    pub sitemap_url: String,
    /// Root of the mirror tree
    pub mirror_root: PathBuf,
    /// Where the regenerated sitemap is written
    pub sitemap_file: PathBuf,
    /// Run log written by the file logging layer
    pub log_file: PathBuf,
    /// Sorted list of URLs saved in this run
    pub processed_file: PathBuf,
    /// Sorted list of redirected or query-stripped URLs
    pub skipped_file: PathBuf,
    /// Retry ledger
    pub retry_file: PathBuf,
}

impl ArchivePaths {
    /// Derives all run paths from the configuration
    pub fn from_config(config: &Config) -> Self {
        let top_page_url = config.site.top_page_url.trim_end_matches('/').to_string();
        let sitemap_url = format!("{}{}", top_page_url, config.site.sitemap_url_path);

        let mirror_root = PathBuf::from(&config.output.mirror_root);
        let sitemap_file = join_url_path(&mirror_root, &config.site.sitemap_url_path);

        let prefix = config
            .output
            .file_prefix
            .clone()
            .unwrap_or_else(|| default_prefix(&mirror_root));
        let state_dir = PathBuf::from(&config.output.state_dir);

        Self {
            top_page_url,
            sitemap_url,
            sitemap_file,
            log_file: state_dir.join(format!("{}_download_log.txt", prefix)),
            processed_file: state_dir.join(format!("{}_processed_log.txt", prefix)),
            skipped_file: state_dir.join(format!("{}_skipped_log.txt", prefix)),
            retry_file: state_dir.join(format!("{}_download_retry.txt", prefix)),
            mirror_root,
        }
    }
}

/// Maps a `/`-separated URL path onto a local directory
pub fn join_url_path(root: &Path, url_path: &str) -> PathBuf {
    url_path
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

fn default_prefix(mirror_root: &Path) -> String {
    mirror_root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "site".to_string())
}
