use crate::config::types::{Config, FetchConfig, OutputConfig, RewriteConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_output_config(&config.output)?;
    validate_fetch_config(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_rewrite_config(&config.rewrite)?;
    Ok(())
}

/// Validates the archived site's origin and sitemap location
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.top_page_url).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid top-page-url '{}': {}",
            config.top_page_url, e
        ))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "top-page-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "top-page-url '{}' has no host",
            config.top_page_url
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Validation(format!(
            "top-page-url '{}' must not carry a query or fragment",
            config.top_page_url
        )));
    }

    if !config.sitemap_url_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "sitemap-url-path must start with '/', got '{}'",
            config.sitemap_url_path
        )));
    }

    if config.index_file_name.is_empty() || config.index_file_name.contains('/') {
        return Err(ConfigError::Validation(format!(
            "index-file-name must be a plain file name, got '{}'",
            config.index_file_name
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.mirror_root.is_empty() {
        return Err(ConfigError::Validation(
            "mirror-root cannot be empty".to_string(),
        ));
    }

    if config.state_dir.is_empty() {
        return Err(ConfigError::Validation(
            "state-dir cannot be empty".to_string(),
        ));
    }

    if let Some(prefix) = &config.file_prefix {
        if prefix.is_empty() || prefix.contains('/') || prefix.contains('\\') {
            return Err(ConfigError::Validation(format!(
                "file-prefix must be a plain name, got '{}'",
                prefix
            )));
        }
    }

    Ok(())
}

/// Validates fetch limits
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.retry_count < 1 || config.retry_count > 10 {
        return Err(ConfigError::Validation(format!(
            "retry-count must be between 1 and 10, got {}",
            config.retry_count
        )));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 32 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-fetches must be between 1 and 32, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.request_timeout_secs < 1 || config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeouts must be at least 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Ok(())
}

/// Validates the HTML edit parameters
fn validate_rewrite_config(config: &RewriteConfig) -> Result<(), ConfigError> {
    for (key, id) in [
        ("mobile-view-item-id", &config.mobile_view_item_id),
        ("banner-id", &config.banner_id),
        ("banner-anchor-id", &config.banner_anchor_id),
    ] {
        validate_element_id(key, id)?;
    }
    Ok(())
}

/// Element ids end up inside CSS selectors, so keep them to a safe alphabet
fn validate_element_id(key: &str, id: &str) -> Result<(), ConfigError> {
    if id.is_empty()
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "{} must be a non-empty identifier, got '{}'",
            key, id
        )));
    }
    Ok(())
}
