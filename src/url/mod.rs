//! URL handling module for Site-Archiver
//!
//! This module provides the URL normalization policy applied at link-discovery
//! time, the same-origin scope of the archived site, and the mapping of URL keys
//! onto local mirror paths.

mod domain;
mod normalize;
mod target;

// Re-export main functions
pub use domain::{extract_domain, url_key, SiteOrigin};
pub use normalize::normalize_link;
pub use target::{
    is_tagcloud, plan_target, rewrite_tagcloud, CrawlTarget, TargetKind,
};
