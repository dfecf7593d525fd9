//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: where the driver is in a run (seeding, draining, sitemap pass, output)
//! - `CrawlState`: the worklist plus the processed, skipped and retained URL sets

mod crawl_state;
mod phase;

// Re-export main types
pub use crawl_state::CrawlState;
pub use phase::CrawlPhase;
