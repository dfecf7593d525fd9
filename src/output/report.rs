//! End-of-run report
//!
//! This module turns the outcome of a run into the figures, summary line and
//! exit status the binary presents.

use crate::ledger::LedgerStatus;
use std::path::PathBuf;
use std::time::Duration;

/// Exit status when every download succeeded
pub const EXIT_COMPLETE: u8 = 0;

/// Exit status for a fatal precondition failure
pub const EXIT_FATAL: u8 = 1;

/// Exit status when the run finished but left URLs in the retry ledger
pub const EXIT_FAILURES_RECORDED: u8 = 2;

/// Summary of a finished archive run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// URLs fetched and saved (excluding the regenerated sitemap)
    pub processed: usize,

    /// Redirected or query-stripped URLs
    pub skipped: usize,

    /// URLs gated in retry mode but still published in the output sitemap
    pub retained: usize,

    /// Entries written to the output sitemap
    pub sitemap_entries: usize,

    /// URLs left in the retry ledger, sorted
    pub failed: Vec<String>,

    /// Whether the run started in retry mode
    pub retry_mode: bool,

    /// What the ledger file looks like after the run
    pub ledger: LedgerStatus,

    /// Run log
    pub log_file: PathBuf,

    /// Retry ledger
    pub retry_file: PathBuf,

    /// Wall-clock duration
    pub elapsed: Duration,
}

impl CrawlReport {
    /// True when no URL remains in the retry ledger
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_complete() {
            EXIT_COMPLETE
        } else {
            EXIT_FAILURES_RECORDED
        }
    }

    /// The one-line console verdict
    pub fn summary_line(&self) -> String {
        if self.is_complete() {
            format!(
                "All downloads succeeded. See the log file {} for details.",
                self.log_file.display()
            )
        } else {
            format!(
                "Some downloads failed; {} URLs were written to the retry file {}. See the log file {} for details.",
                self.failed.len(),
                self.retry_file.display(),
                self.log_file.display()
            )
        }
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Archive Run ===\n");

    println!("Overview:");
    println!(
        "  Mode: {}",
        if report.retry_mode { "retry" } else { "full crawl" }
    );
    println!("  Processed: {}", report.processed);
    println!("  Skipped: {}", report.skipped);
    if report.retained > 0 {
        println!("  Retained without fetching: {}", report.retained);
    }
    println!("  Sitemap entries: {}", report.sitemap_entries);
    println!("  Elapsed: {:.1}s", report.elapsed.as_secs_f64());
    println!();

    if !report.failed.is_empty() {
        println!("Pending Retries ({}):", report.failed.len());
        for url in report.failed.iter().take(20) {
            println!("  - {}", url);
        }
        if report.failed.len() > 20 {
            println!("  ... and {} more", report.failed.len() - 20);
        }
        println!();
    }

    println!("{}", report.summary_line());
}
