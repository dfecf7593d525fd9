//! Output module for the run's bookkeeping files and final report
//!
//! This module handles:
//! - Writing the processed and skipped URL logs
//! - Summarising a run for the console and the process exit status

pub mod report;
mod url_log;

pub use report::{print_report, CrawlReport, EXIT_COMPLETE, EXIT_FAILURES_RECORDED, EXIT_FATAL};
pub use url_log::{write_url_log, write_url_log_if_any};
