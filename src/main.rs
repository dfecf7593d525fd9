//! Site-Archiver main entry point
//!
//! This is the command-line interface for mirroring a site into a local tree.

use anyhow::Context;
use clap::Parser;
use site_archiver::config::{load_config_with_hash, ArchivePaths, Config};
use site_archiver::crawler::run_archive;
use site_archiver::ledger::RetryLedger;
use site_archiver::mirror::scan_mirror;
use site_archiver::output::{print_report, EXIT_COMPLETE, EXIT_FAILURES_RECORDED, EXIT_FATAL};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Site-Archiver: mirrors a CMS-driven site for static hosting
///
/// Site-Archiver crawls a single site from its top page and sitemap feed,
/// rewrites a few fixed HTML fragments, and writes every object next to a
/// `.metadata` sidecar declaring its content type. Failed downloads are kept
/// in a retry file; running again while it exists retries only those URLs.
#[derive(Parser, Debug)]
#[command(name = "site-archiver")]
#[command(version)]
#[command(about = "Mirrors a CMS-driven site into a local directory tree", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Delete the retry file first, forcing a full crawl
    #[arg(long, conflicts_with_all = ["dry_run", "verify_mirror"])]
    fresh: bool,

    /// Validate config and show the derived paths without fetching anything
    #[arg(long, conflicts_with = "verify_mirror")]
    dry_run: bool,

    /// Check that every mirrored object has a usable metadata sidecar and exit
    #[arg(long, conflicts_with = "dry_run")]
    verify_mirror: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    let paths = ArchivePaths::from_config(&config);

    if cli.dry_run {
        setup_logging(cli.verbose, cli.quiet, None);
        handle_dry_run(&config, &paths, &config_hash);
        return Ok(EXIT_COMPLETE);
    }

    if cli.verify_mirror {
        setup_logging(cli.verbose, cli.quiet, None);
        return handle_verify_mirror(&paths);
    }

    let log_file = open_log_file(&paths.log_file)?;
    setup_logging(cli.verbose, cli.quiet, Some(log_file));
    tracing::info!(
        "Configuration {} loaded (hash: {})",
        cli.config.display(),
        config_hash
    );

    if cli.fresh {
        RetryLedger::clear_file(&paths.retry_file)
            .context("failed to remove the retry file for a fresh run")?;
        tracing::info!("Starting fresh crawl (retry file ignored)");
    }

    let report = run_archive(config).await.context("archive run failed")?;

    if !cli.quiet {
        print_report(&report);
    } else {
        println!("{}", report.summary_line());
    }

    Ok(report.exit_code())
}

/// Sets up the logging/tracing subscriber
///
/// The console follows the verbosity flags. The run log, when given, always
/// records `info` and above without colour codes.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<File>) {
    let console_filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_archiver=info,warn"),
            1 => EnvFilter::new("site_archiver=debug,info"),
            2 => EnvFilter::new("site_archiver=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let console = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_filter(console_filter);

    let file = log_file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
            .with_filter(EnvFilter::new("site_archiver=info,warn"))
    });

    tracing_subscriber::registry().with(console).with(file).init();
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Handles the --dry-run mode: validates config and shows what a run would touch
fn handle_dry_run(config: &Config, paths: &ArchivePaths, config_hash: &str) {
    println!("=== Site-Archiver Dry Run ===\n");

    println!("Site:");
    println!("  Top page: {}", paths.top_page_url);
    println!("  Sitemap feed: {}", paths.sitemap_url);
    println!("  Index file name: {}", config.site.index_file_name);

    println!("\nFetch:");
    println!("  Retry count: {}", config.fetch.retry_count);
    println!("  Retry backoff: {}ms", config.fetch.retry_backoff_ms);
    println!("  Request timeout: {}s", config.fetch.request_timeout_secs);
    println!("  Concurrent fetches: {}", config.fetch.max_concurrent_fetches);
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Mirror root: {}", paths.mirror_root.display());
    println!("  Output sitemap: {}", paths.sitemap_file.display());
    println!("  Run log: {}", paths.log_file.display());
    println!("  Processed log: {}", paths.processed_file.display());
    println!("  Skipped log: {}", paths.skipped_file.display());
    println!("  Retry file: {}", paths.retry_file.display());

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
    if paths.retry_file.exists() {
        println!("✓ Retry file present: the next run retries only the URLs it lists");
    } else {
        println!("✓ No retry file: the next run is a full crawl");
    }
}

/// Handles the --verify-mirror mode: checks the sidecar contract of the mirror
fn handle_verify_mirror(paths: &ArchivePaths) -> anyhow::Result<u8> {
    let manifest = scan_mirror(&paths.mirror_root)
        .with_context(|| format!("failed to scan {}", paths.mirror_root.display()))?;

    let uploadable = manifest.uploadable().count();
    let missing: Vec<_> = manifest.missing_metadata().collect();

    println!("=== Mirror Check ===\n");
    println!("  Root: {}", paths.mirror_root.display());
    println!("  Objects: {}", manifest.objects.len());
    println!("  With Content-Type: {}", uploadable);

    if missing.is_empty() {
        println!("\n✓ Every object has a metadata sidecar");
        return Ok(EXIT_COMPLETE);
    }

    println!("\nMissing Content-Type ({}):", missing.len());
    for object in &missing {
        println!("  - {}", object.key);
    }
    Ok(EXIT_FAILURES_RECORDED)
}
