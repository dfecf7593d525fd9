//! Crawler coordinator - main archive orchestration logic
//!
//! This module contains the driver of a run. It owns the worklist, the
//! processed/skipped/retained sets and the retry ledger, and is the only place
//! they are mutated. Fetches run as tasks on a bounded `JoinSet`; each task
//! hands its [`FetchOutcome`] back to the driver, which does the bookkeeping.
//!
//! A run moves through the phases of [`CrawlPhase`] in order:
//! 1. load the sitemap feed (a failure here aborts before any fetch)
//! 2. fetch the top page and seed the worklist with its links
//! 3. drain the worklist, following links recursively
//! 4. fetch sitemap entries the traversal did not reach, without following links
//! 5. write the output sitemap, the URL logs and the retry ledger

use crate::config::{ArchivePaths, Config};
use crate::crawler::fetcher::{build_feed_client, build_http_client, FetchOutcome, Fetcher};
use crate::crawler::rewriter::PageRewriter;
use crate::ledger::RetryLedger;
use crate::output::{write_url_log, write_url_log_if_any, CrawlReport};
use crate::sitemap::{build_output_entries, load_sitemap, write_output_sitemap, SitemapEntry};
use crate::state::{CrawlPhase, CrawlState};
use crate::url::{plan_target, CrawlTarget, SiteOrigin};
use crate::{ArchiveError, Result};
use chrono::{DateTime, FixedOffset, Local};
use reqwest::Client;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Completed items between two progress lines
const PROGRESS_INTERVAL: usize = 100;

/// Main archive coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    paths: ArchivePaths,
    origin: SiteOrigin,
    fetcher: Arc<Fetcher>,
    feed_client: Client,
    state: CrawlState,
    ledger: RetryLedger,
    phase: CrawlPhase,
    sitemap: Vec<SitemapEntry>,
    max_in_flight: usize,
    completed: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Builds the HTTP clients and rewrite rules and loads the retry ledger.
    /// No request is made here.
    pub fn new(config: Config) -> Result<Self> {
        let paths = ArchivePaths::from_config(&config);
        let origin = SiteOrigin::new(&config.site.top_page_url)?;

        let client = build_http_client(&config)?;
        let rewriter = PageRewriter::from_config(&config.rewrite)?;
        let fetcher = Fetcher::new(client, rewriter, origin.clone(), &config);
        let feed_client = build_feed_client(&config)?;

        let ledger = RetryLedger::load(&paths.retry_file)?;
        let max_in_flight = config.fetch.max_concurrent_fetches.max(1) as usize;

        Ok(Self {
            config: Arc::new(config),
            paths,
            origin,
            fetcher: Arc::new(fetcher),
            feed_client,
            state: CrawlState::new(),
            ledger,
            phase: CrawlPhase::SeedingTop,
            sitemap: Vec::new(),
            max_in_flight,
            completed: 0,
        })
    }

    pub fn paths(&self) -> &ArchivePaths {
        &self.paths
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn ledger(&self) -> &RetryLedger {
        &self.ledger
    }

    /// Runs every phase and reports the result
    ///
    /// Item-level failures end up in the retry ledger and the report; only the
    /// sitemap precondition and writing the run's output files return `Err`.
    pub async fn run(mut self) -> Result<CrawlReport> {
        let start_time = Instant::now();
        tracing::info!(
            "Archiving {} into {} ({} mode)",
            self.paths.top_page_url,
            self.paths.mirror_root.display(),
            if self.ledger.is_retry_mode() {
                "retry"
            } else {
                "full crawl"
            }
        );

        self.sitemap = load_sitemap(&self.feed_client, &self.paths.sitemap_url).await?;

        self.seed_top().await?;
        self.advance(CrawlPhase::DrainingWorklist)?;
        self.drain_worklist().await?;
        self.advance(CrawlPhase::ApplyingSitemap)?;
        self.apply_sitemap().await?;
        self.advance(CrawlPhase::BuildingOutput)?;
        let sitemap_entries = self.build_output()?;
        let ledger_status = self.ledger.persist()?;
        self.advance(CrawlPhase::Done)?;

        let report = CrawlReport {
            processed: self.state.processed().len(),
            skipped: self.state.skipped().len(),
            retained: self.state.retained().len(),
            sitemap_entries,
            failed: self.ledger.entries().iter().cloned().collect(),
            retry_mode: self.ledger.is_retry_mode(),
            ledger: ledger_status,
            log_file: self.paths.log_file.clone(),
            retry_file: self.ledger.path().to_path_buf(),
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Archive completed: {} processed, {} skipped, {} pending retry in {:?}",
            report.processed,
            report.skipped,
            report.failed.len(),
            report.elapsed
        );

        Ok(report)
    }

    fn advance(&mut self, to: CrawlPhase) -> Result<()> {
        if !self.phase.can_transition_to(to) {
            return Err(ArchiveError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        tracing::info!("Phase {} -> {}", self.phase, to);
        self.phase = to;
        Ok(())
    }

    /// Fetches the top page; in retry mode also queues every ledger URL
    async fn seed_top(&mut self) -> Result<()> {
        let retry_seeds = if self.ledger.is_retry_mode() {
            self.ledger_seeds()
        } else {
            Vec::new()
        };

        let top = VecDeque::from([self.origin.top_key().to_string()]);
        self.run_pool(Some(top)).await?;

        if !self.state.is_processed(self.origin.top_key()) {
            tracing::warn!("Top page was not archived; continuing with an empty seed set");
        }

        if !retry_seeds.is_empty() {
            let queued = self.state.enqueue_all(retry_seeds);
            tracing::info!("Queued {} URLs from the retry ledger", queued);
        }

        tracing::info!("Seeded worklist with {} URLs", self.state.pending_len());
        Ok(())
    }

    /// Brings ledger lines into the form a fetch records and returns them
    ///
    /// Lines that are not URLs of the site are dropped from the ledger, since
    /// no fetch could ever resolve them.
    fn ledger_seeds(&mut self) -> Vec<String> {
        let entries: Vec<String> = self.ledger.entries().iter().cloned().collect();
        let mut seeds = Vec::with_capacity(entries.len());

        for entry in entries {
            let planned = match self.origin.key_of(&entry) {
                Ok(key) => self.plan(&key),
                Err(e) => {
                    tracing::warn!("Dropping retry entry {}: {}", entry, e);
                    self.ledger.resolve(&entry);
                    continue;
                }
            };
            let Some(target) = planned else {
                tracing::warn!("Dropping retry entry outside the site: {}", entry);
                self.ledger.resolve(&entry);
                continue;
            };

            if target.url != entry {
                tracing::debug!("Retry entry {} recorded as {}", entry, target.url);
                self.ledger.resolve(&entry);
                self.ledger.record(&target.url);
            }
            seeds.push(target.url);
        }

        seeds
    }

    async fn drain_worklist(&mut self) -> Result<()> {
        self.run_pool(None).await
    }

    /// Fetches sitemap entries not yet processed, without following their links
    async fn apply_sitemap(&mut self) -> Result<()> {
        self.state.reset_attempts();

        let mut queue = VecDeque::new();
        for entry in &self.sitemap {
            let Some(key) = self.sitemap_key(&entry.location) else {
                continue;
            };
            if !self.state.is_processed(&key) {
                queue.push_back(key);
            }
        }

        tracing::info!("Applying {} sitemap entries", queue.len());
        self.run_pool(Some(queue)).await
    }

    fn sitemap_key(&self, location: &str) -> Option<String> {
        match self.origin.key_of(location) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::warn!("Ignoring sitemap entry {}: {}", location, e);
                None
            }
        }
    }

    fn plan(&self, key: &str) -> Option<CrawlTarget> {
        plan_target(
            key,
            &self.origin,
            &self.paths.mirror_root,
            &self.config.site.index_file_name,
        )
    }

    /// Dispatches keys to at most `max_in_flight` fetch tasks until none remain
    ///
    /// Keys come from `queue` when given, otherwise from the worklist, which
    /// keeps growing while outcomes of a recursive phase report new links.
    async fn run_pool(&mut self, mut queue: Option<VecDeque<String>>) -> Result<()> {
        let recursive = self.phase.is_recursive();
        let mut tasks: JoinSet<(CrawlTarget, FetchOutcome)> = JoinSet::new();

        loop {
            while tasks.len() < self.max_in_flight {
                let next = match queue.as_mut() {
                    Some(queue) => queue.pop_front(),
                    None => self.state.next_pending(),
                };
                let Some(key) = next else {
                    break;
                };

                if let Some(target) = self.prepare(&key) {
                    let fetcher = Arc::clone(&self.fetcher);
                    tasks.spawn(async move {
                        let outcome = fetcher.fetch(&target, recursive).await;
                        (target, outcome)
                    });
                }
            }

            match tasks.join_next().await {
                Some(Ok((target, outcome))) => self.apply_outcome(&target, outcome),
                Some(Err(e)) => {
                    return Err(ArchiveError::Io(std::io::Error::other(format!(
                        "fetch task failed: {}",
                        e
                    ))))
                }
                None => break,
            }
        }

        Ok(())
    }

    /// Plans a key and claims it for dispatch
    ///
    /// Returns `None` when there is nothing to fetch: the key is off-site,
    /// already claimed or processed, or gated by retry mode.
    fn prepare(&mut self, key: &str) -> Option<CrawlTarget> {
        let Some(target) = self.plan(key) else {
            tracing::debug!("Not planning off-site key {}", key);
            return None;
        };

        if let Some(original) = &target.skipped_original {
            tracing::debug!("Dropped query from {}", original);
            self.state.mark_skipped(original);
        }

        if !self.state.begin(&target.url) {
            return None;
        }

        if !self.ledger.permits(&target.url) {
            self.apply_outcome(&target, FetchOutcome::Gated);
            return None;
        }

        Some(target)
    }

    fn apply_outcome(&mut self, target: &CrawlTarget, outcome: FetchOutcome) {
        self.state.finish(&target.url);

        match outcome {
            FetchOutcome::Saved { links, .. } => {
                self.ledger.resolve(&target.url);
                self.state.mark_processed(&target.url);
                if self.phase.is_recursive() {
                    let added = self.state.enqueue_all(links);
                    tracing::debug!("{} new links from {}", added, target.url);
                }
            }
            FetchOutcome::Redirected { location, .. } => {
                // A redirect is not retried, so it leaves the ledger too
                self.ledger.resolve(&target.url);
                self.state.mark_skipped(&target.url);
                if let Some(location) = location {
                    tracing::debug!("{} redirects to {}", target.url, location);
                }
            }
            FetchOutcome::Gated => {
                tracing::debug!("{} not in retry ledger; skipping", target.url);
                self.state.mark_retained(&target.url);
            }
            FetchOutcome::Failed { attempts, error } => {
                tracing::warn!(
                    "Giving up on {} after {} attempts: {}",
                    target.url,
                    attempts,
                    error
                );
                self.ledger.record(&target.url);
            }
        }

        self.completed += 1;
        if self.completed % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {} items done, {} pending, {} in flight ({})",
                self.completed,
                self.state.pending_len(),
                self.state.in_flight_len(),
                self.phase
            );
        }
    }

    /// Writes the output sitemap and the URL logs, returning the sitemap size
    fn build_output(&mut self) -> Result<usize> {
        let now: DateTime<FixedOffset> = Local::now().into();
        let published = self.state.published();
        let entries = build_output_entries(&published, self.origin.top_key(), &self.sitemap, now);
        write_output_sitemap(&self.paths.sitemap_file, &entries)?;

        let mut processed: BTreeSet<String> = self.state.processed().clone();
        processed.insert(self.paths.sitemap_url.clone());
        write_url_log(&self.paths.processed_file, &processed)?;
        write_url_log_if_any(&self.paths.skipped_file, self.state.skipped())?;

        Ok(entries.len())
    }
}

/// Runs a complete archive operation
///
/// This is the main entry point for archiving a site. It will:
/// 1. Build the HTTP client and load the retry ledger
/// 2. Load the sitemap feed
/// 3. Fetch the top page, the pages it reaches, and the sitemap entries
/// 4. Write the output sitemap, URL logs and retry ledger
pub async fn run_archive(config: Config) -> Result<CrawlReport> {
    Coordinator::new(config)?.run().await
}
