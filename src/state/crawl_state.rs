use std::collections::{BTreeSet, HashSet};

/// The URL sets owned by the crawl driver for one run
///
/// Only the driver mutates this; fetch tasks report back and never touch it.
/// Keys in `pending` are normalized link keys. The other sets hold the URL
/// actually fetched, which differs from the key when a query was dropped.
#[derive(Debug, Default)]
pub struct CrawlState {
    /// Discovered but not yet dispatched
    pending: BTreeSet<String>,

    /// Fetched and saved
    processed: BTreeSet<String>,

    /// Redirected away, or the pre-truncation form of a query URL
    skipped: BTreeSet<String>,

    /// Gated in retry mode; kept in the output sitemap without being fetched
    retained: BTreeSet<String>,

    /// Dispatched and not yet reported back
    in_flight: HashSet<String>,

    /// Dispatched at least once in the current phase
    attempted: HashSet<String>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a discovered key to the worklist
    ///
    /// Returns false if the key was already pending, processed or attempted.
    pub fn enqueue(&mut self, key: String) -> bool {
        if self.processed.contains(&key) || self.attempted.contains(&key) {
            return false;
        }
        self.pending.insert(key)
    }

    /// Adds every key, returning how many were new
    pub fn enqueue_all<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        keys.into_iter().filter(|key| self.enqueue(key.clone())).count()
    }

    /// Removes and returns the next worklist key
    pub fn next_pending(&mut self) -> Option<String> {
        self.pending.pop_first()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Claims `url` for a fetch
    ///
    /// Returns false when it is already processed, in flight, or was already
    /// attempted in this phase, so the same URL is never dispatched twice.
    pub fn begin(&mut self, url: &str) -> bool {
        if self.processed.contains(url) || self.attempted.contains(url) {
            return false;
        }
        self.attempted.insert(url.to_string());
        self.in_flight.insert(url.to_string());
        true
    }

    /// Releases the in-flight claim on `url`
    pub fn finish(&mut self, url: &str) {
        self.in_flight.remove(url);
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    /// Forgets attempts so the next phase may try failed URLs again
    ///
    /// Processed URLs stay processed.
    pub fn reset_attempts(&mut self) {
        self.attempted.clear();
    }

    pub fn mark_processed(&mut self, url: &str) {
        self.skipped.remove(url);
        self.retained.remove(url);
        self.processed.insert(url.to_string());
    }

    /// Records a skipped URL unless it was processed
    pub fn mark_skipped(&mut self, url: &str) {
        if !self.processed.contains(url) {
            self.skipped.insert(url.to_string());
        }
    }

    /// Records a URL gated in retry mode unless it was processed
    pub fn mark_retained(&mut self, url: &str) {
        if !self.processed.contains(url) {
            self.retained.insert(url.to_string());
        }
    }

    pub fn is_processed(&self, url: &str) -> bool {
        self.processed.contains(url)
    }

    pub fn processed(&self) -> &BTreeSet<String> {
        &self.processed
    }

    pub fn skipped(&self) -> &BTreeSet<String> {
        &self.skipped
    }

    pub fn retained(&self) -> &BTreeSet<String> {
        &self.retained
    }

    /// Every URL the output sitemap lists: processed plus retained
    pub fn published(&self) -> BTreeSet<String> {
        self.processed.union(&self.retained).cloned().collect()
    }
}
