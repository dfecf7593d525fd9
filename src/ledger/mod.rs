//! Retry ledger: the durable set of URLs that failed in a previous run
//!
//! The ledger file's existence at startup is what switches a run into retry
//! mode, so it is never left behind empty: [`RetryLedger::persist`] deletes it
//! when nothing is pending and otherwise writes one URL per line, sorted.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading or writing the ledger file
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Failed to read retry ledger {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write retry ledger {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to remove retry ledger {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What [`RetryLedger::persist`] left on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerStatus {
    /// No failures remain; the file does not exist
    Cleared,
    /// The file holds this many URLs
    Pending(usize),
}

/// In-memory view of the ledger for one run
#[derive(Debug, Clone)]
pub struct RetryLedger {
    path: PathBuf,
    entries: BTreeSet<String>,
    retry_mode: bool,
}

impl RetryLedger {
    /// Loads the ledger at `path`
    ///
    /// A present file puts the run in retry mode, even when it holds no URLs.
    /// A missing file yields an empty ledger in full-crawl mode; the file is
    /// not created until [`persist`](Self::persist) has something to write.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();

        let (entries, retry_mode) = match fs::read_to_string(&path) {
            Ok(text) => {
                let entries: BTreeSet<String> = text
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect();
                (entries, true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (BTreeSet::new(), false),
            Err(source) => return Err(LedgerError::Read { path, source }),
        };

        if retry_mode {
            tracing::info!(
                "Retry ledger {} found with {} URLs; running in retry mode",
                path.display(),
                entries.len()
            );
        }

        Ok(Self {
            path,
            entries,
            retry_mode,
        })
    }

    /// Deletes the ledger file if present, forcing the next load into full-crawl mode
    pub fn clear_file(path: &Path) -> Result<bool, LedgerError> {
        match fs::remove_file(path) {
            Ok(()) => {
                tracing::info!("Removed retry ledger {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(LedgerError::Remove {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// True when the ledger file existed at load time
    pub fn is_retry_mode(&self) -> bool {
        self.retry_mode
    }

    /// Whether `url` may be attempted in this run
    ///
    /// Always true in full-crawl mode; in retry mode only ledger URLs pass.
    pub fn permits(&self, url: &str) -> bool {
        !self.retry_mode || self.entries.contains(url)
    }

    /// Marks `url` as failed
    pub fn record(&mut self, url: &str) {
        if self.entries.insert(url.to_string()) {
            tracing::debug!("Added {} to retry ledger", url);
        }
    }

    /// Marks `url` as fetched successfully
    pub fn resolve(&mut self, url: &str) {
        if self.entries.remove(url) {
            tracing::debug!("Removed {} from retry ledger", url);
        }
    }

    pub fn entries(&self) -> &BTreeSet<String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the ledger at run end, or deletes it when empty
    pub fn persist(&self) -> Result<LedgerStatus, LedgerError> {
        if self.entries.is_empty() {
            Self::clear_file(&self.path)?;
            return Ok(LedgerStatus::Cleared);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| LedgerError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let mut text = String::new();
        for url in &self.entries {
            text.push_str(url);
            text.push('\n');
        }
        fs::write(&self.path, text).map_err(|source| LedgerError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::warn!(
            "{} URLs remain in retry ledger {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(LedgerStatus::Pending(self.entries.len()))
    }
}
