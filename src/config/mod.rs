//! Configuration module for Site-Archiver
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and derives the set of paths a run reads and writes.
//!
//! # Example
//!
//! ```no_run
//! use site_archiver::config::{load_config, ArchivePaths};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("archive.toml")).unwrap();
//! let paths = ArchivePaths::from_config(&config);
//! println!("Retry ledger lives at {}", paths.retry_file.display());
//! ```

mod parser;
mod paths;
mod types;
mod validation;

pub use types::{Config, FetchConfig, OutputConfig, RewriteConfig, SiteConfig, UserAgentConfig};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use paths::{join_url_path, ArchivePaths};
