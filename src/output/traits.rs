//! Output log trait and associated types
//!
//! This module defines the interface the controller appends accepted URLs
//! through, and the summary it produces when a run ends.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate entry on line {line}: {url}")]
    Duplicate { line: usize, url: String },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Append-only sink for accepted URLs
///
/// Each call to `append` is one discrete, acknowledged write of one line.
/// Implementations never rewrite or reorder earlier lines.
pub trait OutputLog: Send {
    /// Appends `url` followed by a newline
    fn append(&mut self, url: &str) -> OutputResult<()>;
}

/// Counters describing one crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub seed: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Links the seed page produced
    pub seed_links: usize,

    /// Workers spawned from the seed links
    pub workers_spawned: usize,

    /// Seed links beyond the pool that were recorded but never crawled
    pub initial_links_recorded: u64,

    /// Final value of the crawl counter
    pub accepted: u64,

    /// Discovery reports answered with an authorization
    pub authorized: u64,

    /// Discovery reports answered with a denial
    pub denied: u64,

    pub clean_exits: usize,
    pub failed_exits: usize,
    pub crashed_exits: usize,

    /// Accepted URLs that could not be written to the output log
    pub persist_failures: u64,
}

impl CrawlSummary {
    /// Creates an empty summary for a run starting now
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            started_at: Utc::now(),
            finished_at: None,
            seed_links: 0,
            workers_spawned: 0,
            initial_links_recorded: 0,
            accepted: 0,
            authorized: 0,
            denied: 0,
            clean_exits: 0,
            failed_exits: 0,
            crashed_exits: 0,
            persist_failures: 0,
        }
    }

    /// Wall-clock seconds between start and finish, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Share of discovery reports that were authorized, as a percentage
    pub fn authorization_rate(&self) -> f64 {
        let total = self.authorized + self.denied;
        if total == 0 {
            return 0.0;
        }
        (self.authorized as f64 / total as f64) * 100.0
    }

    /// Number of workers that have been observed exiting
    pub fn total_exits(&self) -> usize {
        self.clean_exits + self.failed_exits + self.crashed_exits
    }

    /// True when every accepted URL reached the output log
    pub fn is_durable(&self) -> bool {
        self.persist_failures == 0
    }
}
