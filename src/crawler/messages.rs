//! Messages exchanged between the controller and its workers
//!
//! Workers and the controller share no memory; everything they know about
//! each other travels over these types.

use crate::state::{WorkerExit, WorkerId};

/// Sent to the controller, by workers and by the exit watchers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerMessage {
    /// A worker found `url` and asks whether it may crawl it
    Discovered { worker_id: WorkerId, url: String },

    /// A worker task has ended
    Exited { worker_id: WorkerId, exit: WorkerExit },
}

/// The controller's reply to one `Discovered` report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub ok_to_crawl: bool,
    pub url: String,
    /// Crawl counter value assigned on acceptance
    pub crawl_number: Option<u64>,
}

impl Authorization {
    pub fn granted(url: impl Into<String>, crawl_number: u64) -> Self {
        Self {
            ok_to_crawl: true,
            url: url.into(),
            crawl_number: Some(crawl_number),
        }
    }

    pub fn denied(url: impl Into<String>) -> Self {
        Self {
            ok_to_crawl: false,
            url: url.into(),
            crawl_number: None,
        }
    }
}
