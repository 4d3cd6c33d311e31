//! Crawl worker
//!
//! A worker starts from one URL, reports every link it finds to the
//! controller, and fetches only the links the controller authorizes. Reports
//! are fire-and-forget: the worker never waits for one reply before sending
//! the next report, so several authorized fetches can be in flight at once.
//!
//! A worker exits once it has no reports awaiting a reply and no fetch in
//! flight. If its starting URL yields no links it exits without sending
//! anything.

use crate::crawler::fetcher::PageSource;
use crate::crawler::messages::{Authorization, ControllerMessage};
use crate::state::{WorkerExit, WorkerId};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;

/// One isolated crawl unit
pub struct Worker {
    id: WorkerId,
    starting_url: String,
    source: Arc<dyn PageSource>,
    reports: UnboundedSender<ControllerMessage>,
    replies: UnboundedReceiver<Authorization>,
}

impl Worker {
    pub fn new(
        id: WorkerId,
        starting_url: impl Into<String>,
        source: Arc<dyn PageSource>,
        reports: UnboundedSender<ControllerMessage>,
        replies: UnboundedReceiver<Authorization>,
    ) -> Self {
        Self {
            id,
            starting_url: starting_url.into(),
            source,
            reports,
            replies,
        }
    }

    /// Runs the worker to completion and reports how it ended
    pub async fn run(mut self) -> WorkerExit {
        tracing::debug!(
            "worker {} fetching links to crawl from: {}",
            self.id,
            self.starting_url
        );

        let links = self.source.fetch_links(&self.starting_url).await;
        if links.is_empty() {
            tracing::debug!("worker {} received no links to crawl", self.id);
            return WorkerExit::Clean;
        }

        // Reports sent but not yet answered
        let mut pending: usize = 0;
        if let Err(exit) = self.report_all(links, &mut pending) {
            return exit;
        }

        let mut fetches: JoinSet<Vec<String>> = JoinSet::new();

        loop {
            if pending == 0 && fetches.is_empty() {
                return WorkerExit::Clean;
            }

            tokio::select! {
                reply = self.replies.recv(), if pending > 0 => {
                    let Some(authorization) = reply else {
                        return WorkerExit::Failed("controller closed the reply channel".to_string());
                    };
                    pending -= 1;
                    self.on_authorization(authorization, &mut fetches);
                }
                Some(joined) = fetches.join_next(), if !fetches.is_empty() => {
                    match joined {
                        Ok(links) => {
                            if let Err(exit) = self.report_all(links, &mut pending) {
                                return exit;
                            }
                        }
                        Err(e) => {
                            return WorkerExit::Crashed(format!("fetch task failed: {}", e));
                        }
                    }
                }
            }
        }
    }

    /// Starts a fetch for an authorized URL; denied URLs are dropped
    fn on_authorization(&self, authorization: Authorization, fetches: &mut JoinSet<Vec<String>>) {
        if !authorization.ok_to_crawl {
            tracing::trace!("worker {} denied {}", self.id, authorization.url);
            return;
        }

        if let Some(number) = authorization.crawl_number {
            tracing::info!("Crawl #{}: {}", number, authorization.url);
        }

        let source = Arc::clone(&self.source);
        let url = authorization.url;
        fetches.spawn(async move { source.fetch_links(&url).await });
    }

    /// Sends one report per link without waiting for replies
    fn report_all(&self, links: Vec<String>, pending: &mut usize) -> Result<(), WorkerExit> {
        for url in links {
            self.reports
                .send(ControllerMessage::Discovered {
                    worker_id: self.id,
                    url,
                })
                .map_err(|_| {
                    WorkerExit::Failed("controller closed the report channel".to_string())
                })?;
            *pending += 1;
        }
        Ok(())
    }
}
