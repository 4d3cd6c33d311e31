//! Crawl controller - seeds the pool and arbitrates every discovered link
//!
//! The coordinator is the only owner of the visited registry and the output
//! log. It runs on a single task and handles one message at a time, so a
//! check-and-insert on the registry can never interleave with another:
//! two workers reporting the same URL can never both be authorized.
//!
//! Lifecycle:
//! 1. Fetch the seed and extract its links
//! 2. Spawn one worker per link, up to the pool size; the remaining seed
//!    links are accepted and logged but never crawled
//! 3. Answer each `Discovered` report with an authorization or a denial
//! 4. Log each worker exit; nothing is respawned or redistributed
//! 5. Stop once every worker and exit watcher has dropped its sender

use crate::config::Config;
use crate::crawler::fetcher::{HttpFetcher, PageSource};
use crate::crawler::messages::{Authorization, ControllerMessage};
use crate::crawler::worker::Worker;
use crate::output::{CrawlSummary, FileOutputLog, OutputLog};
use crate::state::{VisitedRegistry, WorkerExit, WorkerId, WorkerRecord, WorkerState};
use crate::FanoutError;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// A live worker as the coordinator sees it
struct WorkerHandle {
    record: WorkerRecord,
    replies: UnboundedSender<Authorization>,
}

/// Main crawl controller
pub struct Coordinator {
    seed_url: String,
    pool_bound: usize,
    source: Arc<dyn PageSource>,
    output: Box<dyn OutputLog>,
    registry: VisitedRegistry,
    crawl_number: u64,
    workers: HashMap<WorkerId, WorkerHandle>,
    next_worker_id: WorkerId,
    summary: CrawlSummary,
    reports_tx: Option<UnboundedSender<ControllerMessage>>,
    reports_rx: UnboundedReceiver<ControllerMessage>,
}

impl Coordinator {
    /// Creates a coordinator over explicit collaborators
    ///
    /// # Arguments
    ///
    /// * `seed_url` - The single starting point
    /// * `pool_bound` - Maximum number of workers (at least one is used)
    /// * `source` - Where page links come from
    /// * `output` - Where accepted URLs are appended
    pub fn new(
        seed_url: impl Into<String>,
        pool_bound: usize,
        source: Arc<dyn PageSource>,
        output: Box<dyn OutputLog>,
    ) -> Self {
        let seed_url = seed_url.into();
        let (reports_tx, reports_rx) = mpsc::unbounded_channel();

        Self {
            summary: CrawlSummary::new(seed_url.clone()),
            seed_url,
            pool_bound: pool_bound.max(1),
            source,
            output,
            registry: VisitedRegistry::new(),
            crawl_number: 0,
            workers: HashMap::new(),
            next_worker_id: 1,
            reports_tx: Some(reports_tx),
            reports_rx,
        }
    }

    /// Creates a coordinator that fetches over HTTP and appends to the configured file
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Clients built and output log opened
    /// * `Err(FanoutError)` - Client construction or opening the log failed
    pub fn from_config(config: &Config) -> Result<Self, FanoutError> {
        let source = HttpFetcher::new(config)?;
        let output = FileOutputLog::open(&config.output.file_path)?;

        Ok(Self::new(
            config.seed.link.clone(),
            config.crawler.pool_bound(),
            Arc::new(source),
            Box::new(output),
        ))
    }

    /// Runs the crawl until every worker has exited
    pub async fn run(mut self) -> Result<CrawlSummary, FanoutError> {
        tracing::info!("Crawling...");

        self.seed().await?;

        // From here on only workers and exit watchers hold senders, so the
        // channel closes once the last of them is gone
        self.reports_tx = None;

        while let Some(message) = self.reports_rx.recv().await {
            self.handle_message(message);
        }

        self.summary.accepted = self.crawl_number;
        self.summary.finished_at = Some(Utc::now());

        tracing::info!(
            "Crawl completed: {} URLs accepted by {} workers",
            self.crawl_number,
            self.summary.workers_spawned
        );

        Ok(self.summary)
    }

    /// Fetches the seed and distributes its links
    ///
    /// The first links become worker starting points, up to
    /// `min(pool_bound, links.len())` workers. Every later link is accepted
    /// and persisted if unvisited, but never crawled. A link repeated in the
    /// seed page is claimed once; a repeat never gets a second worker.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of workers spawned
    /// * `Err(FanoutError::SeedUnavailable)` - The seed yielded no links
    pub async fn seed(&mut self) -> Result<usize, FanoutError> {
        let links = self.source.fetch_links(&self.seed_url).await;
        if links.is_empty() {
            return Err(FanoutError::SeedUnavailable {
                url: self.seed_url.clone(),
            });
        }

        let pool_size = self.pool_bound.min(links.len());
        self.summary.seed_links = links.len();
        tracing::debug!(
            "Seed {} yielded {} links, worker pool size {}",
            self.seed_url,
            links.len(),
            pool_size
        );

        for link in links {
            if self.summary.workers_spawned < pool_size {
                self.spawn_worker(link);
            } else {
                self.record_initial_link(link);
            }
        }

        Ok(self.summary.workers_spawned)
    }

    /// Claims `starting_url` and spawns a worker for it
    ///
    /// The URL is accepted and persisted before the worker exists, so no
    /// other worker can ever be authorized to crawl it. Returns None if the
    /// URL was already claimed.
    fn spawn_worker(&mut self, starting_url: String) -> Option<WorkerId> {
        let reports = self.reports_tx.clone()?;

        if self.accept(&starting_url).is_none() {
            tracing::debug!("Seed link {} already claimed, no worker spawned", starting_url);
            return None;
        }

        let id = self.next_worker_id;
        self.next_worker_id += 1;

        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let worker = Worker::new(
            id,
            starting_url.clone(),
            Arc::clone(&self.source),
            reports.clone(),
            reply_rx,
        );

        let handle = tokio::spawn(worker.run());
        tokio::spawn(watch_exit(id, handle, reports));

        tracing::debug!("spawning worker: {} ({})", id, starting_url);
        self.workers.insert(
            id,
            WorkerHandle {
                record: WorkerRecord::new(id, starting_url),
                replies: reply_tx,
            },
        );
        self.summary.workers_spawned += 1;

        Some(id)
    }

    /// Records a seed link beyond the pool size without crawling it
    fn record_initial_link(&mut self, link: String) {
        if self.accept(&link).is_some() {
            self.summary.initial_links_recorded += 1;
        }
    }

    fn handle_message(&mut self, message: ControllerMessage) {
        match message {
            ControllerMessage::Discovered { worker_id, url } => self.on_discover(worker_id, url),
            ControllerMessage::Exited { worker_id, exit } => self.on_worker_exit(worker_id, exit),
        }
    }

    /// Arbitrates one discovered link and replies to the reporting worker
    fn on_discover(&mut self, worker_id: WorkerId, url: String) {
        tracing::debug!("message from worker: {} {}", worker_id, url);

        if !self.workers.contains_key(&worker_id) {
            tracing::warn!("Ignoring report from unknown worker {}: {}", worker_id, url);
            return;
        }

        let decision = match self.accept(&url) {
            Some(number) => {
                self.summary.authorized += 1;
                Authorization::granted(url, number)
            }
            None => {
                self.summary.denied += 1;
                Authorization::denied(url)
            }
        };

        let Some(handle) = self.workers.get_mut(&worker_id) else {
            return;
        };

        if let Err(e) = handle.record.transition(WorkerState::Running) {
            tracing::warn!("worker {}: {}", worker_id, e);
        }
        handle.record.reported += 1;
        if decision.ok_to_crawl {
            handle.record.authorized += 1;
        }

        if handle.replies.send(decision).is_err() {
            tracing::debug!("worker {} is gone, reply dropped", worker_id);
        }
    }

    /// Logs how a worker ended and forgets it
    fn on_worker_exit(&mut self, worker_id: WorkerId, exit: WorkerExit) {
        match &exit {
            WorkerExit::Clean => {
                self.summary.clean_exits += 1;
                tracing::info!("worker #{} {}", worker_id, exit);
            }
            WorkerExit::Failed(_) => {
                self.summary.failed_exits += 1;
                tracing::warn!("worker #{} {}", worker_id, exit);
            }
            WorkerExit::Crashed(_) => {
                self.summary.crashed_exits += 1;
                tracing::warn!("worker #{} {}", worker_id, exit);
            }
        }

        if let Some(mut handle) = self.workers.remove(&worker_id) {
            if let Err(e) = handle.record.transition(WorkerState::Exited) {
                tracing::warn!("worker {}: {}", worker_id, e);
            }
            tracing::debug!(
                "worker {} from {} reported {} links, {} authorized",
                worker_id,
                handle.record.starting_url,
                handle.record.reported,
                handle.record.authorized
            );
        }
    }

    /// Claims `url`, bumps the crawl counter and persists it
    ///
    /// Returns the crawl number on first sight, None if already claimed.
    fn accept(&mut self, url: &str) -> Option<u64> {
        if !self.registry.try_accept(url) {
            return None;
        }
        self.crawl_number += 1;
        self.persist(url);
        Some(self.crawl_number)
    }

    /// Appends to the output log, retrying once
    ///
    /// A URL that still cannot be written stays claimed in the registry, so
    /// it is never handed out twice; the miss is counted in the summary.
    fn persist(&mut self, url: &str) {
        if let Err(first) = self.output.append(url) {
            tracing::warn!("Failed to append {} to output log ({}), retrying", url, first);
            if let Err(e) = self.output.append(url) {
                tracing::error!("Failed to persist {}: {}", url, e);
                self.summary.persist_failures += 1;
            }
        }
    }

    /// The visited registry
    pub fn registry(&self) -> &VisitedRegistry {
        &self.registry
    }

    /// Current crawl counter value
    pub fn crawl_number(&self) -> u64 {
        self.crawl_number
    }

    /// Workers that have not been observed exiting yet
    pub fn active_workers(&self) -> usize {
        self.workers.len()
    }

    /// Summary counters so far
    pub fn summary(&self) -> &CrawlSummary {
        &self.summary
    }
}

/// Waits for a worker task and reports its exit to the coordinator
async fn watch_exit(
    worker_id: WorkerId,
    handle: JoinHandle<WorkerExit>,
    reports: UnboundedSender<ControllerMessage>,
) {
    let exit = match handle.await {
        Ok(exit) => exit,
        Err(e) if e.is_panic() => WorkerExit::Crashed("worker panicked".to_string()),
        Err(e) => WorkerExit::Crashed(e.to_string()),
    };

    // The coordinator only drops its receiver after every sender is gone
    let _ = reports.send(ControllerMessage::Exited { worker_id, exit });
}

/// Runs the main crawl operation from configuration
///
/// # Example
///
/// ```no_run
/// use sumi_fanout::config::load_config;
/// use sumi_fanout::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(None)?;
/// let summary = run_crawl(config).await?;
/// println!("{} URLs accepted", summary.accepted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlSummary, FanoutError> {
    let coordinator = Coordinator::from_config(&config)?;
    coordinator.run().await
}
