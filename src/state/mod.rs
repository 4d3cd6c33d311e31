//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedRegistry`: the set of URLs already claimed, owned by the controller
//! - `WorkerState` / `WorkerRecord`: per-worker lifecycle as the controller sees it
//! - `WorkerExit`: how a worker task ended

mod visited;
mod worker_state;

// Re-export main types
pub use visited::VisitedRegistry;
pub use worker_state::{WorkerExit, WorkerId, WorkerRecord, WorkerState};
