//! Output module for the append-only link log
//!
//! This module handles:
//! - Appending accepted URLs to the output log
//! - Verifying that a log holds no duplicate lines
//! - Reporting crawl summaries

mod file_log;
pub mod stats;
mod traits;
mod verify;

pub use file_log::{FileOutputLog, MemoryOutputLog};
pub use stats::print_summary;
pub use traits::{CrawlSummary, OutputError, OutputLog, OutputResult};
pub use verify::verify_output_log;
