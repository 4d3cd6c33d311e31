//! Human-readable crawl summary output

use crate::output::traits::CrawlSummary;

/// Prints the run summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Run:");
    println!("  Seed: {}", summary.seed);
    println!("  Started: {}", summary.started_at.to_rfc3339());
    if let Some(finished) = summary.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = summary.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    println!("Fan-out:");
    println!("  Seed links: {}", summary.seed_links);
    println!("  Workers spawned: {}", summary.workers_spawned);
    println!(
        "  Initial links recorded, not crawled: {}",
        summary.initial_links_recorded
    );
    println!();

    println!("Arbitration:");
    println!("  URLs accepted: {}", summary.accepted);
    println!("  Reports authorized: {}", summary.authorized);
    println!("  Reports denied: {}", summary.denied);
    println!(
        "  Authorization rate: {:.1}%",
        summary.authorization_rate()
    );
    println!();

    println!("Workers:");
    println!("  Clean exits: {}", summary.clean_exits);
    if summary.failed_exits > 0 {
        println!("  Failed exits: {}", summary.failed_exits);
    }
    if summary.crashed_exits > 0 {
        println!("  Crashed: {}", summary.crashed_exits);
    }

    if !summary.is_durable() {
        println!();
        println!(
            "WARNING: {} accepted URLs are missing from the output log",
            summary.persist_failures
        );
    }
}
