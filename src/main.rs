//! Sumi-Fanout main entry point
//!
//! This is the command-line interface for the Sumi-Fanout link crawler.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use sumi_fanout::config::{
    apply_env_overrides, compute_config_hash, read_config_file, validate_config, Config,
};
use sumi_fanout::crawler::crawl;
use sumi_fanout::output::{print_summary, verify_output_log};
use tracing_subscriber::EnvFilter;

/// Sumi-Fanout: a fan-out link crawler
///
/// Fetches a seed page, hands its links to a pool of workers, and appends
/// every newly discovered URL exactly once to an output file. The seed, the
/// output path and log suppression can also be set through `SEED_LINK`,
/// `OUTPUT_FILE_PATH` and `DISABLE_LOGGING`.
#[derive(Parser, Debug)]
#[command(name = "sumi-fanout")]
#[command(version = "1.0.0")]
#[command(about = "A fan-out link crawler", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL (overrides SEED_LINK and the config file)
    #[arg(long, value_name = "URL")]
    seed: Option<String>,

    /// Output log path (overrides OUTPUT_FILE_PATH and the config file)
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Upper bound on the worker pool (defaults to available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only show progress lines and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Check the output log for duplicate lines and exit
    #[arg(long, conflicts_with = "dry_run")]
    verify: bool,

    /// Show the resolved configuration without crawling
    #[arg(long, conflicts_with = "verify")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // File, then environment, then flags; validated once all three are applied
    let mut config = match &cli.config {
        Some(path) => read_config_file(path).context("Failed to load configuration")?,
        None => Config::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    apply_cli_overrides(&mut config, &cli);
    validate_config(&config).context("Invalid configuration")?;

    setup_logging(cli.verbose, cli.quiet || config.logging.disabled);

    if let Some(path) = &cli.config {
        let hash = compute_config_hash(path)?;
        tracing::debug!("Configuration loaded from {} (hash: {})", path.display(), hash);
    }

    if cli.verify {
        handle_verify(Path::new(&config.output.file_path))
    } else if cli.dry_run {
        handle_dry_run(&config);
        Ok(())
    } else {
        handle_crawl(config).await
    }
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(seed) = &cli.seed {
        config.seed.link = seed.clone();
    }
    if let Some(output) = &cli.output {
        config.output.file_path = output.clone();
    }
    if cli.workers.is_some() {
        config.crawler.workers = cli.workers;
    }
}

/// Sets up the logging/tracing subscriber
///
/// Progress lines log at info and survive `quiet`; everything else is debug.
fn setup_logging(verbose: u8, quiet: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter(verbose, quiet)))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Filter directives for the requested verbosity; `quiet` wins over `verbose`
fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "sumi_fanout=info,error";
    }
    match verbose {
        0 => "sumi_fanout=debug,warn",
        1 => "sumi_fanout=trace,info",
        _ => "trace",
    }
}

/// Handles --verify: scans the output log for repeated lines
fn handle_verify(path: &Path) -> anyhow::Result<()> {
    let unique = verify_output_log(path)
        .with_context(|| format!("Verification of {} failed", path.display()))?;
    println!("Success! {} unique URLs in {}", unique, path.display());
    Ok(())
}

/// Handles --dry-run: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Fanout Dry Run ===\n");

    println!("Seed: {}", config.seed.link);
    println!("Output log: {}", config.output.file_path);
    println!("Worker pool bound: {}", config.crawler.pool_bound());
    println!(
        "Transient retries: {} ({}ms apart)",
        config.crawler.max_retries, config.crawler.retry_delay_ms
    );
    println!("Request timeout: {}s", config.crawler.request_timeout_secs);
    println!(
        "Excluded extensions: {}",
        config.extractor.excluded_extensions.join(", ")
    );
    println!("User agent: {}", config.user_agent.header_value());

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::debug!("Seed: {}", config.seed.link);
    tracing::debug!("Output log: {}", config.output.file_path);

    let summary = crawl(config).await.context("Crawl failed")?;

    print_summary(&summary);

    if !summary.is_durable() {
        bail!(
            "{} accepted URLs could not be written to the output log",
            summary.persist_failures
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_keeps_only_progress_and_errors() {
        assert_eq!(log_filter(0, true), "sumi_fanout=info,error");
        assert_eq!(log_filter(2, true), "sumi_fanout=info,error");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(log_filter(0, false), "sumi_fanout=debug,warn");
        assert_eq!(log_filter(1, false), "sumi_fanout=trace,info");
        assert_eq!(log_filter(3, false), "trace");
    }

    #[test]
    fn test_disable_logging_env_selects_quiet_filter() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| {
            (key == "DISABLE_LOGGING").then(|| "TRUE".to_string())
        });

        assert_eq!(
            log_filter(0, config.logging.disabled),
            "sumi_fanout=info,error"
        );
    }

    #[test]
    fn test_cli_overrides_env_values() {
        let cli = Cli::parse_from(["sumi-fanout", "--seed", "https://cli.example.com/", "-w", "2"]);
        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| {
            (key == "SEED_LINK").then(|| "https://env.example.com/".to_string())
        });
        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.seed.link, "https://cli.example.com/");
        assert_eq!(config.crawler.workers, Some(2));
    }
}
