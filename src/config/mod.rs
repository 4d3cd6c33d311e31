//! Configuration module for Sumi-Fanout
//!
//! This module handles loading, parsing, and validating the crawler
//! configuration. Values come from an optional TOML file, then from the
//! `SEED_LINK`, `OUTPUT_FILE_PATH` and `DISABLE_LOGGING` environment variables.
//!
//! # Example
//!
//! ```no_run
//! use sumi_fanout::config::load_config;
//!
//! let config = load_config(None).unwrap();
//! println!("Appending accepted links to: {}", config.output.file_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractorConfig, LoggingConfig, OutputConfig, SeedConfig,
    UserAgentConfig, DEFAULT_OUTPUT_FILE_PATH, DEFAULT_SEED_LINK,
};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, read_config_file, ENV_DISABLE_LOGGING,
    ENV_OUTPUT_FILE_PATH, ENV_SEED_LINK,
};
pub use validation::validate as validate_config;
