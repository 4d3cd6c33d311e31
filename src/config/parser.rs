use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable naming the output log path
pub const ENV_OUTPUT_FILE_PATH: &str = "OUTPUT_FILE_PATH";

/// Environment variable naming the seed URL
pub const ENV_SEED_LINK: &str = "SEED_LINK";

/// Environment variable that silences non-progress log lines when `true`
pub const ENV_DISABLE_LOGGING: &str = "DISABLE_LOGGING";

/// Loads the configuration, applies environment overrides and validates it
///
/// Without a path every field takes its default value, so the crawler can run
/// from environment variables alone.
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_fanout::config::load_config;
///
/// let config = load_config(Some(Path::new("fanout.toml"))).unwrap();
/// println!("Seed: {}", config.seed.link);
/// ```
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate(&config)?;

    Ok(config)
}

/// Reads and parses a TOML configuration file without validating it
pub fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Applies `SEED_LINK`, `OUTPUT_FILE_PATH` and `DISABLE_LOGGING` on top of `config`
///
/// `lookup` resolves a variable name to its value; the binary passes
/// `std::env::var`, tests pass a map.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(link) = lookup(ENV_SEED_LINK).filter(|v| !v.is_empty()) {
        config.seed.link = link;
    }

    if let Some(path) = lookup(ENV_OUTPUT_FILE_PATH).filter(|v| !v.is_empty()) {
        config.output.file_path = path;
    }

    if let Some(flag) = lookup(ENV_DISABLE_LOGGING) {
        config.logging.disabled = flag.trim().eq_ignore_ascii_case("true");
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so separate runs can be matched to the file they used.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}
