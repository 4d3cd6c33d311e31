use serde::Deserialize;

/// Seed used when neither the config file nor `SEED_LINK` provides one
pub const DEFAULT_SEED_LINK: &str = "https://medium.com/tag/web-scraping";

/// Output log path used when neither the config file nor `OUTPUT_FILE_PATH` provides one
pub const DEFAULT_OUTPUT_FILE_PATH: &str = "./sites.txt";

/// Main configuration structure for Sumi-Fanout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Upper bound on the worker pool; `None` means available parallelism
    #[serde(default)]
    pub workers: Option<usize>,

    /// Retries for transient network failures, per fetch
    #[serde(default = "default_max_retries", rename = "max-retries")]
    pub max_retries: u32,

    /// Delay between transient-failure retries (milliseconds)
    #[serde(default = "default_retry_delay_ms", rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Total request timeout (seconds)
    #[serde(
        default = "default_request_timeout_secs",
        rename = "request-timeout-secs"
    )]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: None,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl CrawlerConfig {
    /// Resolves the worker pool bound against the machine's parallelism
    pub fn pool_bound(&self) -> usize {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.workers.unwrap_or(available).max(1)
    }
}

/// Seed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// The single starting URL
    #[serde(default = "default_seed_link")]
    pub link: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            link: default_seed_link(),
        }
    }
}

/// Output log configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the append-only output log
    #[serde(default = "default_output_file_path", rename = "file-path")]
    pub file_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_path: default_output_file_path(),
        }
    }
}

/// Link extractor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// Asset extensions (without the dot) whose links are never reported
    #[serde(
        default = "default_excluded_extensions",
        rename = "excluded-extensions"
    )]
    pub excluded_extensions: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            excluded_extensions: default_excluded_extensions(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Suppresses everything except progress lines
    #[serde(default)]
    pub disabled: bool,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(default = "default_crawler_name", rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(default = "default_crawler_version", rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(default, rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

fn default_max_retries() -> u32 {
    1
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_seed_link() -> String {
    DEFAULT_SEED_LINK.to_string()
}

fn default_output_file_path() -> String {
    DEFAULT_OUTPUT_FILE_PATH.to_string()
}

fn default_excluded_extensions() -> Vec<String> {
    ["js", "css", "jpg", "jpeg", "png", "svg", "gif", "mp4", "mp3"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_crawler_name() -> String {
    "SumiFanout".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.seed.link, DEFAULT_SEED_LINK);
        assert_eq!(config.output.file_path, "./sites.txt");
        assert!(!config.logging.disabled);
        assert_eq!(config.crawler.max_retries, 1);
        assert!(config
            .extractor
            .excluded_extensions
            .contains(&"css".to_string()));
    }

    #[test]
    fn test_pool_bound_uses_configured_workers() {
        let crawler = CrawlerConfig {
            workers: Some(3),
            ..CrawlerConfig::default()
        };
        assert_eq!(crawler.pool_bound(), 3);
    }

    #[test]
    fn test_pool_bound_may_exceed_parallelism() {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let crawler = CrawlerConfig {
            workers: Some(available + 4),
            ..CrawlerConfig::default()
        };
        assert_eq!(crawler.pool_bound(), available + 4);
    }

    #[test]
    fn test_pool_bound_never_zero() {
        let crawler = CrawlerConfig {
            workers: Some(0),
            ..CrawlerConfig::default()
        };
        assert_eq!(crawler.pool_bound(), 1);
        assert!(CrawlerConfig::default().pool_bound() >= 1);
    }

    #[test]
    fn test_user_agent_header_value() {
        let mut ua = UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: None,
        };
        assert_eq!(ua.header_value(), "TestCrawler/1.0");

        ua.contact_url = Some("https://example.com/about".to_string());
        assert_eq!(
            ua.header_value(),
            "TestCrawler/1.0 (+https://example.com/about)"
        );
    }
}
