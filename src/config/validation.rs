use crate::config::types::{
    Config, CrawlerConfig, ExtractorConfig, OutputConfig, SeedConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_seed_config(&config.seed)?;
    validate_output_config(&config.output)?;
    validate_extractor_config(&config.extractor)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if let Some(workers) = config.workers {
        if workers < 1 || workers > MAX_WORKERS {
            return Err(ConfigError::Validation(format!(
                "workers must be between 1 and {}, got {}",
                MAX_WORKERS, workers
            )));
        }
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the seed link: it must be an absolute http(s) URL
fn validate_seed_config(config: &SeedConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.link).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid seed link '{}': {}", config.link, e))
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "Seed link '{}' must use http or https",
            config.link
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.file_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output file_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the excluded extension list
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    if config.excluded_extensions.is_empty() {
        return Err(ConfigError::Validation(
            "excluded_extensions cannot be empty".to_string(),
        ));
    }

    for ext in &config.excluded_extensions {
        if ext.is_empty() || ext.contains('.') || !ext.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ConfigError::Validation(format!(
                "Excluded extension '{}' must be alphanumeric without a leading dot",
                ext
            )));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_seed_link() {
        let mut seed = SeedConfig {
            link: "http://example.com/".to_string(),
        };
        assert!(validate_seed_config(&seed).is_ok());

        seed.link = "example.com/page".to_string();
        assert!(matches!(
            validate_seed_config(&seed),
            Err(ConfigError::InvalidUrl(_))
        ));

        seed.link = "ftp://example.com/file".to_string();
        assert!(matches!(
            validate_seed_config(&seed),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_workers_range() {
        let mut crawler = CrawlerConfig::default();
        crawler.workers = Some(0);
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.workers = Some(MAX_WORKERS + 1);
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.workers = Some(8);
        assert!(validate_crawler_config(&crawler).is_ok());
    }

    #[test]
    fn test_validate_extensions() {
        let mut extractor = ExtractorConfig::default();
        assert!(validate_extractor_config(&extractor).is_ok());

        extractor.excluded_extensions = vec![".css".to_string()];
        assert!(validate_extractor_config(&extractor).is_err());

        extractor.excluded_extensions = vec![];
        assert!(validate_extractor_config(&extractor).is_err());
    }

    #[test]
    fn test_validate_output_path() {
        let output = OutputConfig {
            file_path: "   ".to_string(),
        };
        assert!(validate_output_config(&output).is_err());
    }

    #[test]
    fn test_validate_crawler_name() {
        let mut ua = UserAgentConfig::default();
        ua.crawler_name = "bad name!".to_string();
        assert!(validate_user_agent_config(&ua).is_err());

        ua.crawler_name = "good-name".to_string();
        ua.contact_url = Some("not a url".to_string());
        assert!(validate_user_agent_config(&ua).is_err());
    }
}
