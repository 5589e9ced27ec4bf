use crate::config::types::{Config, FetcherConfig, IndexConfig, OutputConfig, SiteConfig};
use crate::symbols::is_valid_token_name;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_index_config(&config.index)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the documentation site URLs
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_https_url("site.root", &config.root)?;
    validate_https_url("site.link-prefix", &config.link_prefix)?;
    Ok(())
}

/// Validates the traversal root
fn validate_index_config(config: &IndexConfig) -> Result<(), ConfigError> {
    validate_https_url("index.root-url", &config.root_url)?;

    if config.namespace.is_empty() {
        return Err(ConfigError::Validation(
            "index.namespace cannot be empty".to_string(),
        ));
    }

    if !is_valid_token_name(&config.namespace) {
        return Err(ConfigError::Validation(format!(
            "index.namespace '{}' contains characters that cannot appear in a symbol name",
            config.namespace
        )));
    }

    Ok(())
}

/// Validates fetcher limits
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.min_request_interval < 100 {
        return Err(ConfigError::Validation(format!(
            "min-request-interval must be >= 100ms, got {}ms",
            config.min_request_interval
        )));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1s, got {}s",
            config.timeout
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_path.is_empty() {
        return Err(ConfigError::Validation(
            "data-path cannot be empty".to_string(),
        ));
    }

    if config.log_path.is_empty() {
        return Err(ConfigError::Validation(
            "log-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_https_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use HTTPS scheme",
            field, value
        )));
    }

    Ok(())
}
