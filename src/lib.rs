//! cppref-indexer: a polite documentation symbol indexer
//!
//! This crate crawls the cppreference symbol index, follows namespace and
//! container pages, and produces a flat, sorted table mapping qualified symbol
//! names to their documentation links.

pub mod config;
pub mod crawler;
pub mod output;
pub mod symbols;

use thiserror::Error;

/// Main error type for indexer operations
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Couldn't reach {url} after {attempts} tries: {last_error}")]
    Unreachable {
        url: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for indexer operations
pub type Result<T> = std::result::Result<T, IndexerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_index, IndexRun};
pub use symbols::{finalize, TokenKind, TokenLink};
