//! Configuration module for the indexer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: `Config::default()` indexes the public
//! cppreference site exactly as the tool always has.
//!
//! # Example
//!
//! ```no_run
//! use cppref_indexer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("indexer.toml")).unwrap();
//! println!("Indexing from: {}", config.index.root_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DuplicatePolicy, FetcherConfig, IndexConfig, IndexMode, OutputConfig, SiteConfig,
    UnreachablePolicy,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
