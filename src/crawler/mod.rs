//! Crawler module for fetching and indexing documentation pages
//!
//! This module contains the core indexing logic, including:
//! - HTTP fetching with pacing, retries and a page cache
//! - Anchor extraction and token classification
//! - Traversal of namespace and container pages

mod extractor;
mod fetcher;
mod indexer;
mod pacer;

pub use extractor::{Extractor, LineScan, Marker};
pub use fetcher::{build_http_client, FetchResult, FetchStatistics, Page, PageFetcher, PageSource};
pub use indexer::{
    Indexer, PageKind, MEMBER_FUNCTIONS_MARKER, SEE_ALSO_MARKER, SYMBOL_INDEX_MARKER,
};
pub use pacer::RequestPacer;

use crate::config::Config;
use crate::output::{IndexStatistics, RunTiming};
use crate::symbols::{finalize, TokenLink};
use crate::IndexerError;
use url::Url;

/// Outcome of a complete indexing run
#[derive(Debug, Clone)]
pub struct IndexRun {
    /// Sorted table with duplicates resolved
    pub table: Vec<TokenLink>,
    pub statistics: IndexStatistics,
    pub timing: RunTiming,
}

/// Runs a complete indexing operation
///
/// This is the main entry point for an indexing run. It will:
/// 1. Build the HTTP client and page fetcher
/// 2. Traverse the configured root page and everything it links to
/// 3. Sort the collected entries and resolve duplicates
///
/// # Arguments
///
/// * `config` - The validated indexer configuration
///
/// # Returns
///
/// * `Ok(IndexRun)` - The final table and run statistics
/// * `Err(IndexerError)` - Setup failed or a page was unreachable under the
///   abort policy
pub async fn run_index(config: &Config) -> Result<IndexRun, IndexerError> {
    let started_at = chrono::Utc::now();
    let clock = std::time::Instant::now();

    let client = build_http_client(&config.fetcher)?;
    let fetcher = PageFetcher::new(client, &config.fetcher);
    let extractor = Extractor::new(Url::parse(&config.site.root)?);
    let mut indexer = Indexer::new(fetcher, extractor, config.index.on_unreachable);

    tracing::info!(
        "Starting {:?} index of {} as {}",
        config.index.mode,
        config.index.root_url,
        config.index.namespace
    );

    let entries = indexer
        .index(
            config.index.mode.into(),
            &config.index.root_url,
            &config.index.namespace,
        )
        .await?;

    let mut statistics = indexer.statistics();
    statistics.entries_collected = entries.len() as u64;

    let table = finalize(entries, config.index.duplicate_policy);
    statistics.final_entries = table.len() as u64;
    statistics.duplicates_removed = statistics.entries_collected - statistics.final_entries;

    let timing = RunTiming {
        started_at,
        elapsed: clock.elapsed(),
    };

    tracing::info!(
        "Indexed {} pages, {} entries in final table",
        statistics.pages_indexed,
        statistics.final_entries
    );

    Ok(IndexRun {
        table,
        statistics,
        timing,
    })
}
