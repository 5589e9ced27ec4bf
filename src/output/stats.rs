//! Run statistics
//!
//! Counters collected by the fetcher and the indexer, printed at the end of a
//! run.

use crate::crawler::FetchStatistics;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Counters describing one indexing run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStatistics {
    /// Pages that were fetched and scanned
    pub pages_indexed: u64,

    /// Links to pages that had already been scanned
    pub pages_revisited: u64,

    /// Pages that were missing or skipped as unreachable
    pub pages_failed: u64,

    /// Entries extracted, by kind
    pub functions_found: u64,
    pub containers_found: u64,
    pub namespaces_found: u64,

    /// Anchors into unresolved wiki pages
    pub anchors_discarded: u64,

    /// Names rejected by character-set validation
    pub invalid_names: u64,

    /// Entries handed to the duplicate resolution pass
    pub entries_collected: u64,

    /// Entries removed by the duplicate resolution pass
    pub duplicates_removed: u64,

    /// Entries in the final table
    pub final_entries: u64,

    /// Network and cache counters
    pub fetch: FetchStatistics,
}

/// Wall-clock bounds of a run
#[derive(Debug, Clone, Copy)]
pub struct RunTiming {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// Formats the elapsed time the way the run log reports it
pub fn format_elapsed(elapsed: Duration) -> Vec<String> {
    let ms = elapsed.as_millis();
    vec![
        format!("Time taken: {} ms", ms),
        format!("Time taken: {} s", ms as f64 / 1000.0),
        format!("Time taken: {} min", ms as f64 / (60.0 * 1000.0)),
    ]
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &IndexStatistics, timing: &RunTiming) {
    println!("=== Index Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", timing.started_at.to_rfc3339());
    for line in format_elapsed(timing.elapsed) {
        println!("  {}", line);
    }
    println!();

    println!("Pages:");
    println!("  Indexed: {}", stats.pages_indexed);
    println!("  Already indexed links: {}", stats.pages_revisited);
    println!("  Failed: {}", stats.pages_failed);
    println!();

    println!("Network:");
    println!("  Requests: {}", stats.fetch.network_requests);
    println!("  Retries: {}", stats.fetch.retries);
    println!("  Cache hits: {}", stats.fetch.cache_hits);
    println!("  Not found (404): {}", stats.fetch.not_found);
    println!("  Unreachable: {}", stats.fetch.unreachable);
    println!();

    println!("Entries:");
    println!("  Functions: {}", stats.functions_found);
    println!("  Containers: {}", stats.containers_found);
    println!("  Namespaces: {}", stats.namespaces_found);
    println!("  Discarded wiki links: {}", stats.anchors_discarded);
    println!("  Invalid names: {}", stats.invalid_names);
    println!();

    println!(
        "Final table: {} entries ({} collected, {} removed as duplicates)",
        stats.final_entries, stats.entries_collected, stats.duplicates_removed
    );
}
