//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the indexer, including:
//! - Building the HTTP client
//! - A process-lifetime page cache keyed by URL
//! - Global pacing between network requests
//! - Retry logic for transient failures
//! - Error classification into a tagged `FetchResult`

use crate::config::FetcherConfig;
use crate::crawler::pacer::RequestPacer;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// One fetched document as an ordered sequence of lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    lines: Vec<String>,
}

impl Page {
    /// Splits a response body into lines
    pub fn from_body(body: &str) -> Self {
        Self {
            lines: body.lines().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// The page, either freshly downloaded or served from the cache
    Success(Arc<Page>),

    /// The server answered HTTP 404
    NotFound,

    /// Every attempt failed
    Unreachable {
        /// Number of attempts made
        attempts: u32,
        /// Description of the last failure
        last_error: String,
    },
}

/// Counters kept by a page source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchStatistics {
    /// Requests that went out to the network, retries included
    pub network_requests: u64,

    /// Fetches answered from the cache
    pub cache_hits: u64,

    /// Attempts repeated after a transient failure
    pub retries: u64,

    /// Pages that answered HTTP 404
    pub not_found: u64,

    /// Pages that exhausted their retry budget
    pub unreachable: u64,
}

/// Anything the indexer can load pages from
///
/// `PageFetcher` is the network implementation; tests drive the indexer with
/// in-memory sources.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Loads the page at `url`
    async fn fetch(&mut self, url: &str) -> FetchResult;

    /// Returns the counters collected so far
    fn statistics(&self) -> FetchStatistics {
        FetchStatistics::default()
    }
}

/// Outcome of a single network attempt
enum Attempt {
    Body(String),
    NotFound,
    Failed(String),
}

/// Rate-limited, caching, retrying page loader
pub struct PageFetcher {
    client: Client,
    cache: HashMap<String, Arc<Page>>,
    pacer: RequestPacer,
    max_attempts: u32,
    statistics: FetchStatistics,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use cppref_indexer::config::FetcherConfig;
/// use cppref_indexer::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

impl PageFetcher {
    /// Creates a fetcher around an existing client
    pub fn new(client: Client, config: &FetcherConfig) -> Self {
        Self {
            client,
            cache: HashMap::new(),
            pacer: RequestPacer::new(Duration::from_millis(config.min_request_interval)),
            max_attempts: config.max_attempts.max(1),
            statistics: FetchStatistics::default(),
        }
    }

    /// Creates a fetcher with a client built from `config`
    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::new(client, config))
    }

    /// Returns whether `url` has already been downloaded
    pub fn is_cached(&self, url: &str) -> bool {
        self.cache.contains_key(url)
    }

    /// Number of pages held in the cache
    pub fn cached_pages(&self) -> usize {
        self.cache.len()
    }

    /// Waits for the pacer, issues one GET and classifies the response
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | HTTP 2xx, body read | `Body` |
    /// | HTTP 404 | `NotFound` |
    /// | Other status | `Failed` (retried) |
    /// | Transport or body error | `Failed` (retried) |
    async fn attempt(&mut self, url: &str) -> Attempt {
        self.pacer.wait_turn().await;
        self.statistics.network_requests += 1;

        let outcome = match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                tracing::debug!("HTTP status code: {} for {}", status.as_u16(), url);

                if status == StatusCode::NOT_FOUND {
                    Attempt::NotFound
                } else if !status.is_success() {
                    Attempt::Failed(format!("HTTP {}", status))
                } else {
                    match response.text().await {
                        Ok(body) => Attempt::Body(body),
                        Err(e) => Attempt::Failed(format!("Failed to read body: {}", e)),
                    }
                }
            }
            Err(e) => {
                if e.is_timeout() {
                    Attempt::Failed("Request timeout".to_string())
                } else if e.is_connect() {
                    Attempt::Failed(format!("Connection failed: {}", e))
                } else {
                    Attempt::Failed(e.to_string())
                }
            }
        };

        self.pacer.record_request(Instant::now());
        outcome
    }
}

impl PageSource for PageFetcher {
    /// Fetches a page, serving repeated URLs from the cache
    ///
    /// A cache hit returns immediately without pacing. A miss retries transient
    /// failures, waiting for the pacer before every attempt, until the attempt
    /// budget is spent. HTTP 404 is never retried.
    async fn fetch(&mut self, url: &str) -> FetchResult {
        if let Some(page) = self.cache.get(url) {
            tracing::debug!("Found url in cache: {}", url);
            self.statistics.cache_hits += 1;
            return FetchResult::Success(Arc::clone(page));
        }

        let mut last_error = String::new();
        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                self.statistics.retries += 1;
            }

            match self.attempt(url).await {
                Attempt::Body(body) => {
                    let page = Arc::new(Page::from_body(&body));
                    tracing::trace!("Fetched {} ({} lines)", url, page.len());
                    self.cache.insert(url.to_string(), Arc::clone(&page));
                    return FetchResult::Success(page);
                }
                Attempt::NotFound => {
                    self.statistics.not_found += 1;
                    return FetchResult::NotFound;
                }
                Attempt::Failed(error) => {
                    tracing::warn!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt,
                        self.max_attempts,
                        url,
                        error
                    );
                    last_error = error;
                }
            }
        }

        tracing::error!("Couldn't reach {} after {} tries", url, self.max_attempts);
        self.statistics.unreachable += 1;
        FetchResult::Unreachable {
            attempts: self.max_attempts,
            last_error,
        }
    }

    fn statistics(&self) -> FetchStatistics {
        self.statistics.clone()
    }
}
