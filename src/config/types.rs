use serde::Deserialize;

/// Main configuration structure for the indexer
///
/// Every section is optional in the TOML file; missing values fall back to the
/// defaults that index the public cppreference site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub index: IndexConfig,
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
}

/// Documentation site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin that relative hrefs are resolved against
    pub root: String,

    /// Prefix stripped from links when writing the data file
    #[serde(rename = "link-prefix")]
    pub link_prefix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: "https://en.cppreference.com".to_string(),
            link_prefix: "https://en.cppreference.com/w/cpp/".to_string(),
        }
    }
}

/// Traversal configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Page the traversal starts from
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Namespace label the root page's symbols are qualified with
    pub namespace: String,

    /// Whether the root page is a namespace listing or a container page
    pub mode: IndexMode,

    /// How names discovered more than once are resolved
    #[serde(rename = "duplicate-policy")]
    pub duplicate_policy: DuplicatePolicy,

    /// What happens when a page stays unreachable after all retries
    #[serde(rename = "on-unreachable")]
    pub on_unreachable: UnreachablePolicy,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            root_url: "https://en.cppreference.com/w/cpp/symbol_index".to_string(),
            namespace: "std".to_string(),
            mode: IndexMode::Namespace,
            duplicate_policy: DuplicatePolicy::DropAll,
            on_unreachable: UnreachablePolicy::Abort,
        }
    }
}

/// Page fetching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Minimum time between two network requests (milliseconds)
    #[serde(rename = "min-request-interval")]
    pub min_request_interval: u64,

    /// Total number of attempts per page before giving up
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Request timeout (seconds)
    pub timeout: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            min_request_interval: 5_000,
            max_attempts: 10,
            timeout: 30,
            user_agent: format!("cppref-indexer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the generated data script
    #[serde(rename = "data-path")]
    pub data_path: String,

    /// Path of the append-only run log
    #[serde(rename = "log-path")]
    pub log_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_path: "data.json".to_string(),
            log_path: "log.txt".to_string(),
        }
    }
}

/// Kind of page the traversal is seeded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexMode {
    #[default]
    Namespace,
    Container,
}

/// Resolution of names that were discovered more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Every entry of a repeated name is removed from the table
    #[default]
    DropAll,
    /// The first entry in traversal order is kept
    KeepFirst,
}

/// Reaction to a page that exhausted its retry budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnreachablePolicy {
    /// Abort the whole run
    #[default]
    Abort,
    /// Treat the page like a missing one and keep going
    Skip,
}
