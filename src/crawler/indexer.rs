//! Indexer - traversal orchestration
//!
//! This module walks the documentation site starting from one page:
//! - Namespace pages (symbol indexes) list free functions, containers and
//!   nested namespaces
//! - Container pages list member functions
//!
//! Discovered pages are scheduled on an explicit worklist. A namespace page is
//! scanned at most once per run, so cyclic links terminate regardless of
//! cache behavior. A container page is scanned once per qualified name, so
//! aliases sharing a page (`string` and `basic_string`) each get their members.

use crate::config::{IndexMode, UnreachablePolicy};
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::{FetchResult, Page, PageSource};
use crate::output::IndexStatistics;
use crate::symbols::{IndexResult, TokenKind, TokenLink};
use crate::IndexerError;
use std::collections::HashSet;
use std::sync::Arc;

/// Line that introduces the listing on a symbol index page
pub const SYMBOL_INDEX_MARKER: &str = "This page tries to list all the symbols ";

/// Heading that introduces the listing on a container page
pub const MEMBER_FUNCTIONS_MARKER: &str =
    "id=\"Member_functions\">Member functions</span></h3>";

/// Heading that ends every listing
pub const SEE_ALSO_MARKER: &str = "id=\"See_also\">See also</span></h3>";

/// Kind of page being scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Namespace,
    Container,
}

impl From<IndexMode> for PageKind {
    fn from(mode: IndexMode) -> Self {
        match mode {
            IndexMode::Namespace => Self::Namespace,
            IndexMode::Container => Self::Container,
        }
    }
}

/// A unit of work on the traversal stack
#[derive(Debug)]
enum Task {
    /// Scan a page and schedule what it links to
    Visit {
        kind: PageKind,
        url: String,
        namespace: String,
    },

    /// Append a container entry once its members have been appended
    Emit(TokenLink),
}

/// Traversal orchestrator turning a root page into a flat entry sequence
pub struct Indexer<S: PageSource> {
    source: S,
    extractor: Extractor,
    on_unreachable: UnreachablePolicy,
    /// Namespace pages already scanned, by URL
    visited_namespaces: HashSet<String>,
    /// Container pages already scanned, by URL and qualified name
    visited_containers: HashSet<(String, String)>,
    statistics: IndexStatistics,
}

impl<S: PageSource> Indexer<S> {
    /// Creates an indexer reading pages from `source`
    pub fn new(source: S, extractor: Extractor, on_unreachable: UnreachablePolicy) -> Self {
        Self {
            source,
            extractor,
            on_unreachable,
            visited_namespaces: HashSet::new(),
            visited_containers: HashSet::new(),
            statistics: IndexStatistics::default(),
        }
    }

    /// Indexes a symbol index page and everything reachable from it
    ///
    /// Free functions come first, then each container's members followed by
    /// the container itself, then the contents of each nested namespace. The
    /// namespace entries themselves are not part of the result.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<TokenLink>)` - All entries found; failed branches contribute nothing
    /// * `Err(IndexerError::Unreachable)` - A page exhausted its retries under
    ///   `UnreachablePolicy::Abort`
    pub async fn index_namespace(
        &mut self,
        url: &str,
        namespace: &str,
    ) -> Result<Vec<TokenLink>, IndexerError> {
        self.index(PageKind::Namespace, url, namespace).await
    }

    /// Indexes the member functions listed on a container page
    pub async fn index_container(
        &mut self,
        url: &str,
        namespace: &str,
    ) -> Result<Vec<TokenLink>, IndexerError> {
        self.index(PageKind::Container, url, namespace).await
    }

    /// Runs the traversal from a page of the given kind
    pub async fn index(
        &mut self,
        kind: PageKind,
        url: &str,
        namespace: &str,
    ) -> Result<Vec<TokenLink>, IndexerError> {
        let mut result = Vec::new();
        let mut stack = vec![Task::Visit {
            kind,
            url: url.to_string(),
            namespace: namespace.to_string(),
        }];

        while let Some(task) = stack.pop() {
            match task {
                Task::Emit(container) => result.push(container),
                Task::Visit {
                    kind,
                    url,
                    namespace,
                } => {
                    if !self.mark_visited(kind, &url, &namespace) {
                        tracing::debug!("Skipping already indexed page: {} ({})", url, namespace);
                        self.statistics.pages_revisited += 1;
                        continue;
                    }

                    match kind {
                        PageKind::Namespace => {
                            tracing::info!("Indexing: {} because of namespace {}", url, namespace);
                        }
                        PageKind::Container => {
                            tracing::info!("Indexing: {} because of container {}", url, namespace);
                        }
                    }

                    let Some(page) = self.load(&url).await? else {
                        continue;
                    };
                    self.statistics.pages_indexed += 1;

                    match kind {
                        PageKind::Namespace => {
                            let found = self.scan_namespace_page(&page, &namespace);
                            result.extend(found.functions);

                            // Pushed in reverse so the stack pops them in page order
                            for child in found.namespaces.into_iter().rev() {
                                stack.push(Task::Visit {
                                    kind: PageKind::Namespace,
                                    url: child.link,
                                    namespace: child.qualified_name,
                                });
                            }
                            for container in found.containers.into_iter().rev() {
                                stack.push(Task::Emit(container.clone()));
                                stack.push(Task::Visit {
                                    kind: PageKind::Container,
                                    url: container.link,
                                    namespace: container.qualified_name,
                                });
                            }
                        }
                        PageKind::Container => {
                            let found = self.scan_container_page(&page, &namespace);
                            result.extend(found.functions);
                        }
                    }
                }
            }
        }

        Ok(result)
    }

    /// Records a visit, returning false if it was already made
    ///
    /// Container pages never schedule further work, so keying them on the
    /// qualified name as well cannot make the traversal loop.
    fn mark_visited(&mut self, kind: PageKind, url: &str, namespace: &str) -> bool {
        match kind {
            PageKind::Namespace => self.visited_namespaces.insert(url.to_string()),
            PageKind::Container => self
                .visited_containers
                .insert((url.to_string(), namespace.to_string())),
        }
    }

    /// Fetches a page, isolating failures to the branch that asked for it
    async fn load(&mut self, url: &str) -> Result<Option<Arc<Page>>, IndexerError> {
        match self.source.fetch(url).await {
            FetchResult::Success(page) => Ok(Some(page)),
            FetchResult::NotFound => {
                tracing::warn!("Site not found: {}", url);
                self.statistics.pages_failed += 1;
                Ok(None)
            }
            FetchResult::Unreachable {
                attempts,
                last_error,
            } => match self.on_unreachable {
                UnreachablePolicy::Abort => Err(IndexerError::Unreachable {
                    url: url.to_string(),
                    attempts,
                    last_error,
                }),
                UnreachablePolicy::Skip => {
                    tracing::error!(
                        "Skipping {} after {} failed attempts: {}",
                        url,
                        attempts,
                        last_error
                    );
                    self.statistics.pages_failed += 1;
                    Ok(None)
                }
            },
        }
    }

    /// Collects the entries listed on a symbol index page
    fn scan_namespace_page(&mut self, page: &Page, namespace: &str) -> IndexResult {
        let mut result = IndexResult::new();

        for token in self.scan_section(page, SYMBOL_INDEX_MARKER, namespace, false) {
            tracing::info!("Found: {}", token);
            result.push(token);
        }

        result
    }

    /// Collects the member functions listed on a container page
    fn scan_container_page(&mut self, page: &Page, namespace: &str) -> IndexResult {
        let mut result = IndexResult::new();

        for token in self.scan_section(page, MEMBER_FUNCTIONS_MARKER, namespace, true) {
            match token.kind {
                TokenKind::Function => {
                    tracing::info!("Found: {}", token);
                    result.push(token);
                }
                TokenKind::Namespace | TokenKind::Container => {
                    tracing::warn!("Discarded {} in container: {}", token.kind, token);
                }
            }
        }

        result
    }

    /// Extracts entries from the lines between `start_marker` and the "See also" heading
    ///
    /// The line holding the start marker is scanned too. A page without the
    /// start marker yields nothing.
    fn scan_section(
        &mut self,
        page: &Page,
        start_marker: &str,
        namespace: &str,
        in_container: bool,
    ) -> Vec<TokenLink> {
        let mut tokens = Vec::new();

        let section = page
            .lines()
            .iter()
            .skip_while(|line| !line.contains(start_marker))
            .take_while(|line| !line.contains(SEE_ALSO_MARKER));

        for line in section {
            let scan = self.extractor.scan_line(line, namespace, in_container);
            self.statistics.anchors_discarded += scan.discarded_anchors as u64;
            self.statistics.invalid_names += scan.invalid_names as u64;

            for token in scan.links {
                match token.kind {
                    TokenKind::Function => self.statistics.functions_found += 1,
                    TokenKind::Container => self.statistics.containers_found += 1,
                    TokenKind::Namespace => self.statistics.namespaces_found += 1,
                }
                tokens.push(token);
            }
        }

        tokens
    }

    /// Returns the traversal counters, merged with the page source's counters
    pub fn statistics(&self) -> IndexStatistics {
        IndexStatistics {
            fetch: self.source.statistics(),
            ..self.statistics.clone()
        }
    }

    /// Returns the page source
    pub fn source(&self) -> &S {
        &self.source
    }
}
