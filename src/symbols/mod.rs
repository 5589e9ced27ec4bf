//! Symbol entries produced by the indexer
//!
//! This module defines the data model shared by the extractor, the indexer and
//! the output writer:
//! - `TokenLink`, one qualified symbol name and its documentation link
//! - `TokenKind`, the extraction context the entry was classified in
//! - `IndexResult`, the per-page partition of extracted entries
//! - `finalize`, the sort and duplicate resolution pass

mod finalize;

pub use finalize::finalize;

use std::fmt;

/// Punctuation allowed in a symbol name besides letters and digits
pub const TOKEN_PUNCTUATION: &str = "_:=<>[]()+-*/!";

/// Classification of an extracted entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A free function or a member function
    Function,
    /// A type whose page lists member functions
    Container,
    /// A nested namespace with its own symbol index page
    Namespace,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Function => "Function",
            Self::Container => "Container",
            Self::Namespace => "Namespace",
        };
        write!(f, "{}", s)
    }
}

/// A qualified symbol name together with the page documenting it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenLink {
    /// Fully qualified name, e.g. `std::vector::begin`
    pub qualified_name: String,

    /// Absolute documentation URL
    pub link: String,

    /// Extraction context classification
    pub kind: TokenKind,
}

impl TokenLink {
    pub fn new(qualified_name: impl Into<String>, link: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            link: link.into(),
            kind,
        }
    }
}

impl fmt::Display for TokenLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {} -> {}", self.kind, self.qualified_name, self.link)
    }
}

/// Entries found on a single page, partitioned by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexResult {
    pub containers: Vec<TokenLink>,
    pub functions: Vec<TokenLink>,
    pub namespaces: Vec<TokenLink>,
}

impl IndexResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files an entry into the bucket matching its kind
    pub fn push(&mut self, token: TokenLink) {
        match token.kind {
            TokenKind::Function => self.functions.push(token),
            TokenKind::Container => self.containers.push(token),
            TokenKind::Namespace => self.namespaces.push(token),
        }
    }

    /// Total number of entries across all buckets
    pub fn len(&self) -> usize {
        self.containers.len() + self.functions.len() + self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Checks that a name only uses letters, digits and `TOKEN_PUNCTUATION`
///
/// # Examples
///
/// ```
/// use cppref_indexer::symbols::is_valid_token_name;
///
/// assert!(is_valid_token_name("std::vector<bool>::operator[]"));
/// assert!(!is_valid_token_name("std::basic_string<char> "));
/// ```
pub fn is_valid_token_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_alphanumeric() || TOKEN_PUNCTUATION.contains(c))
}
