//! Line-based token and link extraction
//!
//! The symbol pages of the documentation site are regular enough that a full
//! DOM is not needed. Each line is scanned for `<a href="...">` anchors, and the
//! text wrapped in a small set of inline markers after each anchor becomes a
//! symbol entry pointing at that anchor's link.

use crate::symbols::{is_valid_token_name, TokenKind, TokenLink};
use url::Url;

const ANCHOR_OPEN: &str = "<a href=\"";

/// Path prefix of wiki pages that are not yet associated with the site
const WIKI_PREFIX: &str = "/mwiki";

/// Inline markup wrapping a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Tt,
    Code,
    Span,
}

impl Marker {
    pub fn open(self) -> &'static str {
        match self {
            Self::Tt => "<tt>",
            Self::Code => "<code>",
            Self::Span => "<span>",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            Self::Tt => "</tt>",
            Self::Code => "</code>",
            Self::Span => "</span>",
        }
    }
}

/// Marker priority on symbol index pages
const INDEX_MARKERS: [Marker; 3] = [Marker::Tt, Marker::Code, Marker::Span];

/// Marker priority on container pages; member listings use `<span>`
const MEMBER_MARKERS: [Marker; 3] = [Marker::Span, Marker::Tt, Marker::Code];

/// Everything learned from one line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineScan {
    /// Entries that passed validation
    pub links: Vec<TokenLink>,

    /// Anchors dropped because they point into the unresolved wiki namespace
    pub discarded_anchors: usize,

    /// Candidate names dropped by character-set validation
    pub invalid_names: usize,
}

/// An anchor and the stretch of the line that belongs to it
struct Anchor<'a> {
    href: &'a str,
    /// First byte after the anchor's opening tag
    content_start: usize,
    /// Start of the next anchor, or the end of the line
    content_end: usize,
}

/// Extracts symbol entries from markup lines
#[derive(Debug, Clone)]
pub struct Extractor {
    site_root: Url,
}

impl Extractor {
    /// Creates an extractor resolving relative links against `site_root`
    pub fn new(site_root: Url) -> Self {
        Self { site_root }
    }

    pub fn site_root(&self) -> &Url {
        &self.site_root
    }

    /// Extracts every entry in `line`, qualified with `namespace`
    ///
    /// # Example
    ///
    /// ```
    /// use cppref_indexer::crawler::Extractor;
    /// use cppref_indexer::TokenKind;
    /// use url::Url;
    ///
    /// let extractor = Extractor::new(Url::parse("https://en.cppreference.com").unwrap());
    /// let links = extractor.extract_links(
    ///     r#"<a href="/w/cpp/utility/pair/make_pair"><tt>make_pair&lt;&gt;()</tt></a>"#,
    ///     "std",
    ///     false,
    /// );
    /// assert_eq!(links[0].qualified_name, "std::make_pair");
    /// assert_eq!(links[0].kind, TokenKind::Function);
    /// ```
    pub fn extract_links(&self, line: &str, namespace: &str, in_container: bool) -> Vec<TokenLink> {
        self.scan_line(line, namespace, in_container).links
    }

    /// Extracts entries from `line` and reports what was discarded
    ///
    /// # Extraction Rules
    ///
    /// 1. Every `<a href="...">` anchor owns the text up to the next anchor.
    ///    Anchors into `/mwiki` are dropped and logged.
    /// 2. Markers are tried in priority order (`<tt>`, `<code>`, `<span>` on
    ///    index pages; `<span>` first on container pages). The first marker that
    ///    matches anywhere in the line is used for the whole line, even when
    ///    every name it yields is then rejected.
    /// 3. One anchor may wrap several markers; each becomes an entry sharing
    ///    the anchor's link.
    pub fn scan_line(&self, line: &str, namespace: &str, in_container: bool) -> LineScan {
        let mut scan = LineScan::default();

        let mut resolved = Vec::new();
        for anchor in find_anchors(line) {
            match self.resolve(anchor.href) {
                Some(link) => resolved.push((anchor, link)),
                None => {
                    tracing::info!("Discarded link into unresolved wiki page: {}", anchor.href);
                    scan.discarded_anchors += 1;
                }
            }
        }

        let markers = if in_container {
            &MEMBER_MARKERS
        } else {
            &INDEX_MARKERS
        };

        for &marker in markers {
            let mut candidates = Vec::new();
            for (anchor, link) in &resolved {
                let segment = &line[anchor.content_start..anchor.content_end];
                for raw in marked_texts(segment, marker) {
                    candidates.push((raw, link.as_str()));
                }
            }

            if candidates.is_empty() {
                continue;
            }

            for (raw, link) in candidates {
                let (qualified_name, kind) = classify(namespace, raw, marker, in_container);

                if !is_valid_token_name(&qualified_name) {
                    tracing::warn!("Discarded invalid token name: {}", qualified_name);
                    scan.invalid_names += 1;
                    continue;
                }

                scan.links.push(TokenLink::new(qualified_name, link, kind));
            }
            break;
        }

        scan
    }

    /// Resolves an href to an absolute link, or None for unresolved wiki pages
    fn resolve(&self, href: &str) -> Option<String> {
        if href.starts_with(WIKI_PREFIX) {
            return None;
        }

        match self.site_root.join(href) {
            Ok(url) if url.path().starts_with(WIKI_PREFIX) => None,
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                tracing::debug!("Failed to resolve href '{}': {}", href, e);
                None
            }
        }
    }
}

/// Locates every anchor in the line together with its content range
fn find_anchors(line: &str) -> Vec<Anchor<'_>> {
    let mut starts = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = line[cursor..].find(ANCHOR_OPEN) {
        let anchor_start = cursor + offset;
        let href_start = anchor_start + ANCHOR_OPEN.len();

        let Some(href_len) = line[href_start..].find('"') else {
            break;
        };
        let href_end = href_start + href_len;

        let Some(tag_len) = line[href_end..].find('>') else {
            break;
        };
        let content_start = href_end + tag_len + 1;

        starts.push((anchor_start, &line[href_start..href_end], content_start));
        cursor = content_start;
    }

    let mut anchors = Vec::with_capacity(starts.len());
    for (i, &(_, href, content_start)) in starts.iter().enumerate() {
        let content_end = starts
            .get(i + 1)
            .map(|&(next_start, _, _)| next_start)
            .unwrap_or(line.len());
        anchors.push(Anchor {
            href,
            content_start,
            content_end,
        });
    }
    anchors
}

/// Collects the text of every complete `marker` pair in `segment`, left to right
fn marked_texts(segment: &str, marker: Marker) -> Vec<&str> {
    let mut texts = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = segment[cursor..].find(marker.open()) {
        let text_start = cursor + offset + marker.open().len();
        let Some(text_len) = segment[text_start..].find(marker.close()) else {
            break;
        };
        texts.push(&segment[text_start..text_start + text_len]);
        cursor = text_start + text_len + marker.close().len();
    }

    texts
}

/// Qualifies a raw token and decides its kind
fn classify(namespace: &str, raw: &str, marker: Marker, in_container: bool) -> (String, TokenKind) {
    let name = format!("{}::{}", namespace, raw)
        .replace("&lt;", "<")
        .replace("&gt;", ">");

    if marker == Marker::Code {
        return (name, TokenKind::Namespace);
    }

    if let Some(stripped) = name.strip_suffix("<>()") {
        return (stripped.to_string(), TokenKind::Function);
    }

    if let Some(stripped) = name.strip_suffix("()") {
        return (stripped.to_string(), TokenKind::Function);
    }

    if in_container {
        (name, TokenKind::Function)
    } else {
        (name, TokenKind::Container)
    }
}
