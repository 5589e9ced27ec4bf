//! Sorting and duplicate resolution for the final table

use crate::config::DuplicatePolicy;
use crate::symbols::TokenLink;

/// Produces the final table: sorted by qualified name, one entry per name
///
/// Entries are sorted with a stable sort, so entries sharing a name keep their
/// traversal order. Names that occur more than once are then resolved according
/// to `policy`:
///
/// * `DuplicatePolicy::DropAll` removes every entry of the repeated name. A name
///   seen once is kept; a name seen two or more times does not appear at all.
/// * `DuplicatePolicy::KeepFirst` keeps the first entry in traversal order.
///
/// Every removed entry is logged.
pub fn finalize(mut entries: Vec<TokenLink>, policy: DuplicatePolicy) -> Vec<TokenLink> {
    entries.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));

    let mut table = Vec::with_capacity(entries.len());
    let mut iter = entries.into_iter().peekable();

    while let Some(first) = iter.next() {
        let mut repeats = Vec::new();
        while let Some(next) = iter.next_if(|n| n.qualified_name == first.qualified_name) {
            repeats.push(next);
        }

        if repeats.is_empty() {
            table.push(first);
            continue;
        }

        for duplicate in &repeats {
            tracing::warn!("Removing duplicate: {}", duplicate);
        }

        match policy {
            DuplicatePolicy::DropAll => {
                tracing::warn!("Removing duplicate: {}", first);
            }
            DuplicatePolicy::KeepFirst => {
                tracing::debug!("Keeping first occurrence: {}", first);
                table.push(first);
            }
        }
    }

    table
}
