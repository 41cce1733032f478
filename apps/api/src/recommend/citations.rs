//! Citation dedup — one entry per URI across any number of accumulated
//! grounding-link lists, first-seen title retained, order of first
//! appearance preserved.

use std::collections::HashSet;

use crate::models::matches::CitationLink;

/// Merges citation links, keyed by URI. Entries with an empty URI are
/// dropped before dedup; on a URI collision the first-seen title wins.
pub fn dedup_citations<I>(links: I) -> Vec<CitationLink>
where
    I: IntoIterator<Item = CitationLink>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for link in links {
        if link.uri.is_empty() {
            continue;
        }
        if seen.insert(link.uri.clone()) {
            out.push(link);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(title: &str, uri: &str) -> CitationLink {
        CitationLink {
            title: title.to_string(),
            uri: uri.to_string(),
        }
    }

    #[test]
    fn test_first_seen_title_wins_and_order_is_preserved() {
        let merged = dedup_citations(vec![link("A", "x"), link("B", "x"), link("C", "y")]);
        assert_eq!(merged, vec![link("A", "x"), link("C", "y")]);
    }

    #[test]
    fn test_empty_uris_are_dropped_before_dedup() {
        let merged = dedup_citations(vec![link("Orphan", ""), link("Kept", "z")]);
        assert_eq!(merged, vec![link("Kept", "z")]);
    }

    #[test]
    fn test_merge_across_batches_stays_unique() {
        let first = vec![link("Lab", "https://a.edu"), link("Dept", "https://b.edu")];
        let second = vec![link("Lab again", "https://a.edu"), link("New", "https://c.edu")];
        let merged = dedup_citations(first.into_iter().chain(second));

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].title, "Lab");
        assert_eq!(merged[2].uri, "https://c.edu");
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(dedup_citations(Vec::new()).is_empty());
    }
}
