// View projection - from cached entries to the visible list
//
// project() is the single source of truth for what is on screen: the
// selection controller clamps against its output and nothing else. It must
// stay pure so it can be re-derived on every keystroke, tab switch and
// reload without side effects.

use crate::model::ClipboardEntry;
use serde::{Deserialize, Serialize};

/// Binary view partition applied after the search filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    History,
    Pinned,
}

impl Tab {
    pub fn cycle(self) -> Self {
        match self {
            Tab::History => Tab::Pinned,
            Tab::Pinned => Tab::History,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::History => "History",
            Tab::Pinned => "Pinned",
        }
    }
}

/// Derive the visible, ordered item list.
///
/// Filters in order: search, then tab. Text entries match when their
/// case-folded content contains the case-folded query; image entries are
/// always shown regardless of the query, since there is no text to match
/// against. Cache order is preserved - the host already sorts by recency
/// and pin state, and the projection never re-sorts.
pub fn project<'a>(entries: &'a [ClipboardEntry], query: &str, tab: Tab) -> Vec<&'a ClipboardEntry> {
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|e| e.is_image() || needle.is_empty() || e.content.to_lowercase().contains(&needle))
        .filter(|e| e.pinned == (tab == Tab::Pinned))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentType;
    use chrono::{TimeZone, Utc};

    fn entry(id: i64, content: &str, content_type: ContentType, pinned: bool) -> ClipboardEntry {
        ClipboardEntry {
            id,
            content: content.to_string(),
            content_type,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            pinned,
        }
    }

    fn text(id: i64, content: &str) -> ClipboardEntry {
        entry(id, content, ContentType::Text, false)
    }

    fn ids(items: &[&ClipboardEntry]) -> Vec<i64> {
        items.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_empty_query_keeps_everything_in_tab() {
        let entries = vec![text(1, "abc"), text(2, "xyz")];
        assert_eq!(ids(&project(&entries, "", Tab::History)), vec![1, 2]);
    }

    #[test]
    fn test_search_is_case_folded() {
        let entries = vec![text(1, "Hello World"), text(2, "goodbye")];
        assert_eq!(ids(&project(&entries, "hello", Tab::History)), vec![1]);
        assert_eq!(ids(&project(&entries, "WORLD", Tab::History)), vec![1]);
        assert_eq!(ids(&project(&entries, "bye", Tab::History)), vec![2]);
    }

    #[test]
    fn test_images_always_pass_the_search_filter() {
        let entries = vec![
            text(1, "notes"),
            entry(2, "aGVsbG8=", ContentType::Image, false),
        ];
        // The image has no text to match, but stays visible
        assert_eq!(ids(&project(&entries, "zzz", Tab::History)), vec![2]);
    }

    #[test]
    fn test_tab_splits_on_pin_state() {
        let entries = vec![
            entry(1, "abc", ContentType::Text, false),
            entry(2, "xyz", ContentType::Text, true),
        ];
        assert_eq!(ids(&project(&entries, "", Tab::History)), vec![1]);
        assert_eq!(ids(&project(&entries, "", Tab::Pinned)), vec![2]);
    }

    #[test]
    fn test_order_is_a_subsequence_of_cache_order() {
        let entries = vec![
            text(10, "alpha"),
            text(11, "beta"),
            text(12, "alphabet"),
            text(13, "gamma"),
        ];
        let projected = ids(&project(&entries, "alpha", Tab::History));
        assert_eq!(projected, vec![10, 12]);

        // Every projected id appears in cache order
        let cache_order: Vec<i64> = entries.iter().map(|e| e.id).collect();
        let mut last_pos = 0;
        for id in projected {
            let pos = cache_order.iter().position(|c| *c == id).unwrap();
            assert!(pos >= last_pos);
            last_pos = pos;
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let entries = vec![text(1, "one"), text(2, "two"), text(3, "twelve")];
        let a = ids(&project(&entries, "tw", Tab::History));
        let b = ids(&project(&entries, "tw", Tab::History));
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_matches_is_an_empty_list_not_an_error() {
        let entries = vec![text(1, "abc")];
        assert!(project(&entries, "nothing", Tab::History).is_empty());
        assert!(project(&[], "", Tab::Pinned).is_empty());
    }
}
