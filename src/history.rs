// History cache - the client-side mirror of host state
//
// Holds the last-known entry list and the committed configuration. The
// cache is only ever replaced wholesale from a snapshot, never patched in
// place, so the view projection can never observe a partial update. A
// failed fetch leaves the previous cache untouched.

use anyhow::Result;

use crate::host::HostBridge;
use crate::model::{AppConfig, ClipboardEntry};

/// One atomic fetch of host state
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub entries: Vec<ClipboardEntry>,
    pub config: AppConfig,
}

/// Read-only mirror of the host's entries and committed configuration
#[derive(Debug, Default)]
pub struct HistoryCache {
    entries: Vec<ClipboardEntry>,
    config: AppConfig,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache with a fresh snapshot.
    ///
    /// Reloads race benignly: whichever snapshot lands last wins, which is
    /// correct because every snapshot is a complete fetch.
    pub fn apply(&mut self, snapshot: HistorySnapshot) {
        self.entries = snapshot.entries;
        self.config = snapshot.config;
    }

    pub fn entries(&self) -> &[ClipboardEntry] {
        &self.entries
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Promote a config the host has acknowledged to committed state
    pub fn set_config(&mut self, config: AppConfig) {
        self.config = config;
    }

    /// Live pinned count across the whole cache (not the projection)
    pub fn pinned_count(&self) -> usize {
        self.entries.iter().filter(|e| e.pinned).count()
    }
}

/// Fetch entries and committed config as one snapshot.
///
/// Errors bubble to the caller; they must be logged there rather than
/// thrown into a rendering path.
pub async fn fetch_snapshot(bridge: &dyn HostBridge) -> Result<HistorySnapshot> {
    let entries = bridge.get_clipboard_history().await?;
    let config = bridge.get_config().await?;
    Ok(HistorySnapshot { entries, config })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::demo::DemoHost;
    use crate::model::ContentType;
    use chrono::Utc;

    fn entry(id: i64, pinned: bool) -> ClipboardEntry {
        ClipboardEntry {
            id,
            content: format!("entry {id}"),
            content_type: ContentType::Text,
            timestamp: Utc::now(),
            pinned,
        }
    }

    #[test]
    fn test_apply_replaces_wholesale() {
        let mut cache = HistoryCache::new();
        cache.apply(HistorySnapshot {
            entries: vec![entry(1, false), entry(2, true)],
            config: AppConfig::default(),
        });
        assert_eq!(cache.entries().len(), 2);

        cache.apply(HistorySnapshot {
            entries: vec![entry(3, false)],
            config: AppConfig::default(),
        });
        let ids: Vec<i64> = cache.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3]); // nothing from the old cache survives
    }

    #[test]
    fn test_pinned_count_counts_the_cache() {
        let mut cache = HistoryCache::new();
        cache.apply(HistorySnapshot {
            entries: vec![entry(1, true), entry(2, false), entry(3, true)],
            config: AppConfig::default(),
        });
        assert_eq!(cache.pinned_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_is_idempotent_without_host_changes() {
        let host = DemoHost::seeded();
        let first = fetch_snapshot(&host).await.unwrap();
        let second = fetch_snapshot(&host).await.unwrap();
        assert_eq!(first, second);
    }
}
