// Demo host: an in-process stand-in for the Clipray daemon
//
// Lets the client run without a daemon (--demo) and backs the state-machine
// tests. Entries live in memory, mutating commands edit the list the way the
// real host would, and a capture loop periodically "copies" canned snippets
// so the UI shows live clipboard-updated pushes.
//
// Run with: clipray --demo

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::sleep;

use super::{event_channel, EventSubscription, HostBridge, HostEvent};
use crate::model::{AppConfig, ClipboardEntry, ContentType};

/// Seconds between simulated clipboard captures in demo mode
const CAPTURE_INTERVAL: Duration = Duration::from_secs(12);

/// Snippets the capture loop cycles through
const CAPTURE_SNIPPETS: &[&str] = &[
    "cargo test --workspace",
    "https://docs.rs/ratatui/latest/ratatui/",
    "ssh deploy@staging.internal",
    "SELECT id, content FROM history ORDER BY id DESC;",
    "The quick brown fox jumps over the lazy dog",
];

// 1x1 transparent PNG, the smallest payload that reads as a real image
const DEMO_IMAGE_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

struct DemoState {
    entries: Vec<ClipboardEntry>,
    config: AppConfig,
    next_id: i64,
    capture_cursor: usize,
}

/// In-memory host implementation
pub struct DemoHost {
    state: Mutex<DemoState>,
    events: broadcast::Sender<HostEvent>,
    exited: AtomicBool,
    /// Names of commands issued, in order - lets tests assert call patterns
    calls: Mutex<Vec<&'static str>>,
}

impl DemoHost {
    /// Empty host with default config
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DemoState {
                entries: Vec::new(),
                config: AppConfig::default(),
                next_id: 1,
                capture_cursor: 0,
            }),
            events: event_channel(),
            exited: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Host pre-populated with a representative history
    pub fn seeded() -> Self {
        let host = Self::new();
        {
            let mut state = host.state.lock().unwrap();
            let seeds: [(&str, ContentType, bool); 6] = [
                ("git push origin main", ContentType::Text, true),
                ("TOTP recovery: 8842-1190-3356", ContentType::Text, true),
                ("docker compose up -d", ContentType::Text, false),
                (DEMO_IMAGE_B64, ContentType::Image, false),
                ("Dear team, please find the meeting notes attached.", ContentType::Text, false),
                ("/usr/local/bin/clipray", ContentType::Text, false),
            ];
            for (content, content_type, pinned) in seeds {
                let id = state.next_id;
                state.next_id += 1;
                state.entries.push(ClipboardEntry {
                    id,
                    content: content.to_string(),
                    content_type,
                    timestamp: Utc::now(),
                    pinned,
                });
            }
        }
        host
    }

    /// Periodically capture a canned snippet and fire clipboard-updated,
    /// mimicking the daemon's OS clipboard monitor.
    pub fn spawn_capture_loop(self: &Arc<Self>) {
        let host = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                sleep(CAPTURE_INTERVAL).await;
                if host.exited.load(Ordering::Relaxed) {
                    break;
                }
                host.capture_next_snippet();
                let _ = host.events.send(HostEvent::ClipboardUpdated);
            }
        });
    }

    fn capture_next_snippet(&self) {
        let mut state = self.state.lock().unwrap();
        let snippet = CAPTURE_SNIPPETS[state.capture_cursor % CAPTURE_SNIPPETS.len()];
        state.capture_cursor += 1;
        let id = state.next_id;
        state.next_id += 1;
        // Newest first, matching the daemon's recency ordering
        state.entries.insert(
            0,
            ClipboardEntry {
                id,
                content: snippet.to_string(),
                content_type: ContentType::Text,
                timestamp: Utc::now(),
                pinned: false,
            },
        );
        trim_overflow(&mut state);
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    /// Commands issued so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times `name` was issued
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::Relaxed)
    }
}

impl Default for DemoHost {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop the oldest unpinned entries beyond the configured limit
fn trim_overflow(state: &mut DemoState) {
    let limit = state.config.max_history_count as usize;
    let mut unpinned_seen = 0;
    state.entries.retain(|e| {
        if e.pinned {
            return true;
        }
        unpinned_seen += 1;
        unpinned_seen <= limit
    });
}

#[async_trait]
impl HostBridge for DemoHost {
    async fn get_clipboard_history(&self) -> Result<Vec<ClipboardEntry>> {
        self.record("get_clipboard_history");
        Ok(self.state.lock().unwrap().entries.clone())
    }

    async fn get_config(&self) -> Result<AppConfig> {
        self.record("get_config");
        Ok(self.state.lock().unwrap().config.clone())
    }

    async fn update_config(&self, config: AppConfig) -> Result<()> {
        self.record("update_config");
        let mut state = self.state.lock().unwrap();
        state.config = config;
        trim_overflow(&mut state);
        Ok(())
    }

    async fn copy_to_clipboard(&self, _content: String, _content_type: ContentType) -> Result<()> {
        self.record("copy_to_clipboard");
        Ok(())
    }

    async fn copy_and_hide(&self, _content: String, _content_type: ContentType) -> Result<()> {
        self.record("copy_and_hide");
        Ok(())
    }

    async fn delete_clipboard_item(&self, id: i64) -> Result<()> {
        self.record("delete_clipboard_item");
        let mut state = self.state.lock().unwrap();
        let before = state.entries.len();
        state.entries.retain(|e| e.id != id);
        if state.entries.len() == before {
            bail!("no clipboard item with id {id}");
        }
        drop(state);
        let _ = self.events.send(HostEvent::ClipboardUpdated);
        Ok(())
    }

    async fn toggle_pin(&self, id: i64) -> Result<()> {
        self.record("toggle_pin");
        let mut state = self.state.lock().unwrap();
        match state.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.pinned = !entry.pinned,
            None => bail!("no clipboard item with id {id}"),
        }
        drop(state);
        let _ = self.events.send(HostEvent::ClipboardUpdated);
        Ok(())
    }

    async fn hide_window(&self) -> Result<()> {
        self.record("hide_window");
        Ok(())
    }

    async fn exit_app(&self) -> Result<()> {
        self.record("exit_app");
        self.exited.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn subscribe(&self) -> EventSubscription {
        EventSubscription::new(self.events.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_removes_entry_and_fires_event() {
        let host = DemoHost::seeded();
        let mut subscription = host.subscribe();
        let victim = host.get_clipboard_history().await.unwrap()[0].id;

        host.delete_clipboard_item(victim).await.unwrap();

        let history = host.get_clipboard_history().await.unwrap();
        assert!(history.iter().all(|e| e.id != victim));
        assert_eq!(subscription.recv().await, Some(HostEvent::ClipboardUpdated));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_an_error() {
        let host = DemoHost::seeded();
        assert!(host.delete_clipboard_item(9999).await.is_err());
    }

    #[tokio::test]
    async fn test_toggle_pin_flips_state() {
        let host = DemoHost::seeded();
        let entry = host.get_clipboard_history().await.unwrap()[2].clone();
        host.toggle_pin(entry.id).await.unwrap();
        let after = host.get_clipboard_history().await.unwrap();
        let flipped = after.iter().find(|e| e.id == entry.id).unwrap();
        assert_eq!(flipped.pinned, !entry.pinned);
    }

    #[tokio::test]
    async fn test_overflow_trims_oldest_unpinned_only() {
        let host = DemoHost::seeded();
        let mut config = host.get_config().await.unwrap();
        config.max_history_count = 1;
        host.update_config(config).await.unwrap();

        let history = host.get_clipboard_history().await.unwrap();
        let unpinned: Vec<_> = history.iter().filter(|e| !e.pinned).collect();
        let pinned: Vec<_> = history.iter().filter(|e| e.pinned).collect();
        assert_eq!(unpinned.len(), 1);
        assert_eq!(pinned.len(), 2); // pinned entries survive any limit
    }

    #[tokio::test]
    async fn test_capture_inserts_newest_first() {
        let host = DemoHost::seeded();
        let before = host.get_clipboard_history().await.unwrap();
        host.capture_next_snippet();
        let after = host.get_clipboard_history().await.unwrap();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[0].content, CAPTURE_SNIPPETS[0]);
        assert!(after[0].id > before[0].id);
    }

    #[tokio::test]
    async fn test_call_log_records_order() {
        let host = DemoHost::new();
        host.get_config().await.unwrap();
        host.hide_window().await.unwrap();
        assert_eq!(host.calls(), vec!["get_config", "hide_window"]);
        assert_eq!(host.call_count("exit_app"), 0);
    }
}
