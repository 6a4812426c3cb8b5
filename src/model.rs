// Data model mirrored from the Clipray host
//
// Clipboard entries and the application configuration are owned by the host
// daemon; this side only holds read-only mirrors that get replaced wholesale
// on every reload. Serde names match the host's wire format.

use crate::theme::ThemePreset;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// History limit used when the settings form holds a non-numeric value
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Default accelerator the host registers when no config exists yet
pub const DEFAULT_HOTKEY: &str = "CommandOrControl+Shift+V";

/// Kind of payload an entry carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Image,
}

/// A single clipboard history entry
///
/// `content` is raw text for `Text` entries and base64-encoded bytes for
/// `Image` entries. Ids are host-assigned and monotonic in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    pub id: i64,
    pub content: String,
    pub content_type: ContentType,
    pub timestamp: DateTime<Utc>,
    pub pinned: bool,
}

impl ClipboardEntry {
    pub fn is_image(&self) -> bool {
        self.content_type == ContentType::Image
    }

    /// Approximate decoded byte size for image entries
    pub fn image_byte_len(&self) -> Option<usize> {
        self.is_image()
            .then(|| base64::decoded_len_estimate(self.content.len()))
    }
}

/// Host-owned application configuration
///
/// Two copies live in the client: the committed one mirrored from the host
/// inside the history cache, and a staged draft while the settings overlay
/// is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub max_history_count: u32,
    pub hotkey: String,
    pub theme: ThemePreset,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_history_count: DEFAULT_HISTORY_LIMIT,
            hotkey: DEFAULT_HOTKEY.to_string(),
            theme: ThemePreset::default(),
        }
    }
}

/// Coerce the settings form's history-limit text into a valid count.
///
/// Invalid input falls back to the default instead of being rejected, so the
/// staged form never holds an unusable value. Zero counts as invalid - the
/// host requires a limit of at least one.
pub fn coerce_history_limit(input: &str) -> u32 {
    match input.trim().parse::<u32>() {
        Ok(n) if n >= 1 => n,
        _ => DEFAULT_HISTORY_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(id: i64) -> ClipboardEntry {
        ClipboardEntry {
            id,
            content: "hello".to_string(),
            content_type: ContentType::Text,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            pinned: false,
        }
    }

    #[test]
    fn test_entry_wire_names_match_host() {
        let json = serde_json::to_value(entry(7)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["content"], "hello");
        assert_eq!(json["content_type"], "text");
        assert_eq!(json["pinned"], false);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_image_byte_len_only_for_images() {
        let mut e = entry(1);
        assert_eq!(e.image_byte_len(), None);

        e.content_type = ContentType::Image;
        e.content = "aGVsbG8=".to_string(); // "hello"
        let len = e.image_byte_len().unwrap();
        assert!((5..=6).contains(&len)); // estimate may include padding
    }

    #[test]
    fn test_coerce_history_limit() {
        assert_eq!(coerce_history_limit("200"), 200);
        assert_eq!(coerce_history_limit(" 12 "), 12);
        assert_eq!(coerce_history_limit(""), DEFAULT_HISTORY_LIMIT);
        assert_eq!(coerce_history_limit("abc"), DEFAULT_HISTORY_LIMIT);
        assert_eq!(coerce_history_limit("0"), DEFAULT_HISTORY_LIMIT);
        assert_eq!(coerce_history_limit("-4"), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_default_config() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.max_history_count, 50);
        assert_eq!(cfg.hotkey, "CommandOrControl+Shift+V");
        assert_eq!(cfg.theme, ThemePreset::Default);
    }
}
