// Settings staging - the overlay's working copy of the configuration
//
// Edits land in a staged draft that diverges from the committed config
// until an explicit save pushes it to the host. Cancelling drops the draft
// and the committed copy is restored from the snapshot taken on open, so a
// half-typed hotkey can never leak into the live configuration.

use crate::model::{coerce_history_limit, AppConfig};

/// Form fields in focus order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettingsField {
    #[default]
    HistoryLimit,
    Hotkey,
    Theme,
}

impl SettingsField {
    pub fn next(self) -> Self {
        match self {
            SettingsField::HistoryLimit => SettingsField::Hotkey,
            SettingsField::Hotkey => SettingsField::Theme,
            SettingsField::Theme => SettingsField::HistoryLimit,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SettingsField::HistoryLimit => SettingsField::Theme,
            SettingsField::Hotkey => SettingsField::HistoryLimit,
            SettingsField::Theme => SettingsField::Hotkey,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::HistoryLimit => "History limit",
            SettingsField::Hotkey => "Hotkey",
            SettingsField::Theme => "Theme",
        }
    }
}

/// Working state of the settings overlay
///
/// Exists only while the overlay is open; the snapshot taken on open is
/// what cancel restores. The history-limit field is kept as the raw typed
/// text and coerced on every edit so the draft is always valid.
#[derive(Debug, Clone)]
pub struct SettingsStaging {
    snapshot: AppConfig,
    draft: AppConfig,
    limit_input: String,
    pub focus: SettingsField,
}

impl SettingsStaging {
    /// Capture the committed configuration and start editing a copy of it
    pub fn open(committed: AppConfig) -> Self {
        Self {
            draft: committed.clone(),
            limit_input: committed.max_history_count.to_string(),
            snapshot: committed,
            focus: SettingsField::default(),
        }
    }

    /// The configuration as currently staged
    pub fn staged(&self) -> &AppConfig {
        &self.draft
    }

    /// The committed configuration captured when the overlay opened
    pub fn snapshot(&self) -> &AppConfig {
        &self.snapshot
    }

    /// Raw history-limit text as typed (may be mid-edit)
    pub fn limit_input(&self) -> &str {
        &self.limit_input
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Type a character into the focused field
    pub fn input(&mut self, c: char) {
        match self.focus {
            SettingsField::HistoryLimit => {
                if c.is_ascii_digit() {
                    self.limit_input.push(c);
                    self.draft.max_history_count = coerce_history_limit(&self.limit_input);
                }
            }
            SettingsField::Hotkey => self.draft.hotkey.push(c),
            SettingsField::Theme => {}
        }
    }

    /// Delete the last character of the focused field
    pub fn backspace(&mut self) {
        match self.focus {
            SettingsField::HistoryLimit => {
                self.limit_input.pop();
                self.draft.max_history_count = coerce_history_limit(&self.limit_input);
            }
            SettingsField::Hotkey => {
                self.draft.hotkey.pop();
            }
            SettingsField::Theme => {}
        }
    }

    /// Up/Down cycle the theme when the theme row is focused
    pub fn prev_option(&mut self) {
        if self.focus == SettingsField::Theme {
            self.draft.theme = self.draft.theme.prev();
        }
    }

    pub fn next_option(&mut self) {
        if self.focus == SettingsField::Theme {
            self.draft.theme = self.draft.theme.next();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_HISTORY_LIMIT;
    use crate::theme::ThemePreset;

    fn committed() -> AppConfig {
        AppConfig {
            max_history_count: 80,
            hotkey: "Alt+V".to_string(),
            theme: ThemePreset::DeepPurple,
        }
    }

    #[test]
    fn test_open_stages_a_copy() {
        let staging = SettingsStaging::open(committed());
        assert_eq!(staging.staged(), &committed());
        assert_eq!(staging.snapshot(), &committed());
        assert_eq!(staging.limit_input(), "80");
    }

    #[test]
    fn test_edits_touch_only_the_draft() {
        let mut staging = SettingsStaging::open(committed());
        staging.focus = SettingsField::Hotkey;
        staging.input('!');
        assert_eq!(staging.staged().hotkey, "Alt+V!");
        assert_eq!(staging.snapshot().hotkey, "Alt+V");
    }

    #[test]
    fn test_limit_field_rejects_non_digits() {
        let mut staging = SettingsStaging::open(committed());
        staging.input('x');
        assert_eq!(staging.limit_input(), "80");
        staging.input('5');
        assert_eq!(staging.limit_input(), "805");
        assert_eq!(staging.staged().max_history_count, 805);
    }

    #[test]
    fn test_empty_limit_coerces_to_default() {
        let mut staging = SettingsStaging::open(committed());
        staging.backspace();
        staging.backspace();
        assert_eq!(staging.limit_input(), "");
        assert_eq!(staging.staged().max_history_count, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_theme_cycles_only_when_focused() {
        let mut staging = SettingsStaging::open(committed());
        staging.next_option();
        assert_eq!(staging.staged().theme, ThemePreset::DeepPurple);

        staging.focus = SettingsField::Theme;
        staging.next_option();
        assert_eq!(staging.staged().theme, ThemePreset::MidnightBlue);
        staging.prev_option();
        staging.prev_option();
        assert_eq!(staging.staged().theme, ThemePreset::DeepPurple.prev());
    }

    #[test]
    fn test_focus_cycles_through_all_fields() {
        let mut staging = SettingsStaging::open(committed());
        assert_eq!(staging.focus, SettingsField::HistoryLimit);
        staging.focus_next();
        assert_eq!(staging.focus, SettingsField::Hotkey);
        staging.focus_next();
        assert_eq!(staging.focus, SettingsField::Theme);
        staging.focus_next();
        assert_eq!(staging.focus, SettingsField::HistoryLimit);
        staging.focus_prev();
        assert_eq!(staging.focus, SettingsField::Theme);
    }
}
