// Application state for the terminal client
//
// One controller instance owns every piece of mutable UI state: the history
// cache, the view state (query, tab, selection), the settings staging area
// and the exit guard. All mutation goes through the named transitions below
// so each is independently testable. Host calls run in spawned tasks that
// report back through the AppEvent channel - the input loop never blocks,
// and a reload triggered by an action is issued only after that action's
// acknowledgment.

use std::sync::Arc;

use ratatui::layout::Rect;
use tokio::sync::mpsc;

use super::keymap::{Command, OverlayContext};
use super::scroll::ViewportSync;
use super::settings::SettingsStaging;
use crate::history::{fetch_snapshot, HistoryCache, HistorySnapshot};
use crate::host::{HostBridge, HostEvent};
use crate::model::{AppConfig, ClipboardEntry};
use crate::projection::{project, Tab};
use crate::theme::{ThemeColors, ThemePreset};

/// Context rows kept around the highlighted row after a scroll correction
const SCROLL_MARGIN: usize = 1;

/// Every entry renders as one list row
pub const ITEM_HEIGHT: usize = 1;

/// Results of host calls finished in the background
#[derive(Debug)]
pub enum AppEvent {
    /// Fresh cache contents; replaces the cache wholesale (last writer wins)
    Snapshot(HistorySnapshot),
    /// The host acknowledged update_config; promote to committed
    ConfigSaved(AppConfig),
}

/// Confirmation gate in front of the app-terminate command
#[derive(Debug, Default)]
pub struct ExitGuard {
    open: bool,
    fired: bool,
}

impl ExitGuard {
    pub fn is_open(&self) -> bool {
        self.open
    }

    fn request(&mut self) {
        self.open = true;
    }

    fn cancel(&mut self) {
        self.open = false;
    }

    /// Close the guard; true exactly once, on the first confirmation
    fn confirm(&mut self) -> bool {
        self.open = false;
        !std::mem::replace(&mut self.fired, true)
    }
}

/// Main application state
pub struct App {
    /// Mirror of host entries and committed configuration
    pub cache: HistoryCache,

    /// Live search text; every edit re-derives the projection
    pub query: String,

    /// Active view partition
    pub tab: Tab,

    /// Index into the current projection (0 when empty)
    pub selected: usize,

    /// Present while the settings overlay is open
    pub settings: Option<SettingsStaging>,

    pub exit_guard: ExitGuard,

    /// Viewport synchronizer for the entry list
    pub scroll: ViewportSync,

    /// Whether the event loop should wind down
    pub should_quit: bool,

    /// List area of the last frame, for mapping mouse clicks to rows
    pub list_area: Rect,

    bridge: Arc<dyn HostBridge>,
    events_tx: mpsc::Sender<AppEvent>,
}

impl App {
    pub fn new(bridge: Arc<dyn HostBridge>, events_tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            cache: HistoryCache::new(),
            query: String::new(),
            tab: Tab::default(),
            selected: 0,
            settings: None,
            exit_guard: ExitGuard::default(),
            scroll: ViewportSync::new(SCROLL_MARGIN),
            should_quit: false,
            list_area: Rect::default(),
            bridge,
            events_tx,
        }
    }

    // ─── Derived views ───────────────────────────────────────────────

    /// The visible, ordered item list - the single source of truth the
    /// selection is clamped against
    pub fn projection(&self) -> Vec<&ClipboardEntry> {
        project(self.cache.entries(), &self.query, self.tab)
    }

    pub fn selected_entry(&self) -> Option<ClipboardEntry> {
        self.projection().get(self.selected).copied().cloned()
    }

    /// Which binding table applies right now
    pub fn overlay_context(&self) -> OverlayContext {
        OverlayContext::topmost(self.exit_guard.is_open(), self.settings.is_some())
    }

    /// Theme to render with: the staged one previews live while the
    /// settings overlay is open
    pub fn active_preset(&self) -> ThemePreset {
        match &self.settings {
            Some(staging) => staging.staged().theme,
            None => self.cache.config().theme,
        }
    }

    pub fn theme(&self) -> &'static ThemeColors {
        self.active_preset().colors()
    }

    // ─── Command dispatch ────────────────────────────────────────────

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MoveDown => self.move_down(),
            Command::MoveUp => self.move_up(),
            Command::Activate => self.activate_selected(),
            Command::CopyEntry => self.copy_selected(),
            Command::DeleteEntry => self.delete_selected(),
            Command::TogglePin => self.toggle_pin_selected(),
            Command::ToggleSettings => self.toggle_settings(),
            Command::CycleTab => self.cycle_tab(),
            Command::RequestExit => self.exit_guard.request(),
            Command::HideWindow => {
                // Escape path: the guard resets on every press
                self.exit_guard.cancel();
                self.spawn_hide_window();
            }
            Command::QueryChar(c) => {
                self.query.push(c);
                self.selected = 0;
                self.reconcile_selection();
            }
            Command::QueryBackspace => {
                self.query.pop();
                self.selected = 0;
                self.reconcile_selection();
            }
            Command::CancelSettings => {
                self.exit_guard.cancel();
                self.cancel_settings();
            }
            Command::SaveSettings => self.save_settings(),
            Command::SettingsFocusNext => self.with_staging(|s| s.focus_next()),
            Command::SettingsFocusPrev => self.with_staging(|s| s.focus_prev()),
            Command::SettingsPrevOption => self.with_staging(|s| s.prev_option()),
            Command::SettingsNextOption => self.with_staging(|s| s.next_option()),
            Command::SettingsInput(c) => self.with_staging(|s| s.input(c)),
            Command::SettingsBackspace => self.with_staging(|s| s.backspace()),
            Command::CancelExit => self.exit_guard.cancel(),
            Command::ConfirmExit => self.confirm_exit(),
        }
    }

    // ─── Selection & navigation ──────────────────────────────────────

    /// Clamp the selection against the current projection. Runs after
    /// every list-affecting event, not only after navigation keys.
    pub fn reconcile_selection(&mut self) {
        let len = self.projection().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        self.scroll.sync(self.selected, ITEM_HEIGHT, len);
    }

    fn move_down(&mut self) {
        let len = self.projection().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
        self.scroll.sync(self.selected, ITEM_HEIGHT, len);
    }

    fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.scroll.sync(self.selected, ITEM_HEIGHT, self.projection().len());
    }

    fn cycle_tab(&mut self) {
        self.tab = self.tab.cycle();
        self.selected = 0;
        self.reconcile_selection();
    }

    /// Back to defaults: empty query, history tab, first row
    pub fn reset_view(&mut self) {
        self.query.clear();
        self.tab = Tab::default();
        self.selected = 0;
        self.reconcile_selection();
    }

    /// Mouse selection: highlight the row and activate it like Enter
    pub fn click_row(&mut self, index: usize) {
        if index < self.projection().len() {
            self.selected = index;
            self.activate_selected();
        }
    }

    // ─── Entry actions ───────────────────────────────────────────────

    fn activate_selected(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return; // empty projection - nothing to copy
        };
        let bridge = Arc::clone(&self.bridge);
        tokio::spawn(async move {
            if let Err(e) = bridge.copy_and_hide(entry.content, entry.content_type).await {
                tracing::warn!(error = %e, id = entry.id, "copy_and_hide failed");
            }
        });
        self.reset_view();
    }

    /// Copy without hiding; the view stays where it is
    fn copy_selected(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let bridge = Arc::clone(&self.bridge);
        tokio::spawn(async move {
            if let Err(e) = bridge
                .copy_to_clipboard(entry.content, entry.content_type)
                .await
            {
                tracing::warn!(error = %e, id = entry.id, "copy failed");
            }
        });
    }

    fn delete_selected(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        tokio::spawn(delete_task(
            Arc::clone(&self.bridge),
            self.events_tx.clone(),
            entry.id,
        ));
    }

    fn toggle_pin_selected(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        tokio::spawn(toggle_pin_task(
            Arc::clone(&self.bridge),
            self.events_tx.clone(),
            entry.id,
        ));
    }

    /// Ask the host for a fresh snapshot; the reply arrives as an AppEvent
    pub fn request_reload(&self) {
        tokio::spawn(reload_task(
            Arc::clone(&self.bridge),
            self.events_tx.clone(),
        ));
    }

    fn spawn_hide_window(&self) {
        let bridge = Arc::clone(&self.bridge);
        tokio::spawn(async move {
            if let Err(e) = bridge.hide_window().await {
                tracing::warn!(error = %e, "hide_window failed");
            }
        });
    }

    // ─── Settings overlay ────────────────────────────────────────────

    fn toggle_settings(&mut self) {
        if self.settings.is_some() {
            self.cancel_settings();
        } else {
            self.settings = Some(SettingsStaging::open(self.cache.config().clone()));
        }
    }

    /// Drop the draft and restore committed config from the snapshot.
    /// Never talks to the host.
    fn cancel_settings(&mut self) {
        if let Some(staging) = self.settings.take() {
            self.cache.set_config(staging.snapshot().clone());
        }
    }

    /// Push the staged config to the host. The overlay stays open (with
    /// the draft intact) until the acknowledgment arrives, so a failure
    /// leaves the user free to retry.
    fn save_settings(&mut self) {
        let Some(staging) = &self.settings else {
            return;
        };
        tokio::spawn(save_config_task(
            Arc::clone(&self.bridge),
            self.events_tx.clone(),
            staging.staged().clone(),
        ));
    }

    fn with_staging(&mut self, edit: impl FnOnce(&mut SettingsStaging)) {
        if let Some(staging) = &mut self.settings {
            edit(staging);
        }
    }

    // ─── Exit guard ──────────────────────────────────────────────────

    fn confirm_exit(&mut self) {
        if self.exit_guard.confirm() {
            let bridge = Arc::clone(&self.bridge);
            tokio::spawn(async move {
                if let Err(e) = bridge.exit_app().await {
                    tracing::warn!(error = %e, "exit_app failed");
                }
            });
            self.should_quit = true;
        }
    }

    // ─── Async results & push events ─────────────────────────────────

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Snapshot(snapshot) => {
                self.cache.apply(snapshot);
                self.reconcile_selection();
            }
            AppEvent::ConfigSaved(config) => {
                self.cache.set_config(config);
                self.settings = None;
            }
        }
    }

    /// Push events route through the same reload path as user actions so
    /// the cache can never diverge.
    pub fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::ClipboardUpdated => self.request_reload(),
            HostEvent::ShowClipboard => {
                self.request_reload();
                self.reset_view();
            }
        }
    }
}

// ─── Host-call tasks ─────────────────────────────────────────────────
//
// Free functions so tests can await them directly instead of racing
// against tokio::spawn. Failures are logged and swallowed; the cache and
// overlay state stay untouched.

pub(crate) async fn reload_task(bridge: Arc<dyn HostBridge>, tx: mpsc::Sender<AppEvent>) {
    match fetch_snapshot(bridge.as_ref()).await {
        Ok(snapshot) => {
            let _ = tx.send(AppEvent::Snapshot(snapshot)).await;
        }
        Err(e) => tracing::warn!(error = %e, "history reload failed"),
    }
}

pub(crate) async fn delete_task(bridge: Arc<dyn HostBridge>, tx: mpsc::Sender<AppEvent>, id: i64) {
    if let Err(e) = bridge.delete_clipboard_item(id).await {
        tracing::warn!(error = %e, id, "delete failed");
        return;
    }
    // Reload strictly after the ack
    reload_task(bridge, tx).await;
}

pub(crate) async fn toggle_pin_task(
    bridge: Arc<dyn HostBridge>,
    tx: mpsc::Sender<AppEvent>,
    id: i64,
) {
    if let Err(e) = bridge.toggle_pin(id).await {
        tracing::warn!(error = %e, id, "pin toggle failed");
        return;
    }
    reload_task(bridge, tx).await;
}

pub(crate) async fn save_config_task(
    bridge: Arc<dyn HostBridge>,
    tx: mpsc::Sender<AppEvent>,
    config: AppConfig,
) {
    match bridge.update_config(config.clone()).await {
        Ok(()) => {
            let _ = tx.send(AppEvent::ConfigSaved(config)).await;
        }
        // No event: the overlay stays open with the draft intact
        Err(e) => tracing::warn!(error = %e, "saving config failed"),
    }
}
