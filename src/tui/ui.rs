// Rendering
//
// Pure view code: reads App state, draws widgets, and records the list
// geometry the mouse handler needs. No state transitions happen here.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::app::{App, ITEM_HEIGHT};
use super::settings::SettingsField;
use crate::logging::LogBuffer;
use crate::model::ClipboardEntry;
use crate::projection::Tab;
use crate::theme::ThemeColors;

/// Footer shows a captured warning for this long
const WARNING_TTL_SECS: i64 = 5;

pub fn draw(f: &mut Frame, app: &mut App, logs: &LogBuffer) {
    let theme = app.theme();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search header
            Constraint::Length(1), // tab bar
            Constraint::Min(1),    // entry list
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    f.render_widget(Block::default().style(theme.base()), f.area());
    render_search(f, chunks[0], app, theme);
    render_tab_bar(f, chunks[1], app, theme);
    render_list(f, chunks[2], app, theme);
    render_footer(f, chunks[3], app, theme, logs);

    if app.settings.is_some() {
        render_settings_overlay(f, app, theme);
    }
    if app.exit_guard.is_open() {
        render_exit_guard(f, app, theme);
    }
}

fn render_search(f: &mut Frame, area: Rect, app: &App, theme: &ThemeColors) {
    let content = if app.query.is_empty() {
        Line::from(Span::styled("Search clipboard history...", theme.muted()))
    } else {
        Line::from(vec![
            Span::raw(app.query.clone()),
            Span::styled("▏", theme.accent_style()),
        ])
    };

    let search = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(" Search "),
    );
    f.render_widget(search, area);
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App, theme: &ThemeColors) {
    let selected = match app.tab {
        Tab::History => 0,
        Tab::Pinned => 1,
    };
    let tabs = Tabs::new([Tab::History.label(), Tab::Pinned.label()])
        .select(selected)
        .style(theme.muted())
        .highlight_style(theme.accent_style().add_modifier(ratatui::style::Modifier::BOLD))
        .divider("│");
    f.render_widget(tabs, area);
}

fn render_list(f: &mut Frame, area: Rect, app: &mut App, theme: &'static ThemeColors) {
    app.list_area = area;
    app.scroll.set_viewport(area.height as usize);

    let len = app.projection().len();
    app.scroll.sync(app.selected, ITEM_HEIGHT, len);

    if len == 0 {
        render_empty_state(f, area, app, theme);
        return;
    }

    let first_visible = app.scroll.offset() / ITEM_HEIGHT;
    let visible_items = area.height as usize / ITEM_HEIGHT;
    let selected = app.selected;
    let now = Utc::now();
    let width = area.width as usize;

    let items: Vec<ListItem> = app
        .projection()
        .iter()
        .enumerate()
        .skip(first_visible)
        .take(visible_items)
        .map(|(i, entry)| entry_row(entry, i == selected, width, now, theme))
        .collect();

    f.render_widget(List::new(items), area);
}

fn entry_row(
    entry: &ClipboardEntry,
    is_selected: bool,
    width: usize,
    now: DateTime<Utc>,
    theme: &'static ThemeColors,
) -> ListItem<'static> {
    let pin_marker = if entry.pinned { "📌 " } else { "   " };
    let time = format_relative(entry.timestamp, now);
    let reserved = 3 + time.width() + 4; // pin marker + separator + timestamp
    let preview = truncate_to_width(&preview_text(entry), width.saturating_sub(reserved));

    let text_style = if is_selected {
        theme.selection()
    } else {
        Style::default().fg(theme.text)
    };
    let line = Line::from(vec![
        Span::styled(pin_marker.to_string(), theme.accent_style()),
        Span::styled(preview, text_style),
        Span::styled(format!(" · {time}"), theme.muted()),
    ]);

    let row_style = if is_selected {
        theme.selection()
    } else {
        Style::default()
    };
    ListItem::new(line).style(row_style)
}

fn render_empty_state(f: &mut Frame, area: Rect, app: &App, theme: &ThemeColors) {
    let lines = if app.query.is_empty() && app.tab == Tab::History {
        vec![
            Line::from(""),
            Line::from(Span::raw("No clipboard history")),
            Line::from(Span::styled(
                "Copy something and it will appear here",
                theme.muted(),
            )),
            Line::from(Span::styled("Supports text and images", theme.muted())),
        ]
    } else if app.tab == Tab::Pinned && app.query.is_empty() {
        vec![
            Line::from(""),
            Line::from(Span::raw("Nothing pinned yet")),
            Line::from(Span::styled("Pin an entry with Ctrl+P", theme.muted())),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::raw("No matches")),
            Line::from(Span::styled(
                "Try a shorter search or another tab",
                theme.muted(),
            )),
        ]
    };

    let empty = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(empty, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App, theme: &ThemeColors, logs: &LogBuffer) {
    // Surface a recent warning instead of the hint line - tracing output
    // must never write to the terminal directly while the TUI owns it
    if let Some(entry) = logs.latest_warning() {
        if (Utc::now() - entry.timestamp).num_seconds() < WARNING_TTL_SECS {
            let warning = Paragraph::new(Line::from(Span::styled(
                format!(" {}", entry.message),
                theme.danger_style(),
            )));
            f.render_widget(warning, area);
            return;
        }
    }

    let text = format!(
        " {} to launch | ↑↓ select | Enter copy & close | Esc close | {} items",
        app.cache.config().hotkey,
        app.projection().len()
    );
    f.render_widget(Paragraph::new(Line::from(Span::styled(text, theme.muted()))), area);
}

fn render_settings_overlay(f: &mut Frame, app: &App, theme: &ThemeColors) {
    let Some(staging) = &app.settings else {
        return;
    };

    let area = centered_rect(54, 11, f.area());
    f.render_widget(Clear, area);

    let field_line = |field: SettingsField, value: String| {
        let focused = staging.focus == field;
        let marker = if focused { "▸ " } else { "  " };
        let label_style = if focused {
            theme.accent_style().add_modifier(ratatui::style::Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        let mut spans = vec![
            Span::styled(format!("{marker}{:<14}", field.label()), label_style),
            Span::raw(value),
        ];
        if focused && field != SettingsField::Theme {
            spans.push(Span::styled("▏", theme.accent_style()));
        }
        Line::from(spans)
    };

    let theme_value = format!("◂ {} ▸", staging.staged().theme.display_name());
    let lines = vec![
        Line::from(""),
        field_line(SettingsField::HistoryLimit, staging.limit_input().to_string()),
        field_line(SettingsField::Hotkey, staging.staged().hotkey.clone()),
        field_line(SettingsField::Theme, theme_value),
        Line::from(""),
        Line::from(Span::styled(
            "  e.g. CommandOrControl+Shift+V, Alt+V, Ctrl+Space",
            theme.muted(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Tab next field · ↑↓ theme · Enter save · Esc cancel",
            theme.muted(),
        )),
    ];

    let overlay = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.accent_style())
            .title(" Settings ")
            .style(theme.base()),
    );
    f.render_widget(overlay, area);
}

fn render_exit_guard(f: &mut Frame, app: &App, theme: &ThemeColors) {
    let pinned = app.cache.pinned_count();
    let area = centered_rect(56, 10, f.area());
    f.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::raw("Are you sure you want to exit Clipray?")),
        Line::from(""),
        Line::from(Span::styled(
            "⚠ Clipboard monitoring stops until the next start.",
            theme.muted(),
        )),
    ];
    if pinned > 0 {
        let plural = if pinned == 1 { "item" } else { "items" };
        lines.push(Line::from(Span::styled(
            format!("📌 {pinned} pinned {plural} will remain saved."),
            theme.muted(),
        )));
    }
    lines.push(Line::from(Span::styled(
        "💾 Your history is saved and restored on restart.",
        theme.muted(),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[Enter] Exit", theme.danger_style()),
        Span::raw("   "),
        Span::styled("[Esc] Cancel", theme.accent_style()),
    ]));

    let modal = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.danger_style())
            .title(" Exit Clipray ")
            .style(theme.base()),
    );
    f.render_widget(modal, area);
}

/// Fixed-size rect centered in `area`, clamped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Single display line for an entry: text preview or image placeholder
pub(crate) fn preview_text(entry: &ClipboardEntry) -> String {
    match entry.image_byte_len() {
        Some(len) => format!("[image · {}]", format_bytes(len)),
        None => entry
            .content
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Truncate to a display width, appending an ellipsis when cut
pub(crate) fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Compact relative timestamp for list rows
pub(crate) fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}

fn format_bytes(len: usize) -> String {
    if len < 1024 {
        format!("{len} B")
    } else if len < 1024 * 1024 {
        format!("{:.1} KB", len as f64 / 1024.0)
    } else {
        format!("{:.1} MB", len as f64 / (1024.0 * 1024.0))
    }
}
