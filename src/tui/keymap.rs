// Keyboard dispatch
//
// A table-driven dispatcher keyed by (overlay context, key combination).
// The precedence that used to be implicit in a chain of conditionals is
// explicit here: the topmost overlay picks the binding table, so Escape
// closing the exit guard before the settings overlay, and navigation keys
// being dead while settings is open, are both lookup results that tests
// can assert directly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which binding table is active, decided by the topmost overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayContext {
    Browse,
    Settings,
    ExitGuard,
}

impl OverlayContext {
    /// The exit guard outranks the settings overlay, which outranks the
    /// plain browse view.
    pub fn topmost(exit_guard_open: bool, settings_open: bool) -> Self {
        if exit_guard_open {
            OverlayContext::ExitGuard
        } else if settings_open {
            OverlayContext::Settings
        } else {
            OverlayContext::Browse
        }
    }
}

/// State transitions a key press can request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Browse
    MoveUp,
    MoveDown,
    Activate,
    CopyEntry,
    DeleteEntry,
    TogglePin,
    ToggleSettings,
    CycleTab,
    RequestExit,
    HideWindow,
    QueryChar(char),
    QueryBackspace,

    // Settings overlay
    CancelSettings,
    SaveSettings,
    SettingsFocusNext,
    SettingsFocusPrev,
    SettingsPrevOption,
    SettingsNextOption,
    SettingsInput(char),
    SettingsBackspace,

    // Exit guard
    CancelExit,
    ConfirmExit,
}

struct Binding {
    ctx: OverlayContext,
    code: KeyCode,
    mods: KeyModifiers,
    command: Command,
}

const fn bind(
    ctx: OverlayContext,
    code: KeyCode,
    mods: KeyModifiers,
    command: Command,
) -> Binding {
    Binding {
        ctx,
        code,
        mods,
        command,
    }
}

/// Binding table, scanned in order. Escape rows sit first in each context
/// so the close-the-topmost-overlay rule reads straight off the table.
static BINDINGS: &[Binding] = &[
    // Exit guard - absorbs everything except an explicit answer
    bind(
        OverlayContext::ExitGuard,
        KeyCode::Esc,
        KeyModifiers::NONE,
        Command::CancelExit,
    ),
    bind(
        OverlayContext::ExitGuard,
        KeyCode::Char('n'),
        KeyModifiers::NONE,
        Command::CancelExit,
    ),
    bind(
        OverlayContext::ExitGuard,
        KeyCode::Enter,
        KeyModifiers::NONE,
        Command::ConfirmExit,
    ),
    bind(
        OverlayContext::ExitGuard,
        KeyCode::Char('y'),
        KeyModifiers::NONE,
        Command::ConfirmExit,
    ),
    // Settings overlay - form keys only, navigation is dead here
    bind(
        OverlayContext::Settings,
        KeyCode::Esc,
        KeyModifiers::NONE,
        Command::CancelSettings,
    ),
    bind(
        OverlayContext::Settings,
        KeyCode::Enter,
        KeyModifiers::NONE,
        Command::SaveSettings,
    ),
    bind(
        OverlayContext::Settings,
        KeyCode::Tab,
        KeyModifiers::NONE,
        Command::SettingsFocusNext,
    ),
    bind(
        OverlayContext::Settings,
        KeyCode::BackTab,
        KeyModifiers::SHIFT,
        Command::SettingsFocusPrev,
    ),
    bind(
        OverlayContext::Settings,
        KeyCode::Up,
        KeyModifiers::NONE,
        Command::SettingsPrevOption,
    ),
    bind(
        OverlayContext::Settings,
        KeyCode::Down,
        KeyModifiers::NONE,
        Command::SettingsNextOption,
    ),
    // Browse view
    bind(
        OverlayContext::Browse,
        KeyCode::Esc,
        KeyModifiers::NONE,
        Command::HideWindow,
    ),
    bind(
        OverlayContext::Browse,
        KeyCode::Down,
        KeyModifiers::NONE,
        Command::MoveDown,
    ),
    bind(
        OverlayContext::Browse,
        KeyCode::Up,
        KeyModifiers::NONE,
        Command::MoveUp,
    ),
    bind(
        OverlayContext::Browse,
        KeyCode::Enter,
        KeyModifiers::NONE,
        Command::Activate,
    ),
    bind(
        OverlayContext::Browse,
        KeyCode::Delete,
        KeyModifiers::NONE,
        Command::DeleteEntry,
    ),
    bind(
        OverlayContext::Browse,
        KeyCode::Char('p'),
        KeyModifiers::CONTROL,
        Command::TogglePin,
    ),
    // Copy without hiding the window
    bind(
        OverlayContext::Browse,
        KeyCode::Char('o'),
        KeyModifiers::CONTROL,
        Command::CopyEntry,
    ),
    bind(
        OverlayContext::Browse,
        KeyCode::Char('i'),
        KeyModifiers::CONTROL,
        Command::ToggleSettings,
    ),
    // Ctrl+Tab where the terminal delivers it, plain Tab everywhere else
    bind(
        OverlayContext::Browse,
        KeyCode::Tab,
        KeyModifiers::CONTROL,
        Command::CycleTab,
    ),
    bind(
        OverlayContext::Browse,
        KeyCode::Tab,
        KeyModifiers::NONE,
        Command::CycleTab,
    ),
    bind(
        OverlayContext::Browse,
        KeyCode::Char('q'),
        KeyModifiers::CONTROL,
        Command::RequestExit,
    ),
];

/// Resolve a key press in the given context.
///
/// Table rows are tried first; printable characters and Backspace then fall
/// through to the search field (Browse) or the focused form field
/// (Settings). Anything else is a no-op.
pub fn dispatch(ctx: OverlayContext, key: &KeyEvent) -> Option<Command> {
    // Shift is part of the typed character itself, not a chord
    let mods = match key.code {
        KeyCode::Char(_) => key.modifiers - KeyModifiers::SHIFT,
        _ => key.modifiers,
    };

    for binding in BINDINGS {
        if binding.ctx == ctx && binding.code == key.code && binding.mods == mods {
            return Some(binding.command.clone());
        }
    }

    if mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }

    match (ctx, key.code) {
        (OverlayContext::Browse, KeyCode::Char(c)) => Some(Command::QueryChar(c)),
        (OverlayContext::Browse, KeyCode::Backspace) => Some(Command::QueryBackspace),
        (OverlayContext::Settings, KeyCode::Char(c)) => Some(Command::SettingsInput(c)),
        (OverlayContext::Settings, KeyCode::Backspace) => Some(Command::SettingsBackspace),
        _ => None,
    }
}
