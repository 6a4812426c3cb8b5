// TUI module - terminal lifecycle and the event loop
//
// Sets up the terminal, runs a single-threaded event loop and tears the
// terminal back down. The loop multiplexes keyboard/mouse input, completed
// host calls and host push events with tokio::select!, so every state
// transition runs to completion on this task before the next one starts.

pub mod app;
pub mod keymap;
pub mod scroll;
pub mod settings;
pub mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::host::{EventSubscription, HostBridge};
use crate::logging::LogBuffer;
use app::{App, AppEvent, ITEM_HEIGHT};
use keymap::{dispatch, Command, OverlayContext};

/// Buffered host-call results; the loop drains these quickly
const APP_EVENT_CAPACITY: usize = 64;

/// Run the client UI until the user hides into the background forever or
/// confirms an exit.
///
/// The push-event subscription is taken once here and released when this
/// function returns.
pub async fn run(
    bridge: Arc<dyn HostBridge>,
    mut subscription: EventSubscription,
    logs: LogBuffer,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (events_tx, mut events_rx) = mpsc::channel(APP_EVENT_CAPACITY);
    let mut app = App::new(bridge, events_tx);
    app.request_reload(); // initial population

    let result = run_event_loop(&mut terminal, &mut app, &mut events_rx, &mut subscription, &logs).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events_rx: &mut mpsc::Receiver<AppEvent>,
    subscription: &mut EventSubscription,
    logs: &LogBuffer,
) -> Result<()> {
    // Periodic redraw so relative timestamps and footer warnings age out
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| ui::draw(f, app, logs))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard or mouse input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => handle_key_event(app, key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            _ = tick_interval.tick() => {}

            // Completed host calls (snapshots, config acks)
            Some(event) = events_rx.recv() => app.handle_app_event(event),

            // Host push events
            Some(event) = subscription.recv() => app.handle_host_event(event),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Route a key press through the table-driven dispatcher
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }
    if let Some(command) = dispatch(app.overlay_context(), &key_event) {
        app.apply(command);
    }
}

/// Mouse input: wheel moves the selection, left click activates a row
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    if app.overlay_context() != OverlayContext::Browse {
        return; // overlays are keyboard-only
    }

    match mouse_event.kind {
        MouseEventKind::ScrollUp => app.apply(Command::MoveUp),
        MouseEventKind::ScrollDown => app.apply(Command::MoveDown),
        MouseEventKind::Down(MouseButton::Left) => {
            let area = app.list_area;
            let in_list = mouse_event.row >= area.y
                && mouse_event.row < area.y + area.height
                && mouse_event.column >= area.x
                && mouse_event.column < area.x + area.width;
            if in_list {
                let rel_row = (mouse_event.row - area.y) as usize;
                let index = (app.scroll.offset() + rel_row) / ITEM_HEIGHT;
                app.click_row(index);
            }
        }
        _ => {}
    }
}
