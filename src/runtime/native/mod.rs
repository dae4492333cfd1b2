//! Native terminal runtime: crossterm input, ratatui output, tokio fetches.

pub mod tasks;

use crate::api::DeckClient;
use crate::app_core::input::{AppKeyCode, AppKeyEvent, AppKeyKind, AppMouseEvent, AppMouseKind};
use crate::app_core::reducer;
use crate::app_core::state::AppState;
use crate::ui;
use anyhow::Result;
use crossterm::event::{
    self, Event, EventStream, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use futures::StreamExt;
use ratatui::Terminal;
use std::io;
use std::path::Path;
use tasks::CycleTasks;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `DECK_TUI_LOG=debug`.
pub const LOG_ENV: &str = "DECK_TUI_LOG";

/// Routes `tracing` output to a daily log file; the terminal belongs to the UI.
///
/// Keep the returned guard alive for the lifetime of the program or buffered
/// lines are lost on exit.
pub fn init_logging(log_dir: &Path) -> Result<WorkerGuard> {
    let appender = tracing_appender::rolling::daily(log_dir, "deck-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))?;
    Ok(guard)
}

/// Asks the terminal to tag key events as press, repeat or release.
///
/// Only terminals speaking the kitty keyboard protocol honour this; elsewhere
/// auto-repeat still arrives as plain presses.
pub fn push_key_event_types<W: io::Write>(out: &mut W) -> io::Result<()> {
    execute!(
        out,
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
}

pub fn pop_key_event_types<W: io::Write>(out: &mut W) -> io::Result<()> {
    execute!(out, PopKeyboardEnhancementFlags)
}

// ---------------------------------------------------------------------------
// Crossterm → shared-reducer adapters
// ---------------------------------------------------------------------------

pub fn crossterm_to_app_key_event(
    code: KeyCode,
    modifiers: KeyModifiers,
    kind: KeyEventKind,
) -> Option<AppKeyEvent> {
    let kind = match kind {
        KeyEventKind::Press => AppKeyKind::Press,
        KeyEventKind::Repeat => AppKeyKind::Repeat,
        KeyEventKind::Release => AppKeyKind::Release,
    };

    let key_code = match code {
        KeyCode::Char(c) => AppKeyCode::Char(c),
        KeyCode::Left => AppKeyCode::Left,
        KeyCode::Right => AppKeyCode::Right,
        KeyCode::Enter => AppKeyCode::Enter,
        KeyCode::Esc => AppKeyCode::Esc,
        _ => return None,
    };

    Some(AppKeyEvent {
        code: key_code,
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        kind,
    })
}

pub fn crossterm_to_app_mouse_event(mouse: &event::MouseEvent) -> Option<AppMouseEvent> {
    let kind = match mouse.kind {
        MouseEventKind::Down(event::MouseButton::Left) => AppMouseKind::LeftDown,
        MouseEventKind::Moved => AppMouseKind::Move,
        _ => return None,
    };
    Some(AppMouseEvent {
        kind,
        column: mouse.column,
        row: mouse.row,
    })
}

/// Terminal event → reducer. Returns `true` when a redraw is needed.
fn handle_terminal_event(app: &mut AppState, event: Event) -> bool {
    match event {
        Event::Key(key) => {
            if let Some(event) = crossterm_to_app_key_event(key.code, key.modifiers, key.kind) {
                reducer::handle_key_event(app, event);
            }
            true
        }
        Event::Mouse(mouse) => crossterm_to_app_mouse_event(&mouse)
            .is_some_and(|event| reducer::handle_mouse_event(app, event)),
        Event::Resize(_, _) => true,
        _ => false,
    }
}

/// Runs the UI loop until the user quits.
///
/// Terminal input and fetch results are interleaved on one thread; fetch
/// tasks only ever talk to the state through the channel.
pub async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    client: DeckClient,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut tasks = CycleTasks::new(client, tx);
    let mut input = EventStream::new();

    if let Some(action) = app.pending_action.take() {
        tasks.dispatch(action);
    }
    terminal.draw(|f| ui::ui(f, app))?;

    while !app.should_quit {
        let redraw = tokio::select! {
            maybe_event = input.next() => match maybe_event {
                Some(Ok(event)) => handle_terminal_event(app, event),
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
            Some(event) = rx.recv() => {
                reducer::handle_fetch_event(app, event);
                true
            }
        };

        if let Some(action) = app.pending_action.take() {
            tasks.dispatch(action);
        }
        if redraw {
            terminal.draw(|f| ui::ui(f, app))?;
        }
    }

    tasks.abort_all();
    Ok(())
}
