//! Shared event reducer: handlers for key, mouse and fetch events.
//!
//! The runtime calls these after converting its platform events to
//! [`AppKeyEvent`] / [`AppMouseEvent`], and for every [`FetchEvent`] that
//! comes back from a fetch task.

use crate::app_core::input::{AppKeyCode, AppKeyEvent, AppKeyKind, AppMouseEvent, AppMouseKind};
use crate::app_core::state::{AppState, FetchEvent};

/// Handle a runtime-agnostic key event, mutating `app` in place.
///
/// May set `app.pending_action`; the runtime is responsible for acting on it
/// after this function returns.
pub fn handle_key_event(app: &mut AppState, event: AppKeyEvent) {
    if event.kind != AppKeyKind::Press {
        return;
    }

    let code = event.code;

    if event.ctrl && code == AppKeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.show_help {
        match code {
            AppKeyCode::Char('?') | AppKeyCode::Esc | AppKeyCode::Enter => app.show_help = false,
            AppKeyCode::Char('q') => app.should_quit = true,
            _ => {}
        }
        return;
    }

    match code {
        AppKeyCode::Char('q') | AppKeyCode::Esc => app.should_quit = true,
        AppKeyCode::Char('?') => app.show_help = true,
        AppKeyCode::Right | AppKeyCode::Char('n') | AppKeyCode::Char('l') => {
            app.advance_user();
        }
        AppKeyCode::Left | AppKeyCode::Char('p') | AppKeyCode::Char('h') => {
            app.previous_user();
        }
        AppKeyCode::Char('r') => {
            app.reload_user();
        }
        _ => {}
    }
}

/// Handle a runtime-agnostic mouse event.
///
/// Returns `true` if the UI needs to be redrawn.
pub fn handle_mouse_event(app: &mut AppState, event: AppMouseEvent) -> bool {
    let over_next = app
        .next_button_area
        .is_some_and(|area| area.contains((event.column, event.row).into()));

    match event.kind {
        AppMouseKind::Move => {
            if app.next_hovered == over_next {
                return false;
            }
            app.next_hovered = over_next;
            true
        }
        AppMouseKind::LeftDown => over_next && app.next_enabled && app.advance_user(),
    }
}

/// Apply the outcome of a fetch. Events from a superseded cycle are dropped.
pub fn handle_fetch_event(app: &mut AppState, event: FetchEvent) {
    if event.generation() != app.generation {
        tracing::debug!(
            "[CYCLE] dropping result of cycle {} (current {})",
            event.generation(),
            app.generation
        );
        return;
    }

    match event {
        FetchEvent::ProfileLoaded { profile, .. } => app.apply_profile(profile),
        FetchEvent::ProfileFailed { error, .. } => app.apply_profile_failure(&error),
        FetchEvent::CharacterLoaded { slot, record, .. } => app.apply_character(slot, &record),
        FetchEvent::CharacterFailed { slot, error, .. } => {
            app.apply_character_failure(slot, &error)
        }
        FetchEvent::ImageLoaded { slot, texture, .. } => app.apply_image(slot, texture),
        FetchEvent::ImageFailed { slot, error, .. } => app.apply_image_failure(slot, &error),
    }
}
