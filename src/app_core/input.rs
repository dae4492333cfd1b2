//! Runtime-agnostic input event types.
//!
//! The terminal runtime converts crossterm events into these types before
//! calling the shared reducer, which keeps the reducer testable without a
//! terminal.

/// Runtime-agnostic key codes used by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKeyCode {
    Char(char),
    Left,
    Right,
    Enter,
    Esc,
}

/// Whether a key event is the initial press, an auto-repeat while held, or
/// the release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKeyKind {
    Press,
    Repeat,
    Release,
}

/// A runtime-agnostic keyboard event.
#[derive(Debug, Clone, Copy)]
pub struct AppKeyEvent {
    pub code: AppKeyCode,
    pub ctrl: bool,
    /// Only `Press` triggers actions; holding a key must not keep navigating.
    pub kind: AppKeyKind,
}

impl AppKeyEvent {
    pub fn new(code: AppKeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            kind: AppKeyKind::Press,
        }
    }
}

/// The kind of a runtime-agnostic mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMouseKind {
    Move,
    LeftDown,
}

/// A runtime-agnostic mouse event in terminal cell coordinates.
#[derive(Debug, Clone, Copy)]
pub struct AppMouseEvent {
    pub kind: AppMouseKind,
    pub column: u16,
    pub row: u16,
}
