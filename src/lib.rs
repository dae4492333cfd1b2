//! deck-tui library: profile/deck fetching, card state and terminal rendering.

pub mod api;
pub mod app_core;
pub mod config;
pub mod error;
pub mod model;
pub mod runtime;
pub mod texture;
pub mod theme;
pub mod ui;
