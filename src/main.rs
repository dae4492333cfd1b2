//! # deck-tui
//!
//! A terminal card viewer: fetches a user's profile, resolves the character
//! ids in their deck and paints one card per slot.

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use deck_tui::api::DeckClient;
use deck_tui::app_core::state::AppState;
use deck_tui::config::{self, Config};
use deck_tui::runtime::native;
use deck_tui::theme;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "deck-tui: browse user decks in the terminal.\n\
                  Each user's profile lists character ids; every id becomes a card with name, status and portrait."
)]
struct Args {
    /// Path to a TOML config file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL for profile requests; the user id is appended
    #[arg(long)]
    user_url: Option<String>,

    /// Base URL for character requests; the character id is appended
    #[arg(long)]
    character_url: Option<String>,

    /// Number of navigable users
    #[arg(long)]
    users: Option<u32>,

    /// User shown at startup
    #[arg(short, long)]
    user: Option<u32>,

    /// Fallback character ids, comma separated (e.g. 300,2,47)
    #[arg(long, value_delimiter = ',')]
    fallback: Option<Vec<i64>>,

    /// Number of card slots
    #[arg(long)]
    slots: Option<usize>,

    /// Image shown in empty or failed slots
    #[arg(long)]
    placeholder: Option<PathBuf>,

    /// UI theme (dracula, solarized, gruvbox, everforest_light)
    #[arg(short, long)]
    theme: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Show all paths used by the application (config, logs)
    #[arg(long)]
    paths: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    /// Command-line values win over the file and the defaults.
    fn apply_to(&self, config: &mut Config) {
        if let Some(url) = &self.user_url {
            config.user_base_url = url.clone();
        }
        if let Some(url) = &self.character_url {
            config.character_base_url = url.clone();
        }
        if let Some(users) = self.users {
            config.total_users = users;
        }
        if let Some(user) = self.user {
            config.start_user = user;
        }
        if let Some(ids) = &self.fallback {
            config.fallback_ids = ids.clone();
        }
        if let Some(slots) = self.slots {
            config.slot_count = slots;
        }
        if let Some(path) = &self.placeholder {
            config.placeholder = Some(path.clone());
        }
        if let Some(name) = &self.theme {
            config.theme = name.clone();
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = secs;
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let app_version = format!("v{}", env!("CARGO_PKG_VERSION"));

    let default_path = config::default_config_path().ok();
    let mut config = Config::load_layered(args.config.as_deref(), default_path.as_deref())?;
    args.apply_to(&mut config);
    config.normalize();
    config.validate()?;

    let log_dir = config::get_log_dir()?;

    if args.paths {
        println!("App Paths:");
        match &default_path {
            Some(path) => println!("  Config:  {}", path.display()),
            None => println!("  Config:  (unavailable)"),
        }
        println!("  Logs:    {}", log_dir.display());
        return Ok(());
    }

    if args.print_config {
        print!("{}", toml::to_string(&config)?);
        return Ok(());
    }

    let _log_guard = native::init_logging(&log_dir)?;
    tracing::info!("deck-tui {} starting", app_version);
    tracing::debug!("config: {:?}", config);

    let theme = theme::Theme::from_str(&config.theme)
        .map_err(anyhow::Error::msg)?
        .config();
    let placeholder = config.load_placeholder()?;
    let client = DeckClient::new(&config)?;

    let mut app = AppState::new(
        config.slot_count,
        config.total_users,
        config.fallback_ids.clone(),
        placeholder,
        theme,
        app_version,
    );
    app.select_user(config.start_user);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let key_event_types = matches!(supports_keyboard_enhancement(), Ok(true));
    if key_event_types {
        native::push_key_event_types(&mut stdout)?;
    } else {
        tracing::info!("terminal can't report key repeats; held keys act as presses");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = native::run_app(&mut terminal, &mut app, client).await;

    // Restore terminal
    if key_event_types {
        native::pop_key_event_types(terminal.backend_mut())?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!("exiting with error: {err:#}");
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_file_values() {
        let args = Args::try_parse_from([
            "deck-tui",
            "--users",
            "6",
            "--user",
            "3",
            "--fallback",
            "1,2,3,4",
            "--theme",
            "gruvbox",
        ])
        .unwrap();

        let mut config = Config::from_toml_str("total_users = 2\nslot_count = 4\n").unwrap();
        args.apply_to(&mut config);

        assert_eq!(config.total_users, 6);
        assert_eq!(config.start_user, 3);
        assert_eq!(config.fallback_ids, vec![1, 2, 3, 4]);
        assert_eq!(config.slot_count, 4);
        assert_eq!(config.theme, "gruvbox");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let args = Args::try_parse_from(["deck-tui"]).unwrap();
        let mut config = Config::default();
        args.apply_to(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_urls_normalized_after_override() {
        let args =
            Args::try_parse_from(["deck-tui", "--user-url", "http://localhost:3000/users"]).unwrap();
        let mut config = Config::default();
        args.apply_to(&mut config);
        config.normalize();
        assert_eq!(config.user_base_url, "http://localhost:3000/users/");
    }
}
