//! Runtime configuration: endpoints, fallback deck, navigation bounds.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! command-line overrides applied by the binary.

use crate::error::ConfigError;
use crate::texture::Texture;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_USER_BASE_URL: &str =
    "https://my-json-server.typicode.com/WatermelonSuggar/jsonDB-Wendy/users/";
pub const DEFAULT_CHARACTER_BASE_URL: &str = "https://rickandmortyapi.com/api/character/";
pub const DEFAULT_FALLBACK_IDS: [i64; 3] = [300, 2, 47];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix for profile requests; the user id is appended.
    pub user_base_url: String,
    /// Prefix for character requests; the character id is appended.
    pub character_base_url: String,
    /// Character ids painted when a profile has no usable deck.
    pub fallback_ids: Vec<i64>,
    /// Number of navigable users, ids run `1..=total_users`.
    pub total_users: u32,
    /// User selected at startup.
    pub start_user: u32,
    /// Number of card slots on screen.
    pub slot_count: usize,
    /// Image shown in empty or failed slots.
    pub placeholder: Option<PathBuf>,
    pub theme: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_base_url: DEFAULT_USER_BASE_URL.to_string(),
            character_base_url: DEFAULT_CHARACTER_BASE_URL.to_string(),
            fallback_ids: DEFAULT_FALLBACK_IDS.to_vec(),
            total_users: 4,
            start_user: 1,
            slot_count: 3,
            placeholder: None,
            theme: "dracula".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given (it must exist), else `default_path` when it
    /// exists, else the built-in defaults.
    pub fn load_layered(
        explicit: Option<&Path>,
        default_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_path {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn normalize(&mut self) {
        self.user_base_url = normalize_base_url(&self.user_base_url);
        self.character_base_url = normalize_base_url(&self.character_base_url);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user_base_url.trim().is_empty() || self.character_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base URLs must not be empty".into()));
        }
        if self.total_users == 0 {
            return Err(ConfigError::Invalid("total_users must be at least 1".into()));
        }
        if self.start_user < 1 || self.start_user > self.total_users {
            return Err(ConfigError::Invalid(format!(
                "start_user {} is outside 1..={}",
                self.start_user, self.total_users
            )));
        }
        if self.slot_count == 0 {
            return Err(ConfigError::Invalid("slot_count must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn load_placeholder(&self) -> Result<Option<Texture>, ConfigError> {
        let Some(path) = &self.placeholder else {
            return Ok(None);
        };
        Texture::open(path)
            .map(Some)
            .map_err(|source| ConfigError::Placeholder {
                path: path.clone(),
                source,
            })
    }
}

/// Appends the trailing `/` that request URLs are built against.
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() || url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("com", "deck-tui", "deck-tui").ok_or(ConfigError::NoProjectDirs)
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

pub fn get_log_dir() -> Result<PathBuf, ConfigError> {
    let log_dir = project_dirs()?.data_dir().join("logs");
    fs::create_dir_all(&log_dir).map_err(|source| ConfigError::CreateDir {
        path: log_dir.clone(),
        source,
    })?;
    Ok(log_dir)
}
