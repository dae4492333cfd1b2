//! Error types for fetching and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single profile, character or image fetch.
///
/// None of these escape the fetch they occur in: the state layer logs them
/// and applies the local fallback (fallback deck, placeholder texture,
/// skipped slot).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success HTTP status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Connection, timeout or body transfer failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The image payload could not be decoded.
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    /// A card update addressed a slot that does not exist.
    #[error("invalid card slot {0}")]
    InvalidSlot(usize),
}

/// Errors raised while loading or validating [`crate::config::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the user config/data directories")]
    NoProjectDirs,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to load placeholder image {path}: {source}")]
    Placeholder {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
