//! Wire types for the profile and character endpoints.

use serde::Deserialize;

/// A user profile as served by the profile endpoint.
///
/// Every field is optional on the wire; missing values fall back to their
/// defaults instead of failing the whole fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub id: i64,
    pub username: Option<String>,
    pub name: Option<String>,
    /// Ordered character ids making up the user's deck.
    pub deck: Option<Vec<i64>>,
}

impl UserProfile {
    /// The `username` when it is non-empty, otherwise `name`.
    pub fn display_name(&self) -> &str {
        match self.username.as_deref() {
            Some(username) if !username.is_empty() => username,
            _ => self.name.as_deref().unwrap_or(""),
        }
    }

    /// The deck, if present and non-empty.
    pub fn deck_ids(&self) -> Option<&[i64]> {
        self.deck.as_deref().filter(|deck| !deck.is_empty())
    }
}

/// A character record as served by the character endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CharacterRecord {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub species: String,
    /// Absolute URL of the character portrait.
    pub image: String,
}

impl CharacterRecord {
    /// Second card line, e.g. `Alive - Human`.
    pub fn subtitle(&self) -> String {
        format!("{} - {}", self.status, self.species)
    }
}

/// Where the ids painted in the current cycle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeckSource {
    #[default]
    None,
    Profile,
    Fallback,
}

impl DeckSource {
    pub fn label(self) -> &'static str {
        match self {
            DeckSource::None => "-",
            DeckSource::Profile => "deck",
            DeckSource::Fallback => "fallback",
        }
    }
}
