//! Shared application state, types, and state-mutation methods.
//!
//! This module is runtime-agnostic: it never performs I/O. Navigation queues
//! an [`AppAction`] in `pending_action`; the runtime executes it and feeds the
//! outcome back as [`FetchEvent`]s.

use crate::error::FetchError;
use crate::model::{CharacterRecord, DeckSource, UserProfile};
use crate::texture::Texture;
use crate::theme::ThemeConfig;
use ratatui::layout::Rect;
use std::rc::Rc;

/// One visual card position. Each slot owns its own image and text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardSlot {
    /// `None` renders as an empty frame.
    pub image: Option<Rc<Texture>>,
    pub title: String,
    pub subtitle: String,
}

impl CardSlot {
    fn new(placeholder: Option<&Rc<Texture>>) -> Self {
        Self {
            image: placeholder.cloned(),
            title: String::new(),
            subtitle: String::new(),
        }
    }

    /// Back to placeholder image and empty text.
    pub fn reset(&mut self, placeholder: Option<&Rc<Texture>>) {
        *self = Self::new(placeholder);
    }
}

/// A character to fetch and paint into `slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardRequest {
    pub slot: usize,
    pub character_id: i64,
}

/// Work for the runtime to start after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Start a new cycle: abandon everything in flight, fetch this profile.
    LoadProfile { generation: u64, user_id: u32 },
    /// Fetch and paint each card independently.
    LoadCards {
        generation: u64,
        requests: Vec<CardRequest>,
    },
}

/// Outcome of one fetch, tagged with the cycle that started it.
#[derive(Debug)]
pub enum FetchEvent {
    ProfileLoaded {
        generation: u64,
        profile: UserProfile,
    },
    ProfileFailed {
        generation: u64,
        error: FetchError,
    },
    CharacterLoaded {
        generation: u64,
        slot: usize,
        record: CharacterRecord,
    },
    CharacterFailed {
        generation: u64,
        slot: usize,
        error: FetchError,
    },
    ImageLoaded {
        generation: u64,
        slot: usize,
        texture: Texture,
    },
    ImageFailed {
        generation: u64,
        slot: usize,
        error: FetchError,
    },
}

impl FetchEvent {
    pub fn generation(&self) -> u64 {
        match self {
            FetchEvent::ProfileLoaded { generation, .. }
            | FetchEvent::ProfileFailed { generation, .. }
            | FetchEvent::CharacterLoaded { generation, .. }
            | FetchEvent::CharacterFailed { generation, .. }
            | FetchEvent::ImageLoaded { generation, .. }
            | FetchEvent::ImageFailed { generation, .. } => *generation,
        }
    }
}

/// Application state for the Ratatui app.
pub struct AppState {
    /// Card slots in display order
    pub slots: Vec<CardSlot>,
    /// Texture used for empty and failed slots, if configured
    pub placeholder: Option<Rc<Texture>>,
    /// Ids painted when the profile has no usable deck
    pub fallback_ids: Vec<i64>,
    /// Navigable users are `1..=total_users`
    pub total_users: u32,
    /// Last user a fetch was started for
    pub current_user: u32,
    /// Navigation cycle counter; events from older cycles are dropped
    pub generation: u64,
    /// True while the profile fetch of the current cycle is in flight
    pub loading: bool,
    /// Whether the "next" button accepts clicks
    pub next_enabled: bool,
    /// Name shown in the header
    pub player_name: String,
    /// Ids chosen for the current cycle, before truncation to the slot count
    pub deck_ids: Vec<i64>,
    pub deck_source: DeckSource,
    /// Most recent fetch failure, shown in the status bar
    pub last_error: Option<String>,
    pub theme: ThemeConfig,
    pub app_version: String,
    /// Pending action to execute after input handling
    pub pending_action: Option<AppAction>,
    /// Screen region of the "next" button (set during render)
    pub next_button_area: Option<Rect>,
    pub next_hovered: bool,
    pub show_help: bool,
    /// Flag to quit app
    pub should_quit: bool,
}

impl AppState {
    pub fn new(
        slot_count: usize,
        total_users: u32,
        fallback_ids: Vec<i64>,
        placeholder: Option<Texture>,
        theme: ThemeConfig,
        app_version: String,
    ) -> Self {
        let placeholder = placeholder.map(Rc::new);
        let slots = (0..slot_count)
            .map(|_| CardSlot::new(placeholder.as_ref()))
            .collect();
        Self {
            slots,
            placeholder,
            fallback_ids,
            total_users,
            current_user: 0,
            generation: 0,
            loading: false,
            next_enabled: true,
            player_name: String::new(),
            deck_ids: Vec::new(),
            deck_source: DeckSource::None,
            last_error: None,
            theme,
            app_version,
            pending_action: None,
            next_button_area: None,
            next_hovered: false,
            show_help: false,
            should_quit: false,
        }
    }

    /// Starts a new cycle for `user_id`.
    ///
    /// Returns `false` and leaves the state untouched when the id is out of
    /// range or a profile fetch is still in flight.
    pub fn select_user(&mut self, user_id: u32) -> bool {
        if user_id < 1 || user_id > self.total_users {
            tracing::debug!("[NAV] user {} outside 1..={}", user_id, self.total_users);
            return false;
        }
        if self.loading {
            tracing::debug!("[NAV] user {} ignored, profile fetch in flight", user_id);
            return false;
        }

        self.loading = true;
        self.next_enabled = false;
        self.current_user = user_id;
        self.generation += 1;
        self.last_error = None;
        self.pending_action = Some(AppAction::LoadProfile {
            generation: self.generation,
            user_id,
        });
        true
    }

    /// Next user, wrapping from `total_users` back to 1.
    pub fn advance_user(&mut self) -> bool {
        let next = if self.current_user >= self.total_users {
            1
        } else {
            self.current_user + 1
        };
        self.select_user(next)
    }

    /// Previous user, wrapping from 1 to `total_users`.
    pub fn previous_user(&mut self) -> bool {
        let previous = if self.current_user <= 1 {
            self.total_users
        } else {
            self.current_user - 1
        };
        self.select_user(previous)
    }

    pub fn reload_user(&mut self) -> bool {
        self.select_user(self.current_user)
    }

    pub fn validate_slot(&self, slot: usize) -> Result<(), FetchError> {
        if slot < self.slots.len() {
            Ok(())
        } else {
            Err(FetchError::InvalidSlot(slot))
        }
    }

    /// Builds the fetch request for one slot, refusing slots that don't exist.
    pub fn request_card(&self, slot: usize, character_id: i64) -> Result<CardRequest, FetchError> {
        self.validate_slot(slot)?;
        Ok(CardRequest { slot, character_id })
    }

    /// Queues one card request per usable slot and resets the rest.
    ///
    /// Usable slots are `min(ids.len(), slots.len())`. Returns that count.
    pub fn load_cards(&mut self, ids: &[i64]) -> usize {
        let usable = ids.len().min(self.slots.len());
        self.deck_ids = ids.to_vec();

        for slot in self.slots.iter_mut().skip(usable) {
            slot.reset(self.placeholder.as_ref());
        }

        let requests: Vec<CardRequest> = ids
            .iter()
            .take(usable)
            .enumerate()
            .filter_map(|(slot, &character_id)| match self.request_card(slot, character_id) {
                Ok(request) => Some(request),
                Err(err) => {
                    tracing::warn!("[CHAR] {}", err);
                    None
                }
            })
            .collect();
        if !requests.is_empty() {
            self.pending_action = Some(AppAction::LoadCards {
                generation: self.generation,
                requests,
            });
        }
        usable
    }

    pub fn apply_profile(&mut self, profile: UserProfile) {
        let who = profile.display_name().to_string();
        let deck = match profile.deck_ids() {
            Some(deck) => deck
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(","),
            None => "no deck".to_string(),
        };
        tracing::info!(
            "[USER SHOWN] id={}, username=\"{}\", deck=[{}]",
            profile.id,
            who,
            deck
        );
        self.player_name = who;

        match profile.deck_ids() {
            Some(ids) => {
                self.deck_source = DeckSource::Profile;
                self.load_cards(ids);
            }
            None => self.load_fallback_cards(),
        }
        self.finish_loading();
    }

    pub fn apply_profile_failure(&mut self, error: &FetchError) {
        tracing::error!("[USER] {}", error);
        self.last_error = Some(format!("user {}: {}", self.current_user, error));
        self.load_fallback_cards();
        self.finish_loading();
    }

    pub fn apply_character(&mut self, slot: usize, record: &CharacterRecord) {
        if let Err(err) = self.validate_slot(slot) {
            tracing::warn!("[CHAR] {}", err);
            return;
        }
        let card = &mut self.slots[slot];
        card.title = record.name.clone();
        card.subtitle = record.subtitle();
    }

    pub fn apply_character_failure(&mut self, slot: usize, error: &FetchError) {
        tracing::error!("[CHAR] slot {}: {}", slot, error);
        self.last_error = Some(format!("card {}: {}", slot + 1, error));
    }

    pub fn apply_image(&mut self, slot: usize, texture: Texture) {
        if let Err(err) = self.validate_slot(slot) {
            tracing::warn!("[IMG] {}", err);
            return;
        }
        self.slots[slot].image = Some(Rc::new(texture));
    }

    /// Swaps in the placeholder when one is configured; text is kept.
    pub fn apply_image_failure(&mut self, slot: usize, error: &FetchError) {
        tracing::error!("[IMG] slot {}: {}", slot, error);
        self.last_error = Some(format!("image {}: {}", slot + 1, error));
        if self.validate_slot(slot).is_err() {
            return;
        }
        if let Some(placeholder) = &self.placeholder {
            self.slots[slot].image = Some(Rc::clone(placeholder));
        }
    }

    fn load_fallback_cards(&mut self) {
        self.deck_source = DeckSource::Fallback;
        let ids = self.fallback_ids.clone();
        self.load_cards(&ids);
    }

    fn finish_loading(&mut self) {
        self.loading = false;
        self.next_enabled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    fn make_app(slots: usize) -> AppState {
        AppState::new(
            slots,
            4,
            vec![300, 2, 47],
            None,
            Theme::Dracula.config(),
            "v0".to_string(),
        )
    }

    fn placeholder() -> Texture {
        Texture::from_rgb(1, 1, vec![[9, 9, 9]]).unwrap()
    }

    #[test]
    fn test_select_user_out_of_range_is_noop() {
        let mut app = make_app(3);
        for id in [0, 5, u32::MAX] {
            assert!(!app.select_user(id));
        }
        assert_eq!(app.generation, 0);
        assert_eq!(app.current_user, 0);
        assert!(!app.loading);
        assert!(app.next_enabled);
        assert!(app.pending_action.is_none());
    }

    #[test]
    fn test_select_user_starts_cycle() {
        let mut app = make_app(3);
        assert!(app.select_user(2));
        assert!(app.loading);
        assert!(!app.next_enabled);
        assert_eq!(app.current_user, 2);
        assert_eq!(
            app.pending_action,
            Some(AppAction::LoadProfile {
                generation: 1,
                user_id: 2
            })
        );
    }

    #[test]
    fn test_select_user_rejected_while_loading() {
        let mut app = make_app(3);
        app.select_user(1);
        app.pending_action = None;

        for id in 1..=4 {
            assert!(!app.select_user(id));
        }
        assert_eq!(app.current_user, 1);
        assert_eq!(app.generation, 1);
        assert!(app.pending_action.is_none());
    }

    #[test]
    fn test_request_card_checks_slot() {
        let app = make_app(3);
        assert_eq!(
            app.request_card(2, 47).unwrap(),
            CardRequest {
                slot: 2,
                character_id: 47
            }
        );
        assert!(matches!(
            app.request_card(3, 47),
            Err(FetchError::InvalidSlot(3))
        ));
    }

    #[test]
    fn test_advance_wraps_to_first_user() {
        let mut app = make_app(3);
        app.current_user = 4;
        assert!(app.advance_user());
        assert_eq!(app.current_user, 1);
    }

    #[test]
    fn test_previous_wraps_to_last_user() {
        let mut app = make_app(3);
        app.current_user = 1;
        assert!(app.previous_user());
        assert_eq!(app.current_user, 4);
    }

    #[test]
    fn test_load_cards_truncates_to_slots() {
        let mut app = make_app(2);
        let usable = app.load_cards(&[5, 6, 7, 8]);
        assert_eq!(usable, 2);
        assert_eq!(
            app.pending_action,
            Some(AppAction::LoadCards {
                generation: 0,
                requests: vec![
                    CardRequest {
                        slot: 0,
                        character_id: 5
                    },
                    CardRequest {
                        slot: 1,
                        character_id: 6
                    },
                ],
            })
        );
    }

    #[test]
    fn test_load_cards_resets_leftover_slots() {
        let mut app = AppState::new(
            3,
            4,
            vec![300, 2, 47],
            Some(placeholder()),
            Theme::Dracula.config(),
            "v0".to_string(),
        );
        for slot in &mut app.slots {
            slot.title = "old".to_string();
            slot.subtitle = "old".to_string();
            slot.image = None;
        }

        assert_eq!(app.load_cards(&[1]), 1);
        assert_eq!(app.slots[0].title, "old");
        for slot in &app.slots[1..] {
            assert!(slot.title.is_empty());
            assert!(slot.subtitle.is_empty());
            assert_eq!(slot.image.as_deref(), Some(&placeholder()));
        }
    }

    #[test]
    fn test_load_cards_with_no_ids_clears_everything() {
        let mut app = make_app(3);
        app.slots[0].title = "old".to_string();
        assert_eq!(app.load_cards(&[]), 0);
        assert!(app.pending_action.is_none());
        assert!(app.slots.iter().all(|slot| slot == &CardSlot::default()));
    }

    #[test]
    fn test_validate_slot() {
        let app = make_app(3);
        assert!(app.validate_slot(2).is_ok());
        assert!(matches!(
            app.validate_slot(3),
            Err(FetchError::InvalidSlot(3))
        ));
    }

    #[test]
    fn test_apply_character_to_missing_slot_is_ignored() {
        let mut app = make_app(1);
        let record = CharacterRecord {
            name: "Rick".to_string(),
            ..CharacterRecord::default()
        };
        app.apply_character(4, &record);
        assert!(app.slots[0].title.is_empty());
    }

    #[test]
    fn test_image_failure_without_placeholder_keeps_image() {
        let mut app = make_app(1);
        app.slots[0].image = Some(Rc::new(placeholder()));
        app.apply_image_failure(0, &FetchError::InvalidSlot(0));
        assert!(app.slots[0].image.is_some());
        assert!(app.last_error.is_some());
    }
}
