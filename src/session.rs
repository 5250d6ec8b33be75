//! Per-session state for a logged-in user.
//!
//! A session is created by [`Session::login`] and lives for one program run.
//! It carries the username every store call is keyed by, a cached daily
//! affirmation, and the music recommendation cursor.

use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// State for one logged-in user.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    username: String,
    daily_affirmation: Option<(NaiveDate, String)>,
    music_cursor: HashMap<String, usize>,
}

impl Session {
    /// Opens a session for `username`.
    ///
    /// Any non-blank username and password are accepted; credentials are not
    /// checked against anything.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` when either value is blank.
    pub fn login(username: &str, password: &str) -> AppResult<Self> {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return Err(AppError::Auth(
                "Please enter both username and password".to_string(),
            ));
        }

        let session = Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            daily_affirmation: None,
            music_cursor: HashMap::new(),
        };
        info!(session_id = %session.id, "Session opened");
        Ok(session)
    }

    /// Session identifier, used in log fields.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The logged-in user.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The cached affirmation if it was generated on `today`.
    pub fn affirmation_for(&self, today: NaiveDate) -> Option<&str> {
        match &self.daily_affirmation {
            Some((date, text)) if *date == today => Some(text),
            _ => None,
        }
    }

    /// Caches `text` as the affirmation for `today`, replacing any older one.
    pub fn cache_affirmation(&mut self, today: NaiveDate, text: String) {
        self.daily_affirmation = Some((today, text));
    }

    /// Current position in the track list for `mood`.
    pub fn music_position(&self, mood: &str) -> usize {
        self.music_cursor.get(mood).copied().unwrap_or(0)
    }

    /// Advances the track cursor for `mood`, wrapping at `len`, and returns the new position.
    pub fn advance_music(&mut self, mood: &str, len: usize) -> usize {
        let next = if len == 0 {
            0
        } else {
            (self.music_position(mood) + 1) % len
        };
        self.music_cursor.insert(mood.to_string(), next);
        next
    }
}
