//! In-memory entry store.
//!
//! Holds one [`UserRecord`] per username for the lifetime of the process.
//! Records are created lazily on first access and entries are append-only:
//! nothing in this module mutates or reorders an entry once it is stored.
//!
//! The store is a plain value owned by whoever drives a session (see
//! [`crate::ops::AppContext`]); there is no ambient global state. Writes take
//! `&mut self`, so a single owner serializes them. A multi-user server would
//! wrap each `UserRecord` in its own lock.

pub mod export;

use crate::constants::{DATE_FORMAT_ISO, MAX_SCORE, MIN_SCORE};
use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

pub use export::{ExportFormat, TabularBlock, TabularExport, UserExport};

/// Clamps a mood or stress score into `[MIN_SCORE, MAX_SCORE]`.
pub fn clamp_score(score: i32) -> i32 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Parses an entry date.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time component
/// (`YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD HH:MM:SS`). Anything else yields
/// `None` and the entry is left out of date-keyed aggregation.
pub fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT_ISO)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
                .ok()
                .map(|dt| dt.date())
        })
}

/// A single mood data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    /// ISO 8601 calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Mood rating, 1 (very low) to 10 (excellent).
    pub mood: i32,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl MoodEntry {
    /// Creates a mood entry, clamping `mood` and dropping blank notes.
    pub fn new(date: NaiveDate, mood: i32, notes: impl Into<String>) -> Self {
        Self {
            date: date.format(DATE_FORMAT_ISO).to_string(),
            mood: clamp_score(mood),
            notes: non_blank(notes.into()),
        }
    }

    /// The entry date, if it parses.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_entry_date(&self.date)
    }

    /// Notes or the empty string.
    pub fn notes_text(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

/// A single stress data point with the activities around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressEntry {
    /// ISO 8601 calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Stress level, 1 (calm) to 10 (overwhelmed).
    pub level: i32,
    /// Comma-separated activity labels, e.g. `"work, gym"`.
    #[serde(default)]
    pub activities: String,
}

impl StressEntry {
    /// Creates a stress entry, clamping `level`.
    pub fn new(date: NaiveDate, level: i32, activities: impl Into<String>) -> Self {
        Self {
            date: date.format(DATE_FORMAT_ISO).to_string(),
            level: clamp_score(level),
            activities: activities.into().trim().to_string(),
        }
    }

    /// The entry date, if it parses.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_entry_date(&self.date)
    }

    /// Activity labels: split on commas, trimmed, blanks dropped.
    pub fn activity_labels(&self) -> impl Iterator<Item = &str> {
        self.activities
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}

/// A free-form journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// ISO 8601 calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Short title.
    #[serde(default)]
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub content: String,
    /// Mood label chosen when writing, e.g. "Anxious".
    #[serde(default)]
    pub mood: Option<String>,
}

impl JournalEntry {
    /// Creates a journal entry.
    pub fn new(
        date: NaiveDate,
        title: impl Into<String>,
        content: impl Into<String>,
        mood: Option<String>,
    ) -> Self {
        Self {
            date: date.format(DATE_FORMAT_ISO).to_string(),
            title: title.into().trim().to_string(),
            content: content.into(),
            mood: mood.and_then(non_blank),
        }
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Identity block of a [`UserRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The username the record is keyed by.
    pub username: String,
    /// The day the record was created.
    pub joined_date: NaiveDate,
}

/// Everything stored for one user.
///
/// Entry sequences keep insertion order. The serialized field names match the
/// structured export layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    profile: Profile,
    #[serde(rename = "mood_data", default)]
    mood_entries: Vec<MoodEntry>,
    #[serde(default)]
    journal_entries: Vec<JournalEntry>,
    #[serde(rename = "stress_data", default)]
    stress_entries: Vec<StressEntry>,
}

impl UserRecord {
    /// Creates an empty record joined on `joined_date`.
    pub fn new(username: impl Into<String>, joined_date: NaiveDate) -> Self {
        Self {
            profile: Profile {
                username: username.into(),
                joined_date,
            },
            mood_entries: Vec::new(),
            journal_entries: Vec::new(),
            stress_entries: Vec::new(),
        }
    }

    /// The username.
    pub fn username(&self) -> &str {
        &self.profile.username
    }

    /// The day the record was created.
    pub fn joined_date(&self) -> NaiveDate {
        self.profile.joined_date
    }

    /// Mood entries in insertion order.
    pub fn mood_entries(&self) -> &[MoodEntry] {
        &self.mood_entries
    }

    /// Stress entries in insertion order.
    pub fn stress_entries(&self) -> &[StressEntry] {
        &self.stress_entries
    }

    /// Journal entries in insertion order.
    pub fn journal_entries(&self) -> &[JournalEntry] {
        &self.journal_entries
    }
}

/// Per-user records keyed by username.
#[derive(Debug, Default)]
pub struct EntryStore {
    users: HashMap<String, UserRecord>,
}

impl EntryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user's record, creating it with today's date if missing.
    pub fn get_or_create_user(&mut self, username: &str) -> &UserRecord {
        self.get_or_create_user_on(username, Local::now().date_naive())
    }

    /// Like [`EntryStore::get_or_create_user`] with an explicit join date.
    pub fn get_or_create_user_on(&mut self, username: &str, today: NaiveDate) -> &UserRecord {
        self.record_mut(username, today)
    }

    fn record_mut(&mut self, username: &str, today: NaiveDate) -> &mut UserRecord {
        self.users.entry(username.to_string()).or_insert_with(|| {
            info!("Creating user record");
            UserRecord::new(username, today)
        })
    }

    /// Returns the user's record without creating it.
    pub fn user(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    /// Number of records held.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Appends a mood entry. Duplicate dates are kept.
    pub fn append_mood(&mut self, username: &str, entry: MoodEntry) {
        debug!("Appending mood entry for {}", entry.date);
        self.record_mut(username, Local::now().date_naive())
            .mood_entries
            .push(entry);
    }

    /// Appends a stress entry. Duplicate dates are kept.
    pub fn append_stress(&mut self, username: &str, entry: StressEntry) {
        debug!("Appending stress entry for {}", entry.date);
        self.record_mut(username, Local::now().date_naive())
            .stress_entries
            .push(entry);
    }

    /// Appends a journal entry.
    pub fn append_journal(&mut self, username: &str, entry: JournalEntry) {
        debug!("Appending journal entry for {}", entry.date);
        self.record_mut(username, Local::now().date_naive())
            .journal_entries
            .push(entry);
    }

    /// Mood entries in insertion order; empty for an unknown user.
    pub fn list_mood(&self, username: &str) -> &[MoodEntry] {
        self.user(username).map(|u| u.mood_entries()).unwrap_or(&[])
    }

    /// Stress entries in insertion order; empty for an unknown user.
    pub fn list_stress(&self, username: &str) -> &[StressEntry] {
        self.user(username).map(|u| u.stress_entries()).unwrap_or(&[])
    }

    /// Journal entries in insertion order; empty for an unknown user.
    pub fn list_journal(&self, username: &str) -> &[JournalEntry] {
        self.user(username).map(|u| u.journal_entries()).unwrap_or(&[])
    }

    /// Serializes the user's full record. Creates the record if missing.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Serialization` if the structured form cannot be encoded.
    pub fn export_user(&mut self, username: &str, format: ExportFormat) -> AppResult<UserExport> {
        let record = self.get_or_create_user(username);
        export::export_record(record, format)
    }

    /// Replaces (or inserts) a record, keyed by its profile username.
    ///
    /// Imported mood and stress scores are clamped to the 1-10 range.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the record has a blank username.
    pub fn import_user(&mut self, mut record: UserRecord) -> AppResult<()> {
        let username = record.username().trim().to_string();
        if username.is_empty() {
            return Err(AppError::Store(
                "Imported record has no username".to_string(),
            ));
        }

        for entry in &mut record.mood_entries {
            entry.mood = clamp_score(entry.mood);
        }
        for entry in &mut record.stress_entries {
            entry.level = clamp_score(entry.level);
        }

        info!(
            "Importing record with {} mood, {} stress, {} journal entries",
            record.mood_entries.len(),
            record.stress_entries.len(),
            record.journal_entries.len()
        );
        self.users.insert(username, record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_get_or_create_is_lazy_and_idempotent() {
        let mut store = EntryStore::new();
        assert!(store.user("ana").is_none());

        let joined = store.get_or_create_user_on("ana", day(2024, 3, 1)).joined_date();
        assert_eq!(joined, day(2024, 3, 1));

        // A later call does not reset the join date
        let again = store.get_or_create_user_on("ana", day(2024, 4, 1));
        assert_eq!(again.joined_date(), day(2024, 3, 1));
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_new_record_is_empty() {
        let mut store = EntryStore::new();
        let record = store.get_or_create_user("ben");
        assert_eq!(record.username(), "ben");
        assert!(record.mood_entries().is_empty());
        assert!(record.stress_entries().is_empty());
        assert!(record.journal_entries().is_empty());
    }

    #[test]
    fn test_append_keeps_insertion_order_and_duplicates() {
        let mut store = EntryStore::new();
        store.append_mood("ana", MoodEntry::new(day(2024, 1, 2), 6, "second day"));
        store.append_mood("ana", MoodEntry::new(day(2024, 1, 1), 4, "first day"));
        store.append_mood("ana", MoodEntry::new(day(2024, 1, 1), 5, ""));

        let moods = store.list_mood("ana");
        assert_eq!(moods.len(), 3);
        assert_eq!(moods[0].date, "2024-01-02");
        assert_eq!(moods[1].mood, 4);
        assert_eq!(moods[2].mood, 5);
        assert_eq!(moods[2].notes, None);
    }

    #[test]
    fn test_lists_are_empty_for_unknown_user() {
        let store = EntryStore::new();
        assert!(store.list_mood("nobody").is_empty());
        assert!(store.list_stress("nobody").is_empty());
        assert!(store.list_journal("nobody").is_empty());
    }

    #[test]
    fn test_users_are_isolated() {
        let mut store = EntryStore::new();
        store.append_stress("ana", StressEntry::new(day(2024, 1, 1), 7, "work"));
        assert_eq!(store.list_stress("ana").len(), 1);
        assert!(store.list_stress("ben").is_empty());
    }

    #[test]
    fn test_constructors_clamp_scores() {
        assert_eq!(MoodEntry::new(day(2024, 1, 1), 0, "").mood, 1);
        assert_eq!(MoodEntry::new(day(2024, 1, 1), 42, "").mood, 10);
        assert_eq!(StressEntry::new(day(2024, 1, 1), -3, "").level, 1);
    }

    #[test]
    fn test_activity_labels_are_trimmed() {
        let entry = StressEntry::new(day(2024, 1, 1), 5, " work ,  walk,, ,gym ");
        let labels: Vec<&str> = entry.activity_labels().collect();
        assert_eq!(labels, vec!["work", "walk", "gym"]);
    }

    #[test]
    fn test_parse_entry_date_variants() {
        assert_eq!(parse_entry_date("2024-05-06"), Some(day(2024, 5, 6)));
        assert_eq!(parse_entry_date(" 2024-05-06 "), Some(day(2024, 5, 6)));
        assert_eq!(parse_entry_date("2024-05-06T08:30:00"), Some(day(2024, 5, 6)));
        assert_eq!(parse_entry_date("2024-05-06 08:30:00"), Some(day(2024, 5, 6)));
        assert_eq!(parse_entry_date("yesterday"), None);
        assert_eq!(parse_entry_date("2024-13-01"), None);
    }

    #[test]
    fn test_import_replaces_record() {
        let mut store = EntryStore::new();
        store.append_mood("ana", MoodEntry::new(day(2024, 1, 1), 3, ""));

        let mut replacement = UserRecord::new("ana", day(2023, 12, 1));
        replacement
            .mood_entries
            .push(MoodEntry::new(day(2024, 2, 1), 9, "fresh"));
        store.import_user(replacement).unwrap();

        let moods = store.list_mood("ana");
        assert_eq!(moods.len(), 1);
        assert_eq!(moods[0].mood, 9);
        assert_eq!(store.user("ana").unwrap().joined_date(), day(2023, 12, 1));
    }

    #[test]
    fn test_import_clamps_scores() {
        let mut record = UserRecord::new("ana", day(2024, 1, 1));
        record.mood_entries.push(MoodEntry {
            date: "2024-01-02".to_string(),
            mood: 42,
            notes: None,
        });
        record.mood_entries.push(MoodEntry {
            date: "2024-01-03".to_string(),
            mood: -5,
            notes: None,
        });
        record.stress_entries.push(StressEntry {
            date: "2024-01-02".to_string(),
            level: 99,
            activities: String::new(),
        });

        let mut store = EntryStore::new();
        store.import_user(record).unwrap();

        let moods: Vec<i32> = store.list_mood("ana").iter().map(|e| e.mood).collect();
        assert_eq!(moods, vec![10, 1]);
        assert_eq!(store.list_stress("ana")[0].level, 10);
    }

    #[test]
    fn test_import_rejects_blank_username() {
        let mut store = EntryStore::new();
        let record = UserRecord::new("  ", day(2024, 1, 1));
        assert!(matches!(
            store.import_user(record),
            Err(AppError::Store(_))
        ));
    }
}
