//! Recording entries and moving whole records in and out of the store.

use super::AppContext;
use crate::config::expand_path;
use crate::errors::{AppError, AppResult};
use crate::store::export::parse_structured;
use crate::store::{ExportFormat, JournalEntry, MoodEntry, StressEntry, UserExport};
use chrono::NaiveDate;
use std::fs;
use tracing::{info, warn};

/// Records a mood score for `date`. Returns the stored entry.
pub fn record_mood(ctx: &mut AppContext, date: NaiveDate, mood: i32, notes: &str) -> MoodEntry {
    let entry = MoodEntry::new(date, mood, notes);
    let username = ctx.session.username().to_string();
    ctx.store.append_mood(&username, entry.clone());
    info!("Recorded mood {} for {}", entry.mood, entry.date);
    entry
}

/// Records a stress level and the activities that came with it.
pub fn record_stress(
    ctx: &mut AppContext,
    date: NaiveDate,
    level: i32,
    activities: &str,
) -> StressEntry {
    let entry = StressEntry::new(date, level, activities);
    let username = ctx.session.username().to_string();
    ctx.store.append_stress(&username, entry.clone());
    info!("Recorded stress {} for {}", entry.level, entry.date);
    entry
}

/// Records a journal entry.
///
/// # Errors
///
/// Returns `AppError::Store` when both title and content are blank.
pub fn record_journal(
    ctx: &mut AppContext,
    date: NaiveDate,
    title: &str,
    content: &str,
    mood: Option<String>,
) -> AppResult<JournalEntry> {
    if title.trim().is_empty() && content.trim().is_empty() {
        return Err(AppError::Store(
            "A journal entry needs a title or some content".to_string(),
        ));
    }

    let entry = JournalEntry::new(date, title, content, mood);
    let username = ctx.session.username().to_string();
    ctx.store.append_journal(&username, entry.clone());
    info!("Recorded journal entry for {}", entry.date);
    Ok(entry)
}

/// Exports the session user's record, optionally writing it to `output`.
///
/// # Errors
///
/// Returns an error if serialization fails or the output file cannot be written.
pub fn export_entries(
    ctx: &mut AppContext,
    format: ExportFormat,
    output: Option<&str>,
) -> AppResult<UserExport> {
    let username = ctx.session.username().to_string();
    let export = ctx.store.export_user(&username, format)?;

    if let Some(raw) = output {
        let path = expand_path(raw)?;
        fs::write(&path, export.to_string()).map_err(|e| {
            AppError::Export(format!("Could not write {}: {}", path.display(), e))
        })?;
        info!("Wrote {:?} export to {}", format, path.display());
    }

    Ok(export)
}

/// Seeds the session user's record from a structured export file.
///
/// Returns the number of entries imported.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if it belongs to
/// a different user than the one logged in.
pub fn import_entries(ctx: &mut AppContext, raw_path: &str) -> AppResult<usize> {
    let path = expand_path(raw_path)?;
    let json = fs::read_to_string(&path)
        .map_err(|e| AppError::Export(format!("Could not read {}: {}", path.display(), e)))?;
    let record = parse_structured(&json)?;

    if record.username() != ctx.session.username() {
        warn!("Refusing import for a different user");
        return Err(AppError::Store(format!(
            "{} holds entries for '{}', not '{}'",
            path.display(),
            record.username(),
            ctx.session.username()
        )));
    }

    let count = record.mood_entries().len()
        + record.stress_entries().len()
        + record.journal_entries().len();
    ctx.store.import_user(record)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_support::context;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_record_mood_clamps_and_stores() {
        let (mut ctx, _) = context(None);
        let entry = record_mood(&mut ctx, day(1), 14, "great");
        assert_eq!(entry.mood, 10);
        assert_eq!(ctx.store.list_mood("ana"), &[entry]);
    }

    #[test]
    fn test_record_journal_rejects_empty_entry() {
        let (mut ctx, _) = context(None);
        assert!(matches!(
            record_journal(&mut ctx, day(1), " ", "", None),
            Err(AppError::Store(_))
        ));
        assert!(record_journal(&mut ctx, day(1), "", "some words", None).is_ok());
        assert_eq!(ctx.store.list_journal("ana").len(), 1);
    }

    #[test]
    fn test_export_writes_file() {
        let (mut ctx, _) = context(None);
        record_stress(&mut ctx, day(2), 6, "work");
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let export = export_entries(&mut ctx, ExportFormat::Csv, Some(&path)).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, export.to_string());
        assert!(written.contains("date,level,activities\n2024-06-02,6,work\n"));
    }

    #[test]
    fn test_import_round_trip_through_file() {
        let (mut ctx, _) = context(None);
        record_mood(&mut ctx, day(1), 6, "ok");
        record_mood(&mut ctx, day(2), 8, "good");
        let json = match export_entries(&mut ctx, ExportFormat::Json, None).unwrap() {
            UserExport::Structured(json) => json,
            other => panic!("Expected structured export, got {:?}", other),
        };

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let (mut fresh, _) = context(None);
        let count = import_entries(&mut fresh, file.path().to_str().unwrap()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(fresh.store.list_mood("ana"), ctx.store.list_mood("ana"));
    }

    #[test]
    fn test_import_rejects_other_users_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"profile": {"username": "ben", "joined_date": "2024-01-01"}}"#)
            .unwrap();

        let (mut ctx, _) = context(None);
        let result = import_entries(&mut ctx, file.path().to_str().unwrap());
        assert!(matches!(result, Err(AppError::Store(_))));
        assert!(ctx.store.user("ben").is_none());
    }

    #[test]
    fn test_import_missing_file() {
        let (mut ctx, _) = context(None);
        let result = import_entries(&mut ctx, "/definitely/not/here.json");
        assert!(matches!(result, Err(AppError::Export(_))));
    }
}
