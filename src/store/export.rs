//! Structured and tabular export of a [`UserRecord`].
//!
//! The structured form is pretty-printed JSON and can be read back with
//! [`parse_structured`]. The tabular form is one CSV block per entry kind; a
//! kind without entries becomes a [`TabularBlock::NoData`] sentinel instead of
//! an empty table.

use super::UserRecord;
use crate::constants::{NO_JOURNAL_ENTRIES, NO_MOOD_DATA, NO_STRESS_DATA};
use crate::errors::AppResult;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Export format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One nested JSON document per user.
    Json,
    /// One CSV block per entry kind.
    Csv,
}

/// One table of the tabular export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabularBlock {
    /// CSV text with a header row.
    Csv(String),
    /// The entry kind has no entries; holds the sentinel text.
    NoData(&'static str),
}

impl TabularBlock {
    /// CSV text or the sentinel.
    pub fn as_str(&self) -> &str {
        match self {
            TabularBlock::Csv(text) => text,
            TabularBlock::NoData(sentinel) => sentinel,
        }
    }

    /// Whether this block is the "no data" sentinel.
    pub fn is_no_data(&self) -> bool {
        matches!(self, TabularBlock::NoData(_))
    }
}

/// Tabular export, one block per entry kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularExport {
    /// `date,mood,notes`
    pub mood_data: TabularBlock,
    /// `date,title,content,mood`
    pub journal_entries: TabularBlock,
    /// `date,level,activities`
    pub stress_data: TabularBlock,
}

/// Result of [`crate::store::EntryStore::export_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserExport {
    /// Pretty-printed JSON.
    Structured(String),
    /// CSV blocks.
    Tabular(TabularExport),
}

impl fmt::Display for UserExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserExport::Structured(json) => writeln!(f, "{}", json),
            UserExport::Tabular(tables) => {
                for (name, block) in [
                    ("mood_data", &tables.mood_data),
                    ("journal_entries", &tables.journal_entries),
                    ("stress_data", &tables.stress_data),
                ] {
                    writeln!(f, "# {}", name)?;
                    let text = block.as_str();
                    if text.ends_with('\n') {
                        write!(f, "{}", text)?;
                    } else {
                        writeln!(f, "{}", text)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
        }
    }
}

/// Serializes `record` in the requested format.
///
/// # Errors
///
/// Returns `AppError::Serialization` if JSON encoding fails.
pub fn export_record(record: &UserRecord, format: ExportFormat) -> AppResult<UserExport> {
    match format {
        ExportFormat::Json => Ok(UserExport::Structured(to_pretty_json(record)?)),
        ExportFormat::Csv => Ok(UserExport::Tabular(to_tables(record))),
    }
}

/// Reads a structured export back into a record.
///
/// # Errors
///
/// Returns `AppError::Serialization` if `json` is not a valid structured export.
pub fn parse_structured(json: &str) -> AppResult<UserRecord> {
    Ok(serde_json::from_str(json)?)
}

fn to_pretty_json(record: &UserRecord) -> AppResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    record.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn to_tables(record: &UserRecord) -> TabularExport {
    let mood_data = block(
        NO_MOOD_DATA,
        &["date", "mood", "notes"],
        record.mood_entries().iter().map(|e| {
            vec![
                Cow::from(e.date.as_str()),
                Cow::from(e.mood.to_string()),
                Cow::from(e.notes_text()),
            ]
        }),
    );

    let journal_entries = block(
        NO_JOURNAL_ENTRIES,
        &["date", "title", "content", "mood"],
        record.journal_entries().iter().map(|e| {
            vec![
                Cow::from(e.date.as_str()),
                Cow::from(e.title.as_str()),
                Cow::from(e.content.as_str()),
                Cow::from(e.mood.as_deref().unwrap_or("")),
            ]
        }),
    );

    let stress_data = block(
        NO_STRESS_DATA,
        &["date", "level", "activities"],
        record.stress_entries().iter().map(|e| {
            vec![
                Cow::from(e.date.as_str()),
                Cow::from(e.level.to_string()),
                Cow::from(e.activities.as_str()),
            ]
        }),
    );

    TabularExport {
        mood_data,
        journal_entries,
        stress_data,
    }
}

fn block<'a, I>(sentinel: &'static str, header: &[&str], rows: I) -> TabularBlock
where
    I: Iterator<Item = Vec<Cow<'a, str>>>,
{
    let mut out = String::new();
    let mut row_count = 0usize;

    for row in rows {
        if row_count == 0 {
            push_row(&mut out, header.iter().map(|h| Cow::from(*h)));
        }
        push_row(&mut out, row.into_iter());
        row_count += 1;
    }

    if row_count == 0 {
        TabularBlock::NoData(sentinel)
    } else {
        TabularBlock::Csv(out)
    }
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = Cow<'a, str>>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&csv_field(&field));
    }
    out.push('\n');
}

/// Quotes a field when it contains a delimiter, quote, or line break.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
