use chrono::NaiveDate;
use mindful::store::export::parse_structured;
use mindful::store::{
    EntryStore, ExportFormat, JournalEntry, MoodEntry, StressEntry, TabularBlock, UserExport,
};
use mindful::AppError;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn structured(export: UserExport) -> String {
    match export {
        UserExport::Structured(json) => json,
        other => panic!("Expected structured export, got {:?}", other),
    }
}

#[test]
fn test_users_are_isolated() {
    let mut store = EntryStore::new();
    store.append_mood("ana", MoodEntry::new(day(1), 7, "fine"));
    store.append_stress("ben", StressEntry::new(day(1), 8, "exams"));

    assert_eq!(store.list_mood("ana").len(), 1);
    assert!(store.list_stress("ana").is_empty());
    assert!(store.list_mood("ben").is_empty());
    assert_eq!(store.list_stress("ben").len(), 1);
    assert_eq!(store.user_count(), 2);
}

#[test]
fn test_unknown_user_lists_are_empty_without_creating() {
    let store = EntryStore::new();
    assert!(store.list_mood("nobody").is_empty());
    assert!(store.list_journal("nobody").is_empty());
    assert_eq!(store.user_count(), 0);
}

#[test]
fn test_insertion_order_and_duplicate_dates_kept() {
    let mut store = EntryStore::new();
    store.append_mood("ana", MoodEntry::new(day(3), 5, "third"));
    store.append_mood("ana", MoodEntry::new(day(1), 6, "first"));
    store.append_mood("ana", MoodEntry::new(day(1), 7, "again"));

    let notes: Vec<&str> = store.list_mood("ana").iter().map(|e| e.notes_text()).collect();
    assert_eq!(notes, vec!["third", "first", "again"]);
}

#[test]
fn test_scores_clamped_on_entry() {
    let mut store = EntryStore::new();
    store.append_mood("ana", MoodEntry::new(day(1), 0, ""));
    store.append_stress("ana", StressEntry::new(day(1), 99, ""));

    assert_eq!(store.list_mood("ana")[0].mood, 1);
    assert_eq!(store.list_stress("ana")[0].level, 10);
}

#[test]
fn test_export_creates_missing_user() {
    let mut store = EntryStore::new();
    let export = store.export_user("cy", ExportFormat::Csv).unwrap();

    assert_eq!(store.user_count(), 1);
    match export {
        UserExport::Tabular(tables) => {
            assert_eq!(tables.mood_data, TabularBlock::NoData("No mood data"));
            assert_eq!(tables.journal_entries, TabularBlock::NoData("No journal entries"));
            assert_eq!(tables.stress_data, TabularBlock::NoData("No stress data"));
        }
        other => panic!("Expected tabular export, got {:?}", other),
    }
}

#[test]
fn test_structured_export_imports_into_fresh_store() {
    let mut store = EntryStore::new();
    store.get_or_create_user_on("ana", day(1));
    store.append_mood("ana", MoodEntry::new(day(2), 6, "ok"));
    store.append_stress("ana", StressEntry::new(day(2), 5, "work, gym"));
    store.append_journal(
        "ana",
        JournalEntry::new(day(2), "Notes", "A \"quoted\" line", Some("Calm".to_string())),
    );

    let json = structured(store.export_user("ana", ExportFormat::Json).unwrap());
    let record = parse_structured(&json).unwrap();
    assert_eq!(record.joined_date(), day(1));

    let mut fresh = EntryStore::new();
    fresh.import_user(record).unwrap();
    assert_eq!(fresh.list_mood("ana"), store.list_mood("ana"));
    assert_eq!(fresh.list_stress("ana"), store.list_stress("ana"));
    assert_eq!(fresh.list_journal("ana"), store.list_journal("ana"));
}

#[test]
fn test_import_replaces_existing_record() {
    let mut store = EntryStore::new();
    store.append_mood("ana", MoodEntry::new(day(1), 3, "old"));

    let record = parse_structured(
        r#"{
            "profile": {"username": "ana", "joined_date": "2024-05-01"},
            "mood_data": [{"date": "2024-05-04", "mood": 9, "notes": "new"}]
        }"#,
    )
    .unwrap();
    store.import_user(record).unwrap();

    let moods = store.list_mood("ana");
    assert_eq!(moods.len(), 1);
    assert_eq!(moods[0].notes_text(), "new");
}

#[test]
fn test_imported_scores_are_clamped_everywhere() {
    let record = parse_structured(
        r#"{
            "profile": {"username": "ana", "joined_date": "2024-01-01"},
            "mood_data": [
                {"date": "2024-01-02", "mood": 42, "notes": "x"},
                {"date": "2024-01-03", "mood": -5, "notes": "y"}
            ],
            "stress_data": [{"date": "2024-01-02", "level": 99, "activities": "work"}]
        }"#,
    )
    .unwrap();
    let mut store = EntryStore::new();
    store.import_user(record).unwrap();

    let moods: Vec<i32> = store.list_mood("ana").iter().map(|e| e.mood).collect();
    assert_eq!(moods, vec![10, 1]);
    assert_eq!(store.list_stress("ana")[0].level, 10);

    match store.export_user("ana", ExportFormat::Csv).unwrap() {
        UserExport::Tabular(tables) => {
            assert_eq!(
                tables.mood_data.as_str(),
                "date,mood,notes\n2024-01-02,10,x\n2024-01-03,1,y\n"
            );
            assert!(tables.stress_data.as_str().contains("2024-01-02,10,work"));
        }
        other => panic!("Expected tabular export, got {:?}", other),
    }
}

#[test]
fn test_import_rejects_blank_username() {
    let record =
        parse_structured(r#"{"profile": {"username": " ", "joined_date": "2024-05-01"}}"#)
            .unwrap();
    let mut store = EntryStore::new();
    assert!(matches!(store.import_user(record), Err(AppError::Store(_))));
}

#[test]
fn test_parse_structured_rejects_garbage() {
    assert!(matches!(
        parse_structured("[1, 2, 3]"),
        Err(AppError::Serialization(_))
    ));
}
