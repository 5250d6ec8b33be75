//! Derived metrics over mood and stress entries.
//!
//! Every function here is pure and deterministic given its inputs (the weekly
//! summary takes "today" explicitly; [`weekly_summary`] reads the wall clock at
//! call time). Sparse input never fails: it produces
//! [`Insight::InsufficientData`] with a guidance message for the user.

use crate::constants::{
    GOOD_MOOD_THRESHOLD, HIGH_STRESS_THRESHOLD, LOW_STRESS_THRESHOLD, MIN_ACTIVITY_OCCURRENCES,
    MIN_ENTRIES_FOR_WEEKLY_SUMMARY, MIN_MOOD_ENTRIES_FOR_INSIGHTS,
    MIN_STRESS_ENTRIES_FOR_ANALYSIS, MIN_STRESS_ENTRIES_FOR_IMPACT, NOT_ENOUGH_IMPACT_DATA,
    NOT_ENOUGH_RECENT_MOOD, NOT_ENOUGH_WEEKLY_DATA, NO_CONSISTENT_ACTIVITIES, RECENT_MOOD_WINDOW,
    WEEKDAY_LABEL_FORMAT, WEEKLY_WINDOW_DAYS,
};
use crate::store::{clamp_score, MoodEntry, StressEntry};
use chrono::{Duration, Local, NaiveDate};
use std::collections::HashMap;
use tracing::debug;

/// A derived value, or the reason it could not be derived yet.
#[derive(Debug, Clone, PartialEq)]
pub enum Insight<T> {
    /// Enough data was available.
    Ready(T),
    /// Too little data; holds the guidance message to show instead.
    InsufficientData(&'static str),
}

impl<T> Insight<T> {
    /// Whether a value is available.
    pub fn is_ready(&self) -> bool {
        matches!(self, Insight::Ready(_))
    }

    /// The value, if ready.
    pub fn ready(self) -> Option<T> {
        match self {
            Insight::Ready(value) => Some(value),
            Insight::InsufficientData(_) => None,
        }
    }

    /// Borrowing view of the value, if ready.
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Insight::Ready(value) => Some(value),
            Insight::InsufficientData(_) => None,
        }
    }
}

/// Minimum-data checks shared by the engine, the prompt builder and the ops layer.
pub mod thresholds {
    use super::*;

    /// Mood insights need at least two mood entries.
    pub fn enough_for_mood_insights(mood_entries: usize) -> bool {
        mood_entries >= MIN_MOOD_ENTRIES_FOR_INSIGHTS
    }

    /// Stress-pattern analysis needs at least three stress entries.
    pub fn enough_for_stress_analysis(stress_entries: usize) -> bool {
        stress_entries >= MIN_STRESS_ENTRIES_FOR_ANALYSIS
    }

    /// Activity impact needs at least three stress entries.
    pub fn enough_for_activity_impact(stress_entries: usize) -> bool {
        stress_entries >= MIN_STRESS_ENTRIES_FOR_IMPACT
    }

    /// The weekly summary needs three entries in at least one series.
    pub fn enough_for_weekly_summary(mood_entries: usize, stress_entries: usize) -> bool {
        mood_entries >= MIN_ENTRIES_FOR_WEEKLY_SUMMARY
            || stress_entries >= MIN_ENTRIES_FOR_WEEKLY_SUMMARY
    }
}

/// One point of the mood chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodPoint {
    /// Entry date.
    pub date: NaiveDate,
    /// Clamped mood.
    pub mood: i32,
    /// Notes, empty when absent.
    pub notes: String,
}

/// One point of the stress chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressPoint {
    /// Entry date.
    pub date: NaiveDate,
    /// Clamped stress level.
    pub level: i32,
    /// Activities as entered.
    pub activities: String,
}

/// Mood chart series sorted by date; ties keep insertion order.
///
/// Entries whose date does not parse are dropped.
pub fn mood_series(entries: &[MoodEntry]) -> Vec<MoodPoint> {
    let mut points: Vec<MoodPoint> = entries
        .iter()
        .filter_map(|entry| {
            entry.parsed_date().map(|date| MoodPoint {
                date,
                mood: clamp_score(entry.mood),
                notes: entry.notes_text().to_string(),
            })
        })
        .collect();

    // sort_by_key is stable
    points.sort_by_key(|p| p.date);
    log_dropped("mood", entries.len(), points.len());
    points
}

/// Stress chart series sorted by date; ties keep insertion order.
///
/// Entries whose date does not parse are dropped.
pub fn stress_series(entries: &[StressEntry]) -> Vec<StressPoint> {
    let mut points: Vec<StressPoint> = entries
        .iter()
        .filter_map(|entry| {
            entry.parsed_date().map(|date| StressPoint {
                date,
                level: clamp_score(entry.level),
                activities: entry.activities.clone(),
            })
        })
        .collect();

    points.sort_by_key(|p| p.date);
    log_dropped("stress", entries.len(), points.len());
    points
}

fn log_dropped(kind: &str, total: usize, kept: usize) {
    if kept < total {
        debug!(
            "Dropped {} {} entries with unparseable dates",
            total - kept,
            kind
        );
    }
}

/// Per-day averages for one calendar day of the weekly summary.
#[derive(Debug, Clone, PartialEq)]
pub struct DayAverages {
    /// The calendar day.
    pub date: NaiveDate,
    /// Mean mood that day, `None` without entries.
    pub mood: Option<f64>,
    /// Mean stress that day, `None` without entries.
    pub stress: Option<f64>,
}

impl DayAverages {
    /// Short label such as `Mon, Jan 01`.
    pub fn label(&self) -> String {
        self.date.format(WEEKDAY_LABEL_FORMAT).to_string()
    }
}

/// Trailing seven-day summary.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySummary {
    /// Seven days, oldest first, the last one being "today".
    pub days: Vec<DayAverages>,
    /// Whether the mood series has any entries at all.
    pub has_mood: bool,
    /// Whether the stress series has any entries at all.
    pub has_stress: bool,
}

/// Weekly summary for the seven days ending today, by the local wall clock.
pub fn weekly_summary(mood: &[MoodEntry], stress: &[StressEntry]) -> Insight<WeeklySummary> {
    weekly_summary_at(mood, stress, Local::now().date_naive())
}

/// Weekly summary for the seven days ending on `today` (inclusive).
pub fn weekly_summary_at(
    mood: &[MoodEntry],
    stress: &[StressEntry],
    today: NaiveDate,
) -> Insight<WeeklySummary> {
    if !thresholds::enough_for_weekly_summary(mood.len(), stress.len()) {
        return Insight::InsufficientData(NOT_ENOUGH_WEEKLY_DATA);
    }

    let mood_by_day = daily_means(
        mood.iter()
            .filter_map(|e| e.parsed_date().map(|d| (d, clamp_score(e.mood)))),
    );
    let stress_by_day = daily_means(
        stress
            .iter()
            .filter_map(|e| e.parsed_date().map(|d| (d, clamp_score(e.level)))),
    );

    let days = (0..WEEKLY_WINDOW_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            DayAverages {
                date,
                mood: mood_by_day.get(&date).copied(),
                stress: stress_by_day.get(&date).copied(),
            }
        })
        .collect();

    Insight::Ready(WeeklySummary {
        days,
        has_mood: !mood.is_empty(),
        has_stress: !stress.is_empty(),
    })
}

fn daily_means(values: impl Iterator<Item = (NaiveDate, i32)>) -> HashMap<NaiveDate, f64> {
    let mut sums: HashMap<NaiveDate, (i64, usize)> = HashMap::new();
    for (date, value) in values {
        let slot = sums.entry(date).or_insert((0, 0));
        slot.0 += i64::from(value);
        slot.1 += 1;
    }
    sums.into_iter()
        .map(|(date, (sum, count))| (date, sum as f64 / count as f64))
        .collect()
}

/// Average of `field` over the last `n` entries in insertion order.
///
/// `field` returns `None` for entries that carry no value; those are skipped.
/// Values are clamped to the score range before averaging.
pub fn average_of_last_n<E, F>(entries: &[E], n: usize, field: F) -> Insight<f64>
where
    F: Fn(&E) -> Option<i32>,
{
    let start = entries.len().saturating_sub(n);
    let values: Vec<i32> = entries[start..]
        .iter()
        .filter_map(&field)
        .map(clamp_score)
        .collect();

    if values.is_empty() {
        return Insight::InsufficientData(NOT_ENOUGH_RECENT_MOOD);
    }

    let sum: i64 = values.iter().copied().map(i64::from).sum();
    Insight::Ready(sum as f64 / values.len() as f64)
}

/// Headline "average mood" over the last seven inserted mood entries.
pub fn recent_average_mood(entries: &[MoodEntry]) -> Insight<f64> {
    average_of_last_n(entries, RECENT_MOOD_WINDOW, |e| Some(e.mood))
}

/// Average stress observed alongside one activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityImpact {
    /// Activity label as first entered.
    pub activity: String,
    /// Mean stress level of the entries mentioning it.
    pub average_stress: f64,
    /// Number of entries mentioning it.
    pub occurrences: usize,
}

/// Ranks activities by the average stress of the entries that mention them.
///
/// An entry mentioning the same label twice counts once for that label. Only
/// labels with at least two contributing entries are kept. The result is
/// sorted by ascending average stress (calmest first); ties keep the order in
/// which labels first appeared.
pub fn activity_impact(entries: &[StressEntry]) -> Insight<Vec<ActivityImpact>> {
    if !thresholds::enough_for_activity_impact(entries.len()) {
        return Insight::InsufficientData(NOT_ENOUGH_IMPACT_DATA);
    }

    // label -> (first-seen rank, level sum, count)
    let mut totals: HashMap<&str, (usize, i64, usize)> = HashMap::new();
    for entry in entries {
        let level = i64::from(clamp_score(entry.level));
        let mut seen_in_entry: Vec<&str> = Vec::new();
        for label in entry.activity_labels() {
            if seen_in_entry.contains(&label) {
                continue;
            }
            seen_in_entry.push(label);

            let rank = totals.len();
            let slot = totals.entry(label).or_insert((rank, 0, 0));
            slot.1 += level;
            slot.2 += 1;
        }
    }

    let mut ranked: Vec<(usize, ActivityImpact)> = totals
        .into_iter()
        .filter(|(_, (_, _, count))| *count >= MIN_ACTIVITY_OCCURRENCES)
        .map(|(label, (rank, sum, count))| {
            (
                rank,
                ActivityImpact {
                    activity: label.to_string(),
                    average_stress: sum as f64 / count as f64,
                    occurrences: count,
                },
            )
        })
        .collect();

    if ranked.is_empty() {
        return Insight::InsufficientData(NO_CONSISTENT_ACTIVITIES);
    }

    ranked.sort_by(|(rank_a, a), (rank_b, b)| {
        a.average_stress
            .total_cmp(&b.average_stress)
            .then(rank_a.cmp(rank_b))
    });

    Insight::Ready(ranked.into_iter().map(|(_, impact)| impact).collect())
}

/// Chart zone of a mood score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodZone {
    /// At or above the good-mood line.
    Good,
    /// Below it.
    Neutral,
}

/// Chart zone of a stress level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressZone {
    /// At or below the low-stress line.
    Low,
    /// Between the two lines.
    Moderate,
    /// At or above the high-stress line.
    High,
}

/// Classifies a mood score against the good-mood reference line.
pub fn mood_zone(mood: i32) -> MoodZone {
    if clamp_score(mood) >= GOOD_MOOD_THRESHOLD {
        MoodZone::Good
    } else {
        MoodZone::Neutral
    }
}

/// Classifies a stress level against the low/high reference lines.
pub fn stress_zone(level: i32) -> StressZone {
    let level = clamp_score(level);
    if level <= LOW_STRESS_THRESHOLD {
        StressZone::Low
    } else if level >= HIGH_STRESS_THRESHOLD {
        StressZone::High
    } else {
        StressZone::Moderate
    }
}
