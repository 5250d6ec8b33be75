//! The text dashboard: every derived metric for one user in a single report.

use super::AppContext;
use crate::constants::{NO_MOOD_SERIES, NO_STRESS_SERIES};
use crate::metrics::{
    activity_impact, mood_series, mood_zone, recent_average_mood, stress_series, stress_zone,
    weekly_summary_at, ActivityImpact, Insight, MoodPoint, MoodZone, StressPoint, StressZone,
    WeeklySummary,
};
use crate::store::UserRecord;
use chrono::NaiveDate;
use std::fmt;

/// All derived metrics for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Whose entries the report covers.
    pub username: String,
    /// Mood over time, oldest first.
    pub mood: Insight<Vec<MoodPoint>>,
    /// Stress over time, oldest first.
    pub stress: Insight<Vec<StressPoint>>,
    /// Per-day averages for the seven days ending today.
    pub weekly: Insight<WeeklySummary>,
    /// Average over the last seven mood entries.
    pub average_mood: Insight<f64>,
    /// Activities ranked from calmest to most stressful.
    pub activities: Insight<Vec<ActivityImpact>>,
}

/// Computes the dashboard for `record` with `today` closing the weekly window.
pub fn build_dashboard(record: &UserRecord, today: NaiveDate) -> Dashboard {
    let mood = mood_series(record.mood_entries());
    let stress = stress_series(record.stress_entries());

    Dashboard {
        username: record.username().to_string(),
        mood: non_empty(mood, NO_MOOD_SERIES),
        stress: non_empty(stress, NO_STRESS_SERIES),
        weekly: weekly_summary_at(record.mood_entries(), record.stress_entries(), today),
        average_mood: recent_average_mood(record.mood_entries()),
        activities: activity_impact(record.stress_entries()),
    }
}

/// Dashboard for the session user.
pub fn session_dashboard(ctx: &mut AppContext, today: NaiveDate) -> Dashboard {
    let username = ctx.session.username().to_string();
    build_dashboard(ctx.store.get_or_create_user_on(&username, today), today)
}

fn non_empty<T>(items: Vec<T>, message: &'static str) -> Insight<Vec<T>> {
    if items.is_empty() {
        Insight::InsufficientData(message)
    } else {
        Insight::Ready(items)
    }
}

fn mood_marker(mood: i32) -> &'static str {
    match mood_zone(mood) {
        MoodZone::Good => "good",
        MoodZone::Neutral => "",
    }
}

fn stress_marker(level: i32) -> &'static str {
    match stress_zone(level) {
        StressZone::Low => "low",
        StressZone::Moderate => "",
        StressZone::High => "high",
    }
}

fn bar(value: f64) -> String {
    "#".repeat(value.round().clamp(0.0, 10.0) as usize)
}

fn or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v))
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dashboard for {}", self.username)?;

        writeln!(f, "\nMood over time")?;
        match &self.mood {
            Insight::Ready(points) => {
                for p in points {
                    writeln!(
                        f,
                        "  {}  {:>2}/10 {:<10} {:<4} {}",
                        p.date,
                        p.mood,
                        bar(f64::from(p.mood)),
                        mood_marker(p.mood),
                        p.notes
                    )?;
                }
            }
            Insight::InsufficientData(message) => writeln!(f, "  {}", message)?,
        }

        writeln!(f, "\nStress over time")?;
        match &self.stress {
            Insight::Ready(points) => {
                for p in points {
                    writeln!(
                        f,
                        "  {}  {:>2}/10 {:<10} {:<4} {}",
                        p.date,
                        p.level,
                        bar(f64::from(p.level)),
                        stress_marker(p.level),
                        p.activities
                    )?;
                }
            }
            Insight::InsufficientData(message) => writeln!(f, "  {}", message)?,
        }

        writeln!(f, "\nYour week at a glance")?;
        match &self.weekly {
            Insight::Ready(summary) => write!(f, "{}", summary_table(summary))?,
            Insight::InsufficientData(message) => writeln!(f, "  {}", message)?,
        }

        match &self.average_mood {
            Insight::Ready(avg) => writeln!(f, "\nAverage mood: {:.1}/10", avg)?,
            Insight::InsufficientData(message) => writeln!(f, "\n{}", message)?,
        }

        writeln!(f, "\nActivities by average stress")?;
        match &self.activities {
            Insight::Ready(impacts) => {
                for impact in impacts {
                    writeln!(
                        f,
                        "  {:<20} {:.1}/10 ({} entries)",
                        impact.activity, impact.average_stress, impact.occurrences
                    )?;
                }
            }
            Insight::InsufficientData(message) => writeln!(f, "  {}", message)?,
        }

        Ok(())
    }
}

/// The weekly summary as a fixed-width table.
pub fn summary_table(summary: &WeeklySummary) -> String {
    let mut out = format!("  {:<12} {:>5} {:>7}\n", "Day", "Mood", "Stress");
    for day in &summary.days {
        let mood = if summary.has_mood { or_dash(day.mood) } else { "-".to_string() };
        let stress = if summary.has_stress {
            or_dash(day.stress)
        } else {
            "-".to_string()
        };
        out.push_str(&format!("  {:<12} {:>5} {:>7}\n", day.label(), mood, stress));
    }
    out
}
