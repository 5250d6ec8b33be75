//! Prompt builders for AI interactions.
//!
//! Each builder turns entry data into a [`CompletionRequest`] carrying the
//! prompt text and its generation parameters. Builders that need a minimum
//! amount of data return [`Insight::InsufficientData`] with a static message
//! instead of a prompt; the caller shows that message and skips the AI call.

use super::completion::CompletionRequest;
use crate::constants::{
    AFFIRMATION_MAX_TOKENS, AFFIRMATION_TEMPERATURE, JOURNAL_PROMPT_MAX_TOKENS,
    JOURNAL_PROMPT_TEMPERATURE, MOOD_INSIGHTS_MAX_TOKENS, MOOD_INSIGHTS_TEMPERATURE,
    MOOD_INSIGHT_WINDOW, NOT_ENOUGH_MOOD_DATA, NOT_ENOUGH_STRESS_DATA, STRESS_ANALYSIS_MAX_TOKENS,
    STRESS_ANALYSIS_TEMPERATURE, STRESS_ANALYSIS_WINDOW, WELLNESS_TIPS_MAX_TOKENS,
    WELLNESS_TIPS_TEMPERATURE,
};
use crate::metrics::{thresholds, Insight};
use crate::store::{clamp_score, JournalEntry, MoodEntry, StressEntry};

/// The last `n` items in insertion order, most recent last.
fn last_n<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

/// One prompt line per mood entry.
pub fn format_mood_line(entry: &MoodEntry) -> String {
    format!(
        "Date: {}, Mood: {}/10, Notes: {}",
        entry.date,
        clamp_score(entry.mood),
        entry.notes_text()
    )
}

/// One prompt line per stress entry.
pub fn format_stress_line(entry: &StressEntry) -> String {
    format!(
        "Date: {}, Stress Level: {}/10, Activities: {}",
        entry.date,
        clamp_score(entry.level),
        entry.activities
    )
}

/// Builds the mood-insights request from the five most recent mood entries.
///
/// Needs at least two mood entries.
pub fn mood_insights_prompt(entries: &[MoodEntry]) -> Insight<CompletionRequest> {
    if !thresholds::enough_for_mood_insights(entries.len()) {
        return Insight::InsufficientData(NOT_ENOUGH_MOOD_DATA);
    }

    let mood_text = last_n(entries, MOOD_INSIGHT_WINDOW)
        .iter()
        .map(format_mood_line)
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        r#"Based on the following recent mood entries from a user, provide helpful insights and gentle suggestions for improving their mental well-being.
Focus on patterns, potential triggers, and actionable advice. Be compassionate and supportive in your response.

RECENT MOOD ENTRIES:
{}

Please provide:
1. A brief observation of patterns or trends
2. Potential factors that might be influencing their mood
3. 2-3 specific, actionable suggestions to help improve their well-being
4. A supportive, encouraging closing statement"#,
        mood_text
    );

    Insight::Ready(CompletionRequest::new(
        prompt,
        MOOD_INSIGHTS_MAX_TOKENS,
        MOOD_INSIGHTS_TEMPERATURE,
    ))
}

/// Builds the stress-analysis request from the seven most recent stress entries.
///
/// Needs at least three stress entries.
pub fn stress_analysis_prompt(entries: &[StressEntry]) -> Insight<CompletionRequest> {
    if !thresholds::enough_for_stress_analysis(entries.len()) {
        return Insight::InsufficientData(NOT_ENOUGH_STRESS_DATA);
    }

    let stress_text = last_n(entries, STRESS_ANALYSIS_WINDOW)
        .iter()
        .map(format_stress_line)
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        r#"Based on the following stress level entries from a user, analyze patterns and provide helpful recommendations:

{}

Please provide:
1. An observation of any patterns in stress levels
2. Identification of potential stress triggers based on the activities
3. 2-3 specific stress management techniques that might be beneficial based on this data
4. A brief, supportive recommendation for when and how to implement these techniques

Focus on being practical, supportive, and evidence-based in your analysis."#,
        stress_text
    );

    Insight::Ready(CompletionRequest::new(
        prompt,
        STRESS_ANALYSIS_MAX_TOKENS,
        STRESS_ANALYSIS_TEMPERATURE,
    ))
}

/// Builds a request for an open-ended journaling prompt.
///
/// `mood` is the user's current mood label; `latest` is the most recent
/// journal entry, whose title steers the prompt away from repetition.
pub fn journal_prompt(mood: Option<&str>, latest: Option<&JournalEntry>) -> CompletionRequest {
    let mut context = String::new();

    if let Some(mood) = mood.map(str::trim).filter(|m| !m.is_empty()) {
        context.push_str(&format!("The user is currently feeling: {}. ", mood));
    }

    if let Some(entry) = latest {
        let title = entry.title.trim();
        let topic = if title.is_empty() { "unknown topic" } else { title };
        context.push_str(&format!(
            "Their most recent journal entry was about: {}. ",
            topic
        ));
    }

    let prompt = format!(
        r#"{}
Create a thoughtful, open-ended journaling prompt to encourage self-reflection and stress relief.
The prompt should be specific enough to inspire writing but open enough to allow for personal expression.
It should be supportive, non-judgmental, and focused on mental wellbeing. Make the prompt 1-2 sentences long."#,
        context.trim_end()
    );

    CompletionRequest::new(
        prompt.trim_start().to_string(),
        JOURNAL_PROMPT_MAX_TOKENS,
        JOURNAL_PROMPT_TEMPERATURE,
    )
}

/// Builds a request for a single daily affirmation.
pub fn affirmation_prompt() -> CompletionRequest {
    let prompt = r#"Create an uplifting, positive affirmation that promotes self-compassion, resilience, and mental wellbeing.
The affirmation should be personal (using "I" statements), present-tense, positive, specific, and brief (1-2 sentences).
Make it powerful yet believable, avoiding toxic positivity. Reply with the affirmation only."#;

    CompletionRequest::new(prompt, AFFIRMATION_MAX_TOKENS, AFFIRMATION_TEMPERATURE)
}

/// Builds a request for wellness tips about `focus_area`.
pub fn wellness_tips_prompt(focus_area: &str) -> CompletionRequest {
    let prompt = format!(
        r#"Provide practical, evidence-based wellness tips for someone interested in improving their {}.
Include:
1. 3-4 actionable suggestions that can be implemented today
2. A brief explanation of why each tip is beneficial
3. One longer-term habit that could be developed over time

Format the response in a friendly, encouraging tone. Focus on small, sustainable changes rather than dramatic lifestyle overhauls."#,
        focus_area.trim()
    );

    CompletionRequest::new(prompt, WELLNESS_TIPS_MAX_TOKENS, WELLNESS_TIPS_TEMPERATURE)
}
