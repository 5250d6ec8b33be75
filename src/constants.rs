//! Constants used throughout the application.
//!
//! This module contains all constants used in the Mindful application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "mindful";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A mood and stress journal with AI-generated insights";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Prompt shown for each line of an interactive session.
pub const SESSION_PROMPT: &str = "mindful> ";

// Configuration Keys & Environment Variables
/// Primary environment variable holding the generative-AI credential.
pub const ENV_VAR_API_KEY: &str = "MINDFUL_API_KEY";
/// Fallback environment variable holding the generative-AI credential.
pub const ENV_VAR_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable selecting the model.
pub const ENV_VAR_MODEL: &str = "MINDFUL_MODEL";
/// Environment variable overriding the service base URL.
pub const ENV_VAR_API_BASE: &str = "MINDFUL_API_BASE";
/// Environment variable for the per-request timeout in seconds.
pub const ENV_VAR_TIMEOUT_SECS: &str = "MINDFUL_TIMEOUT_SECS";
/// Environment variable for the number of retries on transient failures.
pub const ENV_VAR_MAX_RETRIES: &str = "MINDFUL_MAX_RETRIES";
/// Environment variable for the initial retry backoff in milliseconds.
pub const ENV_VAR_RETRY_DELAY_MS: &str = "MINDFUL_RETRY_DELAY_MS";
/// Environment variable supplying the login username.
pub const ENV_VAR_USER: &str = "MINDFUL_USER";
/// Environment variable supplying the login password.
pub const ENV_VAR_PASSWORD: &str = "MINDFUL_PASSWORD";

/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Completion Service Defaults
/// Default model used for text generation.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
/// Default base URL of the generative-language service.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default number of retries for transient failures.
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Upper bound accepted for `MINDFUL_MAX_RETRIES`.
pub const MAX_ALLOWED_RETRIES: u32 = 5;
/// Default initial retry backoff in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;
/// Cap on a single retry backoff in milliseconds.
pub const MAX_RETRY_DELAY_MS: u64 = 8_000;
/// Text returned to the user whenever the completion service fails.
pub const COMPLETION_FALLBACK_TEXT: &str =
    "I'm having trouble connecting to my AI services right now. Please try again later.";

// Generation Parameters (max output tokens, temperature)
/// Max tokens for mood insights.
pub const MOOD_INSIGHTS_MAX_TOKENS: u32 = 600;
/// Temperature for mood insights.
pub const MOOD_INSIGHTS_TEMPERATURE: f32 = 0.7;
/// Max tokens for stress-pattern analysis.
pub const STRESS_ANALYSIS_MAX_TOKENS: u32 = 500;
/// Temperature for stress-pattern analysis.
pub const STRESS_ANALYSIS_TEMPERATURE: f32 = 0.7;
/// Max tokens for a journaling prompt.
pub const JOURNAL_PROMPT_MAX_TOKENS: u32 = 150;
/// Temperature for a journaling prompt.
pub const JOURNAL_PROMPT_TEMPERATURE: f32 = 0.8;
/// Max tokens for wellness tips.
pub const WELLNESS_TIPS_MAX_TOKENS: u32 = 500;
/// Temperature for wellness tips.
pub const WELLNESS_TIPS_TEMPERATURE: f32 = 0.7;
/// Max tokens for an affirmation.
pub const AFFIRMATION_MAX_TOKENS: u32 = 100;
/// Temperature for an affirmation.
pub const AFFIRMATION_TEMPERATURE: f32 = 0.8;

// Data Thresholds & Windows
/// Lowest valid mood or stress score.
pub const MIN_SCORE: i32 = 1;
/// Highest valid mood or stress score.
pub const MAX_SCORE: i32 = 10;
/// Mood entries required before mood insights are generated.
pub const MIN_MOOD_ENTRIES_FOR_INSIGHTS: usize = 2;
/// Stress entries required before stress patterns are analyzed.
pub const MIN_STRESS_ENTRIES_FOR_ANALYSIS: usize = 3;
/// Stress entries required before activity impact is computed.
pub const MIN_STRESS_ENTRIES_FOR_IMPACT: usize = 3;
/// Contributing entries required for an activity to be ranked.
pub const MIN_ACTIVITY_OCCURRENCES: usize = 2;
/// Entries required in at least one series for a weekly summary.
pub const MIN_ENTRIES_FOR_WEEKLY_SUMMARY: usize = 3;
/// Number of calendar days in the weekly summary window.
pub const WEEKLY_WINDOW_DAYS: i64 = 7;
/// Most recent mood entries embedded in the insights prompt.
pub const MOOD_INSIGHT_WINDOW: usize = 5;
/// Most recent stress entries embedded in the analysis prompt.
pub const STRESS_ANALYSIS_WINDOW: usize = 7;
/// Most recent mood entries used for the headline average.
pub const RECENT_MOOD_WINDOW: usize = 7;

// Chart Zones
/// Mood at or above this value is in the "good mood zone".
pub const GOOD_MOOD_THRESHOLD: i32 = 7;
/// Stress at or below this value is in the "low stress zone".
pub const LOW_STRESS_THRESHOLD: i32 = 3;
/// Stress at or above this value is in the "high stress zone".
pub const HIGH_STRESS_THRESHOLD: i32 = 7;

// Guidance Messages
/// Returned instead of mood insights below the mood threshold.
pub const NOT_ENOUGH_MOOD_DATA: &str = "Not enough mood data to generate insights yet. Continue tracking your mood for personalized insights.";
/// Returned instead of stress analysis below the stress threshold.
pub const NOT_ENOUGH_STRESS_DATA: &str = "Not enough stress data to analyze patterns. Continue logging your stress levels for personalized insights.";
/// Shown when there are no mood entries to chart.
pub const NO_MOOD_SERIES: &str = "No mood data available yet. Start tracking to see your patterns!";
/// Shown when there are no stress entries to chart.
pub const NO_STRESS_SERIES: &str = "No stress data available yet. Start monitoring to see your patterns!";
/// Shown when there are too few stress entries for activity impact.
pub const NOT_ENOUGH_IMPACT_DATA: &str = "Not enough data to analyze activities impact yet. Keep tracking!";
/// Shown when no activity reaches the occurrence threshold.
pub const NO_CONSISTENT_ACTIVITIES: &str = "Not enough consistent activities to analyze impact yet. Keep tracking!";
/// Shown when neither series can fill a weekly summary.
pub const NOT_ENOUGH_WEEKLY_DATA: &str = "Not enough data for weekly summary. Continue tracking mood and stress!";
/// Shown when no recent mood value can be averaged.
pub const NOT_ENOUGH_RECENT_MOOD: &str = "Start tracking your mood to see weekly statistics and progress.";

// Export
/// Tabular sentinel for a user without mood entries.
pub const NO_MOOD_DATA: &str = "No mood data";
/// Tabular sentinel for a user without journal entries.
pub const NO_JOURNAL_ENTRIES: &str = "No journal entries";
/// Tabular sentinel for a user without stress entries.
pub const NO_STRESS_DATA: &str = "No stress data";

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format used for weekly summary labels.
pub const WEEKDAY_LABEL_FORMAT: &str = "%a, %b %d";

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "mindful";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
