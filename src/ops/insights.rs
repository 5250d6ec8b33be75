//! AI insights over the session user's entries.
//!
//! Each operation builds its prompt first. When the entries are too sparse the
//! guidance message comes back and the service is never called.

use super::AppContext;
use crate::ai::prompts::{journal_prompt, mood_insights_prompt, stress_analysis_prompt};
use crate::ai::{complete_or_fallback, Completion, CompletionRequest};
use crate::errors::AppResult;
use crate::metrics::Insight;
use tracing::info;

fn run(ctx: &mut AppContext, prompt: Insight<CompletionRequest>) -> AppResult<Insight<Completion>> {
    match prompt {
        Insight::Ready(request) => {
            let client = ctx.completion()?;
            Ok(Insight::Ready(complete_or_fallback(client, &request)))
        }
        Insight::InsufficientData(message) => {
            info!("Skipping completion: insufficient data");
            Ok(Insight::InsufficientData(message))
        }
    }
}

/// Insights over the five most recent mood entries.
///
/// # Errors
///
/// Returns `AppError::Config` when an API key is needed but not configured.
pub fn mood_insights(ctx: &mut AppContext) -> AppResult<Insight<Completion>> {
    let prompt = mood_insights_prompt(ctx.store.list_mood(ctx.session.username()));
    run(ctx, prompt)
}

/// Analysis of the seven most recent stress entries.
///
/// # Errors
///
/// Returns `AppError::Config` when an API key is needed but not configured.
pub fn analyze_stress(ctx: &mut AppContext) -> AppResult<Insight<Completion>> {
    let prompt = stress_analysis_prompt(ctx.store.list_stress(ctx.session.username()));
    run(ctx, prompt)
}

/// A journaling prompt shaped by the current mood and the latest journal entry.
///
/// # Errors
///
/// Returns `AppError::Config` when no API key is configured.
pub fn generate_journal_prompt(ctx: &mut AppContext, mood: Option<&str>) -> AppResult<Completion> {
    let request = journal_prompt(
        mood,
        ctx.store.list_journal(ctx.session.username()).last(),
    );
    let client = ctx.completion()?;
    Ok(complete_or_fallback(client, &request))
}
