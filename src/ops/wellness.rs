//! Wellness tips for a focus area.

use super::AppContext;
use crate::ai::prompts::wellness_tips_prompt;
use crate::ai::{complete_or_fallback, Completion};
use crate::errors::{AppError, AppResult};
use tracing::info;

/// Practical tips for improving `focus_area`, e.g. "sleep quality".
///
/// # Errors
///
/// Returns `AppError::Cli` for a blank focus area and `AppError::Config` when
/// no API key is configured.
pub fn wellness_tips(ctx: &mut AppContext, focus_area: &str) -> AppResult<Completion> {
    if focus_area.trim().is_empty() {
        return Err(AppError::Cli("Please name an area to focus on".to_string()));
    }

    info!("Requesting wellness tips");
    let request = wellness_tips_prompt(focus_area);
    Ok(complete_or_fallback(ctx.completion()?, &request))
}
