//! The completion boundary.
//!
//! [`TextCompletion`] is the seam between the app and whatever produces text.
//! Implementations report failures as `Err`; only [`Completion::from_result`]
//! turns a failure into the fixed fallback text plus a user-facing notice.

use crate::constants::COMPLETION_FALLBACK_TEXT;
use crate::errors::AppResult;
use tracing::warn;

/// A prompt together with its generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// The full prompt text.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Creates a request; `temperature` is clamped into `[0, 1]`.
    pub fn new(prompt: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        let temperature = if temperature.is_nan() {
            0.0
        } else {
            temperature.clamp(0.0, 1.0)
        };
        Self {
            prompt: prompt.into(),
            max_tokens,
            temperature,
        }
    }
}

/// Something that turns a prompt into generated text.
pub trait TextCompletion {
    /// Generates text for `request`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AI` on any transport or service failure.
    fn complete(&self, request: &CompletionRequest) -> AppResult<String>;
}

/// Text ready for display, with an optional notice about a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Generated text, or the fallback text.
    pub text: String,
    /// Set when the service failed; the presentation layer shows it as an error banner.
    pub notice: Option<String>,
}

impl Completion {
    /// Wraps text that did not come from the completion service.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            notice: None,
        }
    }

    /// Converts a completion result into displayable text.
    ///
    /// Failures become [`COMPLETION_FALLBACK_TEXT`] with the error described in `notice`.
    pub fn from_result(result: AppResult<String>) -> Self {
        match result {
            Ok(text) => Self::text(text),
            Err(err) => {
                warn!("Completion failed, using fallback text: {}", err);
                Self {
                    text: COMPLETION_FALLBACK_TEXT.to_string(),
                    notice: Some(format!("Error connecting to the AI service: {}", err)),
                }
            }
        }
    }

    /// Whether this is the fallback text.
    pub fn is_fallback(&self) -> bool {
        self.notice.is_some()
    }
}

/// Runs `request` through `client`, never failing.
pub fn complete_or_fallback(client: &dyn TextCompletion, request: &CompletionRequest) -> Completion {
    Completion::from_result(client.complete(request))
}
