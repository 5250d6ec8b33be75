//! AI operations for mood insights, stress analysis and generated text.
//!
//! # Module Structure
//!
//! - `completion`: The `TextCompletion` seam and the fallback conversion
//! - `gemini`: HTTP client for the Gemini generateContent API
//! - `prompts`: Prompt builders with their generation parameters
//!
//! # Example
//!
//! ```no_run
//! use mindful::ai::{prompts, GeminiClient, TextCompletion};
//!
//! let client = GeminiClient::new(
//!     "https://generativelanguage.googleapis.com",
//!     "gemini-1.5-pro",
//!     "my-api-key",
//!     10,
//! )?;
//! let text = client.complete(&prompts::affirmation_prompt())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod completion;
pub mod gemini;
pub mod prompts;

pub use completion::{complete_or_fallback, Completion, CompletionRequest, TextCompletion};
pub use gemini::GeminiClient;
