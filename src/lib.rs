/*!
# Mindful

Mindful is a mood and stress journal for the terminal. Users record how they
feel, how stressed they are and what they were doing, and the tool turns those
entries into charts, a weekly summary, activity rankings, and AI-generated
insights and affirmations.

## Core Features

- Record mood (1-10) with notes, stress (1-10) with activities, and journal entries
- Text dashboard: mood and stress over time, weekly averages, calmest activities
- AI insights on recent moods and stress patterns, journaling prompts, wellness tips
- Daily affirmation (cached per day) and a built-in affirmation library
- Mood-based music recommendations
- JSON and CSV export; JSON import to seed a session

## Architecture

The codebase follows a modular architecture with clear separation of concerns:

- `store`: In-memory, append-only entry store and export formats
- `metrics`: Pure derived metrics with an explicit insufficient-data result
- `ai`: Prompt builders, the completion seam, and the Gemini client
- `ops`: User-facing operations over one session's `AppContext`
- `cli`: Command-line and interactive command handling using clap
- `config`: Configuration loading and validation
- `errors`: Error handling infrastructure

## Usage Example

```rust,no_run
use chrono::Local;
use mindful::ops::{self, AppContext};
use mindful::session::Session;
use mindful::Config;

fn main() -> mindful::AppResult<()> {
    let config = Config::load()?;
    let session = Session::login("ana", "secret")?;
    let mut ctx = AppContext::new(config, session);

    let today = Local::now().date_naive();
    ops::record_mood(&mut ctx, today, 7, "Slept well");
    println!("{}", ops::session_dashboard(&mut ctx, today));
    Ok(())
}
```
*/

/// Prompt builders and the generative-text client
pub mod ai;
/// Command-line interface for parsing and handling user commands
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Error types and utilities for error handling
pub mod errors;
/// Derived metrics over stored entries
pub mod metrics;
/// High-level operations
pub mod ops;
/// Login and per-session state
pub mod session;
/// Entry storage and export
pub mod store;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use metrics::Insight;
pub use store::EntryStore;
