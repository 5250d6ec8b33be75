//! High-level operations for the mood and stress journal.
//!
//! This module provides user-facing operations that join the entry store,
//! the metrics engine, the prompt builders and the completion client. All of
//! them work on an [`AppContext`], which owns the state of one session.

pub mod affirmations;
pub mod dashboard;
pub mod entries;
pub mod insights;
pub mod music;
pub mod wellness;

use crate::ai::{GeminiClient, TextCompletion};
use crate::config::Config;
use crate::errors::AppResult;
use crate::session::Session;
use crate::store::EntryStore;
use tracing::debug;

// Re-export commonly used functions
pub use affirmations::{affirmation_library, daily_affirmation, find_category, AffirmationCategory};
pub use dashboard::{build_dashboard, session_dashboard, Dashboard};
pub use entries::{export_entries, import_entries, record_journal, record_mood, record_stress};
pub use insights::{analyze_stress, generate_journal_prompt, mood_insights};
pub use music::{music_catalog, recommend_track, Track};
pub use wellness::wellness_tips;

/// Everything one session needs: its store, its user, and its configuration.
///
/// The completion client is created on first use, so commands that never
/// reach the AI service work without an API key.
pub struct AppContext {
    /// Entries for this process.
    pub store: EntryStore,
    /// The logged-in user.
    pub session: Session,
    config: Config,
    completion: Option<Box<dyn TextCompletion>>,
}

impl AppContext {
    /// Creates a context with an empty store.
    pub fn new(config: Config, session: Session) -> Self {
        Self {
            store: EntryStore::new(),
            session,
            config,
            completion: None,
        }
    }

    /// Replaces the completion client, e.g. with a canned one in tests.
    pub fn with_completion(mut self, client: Box<dyn TextCompletion>) -> Self {
        self.completion = Some(client);
        self
    }

    /// The loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The completion client, built from the configuration on first call.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when no API key is configured.
    pub fn completion(&mut self) -> AppResult<&dyn TextCompletion> {
        let client = match self.completion.take() {
            Some(client) => client,
            None => {
                debug!("Creating completion client for model {}", self.config.model);
                Box::new(GeminiClient::from_config(&self.config)?)
            }
        };
        Ok(&**self.completion.insert(client))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A canned completion client shared by the ops unit tests.

    use super::AppContext;
    use crate::ai::{CompletionRequest, TextCompletion};
    use crate::config::Config;
    use crate::errors::{AIError, AppError, AppResult};
    use crate::session::Session;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every prompt and answers with a fixed reply.
    pub struct Canned {
        pub reply: Option<String>,
        pub prompts: Rc<RefCell<Vec<CompletionRequest>>>,
    }

    impl TextCompletion for Canned {
        fn complete(&self, request: &CompletionRequest) -> AppResult<String> {
            self.prompts.borrow_mut().push(request.clone());
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(AppError::AI(AIError::RateLimited("quota".to_string()))),
            }
        }
    }

    /// A context for user "ana" whose client answers with `reply` (or fails on `None`).
    pub fn context(reply: Option<&str>) -> (AppContext, Rc<RefCell<Vec<CompletionRequest>>>) {
        let prompts = Rc::new(RefCell::new(Vec::new()));
        let client = Canned {
            reply: reply.map(str::to_string),
            prompts: Rc::clone(&prompts),
        };
        let session = Session::login("ana", "pw").unwrap();
        let ctx = AppContext::new(Config::default(), session).with_completion(Box::new(client));
        (ctx, prompts)
    }
}
