//! Configuration management for the mindful application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. It covers the generative-AI credential, the
//! model and endpoint, and the timeout/retry policy of the completion client.
//!
//! # Environment Variables
//!
//! - `MINDFUL_API_KEY` (or `GEMINI_API_KEY`): credential for the generative-AI service.
//!   There is no built-in default; AI operations fail fast without it.
//! - `MINDFUL_MODEL`: model name (defaults to `gemini-1.5-pro`)
//! - `MINDFUL_API_BASE`: service base URL
//! - `MINDFUL_TIMEOUT_SECS`: per-request timeout (defaults to 10)
//! - `MINDFUL_MAX_RETRIES`: retries for transient failures (defaults to 2)
//! - `MINDFUL_RETRY_DELAY_MS`: initial retry backoff (defaults to 500)

use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_RETRY_DELAY_MS,
    DEFAULT_TIMEOUT_SECS, ENV_VAR_API_BASE, ENV_VAR_API_KEY, ENV_VAR_GEMINI_API_KEY,
    ENV_VAR_MAX_RETRIES, ENV_VAR_MODEL, ENV_VAR_RETRY_DELAY_MS, ENV_VAR_TIMEOUT_SECS,
    MAX_ALLOWED_RETRIES, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use zeroize::Zeroizing;

/// Configuration for the mindful application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use mindful::Config;
///
/// let config = Config {
///     api_key: Some("test-key".to_string().into()),
///     api_base: "http://127.0.0.1:8080".to_string(),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
pub struct Config {
    /// Credential for the generative-AI service, wiped from memory on drop.
    pub api_key: Option<Zeroizing<String>>,

    /// Model used for every completion request.
    pub model: String,

    /// Base URL of the generative-language service.
    pub api_base: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// How many times a transient failure is retried.
    pub max_retries: u32,

    /// Initial retry backoff in milliseconds, doubled per attempt.
    pub retry_delay_ms: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| REDACTED_PLACEHOLDER),
            )
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// A missing API key is not an error here: commands that never talk to the
    /// AI service (dashboard, export) keep working. [`Config::require_api_key`]
    /// is the fail-fast point.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a numeric variable does not parse or the
    /// resulting configuration fails [`Config::validate`].
    pub fn load() -> AppResult<Self> {
        let api_key = env::var(ENV_VAR_API_KEY)
            .or_else(|_| env::var(ENV_VAR_GEMINI_API_KEY))
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(Zeroizing::new);

        let model = env::var(ENV_VAR_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let api_base = env::var(ENV_VAR_API_BASE).unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let config = Config {
            api_key,
            model,
            api_base,
            timeout_secs: parse_env_or(ENV_VAR_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)?,
            max_retries: parse_env_or(ENV_VAR_MAX_RETRIES, DEFAULT_MAX_RETRIES)?,
            retry_delay_ms: parse_env_or(ENV_VAR_RETRY_DELAY_MS, DEFAULT_RETRY_DELAY_MS)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when:
    /// - the model name is empty
    /// - the base URL is not http(s)
    /// - the timeout is zero
    /// - more than five retries are requested
    pub fn validate(&self) -> AppResult<()> {
        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model name is empty".to_string()));
        }

        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "{} must be an http(s) URL",
                ENV_VAR_API_BASE
            )));
        }

        if self.timeout_secs == 0 {
            return Err(AppError::Config(format!(
                "{} must be greater than zero",
                ENV_VAR_TIMEOUT_SECS
            )));
        }

        if self.max_retries > MAX_ALLOWED_RETRIES {
            return Err(AppError::Config(format!(
                "{} must be at most {}",
                ENV_VAR_MAX_RETRIES, MAX_ALLOWED_RETRIES
            )));
        }

        Ok(())
    }

    /// Returns the API key or fails fast.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the variable to set when no key is configured.
    pub fn require_api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.as_str())
            .ok_or_else(|| {
                AppError::Config(format!(
                    "No API key configured. Set {} (or {}) to use AI features",
                    ENV_VAR_API_KEY, ENV_VAR_GEMINI_API_KEY
                ))
            })
    }

    /// Initial retry backoff as a `Duration`.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn parse_env_or<T: FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(default),
    }
}

/// Expands `~` and environment variables in a user-supplied path.
///
/// # Errors
///
/// Returns `AppError::Config` if expansion fails or the path is empty.
pub fn expand_path(raw: &str) -> AppResult<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;

    if expanded.trim().is_empty() {
        return Err(AppError::Config("Path is empty".to_string()));
    }

    Ok(PathBuf::from(expanded.into_owned()))
}
