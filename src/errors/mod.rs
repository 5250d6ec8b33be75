//! Error handling utilities for the mindful application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Sparse data is not an error: the metrics engine reports it through [`crate::metrics::Insight::InsufficientData`] instead.

use thiserror::Error;

/// Represents specific error cases that can occur when calling the
/// generative-text service.
///
/// These errors never reach the user as-is. The presentation edge converts
/// them into the fixed fallback text through
/// [`crate::ai::completion::Completion::from_result`].
///
/// # Examples
///
/// ```
/// use mindful::errors::AIError;
///
/// let error = AIError::ModelNotFound("gemini-1.5-pro".to_string());
/// assert!(format!("{}", error).contains("gemini-1.5-pro"));
/// ```
#[derive(Debug, Error)]
pub enum AIError {
    /// The service could not be reached (DNS, connect, TLS, broken body).
    #[error("Could not reach the generative-AI service: {0}")]
    Transport(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("Request to the generative-AI service timed out after {0}s")]
    Timeout(u64),

    /// The credential was rejected (HTTP 401/403).
    #[error("The generative-AI service rejected the API key: {0}")]
    Unauthorized(String),

    /// Requested model does not exist on the service (HTTP 404).
    #[error("Model not found: {0}. Check MINDFUL_MODEL")]
    ModelNotFound(String),

    /// Quota or rate limit reached and retries were exhausted (HTTP 429).
    #[error("Rate limited by the generative-AI service: {0}")]
    RateLimited(String),

    /// Any other non-success HTTP status.
    #[error("Generative-AI service returned HTTP {status}: {message}")]
    Service {
        /// The HTTP status code
        status: u16,
        /// A truncated copy of the response body
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Invalid response from the generative-AI service: {0}")]
    InvalidResponse(String),

    /// The service answered but produced no text (e.g. blocked by safety filters).
    #[error("The generative-AI service returned no text (finish reason: {0})")]
    EmptyResponse(String),
}

impl AIError {
    /// Whether a retry with backoff may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AIError::Transport(e) => e.is_connect() || e.is_timeout(),
            AIError::Timeout(_) | AIError::RateLimited(_) => true,
            AIError::Service { status, .. } => is_retryable_status(*status),
            AIError::Unauthorized(_)
            | AIError::ModelNotFound(_)
            | AIError::InvalidResponse(_)
            | AIError::EmptyResponse(_) => false,
        }
    }
}

/// HTTP statuses worth retrying.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Represents all possible errors that can occur in the mindful application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use mindful::errors::AppError;
///
/// let error = AppError::Config("MINDFUL_API_KEY is not set".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: MINDFUL_API_KEY is not set");
/// ```
///
/// Converting from an IO error:
/// ```
/// use mindful::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem or terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Login was refused.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Entry store misuse (e.g. importing a record without a username).
    #[error("Entry store error: {0}")]
    Store(String),

    /// Export or import could not be produced.
    #[error("Export error: {0}")]
    Export(String),

    /// JSON (de)serialization failures.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A command line typed into an interactive session could not be parsed.
    #[error("{0}")]
    Cli(String),

    /// Errors related to AI operations.
    ///
    /// This variant uses a dedicated AIError type to provide detailed
    /// information about what went wrong with the generative-AI service.
    #[error("AI error: {0}")]
    AI(#[from] AIError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use mindful::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Store("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
