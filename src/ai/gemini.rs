//! Gemini HTTP client for text generation.
//!
//! Calls `POST {base}/v1beta/models/{model}:generateContent` with the API key
//! in the `x-goog-api-key` header. Transient failures (connect errors,
//! timeouts, 429 and 5xx) are retried with exponential backoff.

use super::completion::{CompletionRequest, TextCompletion};
use crate::config::Config;
use crate::constants::MAX_RETRY_DELAY_MS;
use crate::errors::{AIError, AppResult};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use zeroize::Zeroizing;

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, or why there is none.
    fn into_text(self) -> Result<String, AIError> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(AIError::EmptyResponse(
                block_reason.unwrap_or_else(|| "no candidates".to_string()),
            ));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AIError::EmptyResponse(
                candidate
                    .finish_reason
                    .unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        Ok(text.trim().to_string())
    }
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Zeroizing<String>,
    client: Client,
    timeout_secs: u64,
    max_retries: u32,
    retry_delay: Duration,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &crate::constants::REDACTED_PLACEHOLDER)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

impl GeminiClient {
    /// Creates a client from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when no API key is configured, and
    /// `AppError::AI` if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let api_key = config.require_api_key()?;
        let client = Self::new(
            &config.api_base,
            &config.model,
            api_key,
            config.timeout_secs,
        )?;
        Ok(client.with_retry(config.max_retries, config.retry_delay()))
    }

    /// Creates a client without retries.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Service root, e.g. "https://generativelanguage.googleapis.com"
    /// * `model` - Model name, e.g. "gemini-1.5-pro"
    /// * `api_key` - Credential sent in the `x-goog-api-key` header
    /// * `timeout_secs` - Per-request timeout
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(AIError::Transport)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: Zeroizing::new(api_key.to_string()),
            client,
            timeout_secs,
            max_retries: 0,
            retry_delay: Duration::ZERO,
        })
    }

    /// Sets how many times a transient failure is retried, and the initial backoff.
    pub fn with_retry(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Full endpoint URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Generates text for a single prompt, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the last [`AIError`] once retries are exhausted, or the first
    /// non-transient one.
    pub fn generate(&self, request: &CompletionRequest) -> Result<String, AIError> {
        let mut attempt = 0u32;
        loop {
            match self.generate_once(request) {
                Ok(text) => return Ok(text),
                Err((err, retry_after)) if err.is_transient() && attempt < self.max_retries => {
                    let delay = retry_after
                        .map(|d| d.min(Duration::from_millis(MAX_RETRY_DELAY_MS)))
                        .unwrap_or_else(|| backoff_delay(self.retry_delay, attempt));
                    warn!(
                        "Generation attempt {} failed ({}); retrying in {:?}",
                        attempt + 1,
                        err,
                        delay
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err((err, _)) => return Err(err),
            }
        }
    }

    fn generate_once(
        &self,
        request: &CompletionRequest,
    ) -> Result<String, (AIError, Option<Duration>)> {
        debug!(
            "Sending generateContent request with model: {} (max_tokens={}, temperature={})",
            self.model, request.max_tokens, request.temperature
        );

        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .map_err(|e| (self.map_transport_error(e), None))?;

        if !response.status().is_success() {
            let retry_after = retry_after(&response);
            return Err((self.map_status_error(response), retry_after));
        }

        let parsed: GenerateResponse = response.json().map_err(|e| {
            (
                AIError::InvalidResponse(format!("Failed to parse generation response: {}", e)),
                None,
            )
        })?;

        let text = parsed.into_text().map_err(|e| (e, None))?;
        debug!("Received {} characters of generated text", text.len());
        Ok(text)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> AIError {
        if err.is_timeout() {
            AIError::Timeout(self.timeout_secs)
        } else {
            AIError::Transport(err)
        }
    }

    fn map_status_error(&self, response: Response) -> AIError {
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        let message = truncate(&body, MAX_ERROR_BODY_CHARS);

        match status {
            401 | 403 => AIError::Unauthorized(message),
            404 => AIError::ModelNotFound(self.model.clone()),
            429 => AIError::RateLimited(message),
            _ => AIError::Service { status, message },
        }
    }
}

impl TextCompletion for GeminiClient {
    fn complete(&self, request: &CompletionRequest) -> AppResult<String> {
        Ok(self.generate(request)?)
    }
}

/// Exponential backoff: `base * 2^attempt`, capped.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let factor = 2u64.saturating_pow(attempt.min(16));
    Duration::from_millis(base_ms.saturating_mul(factor).min(MAX_RETRY_DELAY_MS))
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const PATH: &str = "/v1beta/models/gemini-1.5-pro:generateContent";

    fn client_for(server: &mockito::Server) -> GeminiClient {
        GeminiClient::new(&server.url(), "gemini-1.5-pro", "test-key", 5).unwrap()
    }

    fn success_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })
        .to_string()
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(2000));
        assert_eq!(
            backoff_delay(base, 10),
            Duration::from_millis(MAX_RETRY_DELAY_MS)
        );
        assert_eq!(backoff_delay(Duration::ZERO, 3), Duration::ZERO);
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }

    #[test]
    fn test_debug_redacts_key() {
        let client =
            GeminiClient::new("http://localhost:1", "gemini-1.5-pro", "secret-key", 5).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new("http://localhost:8080/", "m", "k", 5).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/m:generateContent"
        );
    }

    #[test]
    fn test_generate_sends_prompt_and_parameters() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", PATH)
            .match_header(API_KEY_HEADER, "test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{"parts": [{"text": "How am I doing?"}]}],
                "generationConfig": {"maxOutputTokens": 600}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(success_body("  You are doing well.  "))
            .create();

        let request = CompletionRequest::new("How am I doing?", 600, 0.7);
        let text = client_for(&server).generate(&request).unwrap();

        assert_eq!(text, "You are doing well.");
        mock.assert();
    }

    #[test]
    fn test_status_errors_are_mapped() {
        let mut server = mockito::Server::new();
        let request = CompletionRequest::new("p", 10, 0.5);

        let _m = server.mock("POST", PATH).with_status(401).with_body("bad key").create();
        let err = client_for(&server).generate(&request).unwrap_err();
        assert!(matches!(err, AIError::Unauthorized(ref m) if m == "bad key"));

        server.reset();
        let _m = server.mock("POST", PATH).with_status(404).create();
        let err = client_for(&server).generate(&request).unwrap_err();
        assert!(matches!(err, AIError::ModelNotFound(ref m) if m == "gemini-1.5-pro"));

        server.reset();
        let _m = server.mock("POST", PATH).with_status(400).with_body("nope").create();
        let err = client_for(&server).generate(&request).unwrap_err();
        assert!(matches!(err, AIError::Service { status: 400, .. }));
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let mut server = mockito::Server::new();
        let failing = server
            .mock("POST", PATH)
            .with_status(503)
            .with_body("overloaded")
            .expect(3)
            .create();

        let client = client_for(&server).with_retry(2, Duration::from_millis(1));
        let err = client
            .generate(&CompletionRequest::new("p", 10, 0.5))
            .unwrap_err();

        assert!(matches!(err, AIError::Service { status: 503, .. }));
        failing.assert();
    }

    #[test]
    fn test_permanent_failures_are_not_retried() {
        let mut server = mockito::Server::new();
        let failing = server
            .mock("POST", PATH)
            .with_status(403)
            .expect(1)
            .create();

        let client = client_for(&server).with_retry(3, Duration::from_millis(1));
        assert!(client
            .generate(&CompletionRequest::new("p", 10, 0.5))
            .is_err());
        failing.assert();
    }

    #[test]
    fn test_blocked_prompt_is_empty_response() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create();

        let err = client_for(&server)
            .generate(&CompletionRequest::new("p", 10, 0.5))
            .unwrap_err();
        assert!(matches!(err, AIError::EmptyResponse(ref r) if r == "SAFETY"));
    }

    #[test]
    fn test_malformed_body_is_invalid_response() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body("not json")
            .create();

        let err = client_for(&server)
            .generate(&CompletionRequest::new("p", 10, 0.5))
            .unwrap_err();
        assert!(matches!(err, AIError::InvalidResponse(_)));
    }

    #[test]
    fn test_unreachable_service_is_transport_error() {
        let client = GeminiClient::new("http://127.0.0.1:1", "gemini-1.5-pro", "k", 2).unwrap();
        let err = client
            .generate(&CompletionRequest::new("p", 10, 0.5))
            .unwrap_err();
        assert!(matches!(err, AIError::Transport(_) | AIError::Timeout(_)));
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = Config {
            api_key: None,
            ..Config::default()
        };
        assert!(GeminiClient::from_config(&config).is_err());
    }
}
