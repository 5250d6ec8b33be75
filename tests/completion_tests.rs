use mindful::ai::prompts::wellness_tips_prompt;
use mindful::ai::{complete_or_fallback, CompletionRequest, GeminiClient, TextCompletion};
use mindful::constants::COMPLETION_FALLBACK_TEXT;
use mindful::errors::{AIError, AppError};
use mindful::Config;
use mockito::Matcher;

use test_helpers::gemini_reply;

const PATH: &str = "/v1beta/models/gemini-1.5-pro:generateContent";

fn config_for(server: &mockito::Server) -> Config {
    Config {
        api_key: Some("test-key".to_string().into()),
        api_base: server.url(),
        max_retries: 2,
        retry_delay_ms: 1,
        ..Config::default()
    }
}

#[test]
fn test_client_sends_generation_parameters() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "generationConfig": {"maxOutputTokens": 500}
        })))
        .with_status(200)
        .with_body(gemini_reply("Try a short walk after lunch."))
        .create();

    let client = GeminiClient::from_config(&config_for(&server)).unwrap();
    let text = client.complete(&wellness_tips_prompt("energy")).unwrap();

    assert_eq!(text, "Try a short walk after lunch.");
    mock.assert();
}

#[test]
fn test_client_concatenates_parts() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(
            serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "I am "}, {"text": "steady."}]}}]
            })
            .to_string(),
        )
        .create();

    let client = GeminiClient::from_config(&config_for(&server)).unwrap();
    let text = client
        .complete(&CompletionRequest::new("affirm", 100, 0.8))
        .unwrap();
    assert_eq!(text, "I am steady.");
}

#[test]
fn test_rate_limit_recovers_after_retry() {
    let mut server = mockito::Server::new();
    let limited = server
        .mock("POST", PATH)
        .with_status(429)
        .with_body("slow down")
        .expect(1)
        .create();
    let ok = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(gemini_reply("Recovered."))
        .expect(1)
        .create();

    let client = GeminiClient::from_config(&config_for(&server)).unwrap();
    let completion = complete_or_fallback(&client, &CompletionRequest::new("p", 10, 0.5));

    assert_eq!(completion.text, "Recovered.");
    assert!(!completion.is_fallback());
    limited.assert();
    ok.assert();
}

#[test]
fn test_exhausted_retries_keep_fallback_contract() {
    let mut server = mockito::Server::new();
    let failing = server
        .mock("POST", PATH)
        .with_status(500)
        .with_body("boom")
        .expect(3)
        .create();

    let client = GeminiClient::from_config(&config_for(&server)).unwrap();
    let request = CompletionRequest::new("p", 10, 0.5);

    match client.complete(&request) {
        Err(AppError::AI(AIError::Service { status, .. })) => assert_eq!(status, 500),
        other => panic!("Expected service error, got {:?}", other),
    }
    failing.assert();

    let completion = complete_or_fallback(&client, &request);
    assert_eq!(completion.text, COMPLETION_FALLBACK_TEXT);
    assert!(completion.notice.unwrap().contains("HTTP 500"));
}

#[test]
fn test_unknown_model_reported() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1beta/models/no-such-model:generateContent")
        .with_status(404)
        .create();

    let config = Config {
        model: "no-such-model".to_string(),
        ..config_for(&server)
    };
    let client = GeminiClient::from_config(&config).unwrap();
    let err = client
        .complete(&CompletionRequest::new("p", 10, 0.5))
        .unwrap_err();
    assert!(err.to_string().contains("no-such-model"));
}
