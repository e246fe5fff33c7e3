use tsc_agent::domain::models::ChatMessage;
use tsc_agent::domain::ports::{ChatCompletion, ChatRequest};
use tsc_agent::infrastructure::llm::{ChatClientConfig, ChatCompletionClient, LlmApiError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, api_key: Option<&str>) -> ChatCompletionClient {
    let config = ChatClientConfig {
        base_url: format!("{}/v1", server.uri()),
        api_key: api_key.map(str::to_string),
        timeout_secs: 30,
        requests_per_second: 100, // High limit for tests
        burst_size: 100,
        max_retries: 3,
        initial_backoff_ms: 10,
        max_backoff_ms: 100,
    };
    ChatCompletionClient::new(config).unwrap()
}

fn request() -> ChatRequest {
    ChatRequest {
        model: "gpt-4".to_string(),
        messages: vec![
            ChatMessage::system("You control a traffic light."),
            ChatMessage::user("Which phase?"),
        ],
        max_tokens: 3072,
        temperature: Some(0.7),
    }
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4",
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }
        ],
        "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160}
    })
}

#[tokio::test]
async fn test_successful_completion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-api-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4",
            "max_tokens": 3072,
            "stream": false,
            "messages": [
                {"role": "system", "content": "You control a traffic light."},
                {"role": "user", "content": "Which phase?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("\\boxed{NTST}")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Some("test-api-key"));
    let response = client.complete(request()).await.unwrap();

    assert_eq!(response.content, "\\boxed{NTST}");
    assert_eq!(response.model.as_deref(), Some("gpt-4"));
}

#[tokio::test]
async fn test_retry_on_500_error() {
    let mock_server = MockServer::start().await;

    // First two requests fail with 500
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    // Third request succeeds
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("\\boxed{ELWL}")))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    let response = client.complete(request()).await.unwrap();

    assert_eq!(response.content, "\\boxed{ELWL}");
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_retry_on_rate_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("\\boxed{NLSL}")))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    let response = client.complete(request()).await.unwrap();

    assert_eq!(response.content, "\\boxed{NLSL}");
}

#[tokio::test]
async fn test_no_retry_on_401_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .expect(1) // Should only be called once (no retry)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Some("wrong-key"));
    let err = client.complete(request()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LlmApiError>(),
        Some(LlmApiError::InvalidApiKey)
    ));
}

#[tokio::test]
async fn test_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(4) // initial attempt plus max_retries
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    let err = client.complete(request()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LlmApiError>(),
        Some(LlmApiError::ServerError(status, _)) if status.as_u16() == 503
    ));
}

#[tokio::test]
async fn test_empty_reply_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-empty",
            "choices": []
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    let err = client.complete(request()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LlmApiError>(),
        Some(LlmApiError::EmptyReply)
    ));
}

#[tokio::test]
async fn test_no_auth_header_without_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("\\boxed{ETWT}")))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    client.complete(request()).await.unwrap();

    let received = mock_server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}
