//! Integration tests for `OpenAiClient` using wiremock HTTP mocks.

use cforge_generator::{
    CompletionRequest, GenerationBackend, GenerationError, ImageRequest, OpenAiClient,
    OpenAiConfig,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str, api_key: Option<&str>) -> OpenAiClient {
    OpenAiClient::new(OpenAiConfig::with_base_url(api_key, base_url))
        .expect("client construction should not fail")
}

fn completion() -> CompletionRequest {
    CompletionRequest {
        context: "generate post for LinkedIn".to_owned(),
        system: "You are a writer.".to_owned(),
        prompt: "Write something.".to_owned(),
        temperature: 0.7,
        max_tokens: 1000,
    }
}

#[tokio::test]
async fn complete_posts_chat_request_and_trims_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4",
            "max_tokens": 1000,
            "messages": [
                { "role": "system", "content": "You are a writer." },
                { "role": "user", "content": "Write something." }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "  Hello world \n" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), Some("sk-test"));
    let text = client.complete(completion()).await.expect("should complete");
    assert_eq!(text, "Hello world");
}

#[tokio::test]
async fn missing_key_fails_without_touching_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), Some("your_openai_api_key_here"));
    let err = client.complete(completion()).await.unwrap_err();
    assert!(err.is_configuration(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn server_errors_are_retried_then_surface_as_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), Some("sk-test"));
    let err = client.complete(completion()).await.unwrap_err();
    match err {
        GenerationError::Api {
            status,
            body,
            context,
        } => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
            assert_eq!(context, "generate post for LinkedIn");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), Some("sk-test"));
    let err = client.complete(completion()).await.unwrap_err();
    assert!(matches!(err, GenerationError::Api { status: 401, .. }));
}

#[tokio::test]
async fn empty_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), Some("sk-test"));
    let err = client.complete(completion()).await.unwrap_err();
    assert!(matches!(err, GenerationError::MalformedResponse { .. }));
}

#[tokio::test]
async fn create_image_requests_one_standard_square_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(body_partial_json(serde_json::json!({
            "model": "dall-e-3",
            "size": "1024x1024",
            "quality": "standard",
            "n": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "created": 1,
            "data": [ { "url": "https://images.example/a.png" } ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), Some("sk-test"));
    let url = client
        .create_image(ImageRequest {
            context: "image for Instagram".to_owned(),
            prompt: "A bright storefront".to_owned(),
        })
        .await
        .expect("should return url");
    assert_eq!(url, "https://images.example/a.png");
}
