use feddit_sentiment::analysis::{GeminiModel, SentimentModel};
use feddit_sentiment::config::GeminiConfig;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/models/gemini-test:generateContent";

fn model_for(server: &MockServer) -> GeminiModel {
    GeminiModel::new(&GeminiConfig {
        model: "gemini-test".to_string(),
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        ..Default::default()
    })
    .unwrap()
}

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    }))
}

#[tokio::test]
async fn parses_structured_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("system_instruction"))
        .and(body_string_contains("I love this product!"))
        .respond_with(reply(r#"{"sentiment_score": 0.8, "sentiment_label": "positive"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let verdict = model_for(&server).score("I love this product!").await.unwrap();

    assert_eq!(verdict.sentiment_score, 0.8);
    assert_eq!(verdict.sentiment_label, "positive");
}

#[tokio::test]
async fn api_error_is_reported_without_the_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = model_for(&server).score("meh").await.unwrap_err();
    let message = format!("{:#}", err);

    assert!(message.contains("429"));
    assert!(!message.contains("test-key"));
}

#[tokio::test]
async fn rejects_empty_and_non_json_replies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_string_contains("empty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_string_contains("prose"))
        .respond_with(reply("The sentiment is mildly positive."))
        .mount(&server)
        .await;

    let model = model_for(&server);

    let err = model.score("empty").await.unwrap_err();
    assert!(format!("{:#}", err).contains("Empty Gemini response"));

    let err = model.score("prose").await.unwrap_err();
    assert!(format!("{:#}", err).contains("sentiment JSON"));
}
