use chrono::{TimeZone, Utc};
use feddit_sentiment::config::FedditConfig;
use feddit_sentiment::feddit::{CommentSource, FedditClient};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> FedditClient {
    FedditClient::new(&FedditConfig {
        base_url: format!("{}/", server.uri()),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn fetches_subfeddits_with_paging_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/subfeddits/"))
        .and(query_param("limit", "10"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "skip": 0,
            "limit": 10,
            "subfeddits": [
                {"id": 1, "username": "admin_1", "title": "Dummy Topic 1", "description": "Dummy Topic 1",
                 "created_at": 1704067200, "updated_at": 1704067200},
                {"id": 2, "username": "admin_2", "title": "Dummy Topic 2", "description": "Dummy Topic 2"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let subfeddits = client_for(&server).subfeddits(10, 0).await.unwrap();

    assert_eq!(subfeddits.len(), 2);
    assert_eq!(subfeddits[0].title, "Dummy Topic 1");
    assert_eq!(
        subfeddits[0].created_at,
        Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(subfeddits[1].created_at, None);
}

#[tokio::test]
async fn fetches_comments_and_converts_timestamps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/comments/"))
        .and(query_param("subfeddit_id", "1"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "subfeddit_id": 1,
            "limit": 25,
            "skip": 0,
            "comments": [
                {"id": 1, "subfeddit_id": 1, "username": "user_0", "text": "It looks great!", "created_at": 1704110400},
                {"id": 2, "username": "user_1", "text": "  Love it.  ", "created_at": 1704110460, "updated_at": 1704110470}
            ]
        })))
        .mount(&server)
        .await;

    let comments = client_for(&server).comments(1, 25, 0).await.unwrap();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].created_at, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
    assert_eq!(comments[1].subfeddit_id, 1);
    assert_eq!(comments[1].text, "Love it.");
    assert!(comments[1].updated_at.is_some());
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/subfeddits/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client_for(&server).subfeddits(10, 0).await.unwrap_err();
    let message = format!("{:#}", err);

    assert!(message.contains("503"));
    assert!(message.contains("maintenance"));
}

#[tokio::test]
async fn malformed_payload_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/comments/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "comments": [{"id": 0, "username": "x", "text": "hi", "created_at": 1}]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).comments(1, 5, 0).await.unwrap_err();
    assert!(format!("{:#}", err).contains("invalid comment"));

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/comments/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    assert!(client_for(&server).comments(1, 5, 0).await.is_err());
}
