mod common;

use axum::http::StatusCode;
use shortlink::domain::repositories::MappingRepository;

#[tokio::test]
async fn test_shorten_success() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/shorten")
        .form(&[("url", "https://example.com/page")])
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.text();
    let token = common::extract_token(&body);
    assert!(body.contains(&format!("{}/s/{}", common::BASE_URL, token)));

    let mapping = app.repository.lookup(&token).await.unwrap();
    assert_eq!(mapping.long_url, "https://example.com/page");
    assert_eq!(mapping.visit_count, 0);
}

#[tokio::test]
async fn test_shorten_creates_distinct_tokens() {
    let app = common::spawn_app();

    let first = app
        .server
        .post("/shorten")
        .form(&[("url", "https://example.com/same")])
        .await;
    let second = app
        .server
        .post("/shorten")
        .form(&[("url", "https://example.com/same")])
        .await;

    assert_ne!(
        common::extract_token(&first.text()),
        common::extract_token(&second.text())
    );
    assert_eq!(app.repository.list_recent(-1).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let app = common::spawn_app();

    for url in ["not-a-url", "ftp://example.com/file", "https://", ""] {
        let response = app.server.post("/shorten").form(&[("url", url)]).await;

        response.assert_status_bad_request();
    }

    assert!(app.repository.list_recent(-1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_shorten_rejects_url_stripped_by_parser() {
    let app = common::spawn_app();

    for url in [
        "https://example.com/a\nb",
        "https://example.com/a\tb",
        " https://example.com/",
        "https://example.com/ ",
    ] {
        let response = app.server.post("/shorten").form(&[("url", url)]).await;

        response.assert_status_bad_request();
    }

    assert!(app.repository.list_recent(-1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_shorten_invalid_url_error_body() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/shorten")
        .form(&[("url", "not-a-url")])
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"]["url"], "not-a-url");
}

#[tokio::test]
async fn test_shorten_missing_url_field() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/shorten")
        .form(&[("link", "https://example.com")])
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_unparseable_body() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/shorten")
        .json(&serde_json::json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_wrong_method() {
    let app = common::spawn_app();

    let response = app.server.get("/shorten").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_shorten_storage_failure() {
    let app = common::spawn_app();
    app.repository.close().await;

    let response = app
        .server
        .post("/shorten")
        .form(&[("url", "https://example.com")])
        .await;

    response.assert_status_internal_server_error();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["message"], "Internal Server Error");
}
