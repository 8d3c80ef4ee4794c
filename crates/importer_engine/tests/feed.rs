use std::sync::Once;
use std::time::Duration;

use importer_engine::{CatalogFeed, FeedError, FeedSettings, ReqwestCatalogFeed};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(importer_logging::initialize_for_tests);
}

fn settings(server: &MockServer) -> FeedSettings {
    FeedSettings {
        url: format!("{}/feed", server.uri()),
        api_key: "key-123".to_string(),
        bearer_token: "token-abc".to_string(),
        language: "nl".to_string(),
        page_size: 100,
        request_timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn fetch_page_sends_credentials_and_parses_records() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feed"))
        .and(header("authorization", "Bearer token-abc"))
        .and(body_partial_json(serde_json::json!({
            "api_key": "key-123",
            "language": "nl",
            "page_size": 100,
            "page_num": 3,
            "show_all_attributes": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "products": [
                { "Sku": "VAAS-10", "Naam": "Vaas", "Verkoopprijs": "12,50" },
                { "Sku": "VAAS-11", "Naam": "Vaas groot", "Verkoopprijs": "17,50" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let feed = ReqwestCatalogFeed::new(settings(&server)).expect("client");
    let records = feed.fetch_page(3).await.expect("page");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].sku, "VAAS-10");
    assert_eq!(records[1].name, "Vaas groot");
}

#[tokio::test]
async fn empty_products_array_signals_end_of_pagination() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "products": [] })),
        )
        .mount(&server)
        .await;

    let feed = ReqwestCatalogFeed::new(settings(&server)).expect("client");
    let records = feed.fetch_page(17).await.expect("page");
    assert!(records.is_empty());
}

#[tokio::test]
async fn missing_products_field_also_signals_the_end() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let feed = ReqwestCatalogFeed::new(settings(&server)).expect("client");
    let records = feed.fetch_page(17).await.expect("page");
    assert!(records.is_empty());
}

#[tokio::test]
async fn feed_http_error_is_fatal() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let feed = ReqwestCatalogFeed::new(settings(&server)).expect("client");
    let err = feed.fetch_page(1).await.unwrap_err();
    assert!(matches!(err, FeedError::HttpStatus(503)));
}

#[tokio::test]
async fn malformed_feed_body_is_invalid_response() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let feed = ReqwestCatalogFeed::new(settings(&server)).expect("client");
    let err = feed.fetch_page(1).await.unwrap_err();
    assert!(matches!(err, FeedError::InvalidResponse(_)));
}
