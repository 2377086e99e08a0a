// tests/client_retry_test.rs

use mockito::Matcher;
use std::sync::Arc;
use ubicast_dl::client::RobustClient;
use ubicast_dl::config::AppConfig;
use ubicast_dl::error::AppError;
use ubicast_dl::metadata::MetadataSource;
use ubicast_dl::page::fetch_page;

fn client_with_retries(retries: u32) -> RobustClient {
    let config = AppConfig {
        page_max_retries: retries,
        ..AppConfig::default()
    };
    RobustClient::new(Arc::new(config)).expect("Failed to create client")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_page_fetch_retries_transient_errors() {
    let mut server = mockito::Server::new_async().await;

    // 第一次请求 -> 503，第二次 -> 200
    let mock_503 = server
        .mock("GET", "/permalink/v1/")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;
    let mock_200 = server
        .mock("GET", "/permalink/v1/")
        .with_status(200)
        .with_body("<footer>Powered by UBICAST</footer>")
        .expect(1)
        .create_async()
        .await;

    let client = client_with_retries(1);
    let page = fetch_page(&client, &format!("{}/permalink/v1/", server.url()))
        .await
        .expect("Request should eventually succeed");

    assert!(page.markup().contains("Powered by UBICAST"));
    assert_eq!(page.url(), format!("{}/permalink/v1/", server.url()));
    mock_503.assert_async().await;
    mock_200.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_metadata_fetch_is_never_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/medias/get/")
        .match_query(Matcher::UrlEncoded("oid".into(), "v1".into()))
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    // 即使页面抓取允许重试，媒体信息请求也只发一次
    let client = client_with_retries(3);
    let result = client
        .fetch_media_info(&format!("{}/api/v2/medias/get/?oid=v1", server.url()))
        .await;

    // 503 且没有 JSON 响应体
    assert!(matches!(result, Err(AppError::ApiParseFailed { .. })));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_metadata_fetch_unreachable_host() {
    let client = client_with_retries(3);
    let result = client
        .fetch_media_info("http://127.0.0.1:9/api/v2/medias/get/?oid=v1")
        .await;

    assert!(matches!(result, Err(AppError::MetadataFetch(_))));
}

#[tokio::test]
async fn test_metadata_fetch_keeps_json_body_of_error_status() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/medias/get/")
        .match_query(Matcher::UrlEncoded("oid".into(), "v1".into()))
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": false, "error": "Access denied"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_with_retries(0);
    let info = client
        .fetch_media_info(&format!("{}/api/v2/medias/get/?oid=v1", server.url()))
        .await
        .unwrap();

    assert_eq!(info.title, None);
    assert_eq!(info.raw["error"], "Access denied");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_metadata_fetch_parses_title() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/medias/get/")
        .match_query(Matcher::UrlEncoded("oid".into(), "v1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "title": "Cours magistral 1", "duration": "1:02:03"}"#)
        .create_async()
        .await;

    let client = client_with_retries(0);
    let info = client
        .fetch_media_info(&format!("{}/api/v2/medias/get/?oid=v1", server.url()))
        .await
        .unwrap();

    assert_eq!(info.title.as_deref(), Some("Cours magistral 1"));
    assert_eq!(info.raw["duration"], "1:02:03");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_metadata_fetch_rejects_invalid_json() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v2/medias/get/")
        .match_query(Matcher::UrlEncoded("oid".into(), "v1".into()))
        .with_status(200)
        .with_body("<html>login required</html>")
        .create_async()
        .await;

    let client = client_with_retries(0);
    let result = client
        .fetch_media_info(&format!("{}/api/v2/medias/get/?oid=v1", server.url()))
        .await;

    assert!(matches!(result, Err(AppError::ApiParseFailed { .. })));
}
