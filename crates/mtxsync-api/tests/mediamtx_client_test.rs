#![allow(clippy::unwrap_used)]
// Integration tests for `MediaMtxClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mtxsync_api::{Error, MediaMtxClient};

async fn setup() -> (MockServer, MediaMtxClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = MediaMtxClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Listing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_paths() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v3/paths/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pageCount": 1,
            "itemCount": 2,
            "items": [
                { "name": "cam_1", "ready": true, "source": { "type": "rtspSource", "id": "" } },
                { "name": "cam_1/sub", "ready": false, "source": null }
            ]
        })))
        .mount(&server)
        .await;

    let paths = client.list_paths().await.unwrap();

    assert_eq!(paths.len(), 2);
    assert!(paths["cam_1"].ready);
    assert_eq!(paths["cam_1"].source.as_ref().unwrap().kind, "rtspSource");
    assert!(!paths["cam_1/sub"].ready);
    assert!(paths["cam_1/sub"].source.is_none());
}

#[tokio::test]
async fn test_list_paths_walks_every_page() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v3/paths/list"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pageCount": 2,
            "items": [{ "name": "cam_1", "ready": true }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3/paths/list"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pageCount": 2,
            "items": [{ "name": "cam_2", "ready": true }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let paths = client.list_paths().await.unwrap();

    assert_eq!(paths.keys().collect::<Vec<_>>(), ["cam_1", "cam_2"]);
}

#[tokio::test]
async fn test_list_paths_empty_server() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v3/paths/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "pageCount": 0, "items": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.list_paths().await.unwrap().is_empty());
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_sub_stream_path() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v3/config/paths/add/cam_1/sub"))
        .and(body_json(json!({ "source": "rtsp://vms:555/tok" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_path("cam_1/sub", "rtsp://vms:555/tok")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_path() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/v3/config/paths/delete/cam_1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_path("cam_1").await.unwrap();
}

#[tokio::test]
async fn test_api_error_is_surfaced() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/v3/config/paths/delete/ghost"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "path configuration not found" })),
        )
        .mount(&server)
        .await;

    match client.delete_path("ghost").await {
        Err(Error::MediaServer { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "path configuration not found");
        }
        other => panic!("expected MediaServer error, got: {other:?}"),
    }
}
