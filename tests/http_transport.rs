//! Wire-level tests: the gateway and HTTP transport against a mock server.

use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_json, body_string_contains, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use profile_client::config::{ApiConfig, ProfileConfig};
use profile_client::http::TransportError;
use profile_client::{ApiClient, Fields, FilePart, GroupMapper, ParamBag, ProfileStore, RequestOptions, StaticAuth};

mod common;

use common::{alice, alice_json, User};

fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        bearer_token: Some("secret-token".to_string()),
        ..ApiConfig::default()
    }
}

fn client(server: &MockServer) -> ApiClient {
    ApiClient::from_config(&api_config(server)).unwrap()
}

#[tokio::test]
async fn test_get_encodes_query_and_identifies_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("with[]", "roles"))
        .and(query_param("with[]", "team"))
        .and(query_param("active", "1"))
        .and(query_param("deleted_at", ""))
        .and(header_exists("x-request-id"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let params = ParamBag::new()
        .with("with", vec!["roles", "team"])
        .with("active", true)
        .with_null("deleted_at")
        .with("page", None::<i64>);

    let body = client(&server)
        .get("/users", &params, RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(body, json!([{"id": 1}]));

    let received = server.received_requests().await.unwrap();
    let query = received[0].url.query().unwrap_or_default().to_string();
    assert!(!query.contains("page"));
}

#[tokio::test]
async fn test_put_without_files_sends_json() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/profile"))
        .and(body_json(json!({"name": "Alice", "tags": ["a", "b"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let data = Fields::new().with("name", "Alice").with("tags", vec!["a", "b"]);
    let body = client(&server)
        .put("/profile", &data, RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn test_put_with_file_is_tunneled_through_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/profile"))
        .and(body_string_contains("name=\"_method\""))
        .and(body_string_contains("filename=\"avatar.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let data = Fields::new()
        .with("name", "Alice")
        .with("address", Fields::new().with("city", "Paris"))
        .with("file", FilePart::new("avatar.png", b"png-bytes".to_vec()).with_mime_type("image/png"));

    let body = client(&server)
        .put("/profile", &data, RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(body, json!({"ok": true}));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);

    let content_type = received[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));

    let raw = String::from_utf8_lossy(&received[0].body);
    assert!(raw.contains("name=\"address[city]\""));
    assert!(raw.contains("Paris"));
    assert!(raw.contains("PUT"));
}

#[tokio::test]
async fn test_post_with_files_key_sends_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uploads"))
        .and(body_string_contains("name=\"files[0]\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"stored": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let data = Fields::new().with("files", vec![FilePart::new("a.txt", b"hello".to_vec())]);
    let body = client(&server)
        .post("/uploads", &data, RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(body, json!({"stored": 1}));

    let received = server.received_requests().await.unwrap();
    assert!(!String::from_utf8_lossy(&received[0].body).contains("_method"));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/sessions/7"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .mount(&server)
        .await;

    let err = client(&server)
        .delete("/sessions/7", &ParamBag::new(), RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        TransportError::Status {
            status: 404,
            body: "missing".to_string(),
        }
    );
}

#[tokio::test]
async fn test_empty_body_decodes_as_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/sessions/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let body = client(&server)
        .delete("/sessions/7", &ParamBag::new(), RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_request_options_add_headers_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("x-tenant", "acme"))
        .and(query_param("locale", "fr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let options = RequestOptions::default().header("x-tenant", "acme").query("locale", "fr");
    client(&server).get("/profile", &ParamBag::new(), options).await.unwrap();
}

#[tokio::test]
async fn test_store_refresh_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(query_param("with[]", "roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice_json()))
        .expect(1)
        .mount(&server)
        .await;

    let config = ProfileConfig {
        relations: vec!["roles".to_string()],
        ..ProfileConfig::default()
    };
    let store: ProfileStore<User> = ProfileStore::new(
        client(&server),
        Arc::new(StaticAuth::new(true)),
        Arc::new(GroupMapper::<User>::new()),
        config,
    );

    let outcome = store.refresh().await.unwrap();

    assert!(outcome.is_loaded());
    assert_eq!(store.profile().as_deref(), Some(&alice()));
}
