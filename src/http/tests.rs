//! Tests for the HTTP session module

use super::*;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A local URI nothing is listening on
fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[test]
fn test_session_config_default() {
    let config = SessionConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.default_headers.is_empty());
    assert!(config.cookie_store);
    assert!(config.user_agent.starts_with("sessionauth/"));
}

#[test]
fn test_session_config_builder() {
    let config = SessionConfig::builder()
        .timeout(Duration::from_secs(5))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .no_cookie_store()
        .build();

    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
    assert!(!config.cookie_store);
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .header("X-Request-Id", "abc123")
        .basic_auth("user", "pass")
        .json(serde_json::json!({"key": "value"}))
        .timeout(Duration::from_secs(10));

    assert_eq!(
        config.headers.get("x-request-id"),
        Some(&"abc123".to_string())
    );
    assert!(matches!(config.body, RequestBody::Json(_)));
    assert_eq!(
        config.basic_auth,
        Some(("user".to_string(), "pass".to_string()))
    );
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
}

#[tokio::test]
async fn test_header_map_is_case_insensitive_and_single_valued() {
    let session = Session::new().unwrap();

    assert_eq!(session.set_header("Authorization", "Bearer one").await, None);
    assert_eq!(
        session.set_header("AUTHORIZATION", "JWT two").await,
        Some("Bearer one".to_string())
    );

    let headers = session.headers().await;
    assert_eq!(headers.len(), 1);
    assert_eq!(headers.get(AUTHORIZATION), Some(&"JWT two".to_string()));
    assert_eq!(
        session.header("authorization").await,
        Some("JWT two".to_string())
    );

    assert_eq!(
        session.remove_header("Authorization").await,
        Some("JWT two".to_string())
    );
    assert_eq!(session.remove_header("Authorization").await, None);
    assert!(session.headers().await.is_empty());
}

#[tokio::test]
async fn test_clones_share_headers() {
    let session = Session::new().unwrap();
    let handle = session.clone();

    handle.set_header("X-Trace", "1").await;
    assert_eq!(session.header("x-trace").await, Some("1".to_string()));
}

#[tokio::test]
async fn test_session_sends_default_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/secure"))
        .and(header("X-API-Key", "secret123"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = SessionConfig::builder()
        .header("X-API-Key", "secret123")
        .build();
    let session = Session::with_config(config).unwrap();
    session.set_header("Authorization", "Bearer abc").await;

    let response = session
        .get(&format!("{}/api/secure", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_request_header_overrides_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let session = Session::new().unwrap();
    session.set_header("x-request-id", "default").await;

    session
        .request(
            reqwest::Method::GET,
            &format!("{}/api/data", mock_server.uri()),
            RequestConfig::new().header("X-Request-Id", "req-456"),
        )
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let values: Vec<_> = requests[0].headers.get_all("x-request-id").iter().collect();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0], "req-456");
}

#[tokio::test]
async fn test_request_headers_differing_in_case_send_one_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let session = Session::new().unwrap();
    session
        .request(
            reqwest::Method::GET,
            &format!("{}/api/data", mock_server.uri()),
            RequestConfig::new().header("X-A", "first").header("x-a", "second"),
        )
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let values: Vec<_> = requests[0].headers.get_all("x-a").iter().collect();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0], "second");
}

#[tokio::test]
async fn test_basic_auth_replaces_default_authorization() {
    use base64::Engine;

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let session = Session::new().unwrap();
    session.set_header("Authorization", "Bearer stale").await;

    session
        .get_basic(&format!("{}/login", mock_server.uri()), "user", "pass")
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let values: Vec<_> = requests[0].headers.get_all("authorization").iter().collect();
    assert_eq!(values.len(), 1);

    let value = values[0].to_str().unwrap();
    let encoded = value.strip_prefix("Basic ").unwrap();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), "user:pass");

    // The default stays in place for later requests
    assert_eq!(
        session.header("Authorization").await,
        Some("Bearer stale".to_string())
    );
}

#[tokio::test]
async fn test_post_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Session::new().unwrap();
    let mut fields = HashMap::new();
    fields.insert("username".to_string(), "alice".to_string());
    fields.insert("password".to_string(), "s3cret".to_string());

    let response = session
        .post_form(&format!("{}/login", mock_server.uri()), fields)
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_post_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_json(serde_json::json!({"username": "alice", "password": "pw"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Session::new().unwrap();
    let response = session
        .post_json(
            &format!("{}/api/token", mock_server.uri()),
            serde_json::json!({"username": "alice", "password": "pw"}),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_error_status_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let session = Session::new().unwrap();
    let response = session
        .get(&format!("{}/missing", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_transport_failure() {
    let uri = closed_port_uri();

    let config = SessionConfig::builder()
        .timeout(Duration::from_secs(2))
        .build();
    let session = Session::with_config(config).unwrap();
    let result = session.get(&format!("{uri}/login")).await;

    let err = result.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_response_cookies_persist() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "sid=server-session; Path=/"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/account"))
        .and(header("cookie", "sid=server-session"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Session::new().unwrap();
    session
        .post_form(&format!("{}/login", mock_server.uri()), HashMap::new())
        .await
        .unwrap();

    let response = session
        .get(&format!("{}/account", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_add_cookies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deep/page"))
        .and(header("cookie", "sid=abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Session::new().unwrap();
    let login_url = Url::parse(&format!("{}/auth/login", mock_server.uri())).unwrap();

    assert_eq!(session.add_cookies("sid=abc; broken", &login_url), 1);
    assert_eq!(
        session.cookie_header(&login_url),
        Some("sid=abc".to_string())
    );

    let response = session
        .get(&format!("{}/deep/page", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_session_debug_hides_values() {
    let config = SessionConfig::builder()
        .header("Authorization", "Bearer secret-token")
        .build();
    let session = Session::with_config(config).unwrap();

    let debug = format!("{session:?}");
    assert!(debug.contains("authorization"));
    assert!(!debug.contains("secret-token"));
}

#[tokio::test]
async fn test_add_cookies_without_cookie_store() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = SessionConfig::builder().no_cookie_store().build();
    let session = Session::with_config(config).unwrap();
    let url = Url::parse(&format!("{}/page", mock_server.uri())).unwrap();

    assert_eq!(session.add_cookies("sid=abc", &url), 0);
    assert_eq!(session.cookie_header(&url), None);

    session.get(url.as_str()).await.unwrap();
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("cookie").is_none());
}
