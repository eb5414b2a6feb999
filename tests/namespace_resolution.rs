mod common;

use common::{mount_login, mount_namespaces, test_app};
use futures::future::join_all;
use nacos_mcp::errors::ToolErrorKind;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn default_namespace_resolves_without_network() {
    let server = MockServer::start().await;
    let app = test_app(&server.uri());
    let resolver = app.client.namespaces();

    assert_eq!(resolver.resolve("public").await.expect("public"), "");
    assert_eq!(resolver.resolve("Public").await.expect("Public"), "");
    assert_eq!(resolver.resolve("").await.expect("blank"), "");
    assert_eq!(resolver.resolve("   ").await.expect("spaces"), "");

    let received = server.received_requests().await.expect("recording");
    assert!(received.is_empty(), "no request expected, got {}", received.len());
    assert_eq!(resolver.generation(), 0);
}

#[tokio::test]
async fn cache_miss_reloads_once_then_hits_cache() {
    let server = MockServer::start().await;
    mount_login(&server, 18_000, 1).await;
    mount_namespaces(&server, 1).await;

    let app = test_app(&server.uri());
    let resolver = app.client.namespaces();

    assert_eq!(resolver.resolve("dev").await.expect("dev"), "6f1c-dev");
    assert_eq!(resolver.generation(), 1);
    assert_eq!(resolver.resolve("prod").await.expect("prod"), "9a2e-prod");
    assert_eq!(resolver.resolve("dev").await.expect("dev again"), "6f1c-dev");
    assert_eq!(resolver.generation(), 1);
    assert_eq!(resolver.snapshot().get("public").map(String::as_str), Some(""));
}

#[tokio::test]
async fn unknown_label_fails_after_one_reload() {
    let server = MockServer::start().await;
    mount_login(&server, 18_000, 1).await;
    mount_namespaces(&server, 1).await;

    let app = test_app(&server.uri());
    let err = app
        .client
        .namespaces()
        .resolve("staging")
        .await
        .expect_err("staging is not listed");
    assert_eq!(err.kind, ToolErrorKind::InvalidParams);
    assert_eq!(err.code, "UNKNOWN_NAMESPACE");
    assert!(err.message.contains("staging"));
}

#[tokio::test]
async fn concurrent_misses_share_one_reload() {
    let server = MockServer::start().await;
    mount_login(&server, 18_000, 1).await;
    mount_namespaces(&server, 1).await;

    let app = test_app(&server.uri());
    let resolver = app.client.namespaces();
    let lookups = (0..6).map(|_| resolver.resolve("dev"));
    for id in join_all(lookups).await {
        assert_eq!(id.expect("dev"), "6f1c-dev");
    }
    assert_eq!(resolver.generation(), 1);
}

#[tokio::test]
async fn reload_failure_propagates_underlying_error() {
    let server = MockServer::start().await;
    mount_login(&server, 18_000, 1).await;
    Mock::given(method("GET"))
        .and(path("/nacos/v1/console/namespaces"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let err = app
        .client
        .namespaces()
        .resolve("dev")
        .await
        .expect_err("listing failed");
    assert_eq!(err.kind, ToolErrorKind::Remote);
    assert!(err.message.contains("500"));
}

#[tokio::test]
async fn v2_tool_sends_resolved_namespace_id() {
    let server = MockServer::start().await;
    mount_login(&server, 18_000, 1).await;
    mount_namespaces(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/nacos/v2/cs/history/configs"))
        .and(wiremock::matchers::query_param("namespaceId", "9a2e-prod"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let body = app.client.list_configs("prod").await.expect("list");
    assert_eq!(body, "HTTP 200 OK\n[]");
}
