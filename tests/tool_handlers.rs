mod common;

use common::{mount_login, mount_namespaces, test_app, TOKEN};
use nacos_mcp::errors::ToolErrorKind;
use serde_json::json;
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn instance_toggle_defaults_group_and_namespace() {
    let server = MockServer::start().await;
    mount_login(&server, 18_000, 1).await;
    Mock::given(method("PUT"))
        .and(path("/nacos/v2/ns/instance"))
        .and(query_param("groupName", "DEFAULT_GROUP"))
        .and(query_param("port", "9001"))
        .and(query_param("enabled", "true"))
        .and(query_param("accessToken", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let text = app
        .tool_executor
        .execute(
            "update_instance_status",
            json!({"serviceName": "service-product", "ip": "10.0.0.9", "port": 9001, "enabled": true}),
        )
        .await
        .expect("toggle");
    assert_eq!(text, "HTTP 200 OK\nok");

    let received = server.received_requests().await.expect("recording");
    let put = received
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .expect("put");
    assert!(put.url.query_pairs().all(|(k, _)| k != "namespaceId"));
}

#[tokio::test]
async fn namespace_detail_resolves_display_name() {
    let server = MockServer::start().await;
    mount_login(&server, 18_000, 1).await;
    mount_namespaces(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/nacos/v2/console/namespace"))
        .and(query_param("namespaceId", "6f1c-dev"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"namespace":"6f1c-dev"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let text = app
        .tool_executor
        .execute("get_namespace_detail", json!({"namespace": "dev"}))
        .await
        .expect("detail");
    assert!(text.ends_with(r#"{"namespace":"6f1c-dev"}"#));
}

#[tokio::test]
async fn unknown_namespace_stops_before_the_config_call() {
    let server = MockServer::start().await;
    mount_login(&server, 18_000, 1).await;
    mount_namespaces(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/nacos/v2/cs/config"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let err = app
        .tool_executor
        .execute(
            "get_config",
            json!({"dataId": "a.yaml", "group": "DEFAULT_GROUP", "namespace": "qa"}),
        )
        .await
        .expect_err("qa is unknown");
    assert_eq!(err.code, "UNKNOWN_NAMESPACE");
}

#[tokio::test]
async fn legacy_instances_default_to_public_and_default_group() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nacos/v1/ns/instance/list"))
        .and(basic_auth("nacos", "nacos"))
        .and(query_param("serviceName", "ms-gateway"))
        .and(query_param("groupName", "DEFAULT_GROUP"))
        .and(query_param("namespaceId", "public"))
        .and(query_param("healthyOnly", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"hosts":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let text = app
        .tool_executor
        .execute("legacy_list_instances", json!({"serviceName": "ms-gateway"}))
        .await
        .expect("instances");
    assert_eq!(text, r#"{"hosts":[]}"#);
}

#[tokio::test]
async fn legacy_search_uses_blur_mode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nacos/v1/cs/configs"))
        .and(query_param("search", "blur"))
        .and(query_param("dataId", "order"))
        .and(query_param("pageSize", "20"))
        .and(query_param("namespaceId", ""))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"totalCount":1}"#))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let text = app
        .tool_executor
        .execute("legacy_search_configs", json!({"search": "order"}))
        .await
        .expect("search");
    assert_eq!(text, r#"{"totalCount":1}"#);
}

#[tokio::test]
async fn port_must_be_an_integer() {
    let app = test_app("http://127.0.0.1:9");
    let err = app
        .tool_executor
        .execute(
            "update_instance_status",
            json!({"serviceName": "s", "ip": "10.0.0.1", "port": "eighty", "enabled": true}),
        )
        .await
        .expect_err("port type");
    assert_eq!(err.kind, ToolErrorKind::InvalidParams);
    assert!(err.message.contains("/port"));
}
