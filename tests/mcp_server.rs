mod common;

use common::{mount_login, test_app};
use nacos_mcp::mcp::catalog::{list_tools, tool_catalog};
use nacos_mcp::mcp::server::McpServer;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Feeds `lines` to the server and returns its replies keyed by id.
async fn exchange(server_uri: &str, lines: &[Value]) -> (Vec<Value>, HashMap<String, Value>) {
    let app = Arc::new(test_app(server_uri));
    let server = Arc::new(McpServer::new(app));
    let input: String = lines
        .iter()
        .map(|line| format!("{}\n", line))
        .collect::<String>()
        + "this is not json\n\n";

    let (writer, mut reader) = tokio::io::duplex(1 << 20);
    server
        .serve(input.as_bytes(), writer)
        .await
        .expect("serve");

    let mut output = String::new();
    reader.read_to_string(&mut output).await.expect("read");
    let replies: Vec<Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).expect("reply is json"))
        .collect();
    let by_id = replies
        .iter()
        .filter(|reply| !reply["id"].is_null())
        .map(|reply| (reply["id"].to_string(), reply.clone()))
        .collect();
    (replies, by_id)
}

#[test]
fn every_catalog_tool_is_listed() {
    let listed: Vec<String> = list_tools().into_iter().map(|tool| tool.name).collect();
    assert_eq!(listed.len(), tool_catalog().len());
    assert_eq!(listed.len(), 22);
    assert!(listed.contains(&"update_instance_status".to_string()));
    assert!(listed.contains(&"legacy_search_configs".to_string()));
}

#[tokio::test]
async fn executor_serves_exactly_the_catalog() {
    let app = test_app("http://127.0.0.1:9");
    let mut catalog: Vec<String> = tool_catalog().iter().map(|t| t.name.clone()).collect();
    catalog.sort();
    assert_eq!(app.tool_executor.tool_names(), catalog);
}

#[tokio::test]
async fn protocol_methods_and_errors() {
    let server = MockServer::start().await;
    let lines = vec![
        serde_json::json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        serde_json::json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        serde_json::json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}),
        serde_json::json!({"jsonrpc": "2.0", "id": 3, "method": "tools/list"}),
        serde_json::json!({"jsonrpc": "2.0", "id": 4, "method": "resources/list"}),
        serde_json::json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call", "params": {"name": "get_confg", "arguments": {}}}),
        serde_json::json!({"jsonrpc": "2.0", "id": 6, "method": "tools/call", "params": {}}),
    ];
    let (replies, by_id) = exchange(&server.uri(), &lines).await;

    // Six answered ids plus one parse error; the notification gets nothing.
    assert_eq!(replies.len(), 7);

    let init = &by_id["1"]["result"];
    assert_eq!(init["serverInfo"]["name"], "nacos-mcp");
    assert_eq!(init["protocolVersion"], "2025-06-18");
    assert_eq!(by_id["2"]["result"], serde_json::json!({}));
    assert_eq!(
        by_id["3"]["result"]["tools"].as_array().map(Vec::len),
        Some(tool_catalog().len())
    );
    assert_eq!(by_id["4"]["error"]["code"], -32601);

    let unknown = &by_id["5"]["error"];
    assert_eq!(unknown["code"], -32602);
    assert!(unknown["message"].as_str().unwrap_or("").contains("get_config"));
    assert_eq!(by_id["6"]["error"]["message"], "Missing tool name");

    let parse_error = replies
        .iter()
        .find(|reply| reply["id"].is_null())
        .expect("parse error reply");
    assert_eq!(parse_error["error"]["code"], -32700);
}

#[tokio::test]
async fn tool_failures_are_is_error_results() {
    let server = MockServer::start().await;
    let lines = vec![
        serde_json::json!({"jsonrpc": "2.0", "id": 10, "method": "tools/call",
            "params": {"name": "get_config", "arguments": {"group": "DEFAULT_GROUP"}}}),
        serde_json::json!({"jsonrpc": "2.0", "id": 11, "method": "tools/call",
            "params": {"name": "get_client_detail", "arguments": {"clientId": "   "}}}),
        serde_json::json!({"jsonrpc": "2.0", "id": 12, "method": "tools/call",
            "params": {"name": "update_instance_status", "arguments": {
                "serviceName": "svc", "ip": "10.0.0.1", "port": 70000, "enabled": true}}}),
    ];
    let (_, by_id) = exchange(&server.uri(), &lines).await;

    for id in ["10", "11", "12"] {
        let result = &by_id[id]["result"];
        assert_eq!(result["isError"], true, "reply {}", id);
        let text = result["content"][0]["text"].as_str().unwrap_or("");
        assert!(text.starts_with("NacosError\n"), "reply {}: {}", id, text);
        assert!(text.contains("kind: invalid_params"), "reply {}: {}", id, text);
    }
    assert!(by_id["10"]["result"]["content"][0]["text"]
        .as_str()
        .unwrap_or("")
        .contains("missing required field 'dataId'"));

    let received = server.received_requests().await.expect("recording");
    assert!(received.is_empty(), "invalid calls must not reach Nacos");
}

#[tokio::test]
async fn successful_call_returns_raw_text() {
    let server = MockServer::start().await;
    mount_login(&server, 18_000, 1).await;
    Mock::given(method("GET"))
        .and(path("/nacos/v2/core/cluster/node/self/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code":0,"data":"UP"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let lines = vec![serde_json::json!({"jsonrpc": "2.0", "id": "h", "method": "tools/call",
        "params": {"name": "get_current_node_health"}})];
    let (_, by_id) = exchange(&server.uri(), &lines).await;

    let result = &by_id["\"h\""]["result"];
    assert_eq!(result["isError"], false);
    assert_eq!(
        result["content"][0]["text"],
        "HTTP 200 OK\n{\"code\":0,\"data\":\"UP\"}"
    );
}
