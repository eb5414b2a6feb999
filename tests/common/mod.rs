#![allow(dead_code)]

use nacos_mcp::app::App;
use nacos_mcp::config::NacosConfig;
use nacos_mcp::services::forwarder::RetryPolicy;
use nacos_mcp::services::logger::{LogLevel, Logger};
use once_cell::sync::Lazy;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub const TOKEN: &str = "test-token-1";

pub fn quiet_logger() -> Logger {
    Logger::new("test").with_level(LogLevel::Error)
}

/// Defaults with a short retry delay so transport tests stay fast.
pub fn test_config(server: &str) -> NacosConfig {
    NacosConfig::new(server, "nacos", "nacos")
        .expect("config")
        .with_retry(RetryPolicy {
            base_delay_ms: 50,
            ..RetryPolicy::default()
        })
        .with_timeout(Duration::from_secs(2))
}

pub fn test_app(server: &str) -> App {
    App::with_logger(quiet_logger(), test_config(server)).expect("app")
}

pub fn test_app_with(config: NacosConfig) -> App {
    App::with_logger(quiet_logger(), config).expect("app")
}

pub fn login_response(ttl_secs: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "accessToken": TOKEN,
        "tokenTtl": ttl_secs,
        "globalAdmin": true,
        "username": "nacos",
    }))
}

pub async fn mount_login(server: &MockServer, ttl_secs: u64, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/nacos/v1/auth/login"))
        .respond_with(login_response(ttl_secs))
        .expect(expected)
        .mount(server)
        .await;
}

pub fn namespace_listing() -> serde_json::Value {
    serde_json::json!({
        "code": 200,
        "message": null,
        "data": [
            {"namespace": "", "namespaceShowName": "public", "type": 0},
            {"namespace": "6f1c-dev", "namespaceShowName": "dev", "type": 2},
            {"namespace": "9a2e-prod", "namespaceShowName": "prod", "type": 2}
        ]
    })
}

pub async fn mount_namespaces(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/nacos/v1/console/namespaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(namespace_listing()))
        .expect(expected)
        .mount(server)
        .await;
}

/// A bare TCP server that drops the first `drops` connections without a
/// reply, then answers every later request with `200 OK` and `body`.
pub async fn flaky_server(drops: usize, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let mut seen = 0usize;
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            seen += 1;
            if seen <= drops {
                drop(socket);
                continue;
            }
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    addr
}
