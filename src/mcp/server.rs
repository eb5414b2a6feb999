use crate::app::App;
use crate::constants::server;
use crate::errors::{ErrorCode, McpError, ToolError};
use crate::mcp::catalog::list_tools;
use crate::mcp::protocol::{CallToolResult, JsonRpcRequest, JsonRpcResponse, ToolCallParams};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::Mutex;
use tokio::task::JoinSet;

type SharedWriter<W> = Arc<Mutex<BufWriter<W>>>;

pub struct McpServer {
    app: Arc<App>,
}

impl McpServer {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": server::PROTOCOL_VERSION,
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {"name": server::NAME, "version": server::VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": list_tools() })
    }

    /// Tool failures come back as `isError` results; only a missing or
    /// unknown tool name is a JSON-RPC error.
    pub async fn handle_tools_call(&self, params: Value) -> Result<Value, McpError> {
        let params: ToolCallParams = serde_json::from_value(params).unwrap_or_default();
        let name = params.name.trim();
        if name.is_empty() {
            return Err(McpError::invalid_params("Missing tool name"));
        }
        let executor = &self.app.tool_executor;
        if !executor.has_tool(name) {
            let err = executor.unknown_tool(name);
            let message = match err.hint {
                Some(hint) => format!("{}. {}", err.message, hint),
                None => err.message,
            };
            return Err(McpError::invalid_params(message));
        }

        let result = match executor.execute(name, params.arguments).await {
            Ok(text) => CallToolResult::text(text),
            Err(err) => CallToolResult::error(err.render(name)),
        };
        serde_json::to_value(result)
            .map_err(|err| McpError::new(ErrorCode::InternalError, err.to_string()))
    }

    /// Answers every method except `tools/call`. `None` means no reply.
    pub fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.method.starts_with("notifications/") {
            return None;
        }
        let id = request.id.clone()?;
        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.handle_initialize()),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(id, self.handle_tools_list()),
            _ => JsonRpcResponse::failure(
                id,
                McpError::new(ErrorCode::MethodNotFound, "Method not found"),
            ),
        };
        Some(response)
    }

    /// Serves line-delimited JSON-RPC until `reader` is exhausted. Each
    /// `tools/call` runs as its own task; replies may leave out of order.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, writer: W) -> Result<(), ToolError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let writer: SharedWriter<W> = Arc::new(Mutex::new(BufWriter::new(writer)));
        let mut lines = reader.lines();
        let mut calls = JoinSet::new();

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str::<Value>(trimmed) {
                Err(_) => {
                    let response = JsonRpcResponse::failure(
                        Value::Null,
                        McpError::new(ErrorCode::ParseError, "Parse error"),
                    );
                    write_response(&writer, &response).await?;
                    continue;
                }
                Ok(parsed) => match serde_json::from_value(parsed) {
                    Ok(request) => request,
                    Err(_) => {
                        let response = JsonRpcResponse::failure(
                            Value::Null,
                            McpError::new(ErrorCode::InvalidRequest, "Invalid request"),
                        );
                        write_response(&writer, &response).await?;
                        continue;
                    }
                },
            };

            if request.method == "tools/call" {
                let Some(id) = request.id else {
                    continue;
                };
                let server = self.clone();
                let writer = writer.clone();
                calls.spawn(async move {
                    let response = match server.handle_tools_call(request.params).await {
                        Ok(result) => JsonRpcResponse::success(id, result),
                        Err(err) => JsonRpcResponse::failure(id, err),
                    };
                    if let Err(err) = write_response(&writer, &response).await {
                        server.app.logger.error(
                            "failed to write tool response",
                            Some(&serde_json::json!({ "error": err.to_string() })),
                        );
                    }
                });
                continue;
            }

            if let Some(response) = self.handle_request(&request) {
                write_response(&writer, &response).await?;
            }
        }

        while calls.join_next().await.is_some() {}
        Ok(())
    }
}

async fn write_response<W>(writer: &SharedWriter<W>, response: &JsonRpcResponse) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let payload = serde_json::to_string(response).unwrap_or_default();
    let mut writer = writer.lock().await;
    writer.write_all(payload.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

pub async fn run_stdio(app: Arc<App>) -> Result<(), ToolError> {
    let server = Arc::new(McpServer::new(app));
    let reader = BufReader::new(tokio::io::stdin());
    server.serve(reader, tokio::io::stdout()).await
}
