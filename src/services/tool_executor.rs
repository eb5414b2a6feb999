use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::ToolError;
use crate::mcp::catalog::validate_tool_args;
use crate::services::logger::Logger;
use crate::utils::suggest::suggest;

use serde_json::Value;

/// One handler serves a family of tools; `tool` names the one being called.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, tool: &str, args: Value) -> Result<String, ToolError>;
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: HashMap<String, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(handlers),
        }
    }

    pub fn has_tool(&self, tool: &str) -> bool {
        self.handlers.contains_key(tool)
    }

    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn unknown_tool(&self, tool: &str) -> ToolError {
        let candidates = self.tool_names();
        let suggestions = suggest(tool, &candidates, 5);
        let hint = if suggestions.is_empty() {
            "Call tools/list to see the available tools".to_string()
        } else {
            format!("Did you mean: {}", suggestions.join(", "))
        };
        ToolError::invalid_params(format!("Unknown tool: {}", tool)).with_hint(hint)
    }

    /// Validates `args` against the catalog schema, then runs the handler.
    pub async fn execute(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        let Some(handler) = self.handlers.get(tool) else {
            return Err(self.unknown_tool(tool));
        };
        let args = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args
        };
        validate_tool_args(tool, &args)
            .map_err(|err| ToolError::invalid_params(err.message))?;

        let call_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        self.logger.debug(
            "tool call",
            Some(&serde_json::json!({ "tool": tool, "call_id": call_id })),
        );

        let result = handler.handle(tool, args).await;
        let meta = serde_json::json!({
            "tool": tool,
            "call_id": call_id,
            "duration_ms": started.elapsed().as_millis() as u64,
            "ok": result.is_ok(),
        });
        match &result {
            Ok(_) => self.logger.info("tool call finished", Some(&meta)),
            Err(err) => self.logger.warn(
                "tool call failed",
                Some(&serde_json::json!({
                    "tool": tool,
                    "call_id": call_id,
                    "duration_ms": started.elapsed().as_millis() as u64,
                    "kind": err.kind.as_str(),
                    "code": err.code,
                })),
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl ToolHandler for Echo {
        async fn handle(&self, tool: &str, args: Value) -> Result<String, ToolError> {
            Ok(format!("{}:{}", tool, args))
        }
    }

    fn executor() -> ToolExecutor {
        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        handlers.insert("list_services".to_string(), Arc::new(Echo));
        ToolExecutor::new(Logger::new("test"), handlers)
    }

    #[tokio::test]
    async fn null_arguments_become_empty_object() {
        let out = executor()
            .execute("list_services", Value::Null)
            .await
            .expect("call");
        assert_eq!(out, "list_services:{}");
    }

    #[tokio::test]
    async fn unknown_tool_suggests_close_names() {
        let err = executor()
            .execute("list_service", serde_json::json!({}))
            .await
            .expect_err("unknown");
        assert_eq!(err.kind, crate::errors::ToolErrorKind::InvalidParams);
        assert!(err.hint.unwrap_or_default().contains("list_services"));
    }
}
