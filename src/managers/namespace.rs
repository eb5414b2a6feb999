use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::services::nacos_client::NacosClient;
use crate::services::validation::Validation;
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const NAMESPACE_TOOLS: &[&str] = &[
    "list_namespaces",
    "get_namespace_detail",
    "legacy_list_namespaces",
];

#[derive(Clone)]
pub struct NamespaceManager {
    logger: Logger,
    validation: Validation,
    client: Arc<NacosClient>,
}

impl NamespaceManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<NacosClient>) -> Self {
        Self {
            logger: logger.child("namespace"),
            validation,
            client,
        }
    }

    pub async fn handle_tool(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        match tool {
            "list_namespaces" => self.client.list_namespaces().await,
            "get_namespace_detail" => {
                let namespace = self.validation.required_string(&args, "namespace")?;
                self.client.get_namespace_detail(&namespace).await
            }
            "legacy_list_namespaces" => self.client.legacy_list_namespaces().await,
            _ => Err(unknown_tool_error("namespace", tool, NAMESPACE_TOOLS)),
        }
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for NamespaceManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        self.logger.debug("handle_tool", Some(&Value::String(tool.to_string())));
        self.handle_tool(tool, args).await
    }
}
