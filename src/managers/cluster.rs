use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::services::nacos_client::NacosClient;
use crate::services::validation::Validation;
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const CLUSTER_TOOLS: &[&str] = &[
    "get_current_node",
    "list_cluster_nodes",
    "get_current_node_health",
    "get_system_metrics",
    "list_clients",
    "get_client_detail",
    "legacy_list_cluster_nodes",
];

/// Cluster membership, node health, naming metrics and connected clients.
#[derive(Clone)]
pub struct ClusterManager {
    logger: Logger,
    validation: Validation,
    client: Arc<NacosClient>,
}

impl ClusterManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<NacosClient>) -> Self {
        Self {
            logger: logger.child("cluster"),
            validation,
            client,
        }
    }

    pub async fn handle_tool(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        match tool {
            "get_current_node" => self.client.get_current_node().await,
            "list_cluster_nodes" => self.client.list_cluster_nodes().await,
            "get_current_node_health" => self.client.get_current_node_health().await,
            "get_system_metrics" => self.client.get_system_metrics().await,
            "list_clients" => self.client.list_clients().await,
            "get_client_detail" => {
                let client_id = self.validation.required_string(&args, "clientId")?;
                self.client.get_client_detail(&client_id).await
            }
            "legacy_list_cluster_nodes" => self.client.legacy_list_cluster_nodes().await,
            _ => Err(unknown_tool_error("cluster", tool, CLUSTER_TOOLS)),
        }
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for ClusterManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        self.logger.debug("handle_tool", Some(&Value::String(tool.to_string())));
        self.handle_tool(tool, args).await
    }
}
