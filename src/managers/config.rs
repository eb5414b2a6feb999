use crate::constants::nacos::DEFAULT_GROUP;
use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::services::nacos_client::NacosClient;
use crate::services::validation::Validation;
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const CONFIG_TOOLS: &[&str] = &[
    "get_config",
    "get_config_history",
    "list_configs",
    "legacy_list_configs",
    "legacy_get_config",
    "legacy_search_configs",
];

#[derive(Clone)]
pub struct ConfigManager {
    logger: Logger,
    validation: Validation,
    client: Arc<NacosClient>,
}

impl ConfigManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<NacosClient>) -> Self {
        Self {
            logger: logger.child("config"),
            validation,
            client,
        }
    }

    pub async fn handle_tool(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        match tool {
            "get_config" => {
                let data_id = self.validation.required_string(&args, "dataId")?;
                let group = self.validation.required_string(&args, "group")?;
                let namespace = self.validation.string_or(&args, "namespace", "")?;
                self.client.get_config(&data_id, &group, &namespace).await
            }
            "get_config_history" => {
                let data_id = self.validation.required_string(&args, "dataId")?;
                let group = self.validation.required_string(&args, "group")?;
                let namespace = self.validation.string_or(&args, "namespace", "")?;
                self.client
                    .get_config_history(&data_id, &group, &namespace)
                    .await
            }
            "list_configs" => {
                let namespace = self.validation.string_or(&args, "namespace", "")?;
                self.client.list_configs(&namespace).await
            }
            "legacy_list_configs" => {
                let namespace_id = self.validation.string_or(&args, "namespaceId", "")?;
                self.client.legacy_list_configs(&namespace_id).await
            }
            "legacy_get_config" => {
                let data_id = self.validation.required_string(&args, "dataId")?;
                let group = self.validation.string_or(&args, "group", DEFAULT_GROUP)?;
                let namespace_id = self.validation.string_or(&args, "namespaceId", "")?;
                self.client
                    .legacy_get_config(&data_id, &group, &namespace_id)
                    .await
            }
            "legacy_search_configs" => {
                let keyword = self.validation.required_string(&args, "search")?;
                let namespace_id = self.validation.string_or(&args, "namespaceId", "")?;
                self.client
                    .legacy_search_configs(&keyword, &namespace_id)
                    .await
            }
            _ => Err(unknown_tool_error("config", tool, CONFIG_TOOLS)),
        }
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for ConfigManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        self.logger.debug("handle_tool", Some(&Value::String(tool.to_string())));
        self.handle_tool(tool, args).await
    }
}
