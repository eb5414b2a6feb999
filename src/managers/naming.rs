use crate::constants::nacos::{DEFAULT_GROUP, DEFAULT_NAMESPACE};
use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::services::nacos_client::{InstanceToggle, NacosClient};
use crate::services::validation::Validation;
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const NAMING_TOOLS: &[&str] = &[
    "list_services",
    "get_service_detail",
    "list_service_instances",
    "update_instance_status",
    "legacy_list_services",
    "legacy_list_instances",
];

/// Service registry tools: services, instances and the instance toggle.
#[derive(Clone)]
pub struct NamingManager {
    logger: Logger,
    validation: Validation,
    client: Arc<NacosClient>,
}

impl NamingManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<NacosClient>) -> Self {
        Self {
            logger: logger.child("naming"),
            validation,
            client,
        }
    }

    fn instance_toggle(&self, args: &Value) -> Result<InstanceToggle, ToolError> {
        Ok(InstanceToggle {
            service_name: self.validation.required_string(args, "serviceName")?,
            group: self.validation.string_or(args, "group", DEFAULT_GROUP)?,
            namespace: self
                .validation
                .string_or(args, "namespace", DEFAULT_NAMESPACE)?,
            ip: self.validation.required_string(args, "ip")?,
            port: self.validation.required_port(args, "port")?,
            enabled: self.validation.required_bool(args, "enabled")?,
        })
    }

    pub async fn handle_tool(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        match tool {
            "list_services" => self.client.list_services().await,
            "get_service_detail" => {
                let service_name = self.validation.required_string(&args, "serviceName")?;
                self.client.get_service_detail(&service_name).await
            }
            "list_service_instances" => {
                let service_name = self.validation.required_string(&args, "serviceName")?;
                self.client.list_service_instances(&service_name).await
            }
            "update_instance_status" => {
                let toggle = self.instance_toggle(&args)?;
                self.logger.info(
                    "updating instance status",
                    Some(&serde_json::json!({
                        "service": toggle.service_name,
                        "ip": toggle.ip,
                        "port": toggle.port,
                        "enabled": toggle.enabled,
                    })),
                );
                self.client.update_instance_status(&toggle).await
            }
            "legacy_list_services" => {
                let namespace_id =
                    self.validation
                        .string_or(&args, "namespaceId", DEFAULT_NAMESPACE)?;
                self.client.legacy_list_services(&namespace_id).await
            }
            "legacy_list_instances" => {
                let service_name = self.validation.required_string(&args, "serviceName")?;
                let group_name = self.validation.string_or(&args, "groupName", DEFAULT_GROUP)?;
                let namespace_id =
                    self.validation
                        .string_or(&args, "namespaceId", DEFAULT_NAMESPACE)?;
                self.client
                    .legacy_list_instances(&service_name, &group_name, &namespace_id)
                    .await
            }
            _ => Err(unknown_tool_error("naming", tool, NAMING_TOOLS)),
        }
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for NamingManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        self.logger.debug("handle_tool", Some(&Value::String(tool.to_string())));
        self.handle_tool(tool, args).await
    }
}
