use crate::config::DemoTarget;
use crate::constants::{nacos, paths};
use crate::errors::ToolError;
use crate::services::forwarder::{ForwardRequest, RequestForwarder};
use crate::services::namespace::NamespaceResolver;
use serde_json::Value;
use std::sync::Arc;

/// Field set for toggling a registered instance on or off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceToggle {
    pub service_name: String,
    pub group: String,
    pub namespace: String,
    pub ip: String,
    pub port: u16,
    pub enabled: bool,
}

/// Every Nacos endpoint the tools reach, one method per request shape.
///
/// v2 methods take namespace display names and resolve them; legacy (v1)
/// methods take namespace ids verbatim.
#[derive(Clone)]
pub struct NacosClient {
    forwarder: Arc<RequestForwarder>,
    namespaces: Arc<NamespaceResolver>,
}

impl NacosClient {
    pub fn new(forwarder: Arc<RequestForwarder>, namespaces: Arc<NamespaceResolver>) -> Self {
        Self {
            forwarder,
            namespaces,
        }
    }

    pub fn namespaces(&self) -> &Arc<NamespaceResolver> {
        &self.namespaces
    }

    pub fn forwarder(&self) -> &Arc<RequestForwarder> {
        &self.forwarder
    }

    async fn namespace_id(&self, label: &str) -> Result<String, ToolError> {
        self.namespaces.resolve(label).await
    }

    async fn send(&self, request: ForwardRequest) -> Result<String, ToolError> {
        self.forwarder.forward(&request).await
    }

    pub async fn get_config(
        &self,
        data_id: &str,
        group: &str,
        namespace: &str,
    ) -> Result<String, ToolError> {
        let namespace_id = self.namespace_id(namespace).await?;
        self.send(
            ForwardRequest::get(paths::CONFIG)
                .query("dataId", data_id)
                .query("group", group)
                .query_opt("namespaceId", Some(namespace_id.as_str())),
        )
        .await
    }

    pub async fn get_config_history(
        &self,
        data_id: &str,
        group: &str,
        namespace: &str,
    ) -> Result<String, ToolError> {
        let namespace_id = self.namespace_id(namespace).await?;
        self.send(
            ForwardRequest::get(paths::CONFIG_HISTORY)
                .query("dataId", data_id)
                .query("group", group)
                .query_opt("namespaceId", Some(namespace_id.as_str())),
        )
        .await
    }

    pub async fn list_configs(&self, namespace: &str) -> Result<String, ToolError> {
        let namespace_id = self.namespace_id(namespace).await?;
        self.send(
            ForwardRequest::get(paths::CONFIGS_BY_NAMESPACE)
                .query_opt("namespaceId", Some(namespace_id.as_str())),
        )
        .await
    }

    pub async fn list_services(&self) -> Result<String, ToolError> {
        self.send(ForwardRequest::get(paths::SERVICE_LIST)).await
    }

    pub async fn get_service_detail(&self, service_name: &str) -> Result<String, ToolError> {
        self.send(ForwardRequest::get(paths::SERVICE).query("serviceName", service_name))
            .await
    }

    pub async fn list_service_instances(&self, service_name: &str) -> Result<String, ToolError> {
        self.send(ForwardRequest::get(paths::INSTANCE_LIST).query("serviceName", service_name))
            .await
    }

    /// The only state-changing call: enables or disables one instance.
    pub async fn update_instance_status(&self, toggle: &InstanceToggle) -> Result<String, ToolError> {
        let namespace_id = self.namespace_id(&toggle.namespace).await?;
        self.send(
            ForwardRequest::put(paths::INSTANCE)
                .query("serviceName", &toggle.service_name)
                .query("groupName", &toggle.group)
                .query_opt("namespaceId", Some(namespace_id.as_str()))
                .query("ip", &toggle.ip)
                .query("port", toggle.port)
                .query("enabled", toggle.enabled),
        )
        .await
    }

    pub async fn get_system_metrics(&self) -> Result<String, ToolError> {
        self.send(ForwardRequest::get(paths::METRICS)).await
    }

    pub async fn list_clients(&self) -> Result<String, ToolError> {
        self.send(ForwardRequest::get(paths::CLIENT_LIST)).await
    }

    pub async fn get_client_detail(&self, client_id: &str) -> Result<String, ToolError> {
        self.send(ForwardRequest::get(paths::CLIENT).query("clientId", client_id))
            .await
    }

    pub async fn list_namespaces(&self) -> Result<String, ToolError> {
        self.send(ForwardRequest::get(paths::NAMESPACE_LIST)).await
    }

    pub async fn get_namespace_detail(&self, namespace: &str) -> Result<String, ToolError> {
        let namespace_id = self.namespace_id(namespace).await?;
        self.send(
            ForwardRequest::get(paths::NAMESPACE).query_opt("namespaceId", Some(namespace_id.as_str())),
        )
        .await
    }

    pub async fn get_current_node(&self) -> Result<String, ToolError> {
        self.send(ForwardRequest::get(paths::NODE_SELF)).await
    }

    pub async fn list_cluster_nodes(&self) -> Result<String, ToolError> {
        self.send(ForwardRequest::get(paths::NODE_LIST)).await
    }

    pub async fn get_current_node_health(&self) -> Result<String, ToolError> {
        self.send(ForwardRequest::get(paths::NODE_SELF_HEALTH)).await
    }

    pub async fn legacy_list_namespaces(&self) -> Result<String, ToolError> {
        self.send(ForwardRequest::legacy(paths::NAMESPACES_V1)).await
    }

    pub async fn legacy_list_configs(&self, namespace_id: &str) -> Result<String, ToolError> {
        self.send(
            ForwardRequest::legacy(paths::LEGACY_CONFIGS)
                .query("search", "accurate")
                .query("dataId", "")
                .query("group", "")
                .query("appName", "")
                .query("namespaceId", namespace_id)
                .query("pageNo", 1)
                .query("pageSize", nacos::LEGACY_PAGE_SIZE),
        )
        .await
    }

    pub async fn legacy_get_config(
        &self,
        data_id: &str,
        group: &str,
        namespace_id: &str,
    ) -> Result<String, ToolError> {
        self.send(
            ForwardRequest::legacy(paths::LEGACY_CONFIGS)
                .query("dataId", data_id)
                .query("group", group)
                .query("tenant", namespace_id)
                .not_found(format!("Config not found: {}", data_id)),
        )
        .await
    }

    pub async fn legacy_search_configs(
        &self,
        keyword: &str,
        namespace_id: &str,
    ) -> Result<String, ToolError> {
        self.send(
            ForwardRequest::legacy(paths::LEGACY_CONFIGS)
                .query("search", "blur")
                .query("dataId", keyword)
                .query("group", "")
                .query("appName", "")
                .query("namespaceId", namespace_id)
                .query("pageNo", 1)
                .query("pageSize", nacos::LEGACY_SEARCH_PAGE_SIZE),
        )
        .await
    }

    pub async fn legacy_list_services(&self, namespace_id: &str) -> Result<String, ToolError> {
        self.send(
            ForwardRequest::legacy(paths::LEGACY_SERVICE_LIST)
                .query("namespaceId", namespace_id)
                .query("pageNo", 1)
                .query("pageSize", nacos::LEGACY_PAGE_SIZE),
        )
        .await
    }

    pub async fn legacy_list_instances(
        &self,
        service_name: &str,
        group_name: &str,
        namespace_id: &str,
    ) -> Result<String, ToolError> {
        self.send(
            ForwardRequest::legacy(paths::LEGACY_INSTANCE_LIST)
                .query("serviceName", service_name)
                .query("groupName", group_name)
                .query("namespaceId", namespace_id)
                .query("healthyOnly", false)
                .not_found(format!("Service not found: {}", service_name)),
        )
        .await
    }

    pub async fn legacy_list_cluster_nodes(&self) -> Result<String, ToolError> {
        self.send(ForwardRequest::legacy(paths::LEGACY_CLUSTER_NODES))
            .await
    }

    /// Instance records (`hosts`) for the diagnostic REST route.
    pub async fn demo_instances(&self, target: &DemoTarget) -> Result<Value, ToolError> {
        let request = ForwardRequest::legacy(paths::LEGACY_INSTANCE_LIST)
            .query("serviceName", &target.service)
            .query("groupName", &target.group)
            .query_opt("namespaceId", Some(target.namespace_id.as_str()))
            .query("healthyOnly", false)
            .not_found(format!("Service not found: {}", target.service));
        let body = self.forwarder.forward_json(&request).await?;
        Ok(match body.get("hosts") {
            Some(Value::Array(hosts)) => Value::Array(hosts.clone()),
            _ => Value::Array(Vec::new()),
        })
    }
}
