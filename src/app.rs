use crate::config::NacosConfig;
use crate::constants::network;
use crate::errors::ToolError;
use crate::managers;
use crate::mcp::catalog::tool_catalog;
use crate::services::forwarder::RequestForwarder;
use crate::services::logger::Logger;
use crate::services::nacos_client::NacosClient;
use crate::services::namespace::NamespaceResolver;
use crate::services::session::SessionManager;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use crate::services::validation::Validation;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub config: NacosConfig,
    pub client: Arc<NacosClient>,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn validate_tool_wiring(
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        let mut uncatalogued: Vec<String> = handlers
            .keys()
            .filter(|name| !tool_catalog().iter().any(|tool| &tool.name == *name))
            .cloned()
            .collect();
        if missing.is_empty() && uncatalogued.is_empty() {
            return Ok(());
        }
        missing.sort();
        uncatalogued.sort();
        Err(ToolError::internal("Tool wiring is incomplete").with_hint(
            "This is a server wiring bug: every tool in tool_catalog.json must have exactly one handler."
                .to_string(),
        )
        .with_details(serde_json::json!({
            "missing_tools": missing,
            "uncatalogued_handlers": uncatalogued,
        })))
    }

    fn build_http_client(config: &NacosConfig) -> Result<Client, ToolError> {
        Client::builder()
            .user_agent(network::USER_AGENT)
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|err| ToolError::internal(format!("HTTP client setup failed: {}", err)))
    }

    pub fn initialize(config: NacosConfig) -> Result<Self, ToolError> {
        Self::with_logger(Logger::new("nacos-mcp"), config)
    }

    pub fn with_logger(logger: Logger, config: NacosConfig) -> Result<Self, ToolError> {
        let validation = Validation::new();
        let http = Self::build_http_client(&config)?;

        let session = Arc::new(SessionManager::new(&logger, http.clone(), &config));
        let forwarder = Arc::new(RequestForwarder::new(
            &logger,
            http,
            config.base_url.clone(),
            session,
            config.retry.clone(),
        ));
        let namespaces = Arc::new(NamespaceResolver::new(&logger, forwarder.clone()));
        let client = Arc::new(NacosClient::new(forwarder, namespaces));

        let config_manager = Arc::new(managers::config::ConfigManager::new(
            logger.clone(),
            validation.clone(),
            client.clone(),
        ));
        let naming_manager = Arc::new(managers::naming::NamingManager::new(
            logger.clone(),
            validation.clone(),
            client.clone(),
        ));
        let namespace_manager = Arc::new(managers::namespace::NamespaceManager::new(
            logger.clone(),
            validation.clone(),
            client.clone(),
        ));
        let cluster_manager = Arc::new(managers::cluster::ClusterManager::new(
            logger.clone(),
            validation,
            client.clone(),
        ));

        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        for tool in managers::config::CONFIG_TOOLS {
            handlers.insert(tool.to_string(), config_manager.clone());
        }
        for tool in managers::naming::NAMING_TOOLS {
            handlers.insert(tool.to_string(), naming_manager.clone());
        }
        for tool in managers::namespace::NAMESPACE_TOOLS {
            handlers.insert(tool.to_string(), namespace_manager.clone());
        }
        for tool in managers::cluster::CLUSTER_TOOLS {
            handlers.insert(tool.to_string(), cluster_manager.clone());
        }

        Self::validate_tool_wiring(&handlers)?;

        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));

        Ok(Self {
            logger,
            config,
            client,
            tool_executor,
        })
    }

    /// Logs in and loads the namespace map ahead of the first tool call.
    /// Failure is logged and otherwise ignored; calls retry lazily.
    pub async fn warmup(&self) {
        let session = self.client.forwarder().session();
        if let Err(err) = session.ensure_valid_credential().await {
            self.logger.warn(
                "warm-up login failed",
                Some(&serde_json::json!({ "error": err.message })),
            );
            return;
        }
        match self.client.namespaces().reload().await {
            Ok(count) => self.logger.info(
                "warm-up complete",
                Some(&serde_json::json!({ "namespaces": count })),
            ),
            Err(err) => self.logger.warn(
                "warm-up namespace load failed",
                Some(&serde_json::json!({ "error": err.message })),
            ),
        }
    }
}
