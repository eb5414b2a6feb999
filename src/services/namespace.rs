use crate::constants::{nacos::DEFAULT_NAMESPACE, paths};
use crate::errors::ToolError;
use crate::services::forwarder::{ForwardRequest, RequestForwarder, ResponseStyle};
use crate::services::logger::Logger;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

#[derive(Debug, Deserialize)]
struct NamespaceListing {
    data: Option<Vec<NamespaceEntry>>,
}

#[derive(Debug, Deserialize)]
struct NamespaceEntry {
    #[serde(default)]
    namespace: String,
    #[serde(rename = "namespaceShowName", default)]
    show_name: String,
}

/// Maps namespace display names to Nacos namespace ids.
///
/// The cache is replaced wholesale on reload, so readers see either the old
/// map or the new one. Reloads are serialized; a caller that waited behind a
/// reload finished by someone else does not issue another one.
pub struct NamespaceResolver {
    logger: Logger,
    forwarder: Arc<RequestForwarder>,
    cache: RwLock<HashMap<String, String>>,
    reload_lock: Mutex<()>,
    generation: AtomicU64,
}

impl NamespaceResolver {
    pub fn new(logger: &Logger, forwarder: Arc<RequestForwarder>) -> Self {
        Self {
            logger: logger.child("namespace"),
            forwarder,
            cache: RwLock::new(HashMap::new()),
            reload_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn is_default(label: &str) -> bool {
        let label = label.trim();
        label.is_empty() || label.eq_ignore_ascii_case(DEFAULT_NAMESPACE)
    }

    /// Resolves a display name to its id; the default namespace is `""`.
    pub async fn resolve(&self, label: &str) -> Result<String, ToolError> {
        if Self::is_default(label) {
            return Ok(String::new());
        }
        let label = label.trim();
        let seen = self.generation.load(Ordering::SeqCst);
        if let Some(id) = self.cached(label) {
            return Ok(id);
        }

        self.reload_after(seen).await?;

        self.cached(label)
            .ok_or_else(|| ToolError::unknown_namespace(label))
    }

    pub fn cached(&self, label: &str) -> Option<String> {
        let cache = self.cache.read().unwrap_or_else(|err| err.into_inner());
        cache.get(label).cloned()
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.cache
            .read()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }

    /// Number of completed reloads.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Unconditional reload; returns the number of cached namespaces.
    pub async fn reload(&self) -> Result<usize, ToolError> {
        let _guard = self.reload_lock.lock().await;
        self.reload_locked().await
    }

    async fn reload_after(&self, seen: u64) -> Result<(), ToolError> {
        let _guard = self.reload_lock.lock().await;
        if self.generation.load(Ordering::SeqCst) != seen {
            return Ok(());
        }
        self.reload_locked().await.map(|_| ())
    }

    async fn reload_locked(&self) -> Result<usize, ToolError> {
        let request = ForwardRequest::get(paths::NAMESPACES_V1).style(ResponseStyle::Body);
        let body = self.forwarder.forward_json(&request).await?;
        let listing: NamespaceListing = serde_json::from_value(body).map_err(|err| {
            ToolError::internal(format!("Unexpected namespace listing from Nacos: {}", err))
        })?;
        let entries = listing.data.ok_or_else(|| {
            ToolError::internal("Namespace listing from Nacos has no data array")
        })?;

        let mut fresh: HashMap<String, String> = entries
            .into_iter()
            .filter(|entry| !entry.show_name.is_empty())
            .map(|entry| (entry.show_name, entry.namespace))
            .collect();
        fresh.insert(DEFAULT_NAMESPACE.to_string(), String::new());
        let count = fresh.len();

        {
            let mut cache = self.cache.write().unwrap_or_else(|err| err.into_inner());
            *cache = fresh;
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.logger.info(
            "namespace cache refreshed",
            Some(&serde_json::json!({ "namespaces": count })),
        );
        Ok(count)
    }
}
