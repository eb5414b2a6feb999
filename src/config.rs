use crate::constants::{nacos, network, retry, session};
use crate::errors::ConfigError;
use crate::services::forwarder::RetryPolicy;
use clap::Parser;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "nacos-mcp",
    version,
    about = "Expose a Nacos server to MCP hosts as a set of tools"
)]
pub struct Settings {
    /// Nacos address, e.g. http://127.0.0.1:8848
    #[arg(long, env = "NACOS_SERVER")]
    pub server: Option<String>,

    #[arg(long, env = "NACOS_USERNAME", default_value = "nacos")]
    pub username: String,

    #[arg(long, env = "NACOS_PASSWORD", default_value = "nacos", hide_env_values = true)]
    pub password: String,

    /// Serve the diagnostic REST route on this address.
    #[arg(long, env = "NACOS_MCP_HTTP_BIND")]
    pub http_bind: Option<SocketAddr>,

    #[arg(long, env = "NACOS_MCP_TIMEOUT_MS", default_value_t = network::TIMEOUT_REQUEST_MS)]
    pub timeout_ms: u64,

    #[arg(long, env = "NACOS_MCP_RETRY_ATTEMPTS", default_value_t = retry::MAX_ATTEMPTS)]
    pub retry_attempts: usize,

    #[arg(long, env = "NACOS_MCP_RETRY_BASE_DELAY_MS", default_value_t = retry::BASE_DELAY_MS)]
    pub retry_base_delay_ms: u64,

    #[arg(long, env = "NACOS_MCP_TOKEN_MARGIN_SECS", default_value_t = session::TOKEN_MARGIN_SECS)]
    pub token_margin_secs: u64,

    #[arg(long, env = "NACOS_MCP_DEMO_SERVICE", default_value = nacos::DEMO_SERVICE)]
    pub demo_service: String,

    #[arg(long, env = "NACOS_MCP_DEMO_GROUP", default_value = nacos::DEFAULT_GROUP)]
    pub demo_group: String,

    /// Namespace id for the diagnostic route; empty means public.
    #[arg(long, env = "NACOS_MCP_DEMO_NAMESPACE", default_value = "")]
    pub demo_namespace: String,

    /// Do not log in and load namespaces at start-up.
    #[arg(long, env = "NACOS_MCP_SKIP_WARMUP")]
    pub skip_warmup: bool,
}

/// Service/group/namespace served by `GET /detail/instance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoTarget {
    pub service: String,
    pub group: String,
    pub namespace_id: String,
}

impl Default for DemoTarget {
    fn default() -> Self {
        Self {
            service: nacos::DEMO_SERVICE.to_string(),
            group: nacos::DEFAULT_GROUP.to_string(),
            namespace_id: String::new(),
        }
    }
}

#[derive(Clone)]
pub struct NacosConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
    pub token_margin: Duration,
    pub retry: RetryPolicy,
    pub http_bind: Option<SocketAddr>,
    pub demo: DemoTarget,
    pub warmup: bool,
}

impl fmt::Debug for NacosConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NacosConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("token_margin", &self.token_margin)
            .field("retry", &self.retry)
            .field("http_bind", &self.http_bind)
            .field("demo", &self.demo)
            .field("warmup", &self.warmup)
            .finish()
    }
}

impl NacosConfig {
    /// Defaults for everything except the connection triple.
    pub fn new(
        server: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(server)?,
            username: username.into(),
            password: password.into(),
            timeout: Duration::from_millis(network::TIMEOUT_REQUEST_MS),
            token_margin: Duration::from_secs(session::TOKEN_MARGIN_SECS),
            retry: RetryPolicy::default(),
            http_bind: None,
            demo: DemoTarget::default(),
            warmup: true,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token_margin(mut self, margin: Duration) -> Self {
        self.token_margin = margin;
        self
    }
}

impl Settings {
    pub fn into_config(self) -> Result<NacosConfig, ConfigError> {
        let server = self
            .server
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingServer)?;
        if self.username.trim().is_empty() {
            return Err(ConfigError::Blank { field: "username" });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::NotPositive { field: "timeout_ms" });
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::NotPositive {
                field: "retry_attempts",
            });
        }
        if self.demo_service.trim().is_empty() {
            return Err(ConfigError::Blank {
                field: "demo_service",
            });
        }

        let retry = RetryPolicy {
            max_attempts: self.retry_attempts,
            base_delay_ms: self.retry_base_delay_ms,
            ..RetryPolicy::default()
        };
        let demo_group = if self.demo_group.trim().is_empty() {
            nacos::DEFAULT_GROUP.to_string()
        } else {
            self.demo_group.trim().to_string()
        };

        Ok(NacosConfig {
            base_url: normalize_base_url(server)?,
            username: self.username.trim().to_string(),
            password: self.password,
            timeout: Duration::from_millis(self.timeout_ms),
            token_margin: Duration::from_secs(self.token_margin_secs),
            retry,
            http_bind: self.http_bind,
            demo: DemoTarget {
                service: self.demo_service.trim().to_string(),
                group: demo_group,
                namespace_id: self.demo_namespace.trim().to_string(),
            },
            warmup: !self.skip_warmup,
        })
    }
}

/// Reduces the configured address to `scheme://host:port[/prefix]` without a
/// trailing `/nacos`, since every request path already carries it.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::MissingServer);
    }
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };
    let mut url = Url::parse(&with_scheme).map_err(|err| ConfigError::InvalidServer {
        addr: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidServer {
            addr: raw.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    url.set_fragment(None);
    url.set_query(None);
    let path = url.path().trim_end_matches('/');
    let path = path.strip_suffix("/nacos").unwrap_or(path).to_string();
    Ok(format!("{}{}", url.origin().ascii_serialization(), path))
}
