pub mod network {
    pub const TIMEOUT_REQUEST_MS: u64 = 10_000;
    pub const USER_AGENT: &str = "nacos-mcp/0.3";
}

pub mod limits {
    pub const MAX_PORT: u16 = 65_535;
    pub const MIN_PORT: u16 = 1;
    pub const LOG_BODY_PREVIEW: usize = 256;
}

pub mod retry {
    pub const MAX_ATTEMPTS: usize = 3;
    pub const BASE_DELAY_MS: u64 = 1_000;
    pub const FACTOR: f64 = 2.0;
    pub const MAX_DELAY_MS: u64 = 8_000;
    pub const JITTER: f64 = 0.0;
}

pub mod session {
    pub const TOKEN_MARGIN_SECS: u64 = 60;
    /// Upper bound on a token lifetime announced by the server.
    pub const MAX_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;
}

pub mod nacos {
    pub const DEFAULT_NAMESPACE: &str = "public";
    pub const DEFAULT_GROUP: &str = "DEFAULT_GROUP";
    pub const ACCESS_TOKEN_PARAM: &str = "accessToken";
    pub const DEMO_SERVICE: &str = "service-order";
    pub const LEGACY_PAGE_SIZE: u32 = 50;
    pub const LEGACY_SEARCH_PAGE_SIZE: u32 = 20;
}

pub mod paths {
    pub const LOGIN: &str = "/nacos/v1/auth/login";
    pub const NAMESPACES_V1: &str = "/nacos/v1/console/namespaces";

    pub const CONFIG: &str = "/nacos/v2/cs/config";
    pub const CONFIG_HISTORY: &str = "/nacos/v2/cs/history/list";
    pub const CONFIGS_BY_NAMESPACE: &str = "/nacos/v2/cs/history/configs";
    pub const SERVICE_LIST: &str = "/nacos/v2/ns/service/list";
    pub const SERVICE: &str = "/nacos/v2/ns/service";
    pub const INSTANCE_LIST: &str = "/nacos/v2/ns/instance/list";
    pub const INSTANCE: &str = "/nacos/v2/ns/instance";
    pub const METRICS: &str = "/nacos/v2/ns/operator/metrics";
    pub const CLIENT_LIST: &str = "/nacos/v2/ns/client/list";
    pub const CLIENT: &str = "/nacos/v2/ns/client";
    pub const NAMESPACE_LIST: &str = "/nacos/v2/console/namespace/list";
    pub const NAMESPACE: &str = "/nacos/v2/console/namespace";
    pub const NODE_SELF: &str = "/nacos/v2/core/cluster/node/self";
    pub const NODE_LIST: &str = "/nacos/v2/core/cluster/node/list";
    pub const NODE_SELF_HEALTH: &str = "/nacos/v2/core/cluster/node/self/health";

    pub const LEGACY_CONFIGS: &str = "/nacos/v1/cs/configs";
    pub const LEGACY_SERVICE_LIST: &str = "/nacos/v1/ns/service/list";
    pub const LEGACY_INSTANCE_LIST: &str = "/nacos/v1/ns/instance/list";
    pub const LEGACY_CLUSTER_NODES: &str = "/nacos/v1/ns/operator/cluster/nodes";
}

pub mod server {
    pub const PROTOCOL_VERSION: &str = "2025-06-18";
    pub const NAME: &str = "nacos-mcp";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
