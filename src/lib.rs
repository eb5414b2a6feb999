pub mod app;
pub mod config;
pub mod constants;
pub mod errors;
pub mod http;

pub mod managers {
    pub mod cluster;
    pub mod config;
    pub mod namespace;
    pub mod naming;
}

pub mod mcp {
    pub mod catalog;
    pub mod protocol;
    pub mod server;
}

pub mod services {
    pub mod forwarder;
    pub mod logger;
    pub mod nacos_client;
    pub mod namespace;
    pub mod session;
    pub mod tool_executor;
    pub mod validation;
}

pub mod utils {
    pub mod suggest;
    pub mod tool_errors;
}
