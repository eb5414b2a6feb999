use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("nacos server address is required (set --server or NACOS_SERVER)")]
    MissingServer,
    #[error("invalid nacos server address {addr:?}: {reason}")]
    InvalidServer { addr: String, reason: String },
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
}
