use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    /// Missing or blank parameter, unresolvable namespace.
    InvalidParams,
    /// Login failed or the remote answered 401.
    Unauthorized,
    NotFound,
    /// Connect, timeout or body read failure. The only retried kind.
    Transport,
    /// Any other non-2xx answer from the remote system.
    Remote,
    Internal,
}

impl ToolErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolErrorKind::InvalidParams => "invalid_params",
            ToolErrorKind::Unauthorized => "unauthorized",
            ToolErrorKind::NotFound => "not_found",
            ToolErrorKind::Transport => "transport",
            ToolErrorKind::Remote => "remote",
            ToolErrorKind::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub retryable: bool,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
            retryable: matches!(kind, ToolErrorKind::Transport),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, "INVALID_PARAMS", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Unauthorized, "UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, "NOT_FOUND", message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Transport, "TRANSPORT", message)
    }

    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::new(
            ToolErrorKind::Remote,
            "REMOTE",
            format!("Nacos answered HTTP {}: {}", status, body),
        )
        .with_details(serde_json::json!({ "status": status, "body": body }))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, "INTERNAL", message)
    }

    pub fn unknown_namespace(label: &str) -> Self {
        Self::new(
            ToolErrorKind::InvalidParams,
            "UNKNOWN_NAMESPACE",
            format!("Unknown namespace: {}", label),
        )
        .with_hint("Use list_namespaces to see the namespace names known to Nacos.")
    }

    pub fn is_transport(&self) -> bool {
        self.kind == ToolErrorKind::Transport
    }

    /// Text block handed back to the agent host as a failed tool result.
    pub fn render(&self, tool: &str) -> String {
        let mut lines = vec![
            "NacosError".to_string(),
            format!("tool: {}", tool),
            format!("kind: {}", self.kind.as_str()),
            format!("code: {}", self.code),
            format!("retryable: {}", self.retryable),
            format!("message: {}", self.message),
        ];
        if let Some(hint) = &self.hint {
            lines.push(format!("hint: {}", hint));
        }
        lines.join("\n")
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ToolError::transport(format!("Nacos request timed out: {}", err))
        } else {
            ToolError::transport(format!("Nacos request failed: {}", err))
        }
    }
}
