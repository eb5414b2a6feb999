use crate::constants::{limits, nacos::ACCESS_TOKEN_PARAM, retry as retry_constants};
use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::services::session::SessionManager;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// How a request proves its identity to Nacos. Both styles exist in the
/// Nacos API and are kept per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    None,
    /// `accessToken` query parameter from the session (v2 endpoints).
    AccessToken,
    /// HTTP basic auth with the configured account (v1 endpoints).
    Basic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStyle {
    /// `HTTP <status>\n<body>` for every status except 401.
    StatusPrefixed,
    /// Body on 2xx, classified error otherwise.
    Body,
}

#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub auth: AuthMode,
    pub style: ResponseStyle,
    pub not_found: Option<String>,
}

impl ForwardRequest {
    pub fn get(path: &str) -> Self {
        Self {
            method: Method::GET,
            path: path.to_string(),
            query: Vec::new(),
            auth: AuthMode::AccessToken,
            style: ResponseStyle::StatusPrefixed,
            not_found: None,
        }
    }

    pub fn put(path: &str) -> Self {
        Self {
            method: Method::PUT,
            ..Self::get(path)
        }
    }

    /// GET against a v1 endpoint: basic auth, classified body.
    pub fn legacy(path: &str) -> Self {
        Self {
            auth: AuthMode::Basic,
            style: ResponseStyle::Body,
            ..Self::get(path)
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds the pair only when `value` is present and non-empty.
    pub fn query_opt(self, key: &str, value: Option<&str>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    pub fn style(mut self, style: ResponseStyle) -> Self {
        self.style = style;
        self
    }

    pub fn not_found(mut self, message: impl Into<String>) -> Self {
        self.not_found = Some(message.into());
        self
    }
}

/// Bounded exponential backoff applied around transport failures only.
/// HTTP answers, including 5xx, are never retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay_ms: u64,
    pub factor: f64,
    pub max_delay_ms: u64,
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry_constants::MAX_ATTEMPTS,
            base_delay_ms: retry_constants::BASE_DELAY_MS,
            factor: retry_constants::FACTOR,
            max_delay_ms: retry_constants::MAX_DELAY_MS,
            jitter: retry_constants::JITTER,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn is_retryable(&self, err: &ToolError) -> bool {
        err.is_transport()
    }

    pub fn should_retry(&self, err: &ToolError, attempt: usize) -> bool {
        self.is_retryable(err) && attempt < self.max_attempts
    }

    /// Delay after the `attempt`-th failure (1-based).
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let mut delay = (self.base_delay_ms as f64) * self.factor.powi(exponent);
        if delay > self.max_delay_ms as f64 {
            delay = self.max_delay_ms as f64;
        }
        if self.jitter > 0.0 {
            let delta = delay * self.jitter;
            delay = delay - delta + rand::random::<f64>() * delta * 2.0;
        }
        Duration::from_millis(delay.max(0.0) as u64)
    }
}

pub struct RequestForwarder {
    logger: Logger,
    client: Client,
    base_url: String,
    session: Arc<SessionManager>,
    policy: RetryPolicy,
}

impl RequestForwarder {
    pub fn new(
        logger: &Logger,
        client: Client,
        base_url: impl Into<String>,
        session: Arc<SessionManager>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            logger: logger.child("forwarder"),
            client,
            base_url: base_url.into(),
            session,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub async fn forward(&self, request: &ForwardRequest) -> Result<String, ToolError> {
        let token = match request.auth {
            AuthMode::AccessToken => Some(self.session.ensure_valid_credential().await?),
            AuthMode::Basic | AuthMode::None => None,
        };
        let url = self.build_url(request, token.as_deref())?;

        let mut attempt = 0usize;
        loop {
            attempt += 1;
            self.logger.debug(
                "forward",
                Some(&serde_json::json!({
                    "method": request.method.as_str(),
                    "path": request.path,
                    "attempt": attempt,
                })),
            );
            match self.send_once(request, &url).await {
                Ok((status, body)) => {
                    return self
                        .classify(request, token.as_deref(), status, body)
                        .await
                }
                Err(err) if self.policy.should_retry(&err, attempt) => {
                    let delay = self.policy.delay_for(attempt);
                    self.logger.warn(
                        "transport failure, retrying",
                        Some(&serde_json::json!({
                            "path": request.path,
                            "attempt": attempt,
                            "delay_ms": delay.as_millis() as u64,
                            "error": err.message,
                        })),
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    self.logger.error(
                        "request failed",
                        Some(&serde_json::json!({
                            "path": request.path,
                            "attempts": attempt,
                            "error": err.message,
                        })),
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Forwards and parses the body. Only meaningful for `ResponseStyle::Body`.
    pub async fn forward_json(&self, request: &ForwardRequest) -> Result<Value, ToolError> {
        let body = self.forward(request).await?;
        serde_json::from_str(&body).map_err(|_| {
            ToolError::internal(format!("Nacos answered {} with non-JSON body", request.path))
                .with_details(serde_json::json!({ "body": preview(&body) }))
        })
    }

    fn build_url(&self, request: &ForwardRequest, token: Option<&str>) -> Result<String, ToolError> {
        let mut pairs: Vec<(&str, &str)> = request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if let Some(token) = token {
            pairs.push((ACCESS_TOKEN_PARAM, token));
        }
        let mut url = format!("{}{}", self.base_url, request.path);
        if !pairs.is_empty() {
            let query = serde_urlencoded::to_string(&pairs)
                .map_err(|err| ToolError::internal(format!("Query encoding failed: {}", err)))?;
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }

    async fn send_once(
        &self,
        request: &ForwardRequest,
        url: &str,
    ) -> Result<(StatusCode, String), ToolError> {
        let mut builder = self.client.request(request.method.clone(), url);
        if request.auth == AuthMode::Basic {
            let (username, password) = self.session.basic_auth();
            builder = builder.basic_auth(username, Some(password));
        }
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    async fn classify(
        &self,
        request: &ForwardRequest,
        sent_token: Option<&str>,
        status: StatusCode,
        body: String,
    ) -> Result<String, ToolError> {
        if status == StatusCode::UNAUTHORIZED {
            if let Some(token) = sent_token {
                self.session.invalidate(token).await;
            }
            return Err(ToolError::unauthorized(format!(
                "Nacos authentication failed for {}",
                request.path
            ))
            .with_hint("Check the configured Nacos username and password, then retry the call."));
        }

        match request.style {
            ResponseStyle::StatusPrefixed => Ok(format!("HTTP {}\n{}", status, body)),
            ResponseStyle::Body if status.is_success() => Ok(body),
            ResponseStyle::Body if status == StatusCode::NOT_FOUND => {
                let message = request
                    .not_found
                    .clone()
                    .unwrap_or_else(|| format!("Nacos resource not found: {}", request.path));
                Err(ToolError::not_found(message)
                    .with_details(serde_json::json!({ "body": preview(&body) })))
            }
            ResponseStyle::Body => Err(ToolError::remote(status.as_u16(), body)),
        }
    }
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(limits::LOG_BODY_PREVIEW) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
