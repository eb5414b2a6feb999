use crate::config::NacosConfig;
use crate::constants::paths;
use crate::constants::session::MAX_TOKEN_TTL_SECS;
use crate::errors::ToolError;
use crate::services::logger::Logger;
use reqwest::Client;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Nacos falls back to this lifetime when the login answer omits `tokenTtl`.
const DEFAULT_TOKEN_TTL_SECS: u64 = 18_000;

#[derive(Debug, Clone)]
pub struct Credential {
    token: String,
    expires_at: Instant,
}

impl Credential {
    /// `ttl` is capped at `MAX_TOKEN_TTL_SECS`.
    pub fn new(token: impl Into<String>, ttl: Duration) -> Self {
        let now = Instant::now();
        let ttl = ttl.min(Duration::from_secs(MAX_TOKEN_TTL_SECS));
        Self {
            token: token.into(),
            expires_at: now.checked_add(ttl).unwrap_or(now),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Usable only while `now` is strictly before `expires_at - margin`.
    pub fn is_fresh(&self, now: Instant, margin: Duration) -> bool {
        match self.expires_at.checked_sub(margin) {
            Some(deadline) => now < deadline,
            None => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
    #[serde(rename = "tokenTtl")]
    token_ttl: Option<u64>,
}

/// Owns the Nacos access token. The credential lock is held for the whole
/// login exchange, so callers racing on an expired token share one login.
pub struct SessionManager {
    logger: Logger,
    client: Client,
    login_url: String,
    username: String,
    password: String,
    margin: Duration,
    credential: Mutex<Option<Credential>>,
    logins: AtomicU64,
}

impl SessionManager {
    pub fn new(logger: &Logger, client: Client, config: &NacosConfig) -> Self {
        Self {
            logger: logger.child("session"),
            client,
            login_url: format!("{}{}", config.base_url, paths::LOGIN),
            username: config.username.clone(),
            password: config.password.clone(),
            margin: config.token_margin,
            credential: Mutex::new(None),
            logins: AtomicU64::new(0),
        }
    }

    pub async fn ensure_valid_credential(&self) -> Result<String, ToolError> {
        let mut held = self.credential.lock().await;
        if let Some(credential) = held.as_ref() {
            if credential.is_fresh(Instant::now(), self.margin) {
                return Ok(credential.token().to_string());
            }
            self.logger.debug("access token expired, logging in again", None);
        }
        let fresh = self.login().await?;
        let token = fresh.token().to_string();
        *held = Some(fresh);
        Ok(token)
    }

    /// Drops the held token if it is still the one that was `rejected`.
    /// A token another caller already refreshed is left alone.
    pub async fn invalidate(&self, rejected: &str) {
        let mut held = self.credential.lock().await;
        if held.as_ref().is_some_and(|c| c.token() == rejected) {
            *held = None;
            self.logger.warn("access token invalidated", None);
        }
    }

    pub async fn has_credential(&self) -> bool {
        self.credential.lock().await.is_some()
    }

    pub fn basic_auth(&self) -> (&str, &str) {
        (&self.username, &self.password)
    }

    pub fn login_count(&self) -> u64 {
        self.logins.load(Ordering::SeqCst)
    }

    async fn login(&self) -> Result<Credential, ToolError> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        let form = [
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ];
        let response = self
            .client
            .post(&self.login_url)
            .form(&form)
            .send()
            .await
            .map_err(|err| {
                self.logger.error(
                    "nacos login failed",
                    Some(&serde_json::json!({ "error": err.to_string() })),
                );
                ToolError::unauthorized(format!("Nacos login failed: {}", err))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|err| {
            ToolError::unauthorized(format!("Nacos login answer unreadable: {}", err))
        })?;
        if !status.is_success() {
            self.logger.error(
                "nacos login rejected",
                Some(&serde_json::json!({ "status": status.as_u16() })),
            );
            return Err(ToolError::unauthorized(format!(
                "Nacos login rejected (HTTP {})",
                status.as_u16()
            ))
            .with_hint("Check the configured Nacos username and password."));
        }

        let parsed: LoginResponse = serde_json::from_str(&text).map_err(|_| {
            ToolError::unauthorized("Nacos login answer is not valid JSON")
        })?;
        let token = parsed
            .access_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ToolError::unauthorized("Nacos login did not return accessToken"))?;
        let ttl = match parsed.token_ttl {
            Some(ttl) if ttl > MAX_TOKEN_TTL_SECS => {
                self.logger.warn(
                    "tokenTtl out of range, capping",
                    Some(&serde_json::json!({ "ttl_secs": ttl, "cap_secs": MAX_TOKEN_TTL_SECS })),
                );
                MAX_TOKEN_TTL_SECS
            }
            Some(ttl) => ttl,
            None => {
                self.logger.warn(
                    "login answer has no tokenTtl, assuming nacos default",
                    Some(&serde_json::json!({ "ttl_secs": DEFAULT_TOKEN_TTL_SECS })),
                );
                DEFAULT_TOKEN_TTL_SECS
            }
        };

        self.logger.info(
            "logged in to nacos",
            Some(&serde_json::json!({ "token_ttl_secs": ttl })),
        );
        Ok(Credential::new(token, Duration::from_secs(ttl)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_goes_stale_inside_margin() {
        let credential = Credential::new("tok", Duration::from_secs(120));
        let now = Instant::now();
        assert!(credential.is_fresh(now, Duration::from_secs(60)));
        assert!(!credential.is_fresh(now + Duration::from_secs(60), Duration::from_secs(60)));
    }

    #[test]
    fn oversized_ttl_is_capped() {
        let credential = Credential::new("tok", Duration::from_secs(u64::MAX));
        let now = Instant::now();
        assert!(credential.is_fresh(now, Duration::from_secs(60)));
        let past_cap = now + Duration::from_secs(MAX_TOKEN_TTL_SECS + 1);
        assert!(!credential.is_fresh(past_cap, Duration::ZERO));
    }

    #[test]
    fn ttl_shorter_than_margin_is_never_fresh() {
        let credential = Credential::new("tok", Duration::from_secs(30));
        assert!(!credential.is_fresh(Instant::now(), Duration::from_secs(60)));
    }
}
