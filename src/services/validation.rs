use crate::constants::limits::{MAX_PORT, MIN_PORT};
use crate::errors::ToolError;
use serde_json::Value;

/// Argument extraction for tool calls. Every check runs before any network
/// call so a bad argument never reaches Nacos.
#[derive(Clone)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_string(&self, value: &Value, label: &str) -> Result<String, ToolError> {
        let text = value.as_str().ok_or_else(|| {
            ToolError::invalid_params(format!("{} must be a non-empty string", label))
        })?;
        let normalized = text.trim();
        if normalized.is_empty() {
            return Err(ToolError::invalid_params(format!(
                "{} must be a non-empty string",
                label
            )));
        }
        if normalized.contains('\0') {
            return Err(ToolError::invalid_params(format!(
                "{} must not contain null bytes",
                label
            )));
        }
        Ok(normalized.to_string())
    }

    pub fn required_string(&self, args: &Value, key: &str) -> Result<String, ToolError> {
        self.ensure_string(args.get(key).unwrap_or(&Value::Null), key)
    }

    /// Blank, null and absent all collapse to `None`.
    pub fn optional_string(&self, args: &Value, key: &str) -> Result<Option<String>, ToolError> {
        match args.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => {
                let trimmed = text.trim();
                Ok(if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                })
            }
            Some(_) => Err(ToolError::invalid_params(format!(
                "{} must be a string",
                key
            ))),
        }
    }

    pub fn string_or(&self, args: &Value, key: &str, fallback: &str) -> Result<String, ToolError> {
        Ok(self
            .optional_string(args, key)?
            .unwrap_or_else(|| fallback.to_string()))
    }

    pub fn required_port(&self, args: &Value, key: &str) -> Result<u16, ToolError> {
        let value = args.get(key).unwrap_or(&Value::Null);
        let numeric = value.as_i64().ok_or_else(|| {
            ToolError::invalid_params(format!(
                "{} must be an integer between {} and {}",
                key, MIN_PORT, MAX_PORT
            ))
        })?;
        if numeric < MIN_PORT as i64 || numeric > MAX_PORT as i64 {
            return Err(ToolError::invalid_params(format!(
                "{} must be an integer between {} and {}",
                key, MIN_PORT, MAX_PORT
            )));
        }
        Ok(numeric as u16)
    }

    pub fn required_bool(&self, args: &Value, key: &str) -> Result<bool, ToolError> {
        match args.get(key) {
            Some(Value::Bool(flag)) => Ok(*flag),
            _ => Err(ToolError::invalid_params(format!("{} must be a boolean", key))),
        }
    }
}

impl Default for Validation {
    fn default() -> Self {
        Self::new()
    }
}
