use crate::errors::ToolError;
use crate::utils::suggest::suggest;

/// Raised when a handler is asked for a tool outside its family, which
/// only happens if the executor wiring is wrong.
pub fn unknown_tool_error(family: &str, tool: &str, known_tools: &[&str]) -> ToolError {
    let known: Vec<String> = known_tools.iter().map(|s| s.to_string()).collect();
    let suggestions = suggest(tool, &known, 3);
    let mut err = ToolError::internal(format!("{} handler cannot serve tool: {}", family, tool))
        .with_details(serde_json::json!({
            "known_tools": known,
            "did_you_mean": suggestions,
        }));
    if !suggestions.is_empty() {
        err = err.with_hint(format!("Did you mean: {}?", suggestions.join(", ")));
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolErrorKind;

    #[test]
    fn names_family_and_suggests() {
        let err = unknown_tool_error("config", "get_confg", &["get_config", "list_configs"]);
        assert_eq!(err.kind, ToolErrorKind::Internal);
        assert!(err.message.contains("config handler"));
        assert_eq!(err.hint.as_deref(), Some("Did you mean: get_config?"));
    }
}
