//! Error handling utilities for MCP server

use rmcp::ErrorData;
use wayfinder_core::AssistantError;

/// Helper to convert assistant errors to MCP errors
///
/// Bad tool arguments map to `invalid_params`; everything else is an
/// internal error.
pub fn to_mcp_error(message: &str, error: &AssistantError) -> ErrorData {
    let text = format!("{message}: {error}");
    match error {
        AssistantError::InvalidInput { .. } => ErrorData::invalid_params(text, None),
        _ => ErrorData::internal_error(text, None),
    }
}

#[cfg(test)]
mod tests {
    use rmcp::model::ErrorCode;

    use super::*;

    #[test]
    fn test_invalid_input_is_invalid_params() {
        let error = AssistantError::invalid_input("strategy").with_reason("No strategy matches '9'");
        let mapped = to_mcp_error("Failed to select strategy", &error);
        assert_eq!(mapped.code, ErrorCode::INVALID_PARAMS);
        assert!(mapped.message.contains("No strategy matches"));
    }

    #[test]
    fn test_other_errors_are_internal() {
        let error = AssistantError::malformed("no text");
        assert_eq!(to_mcp_error("x", &error).code, ErrorCode::INTERNAL_ERROR);
    }
}
