//! Error types for the assistant library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all assistant operations.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// The model call was rejected, timed out, or could not be sent
    #[error("Request failed: {message}")]
    RequestFailure {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    /// The model answered, but the payload is not what was asked for
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating request failures with optional transport context.
pub struct RequestErrorBuilder {
    message: String,
}

impl RequestErrorBuilder {
    /// Create a new request error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the underlying transport error.
    pub fn with_source(self, source: reqwest::Error) -> AssistantError {
        AssistantError::RequestFailure {
            message: self.message,
            source: Some(source),
        }
    }

    /// Build the error without a transport error (e.g. an HTTP status).
    pub fn build(self) -> AssistantError {
        AssistantError::RequestFailure {
            message: self.message,
            source: None,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> AssistantError {
        AssistantError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl AssistantError {
    /// Creates a builder for request failures.
    pub fn request(message: impl Into<String>) -> RequestErrorBuilder {
        RequestErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a malformed response error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Whether the error came from talking to the model rather than from the
    /// caller.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            Self::RequestFailure { .. } | Self::MalformedResponse { .. }
        )
    }
}

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_builder() {
        let err = AssistantError::invalid_input("description").with_reason("must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'description': must not be empty"
        );
        assert!(!err.is_generation_failure());
    }

    #[test]
    fn test_request_failure_is_generation_failure() {
        let err = AssistantError::request("HTTP 503").build();
        assert!(err.is_generation_failure());
        assert!(AssistantError::malformed("no candidates").is_generation_failure());
    }
}
