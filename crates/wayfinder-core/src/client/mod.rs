//! The model client seam.
//!
//! The assistant talks to the language model only through [`ModelClient`].
//! Each call is independent: a [`GenerationRequest`] goes in, the model's
//! raw text payload comes out, and the normalizer makes sense of it.

use async_trait::async_trait;

use crate::{error::Result, prompts::GenerationRequest};

mod gemini;

pub use gemini::GeminiClient;

/// Stateless text generation backend.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send one request and return the model's text payload.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError::RequestFailure` when the call could not be
    /// completed and `AssistantError::MalformedResponse` when the answer
    /// carries no text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
