//! MCP tool handlers implementation

use std::{collections::VecDeque, sync::Arc};

use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;
use wayfinder_core::{
    display::{OperationStatus, ScreenView},
    params as core, AppState, Assistant, AssistantError, PendingCall,
};

use super::errors::to_mcp_error;

// ============================================================================
// Generic Parameter Wrapper Implementation
// ============================================================================
//
// Core parameter types carry their JsonSchema derive behind the `schema`
// feature; this transparent wrapper adds nothing to the wire format and
// lets tool signatures name MCP-facing types.

/// Generic MCP wrapper for core parameter types with serde integration
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

// Type aliases for cleaner usage in function signatures
pub type GenerateStrategies = McpParams<core::GenerateStrategies>;
pub type SelectStrategy = McpParams<core::SelectStrategy>;
pub type ExpandStep = McpParams<core::ExpandStep>;
pub type OpenResource = McpParams<core::OpenResource>;
pub type SetLanguage = McpParams<core::SetLanguage>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn screen(state: &AppState) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(
        ScreenView(state).to_string(),
    )]))
}

/// A tool call whose generation failed still succeeds at the protocol
/// level; the failure is reported as an error result carrying the screen.
fn screen_or_failure(state: &AppState) -> McpResult {
    match &state.error {
        Some(error) => Ok(CallToolResult::error(vec![
            Content::text(OperationStatus::failure(error.clone()).to_string()),
            Content::text(ScreenView(state).to_string()),
        ])),
        None => screen(state),
    }
}

/// Handler implementations for the MCP server
///
/// The assistant lock is held only while an action or an answer is applied;
/// model calls run with the lock released, so `show_state` answers during a
/// generation and independent expansions overlap.
pub struct McpHandlers {
    assistant: Arc<Mutex<Assistant>>,
}

impl McpHandlers {
    pub fn new(assistant: Arc<Mutex<Assistant>>) -> Self {
        Self { assistant }
    }

    /// Start an action under the lock, then send its calls unlocked and
    /// apply each answer as it arrives. Returns the state after the last
    /// answer.
    async fn drive<F>(&self, begin: F) -> Result<AppState, AssistantError>
    where
        F: FnOnce(&mut Assistant) -> Result<Vec<PendingCall>, AssistantError> + Send,
    {
        let calls = begin(&mut *self.assistant.lock().await)?;
        let mut pending = VecDeque::from(calls);
        while let Some(call) = pending.pop_front() {
            let completion = call.send().await;
            pending.extend(self.assistant.lock().await.complete(completion));
        }
        Ok(self.assistant.lock().await.state().clone())
    }

    pub async fn generate_strategies(&self, Parameters(params): Parameters<GenerateStrategies>) -> McpResult {
        debug!("generate_strategies: {:?}", params);
        let state = self
            .drive(|assistant| assistant.begin_generate_strategies(params.as_ref()))
            .await
            .map_err(|e| to_mcp_error("Failed to generate strategies", &e))?;
        screen_or_failure(&state)
    }

    pub async fn select_strategy(&self, Parameters(params): Parameters<SelectStrategy>) -> McpResult {
        debug!("select_strategy: {:?}", params);
        let state = self
            .drive(|assistant| assistant.begin_select_strategy(&params.as_ref().strategy))
            .await
            .map_err(|e| to_mcp_error("Failed to select strategy", &e))?;
        screen_or_failure(&state)
    }

    pub async fn expand_step(&self, Parameters(params): Parameters<ExpandStep>) -> McpResult {
        debug!("expand_step: {:?}", params);
        let state = self
            .drive(|assistant| assistant.begin_expand_step(&params.as_ref().step_id))
            .await
            .map_err(|e| to_mcp_error("Failed to expand step", &e))?;
        screen(&state)
    }

    pub async fn open_resource(&self, Parameters(params): Parameters<OpenResource>) -> McpResult {
        debug!("open_resource: {:?}", params);
        let state = self
            .drive(|assistant| assistant.begin_open_resource(&params.as_ref().name))
            .await
            .map_err(|e| to_mcp_error("Failed to open resource", &e))?;
        screen(&state)
    }

    pub async fn set_language(&self, Parameters(params): Parameters<SetLanguage>) -> McpResult {
        debug!("set_language: {:?}", params);
        let language = params
            .as_ref()
            .validate()
            .map_err(|e| to_mcp_error("Failed to set language", &e))?;
        let state = self
            .drive(|assistant| Ok(assistant.begin_set_language(language)))
            .await
            .map_err(|e| to_mcp_error("Failed to set language", &e))?;
        screen(&state)
    }

    pub async fn back(&self) -> McpResult {
        let mut assistant = self.assistant.lock().await;
        screen(assistant.back().await)
    }

    pub async fn reset(&self) -> McpResult {
        let mut assistant = self.assistant.lock().await;
        assistant.reset().await;
        Ok(CallToolResult::success(vec![Content::text(
            OperationStatus::success("Session reset").to_string(),
        )]))
    }

    pub async fn show_state(&self) -> McpResult {
        let assistant = self.assistant.lock().await;
        screen(assistant.state())
    }
}
