//! MCP server implementation for Wayfinder
//!
//! Exposes one planning session over the Model Context Protocol. Every tool
//! returns the current screen as Markdown, so a client can follow the
//! session without calling `show_state` after each action.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};
use wayfinder_core::Assistant;

pub mod errors;
pub mod handlers;

pub use handlers::{
    ExpandStep, GenerateStrategies, McpResult, OpenResource, SelectStrategy, SetLanguage,
};

/// MCP server for Wayfinder
#[derive(Clone)]
pub struct WayfinderMcpServer {
    assistant: Arc<Mutex<Assistant>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WayfinderMcpServer {
    /// Create a new Wayfinder MCP server
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant: Arc::new(Mutex::new(assistant)),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.assistant.clone())
    }

    #[tool(
        name = "generate_strategies",
        description = "Start a planning session for a goal. Provide a description (required), an optional quantification (how much or how well) and an optional environment (where, with what constraints). Returns three numbered strategies; any previous session is replaced."
    )]
    async fn generate_strategies(&self, params: Parameters<GenerateStrategies>) -> McpResult {
        self.handlers().generate_strategies(params).await
    }

    #[tool(
        name = "select_strategy",
        description = "Open one strategy's step-by-step plan, by its 1-based position or its ID. The plan is generated on first use and cached per language. Steps are numbered; parallel steps are grouped. Mentioned resources appear in brackets."
    )]
    async fn select_strategy(&self, params: Parameters<SelectStrategy>) -> McpResult {
        self.handlers().select_strategy(params).await
    }

    #[tool(
        name = "expand_step",
        description = "Break a step into 3-5 sub-steps. Pass the step's ID (shown in backticks) or its number in the open plan. Calling it on a step that already has sub-steps collapses or re-expands it without generating again."
    )]
    async fn expand_step(&self, params: Parameters<ExpandStep>) -> McpResult {
        self.handlers().expand_step(params).await
    }

    #[tool(
        name = "open_resource",
        description = "Show how to obtain or prepare a resource (tool, material, app) mentioned in the plan. Names match case-insensitively, brackets optional. The acquisition plan is generated on first use and cached per language."
    )]
    async fn open_resource(&self, params: Parameters<OpenResource>) -> McpResult {
        self.handlers().open_resource(params).await
    }

    #[tool(
        name = "set_language",
        description = "Switch the output language: 'en' for English or 'zh' for Simplified Chinese. The open plan and open resource are regenerated in the new language."
    )]
    async fn set_language(&self, params: Parameters<SetLanguage>) -> McpResult {
        self.handlers().set_language(params).await
    }

    #[tool(name = "back", description = "Leave the open plan and return to the strategy list.")]
    async fn back(&self) -> McpResult {
        self.handlers().back().await
    }

    #[tool(
        name = "reset",
        description = "Discard the goal, strategies, plans and resources and start over. The language setting is kept."
    )]
    async fn reset(&self) -> McpResult {
        self.handlers().reset().await
    }

    #[tool(name = "show_state", description = "Show the current screen of the planning session.")]
    async fn show_state(&self) -> McpResult {
        self.handlers().show_state().await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for WayfinderMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(r#"Wayfinder is a planning assistant that turns a goal into an actionable, drill-down plan.

## Workflow
1. `generate_strategies` with the goal: returns three strategies
2. `select_strategy` with a number: returns the plan
3. `expand_step` on any step for finer sub-steps, at any depth
4. `open_resource` on a bracketed [resource] for how to get it
5. `back` to compare another strategy, `reset` to start over

## Notes
- Only one session exists per server; `generate_strategies` replaces it.
- `set_language` switches between English ('en') and Simplified Chinese ('zh').
- `show_state` prints the current screen at any time."#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: WayfinderMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Wayfinder MCP server on stdio");
    debug!("Server created with {} tools", server.tool_router.list_all().len());

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    // Set up signal handlers for graceful shutdown
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
