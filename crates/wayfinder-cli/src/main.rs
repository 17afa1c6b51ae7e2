//! Wayfinder CLI Application
//!
//! Command-line interface for the Wayfinder planning assistant.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, WayfinderMcpServer};
use renderer::TerminalRenderer;
use wayfinder_core::AssistantBuilder;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        config_file,
        model,
        language,
        no_color,
        command,
    } = Args::parse();

    let assistant = AssistantBuilder::new()
        .with_config_file(config_file)
        .with_model(model)
        .with_language(language)
        .build()
        .context("Failed to initialize assistant")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Wayfinder started");

    match command {
        Some(Plan(args)) => Cli::new(assistant, renderer).handle_plan(args).await,
        Some(Serve) => {
            info!("Starting Wayfinder MCP server");
            run_stdio_server(WayfinderMcpServer::new(assistant))
                .await
                .context("MCP server failed")
        }
        Some(Session) | None => Cli::new(assistant, renderer).run_session().await,
    }
}
