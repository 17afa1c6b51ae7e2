use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wayfinder_core::Language;

use crate::cli::PlanArgs;

/// Command-line interface for Wayfinder, a model-backed planning assistant
///
/// Wayfinder turns a goal into three candidate strategies, a step-by-step
/// plan for the strategy you pick, finer sub-steps for any step, and
/// acquisition plans for the tools and materials the steps mention. It runs
/// as a one-shot command, an interactive session, or an MCP (Model Context
/// Protocol) server for AI assistants.
#[derive(Parser)]
#[command(version, about, name = "wayfinder")]
pub struct Args {
    /// Path to the JSON config file. Defaults to
    /// $XDG_CONFIG_HOME/wayfinder/config.json
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Model name, overriding the config file
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Output language: en (English) or zh (Simplified Chinese)
    #[arg(short, long, global = true)]
    pub language: Option<Language>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Wayfinder CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Generate strategies for a goal, optionally drilling into one
    #[command(alias = "p")]
    Plan(PlanArgs),
    /// Start an interactive session (the default)
    #[command(alias = "s")]
    Session,
    /// Start the MCP server
    Serve,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_plan_args_parse() {
        let args = Args::parse_from([
            "wayfinder",
            "plan",
            "Learn to bake bread",
            "-q",
            "one loaf",
            "-l",
            "zh",
            "--strategy",
            "2",
            "--expand",
            "1",
            "--expand",
            "3",
        ]);
        assert_eq!(args.language, Some(Language::Chinese));
        let Some(Commands::Plan(plan)) = args.command else {
            panic!("expected plan command");
        };
        assert_eq!(plan.goal, "Learn to bake bread");
        assert_eq!(plan.quantification.as_deref(), Some("one loaf"));
        assert_eq!(plan.strategy.as_deref(), Some("2"));
        assert_eq!(plan.expand, vec!["1", "3"]);
    }
}
