//! Command handlers for the one-shot and interactive modes.
//!
//! Arguments parsed by clap are converted into core parameter types with
//! `From` impls, so core types stay free of clap attributes:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Assistant
//! ```
//!
//! Every handler renders the resulting screen as Markdown through the
//! [`TerminalRenderer`].

use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::Args;
use log::debug;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use wayfinder_core::{
    display::{OperationStatus, ScreenView},
    params::GenerateStrategies,
    AppState, Assistant, Goal, Language, View,
};

use crate::renderer::TerminalRenderer;

const SESSION_HELP: &str = "\
## Commands

- `goal <text>`: set the goal and generate strategies
- `target <text>`: set how much or how well, e.g. `one loaf a week`
- `env <text>`: set where and under what constraints
- `generate`: regenerate strategies for the current goal
- `select <n|id>`: open a strategy
- `expand <n|id>`: expand or collapse a step
- `resource <name>`: open a resource's acquisition plan
- `close`: close the open resource
- `lang <en|zh>`: switch the output language
- `back`: return to the strategy list
- `reset`: start over
- `show`: show the current screen
- `help`: show this help
- `quit`: leave the session
";

/// Generate strategies for a goal
///
/// CLI wrapper for GenerateStrategies that adds one-shot drilling into a
/// strategy, its steps and its resources.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// What you want to achieve
    pub goal: String,
    /// How much or how well, e.g. "one loaf a week"
    #[arg(short, long)]
    pub quantification: Option<String>,
    /// Where and under what constraints, e.g. "small kitchen, no mixer"
    #[arg(short, long)]
    pub environment: Option<String>,
    /// Strategy to open, by position (1-3) or ID
    #[arg(short, long)]
    pub strategy: Option<String>,
    /// Step to expand in the opened plan, by position or ID; repeatable
    #[arg(short = 'x', long, requires = "strategy")]
    pub expand: Vec<String>,
    /// Resource whose acquisition plan to show; repeatable
    #[arg(short, long, requires = "strategy")]
    pub resource: Vec<String>,
}

impl From<&PlanArgs> for GenerateStrategies {
    fn from(val: &PlanArgs) -> Self {
        GenerateStrategies {
            description: val.goal.clone(),
            quantification: val.quantification.clone(),
            environment: val.environment.clone(),
        }
    }
}

/// One line typed in an interactive session.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Goal(String),
    Target(String),
    Env(String),
    Generate,
    Select(String),
    Expand(String),
    Resource(String),
    Close,
    Lang(String),
    Back,
    Reset,
    Show,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parse a session line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim().to_string();
        let needs_arg = |name: &str| -> Result<String> {
            if rest.is_empty() {
                bail!("`{name}` needs an argument; type `help` for usage");
            }
            Ok(rest.clone())
        };

        let command = match word.to_lowercase().as_str() {
            "goal" | "g" => SessionCommand::Goal(needs_arg("goal")?),
            "target" | "t" => SessionCommand::Target(needs_arg("target")?),
            "env" | "environment" => SessionCommand::Env(needs_arg("env")?),
            "generate" | "regen" => SessionCommand::Generate,
            "select" | "sel" => SessionCommand::Select(needs_arg("select")?),
            "expand" | "x" => SessionCommand::Expand(needs_arg("expand")?),
            "resource" | "res" | "r" => SessionCommand::Resource(needs_arg("resource")?),
            "close" => SessionCommand::Close,
            "lang" | "language" => SessionCommand::Lang(needs_arg("lang")?),
            "back" | "b" => SessionCommand::Back,
            "reset" => SessionCommand::Reset,
            "show" | "ls" => SessionCommand::Show,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            other => bail!("Unknown command `{other}`; type `help` for usage"),
        };
        Ok(Some(command))
    }
}

pub struct Cli {
    assistant: Assistant,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(assistant: Assistant, renderer: TerminalRenderer) -> Self {
        Self { assistant, renderer }
    }

    fn render_screen(&self) -> Result<()> {
        self.renderer.render(&ScreenView(self.assistant.state()).to_string())
    }

    /// Run the one-shot `plan` command.
    pub async fn handle_plan(&mut self, args: PlanArgs) -> Result<()> {
        let params = GenerateStrategies::from(&args);
        let state = self
            .assistant
            .generate_strategies(&params)
            .await
            .context("Invalid goal")?;
        ensure_no_error(state)?;

        if let Some(strategy) = &args.strategy {
            let state = self
                .assistant
                .select_strategy(strategy)
                .await
                .context("Failed to open strategy")?;
            ensure_no_error(state)?;
        }
        for step in &args.expand {
            self.assistant
                .expand_step(step)
                .await
                .with_context(|| format!("Failed to expand step {step}"))?;
        }
        for resource in &args.resource {
            self.assistant
                .open_resource(resource)
                .await
                .with_context(|| format!("Failed to open resource {resource}"))?;
        }

        self.render_screen()
    }

    /// Run the interactive session until `quit` or end of input.
    pub async fn run_session(&mut self) -> Result<()> {
        self.renderer.render(SESSION_HELP)?;
        let mut lines = BufReader::new(io::stdin()).lines();

        loop {
            print!("> ");
            std::io::stdout().flush().context("Failed to flush stdout")?;

            let Some(line) = lines.next_line().await.context("Failed to read input")? else {
                break;
            };
            let command = match SessionCommand::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    self.renderer.render(&OperationStatus::failure(e.to_string()).to_string())?;
                    continue;
                }
            };
            debug!("session command: {command:?}");
            if command == SessionCommand::Quit {
                break;
            }
            if let Err(e) = self.execute(command).await {
                self.renderer.render(&OperationStatus::failure(format!("{e:#}")).to_string())?;
            }
        }
        Ok(())
    }

    /// Apply one session command and render the outcome.
    pub async fn execute(&mut self, command: SessionCommand) -> Result<()> {
        match command {
            SessionCommand::Goal(text) => {
                let goal = self.assistant.state().goal.clone();
                let params = GenerateStrategies {
                    description: text,
                    quantification: Some(goal.quantification),
                    environment: Some(goal.environment),
                };
                self.assistant.generate_strategies(&params).await?;
            }
            SessionCommand::Target(text) => {
                let goal = Goal {
                    quantification: text,
                    ..self.assistant.state().goal.clone()
                };
                self.set_context(goal).await?;
            }
            SessionCommand::Env(text) => {
                let goal = Goal {
                    environment: text,
                    ..self.assistant.state().goal.clone()
                };
                self.set_context(goal).await?;
            }
            SessionCommand::Generate => {
                let goal = self.assistant.state().goal.clone();
                let params = GenerateStrategies {
                    description: goal.description,
                    quantification: Some(goal.quantification),
                    environment: Some(goal.environment),
                };
                self.assistant.generate_strategies(&params).await?;
            }
            SessionCommand::Select(reference) => {
                self.assistant.select_strategy(&reference).await?;
            }
            SessionCommand::Expand(reference) => {
                self.assistant.expand_step(&reference).await?;
            }
            SessionCommand::Resource(name) => {
                self.assistant.open_resource(&name).await?;
            }
            SessionCommand::Close => {
                self.assistant.close_resource().await;
            }
            SessionCommand::Lang(code) => {
                let language: Language = code.parse().map_err(anyhow::Error::msg)?;
                self.assistant.set_language(language).await;
                let status = OperationStatus::success(format!("Language set to {language}"));
                self.renderer.render(&status.to_string())?;
            }
            SessionCommand::Back => {
                if self.assistant.state().view != View::Detail {
                    bail!("Nothing to go back from");
                }
                self.assistant.back().await;
            }
            SessionCommand::Reset => {
                self.assistant.reset().await;
            }
            SessionCommand::Show => {}
            SessionCommand::Help => return self.renderer.render(SESSION_HELP),
            SessionCommand::Quit => return Ok(()),
        }
        self.render_screen()
    }

    /// Update the goal context. Strategies already on screen were made
    /// without it, so point the user at `generate`.
    async fn set_context(&mut self, goal: Goal) -> Result<()> {
        let has_strategies = !self.assistant.state().strategies.is_empty();
        self.assistant.set_goal(goal).await;
        if has_strategies {
            let status = OperationStatus::success("Goal updated; type `generate` for new strategies");
            self.renderer.render(&status.to_string())?;
        }
        Ok(())
    }
}

/// Turn a failed generation left in the state into an error.
fn ensure_no_error(state: &AppState) -> Result<()> {
    match &state.error {
        Some(error) => bail!("{error}"),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            SessionCommand::parse("goal Learn to bake bread").unwrap(),
            Some(SessionCommand::Goal("Learn to bake bread".to_string()))
        );
        assert_eq!(
            SessionCommand::parse("  SELECT 2 ").unwrap(),
            Some(SessionCommand::Select("2".to_string()))
        );
        assert_eq!(
            SessionCommand::parse("resource [stand mixer]").unwrap(),
            Some(SessionCommand::Resource("[stand mixer]".to_string()))
        );
        assert_eq!(
            SessionCommand::parse("target one loaf a week").unwrap(),
            Some(SessionCommand::Target("one loaf a week".to_string()))
        );
        assert_eq!(
            SessionCommand::parse("env small kitchen, no mixer").unwrap(),
            Some(SessionCommand::Env("small kitchen, no mixer".to_string()))
        );
        assert_eq!(SessionCommand::parse("q").unwrap(), Some(SessionCommand::Quit));
        assert_eq!(SessionCommand::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(SessionCommand::parse("expand").is_err());
        assert!(SessionCommand::parse("target").is_err());
        assert!(SessionCommand::parse("dance now").is_err());
    }

    #[test]
    fn test_plan_args_into_params() {
        let args = PlanArgs {
            goal: "Run a 10k".to_string(),
            quantification: Some("under an hour".to_string()),
            environment: None,
            strategy: None,
            expand: vec![],
            resource: vec![],
        };
        let params = GenerateStrategies::from(&args);
        assert_eq!(params.description, "Run a 10k");
        assert_eq!(params.quantification.as_deref(), Some("under an hour"));
        assert!(params.environment.is_none());
    }
}
