//! Tests for the assistant driver.

use std::sync::Arc;

use super::*;
use crate::{
    client::mock::ScriptedClient,
    prompts::RequestKind,
    state::{View, GENERIC_ERROR},
};

const STRATEGIES: &str = r#"[
    {"title": "Sourdough", "description": "Grow a starter"},
    {"title": "Yeasted", "description": "Instant yeast loaf"},
    {"title": "Machine", "description": "Use a bread machine"}
]"#;

const PLAN: &str = r#"```json
[
    {"type": "single", "instruction": "Buy [flour] and [yeast]", "resources": ["flour", "yeast"]},
    {"type": "parallel", "steps": [
        {"instruction": "Preheat the [oven]", "resources": ["Oven"]},
        {"instruction": "Knead the dough"}
    ]},
    {"type": "single", "instruction": "Bake for 40 minutes", "resources": []}
]
```"#;

const SUB_STEPS: &str = r#"[
    {"instruction": "Set it to 230C", "resources": []},
    {"instruction": "Put a [baking stone] in", "resources": ["baking stone"]},
    {"instruction": "Wait 30 minutes", "resources": []}
]"#;

const ACQUIRE: &str = r#"[
    {"instruction": "Visit a baking shop", "resources": []},
    {"instruction": "Pick bread flour", "resources": []},
    {"instruction": "Store it dry", "resources": []}
]"#;

fn assistant(client: &Arc<ScriptedClient>) -> Assistant {
    AssistantBuilder::new()
        .with_client(client.clone())
        .with_language(Some(Language::English))
        .with_id_seed("t")
        .build()
        .unwrap()
}

fn goal() -> GenerateStrategies {
    GenerateStrategies {
        description: "Learn to bake bread".to_string(),
        quantification: Some("one loaf".to_string()),
        environment: None,
    }
}

#[tokio::test]
async fn test_empty_goal_makes_no_request() {
    let client = Arc::new(ScriptedClient::ok(&[]));
    let mut assistant = assistant(&client);

    let params = GenerateStrategies {
        description: "   ".to_string(),
        ..Default::default()
    };
    let err = assistant.generate_strategies(&params).await.unwrap_err();

    assert!(matches!(err, AssistantError::InvalidInput { .. }));
    assert_eq!(client.call_count(), 0);
    assert_eq!(assistant.state().view, View::Input);
}

#[tokio::test]
async fn test_full_session_flow() {
    let client = Arc::new(ScriptedClient::ok(&[STRATEGIES, PLAN, SUB_STEPS, ACQUIRE]));
    let mut assistant = assistant(&client);

    let state = assistant.generate_strategies(&goal()).await.unwrap();
    assert_eq!(state.view, View::Selection);
    assert_eq!(state.strategies.len(), 3);
    assert_eq!(state.goal.quantification, "one loaf");

    let state = assistant.select_strategy("1").await.unwrap();
    assert_eq!(state.view, View::Detail);
    let plan = &state.selected_strategy().unwrap().plan;
    assert_eq!(plan.len(), 3);
    assert!(plan[1].is_parallel());
    let names: Vec<&str> = state.resources.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["flour", "yeast", "Oven"]);

    // Position 2 is the first member of the parallel group.
    let state = assistant.expand_step("2").await.unwrap();
    let step = state.resolve_step("2").unwrap();
    assert!(step.is_expanded);
    assert_eq!(step.sub_steps.as_ref().unwrap().len(), 3);
    assert!(state.resources.find_by_name("Baking Stone").is_some());

    let state = assistant.open_resource("[Flour]").await.unwrap();
    let resource = state.selected_resource().unwrap();
    assert!(!resource.is_loading);
    assert!(resource.has_steps_for(Language::English));

    assert_eq!(
        client.kinds(),
        vec![
            RequestKind::Strategies,
            RequestKind::Plan,
            RequestKind::ExpandStep,
            RequestKind::AcquireResource
        ]
    );
}

#[tokio::test]
async fn test_cached_plan_and_resource_are_not_refetched() {
    let client = Arc::new(ScriptedClient::ok(&[STRATEGIES, PLAN, ACQUIRE]));
    let mut assistant = assistant(&client);

    assistant.generate_strategies(&goal()).await.unwrap();
    assistant.select_strategy("1").await.unwrap();
    assistant.open_resource("oven").await.unwrap();
    assistant.back().await;
    let state = assistant.select_strategy("1").await.unwrap();
    assert_eq!(state.view, View::Detail);
    assistant.open_resource("OVEN").await.unwrap();

    assert_eq!(client.call_count(), 3);
}

#[tokio::test]
async fn test_language_switch_regenerates_open_plan() {
    let client = Arc::new(ScriptedClient::ok(&[STRATEGIES, PLAN, PLAN]));
    let mut assistant = assistant(&client);

    assistant.generate_strategies(&goal()).await.unwrap();
    assistant.select_strategy("1").await.unwrap();
    let state = assistant.set_language(Language::Chinese).await;

    assert_eq!(state.view, View::Detail);
    let strategy = state.selected_strategy().unwrap();
    assert_eq!(strategy.plan_language, Some(Language::Chinese));
    assert_eq!(client.call_count(), 3);
}

#[tokio::test]
async fn test_strategy_failure_shows_generic_error() {
    let client = Arc::new(ScriptedClient::new(vec![Err(AssistantError::request("HTTP 503").build())]));
    let mut assistant = assistant(&client);

    let state = assistant.generate_strategies(&goal()).await.unwrap();
    assert_eq!(state.view, View::Input);
    assert_eq!(state.error.as_deref(), Some(GENERIC_ERROR));
}

#[tokio::test]
async fn test_unparseable_strategies_are_a_failure() {
    let client = Arc::new(ScriptedClient::ok(&["I cannot help with that."]));
    let mut assistant = assistant(&client);

    let state = assistant.generate_strategies(&goal()).await.unwrap();
    assert_eq!(state.view, View::Input);
    assert!(state.error.is_some());
}

#[tokio::test]
async fn test_plan_failure_returns_to_selection() {
    let client = Arc::new(ScriptedClient::ok(&[STRATEGIES, "{}"]));
    let mut assistant = assistant(&client);

    assistant.generate_strategies(&goal()).await.unwrap();
    let state = assistant.select_strategy("2").await.unwrap();
    assert_eq!(state.view, View::Selection);
    assert_eq!(state.error.as_deref(), Some(GENERIC_ERROR));
}

#[tokio::test]
async fn test_expansion_failure_clears_loading() {
    let client = Arc::new(ScriptedClient::ok(&[STRATEGIES, PLAN, "not json"]));
    let mut assistant = assistant(&client);

    assistant.generate_strategies(&goal()).await.unwrap();
    assistant.select_strategy("1").await.unwrap();
    let state = assistant.expand_step("1").await.unwrap();

    let step = state.resolve_step("1").unwrap();
    assert!(!step.is_loading);
    assert!(!step.is_expanded);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_unknown_references_are_rejected() {
    let client = Arc::new(ScriptedClient::ok(&[STRATEGIES]));
    let mut assistant = assistant(&client);
    assistant.generate_strategies(&goal()).await.unwrap();

    assert!(assistant.select_strategy("9").await.is_err());
    assert!(assistant.expand_step("step-nope").await.is_err());
    assert!(assistant.open_resource(" [] ").await.is_err());
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_reset_clears_session_but_keeps_language() {
    let client = Arc::new(ScriptedClient::ok(&[STRATEGIES, PLAN]));
    let mut assistant = assistant(&client);

    assistant.set_language(Language::Chinese).await;
    assistant.generate_strategies(&goal()).await.unwrap();
    assistant.select_strategy("1").await.unwrap();
    let state = assistant.reset().await;

    assert_eq!(state.view, View::Input);
    assert!(state.strategies.is_empty());
    assert!(state.resources.is_empty());
    assert_eq!(state.language, Language::Chinese);
}

#[tokio::test]
async fn test_phased_calls_expose_processing_and_overlap() {
    let client = Arc::new(ScriptedClient::ok(&[STRATEGIES, PLAN, SUB_STEPS, ACQUIRE]));
    let mut assistant = assistant(&client);

    let calls = assistant.begin_generate_strategies(&goal()).unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(assistant.state().view, View::Processing);
    let completion = calls.into_iter().next().unwrap().send().await;
    assert!(assistant.complete(completion).is_empty());
    assert_eq!(assistant.state().view, View::Selection);
    assistant.select_strategy("1").await.unwrap();

    // Two expansions in flight at once, answered out of order
    let first = assistant.begin_expand_step("1").unwrap();
    let last = assistant.begin_expand_step("4").unwrap();
    assert!(assistant.state().resolve_step("1").unwrap().is_loading);
    assert!(assistant.state().resolve_step("4").unwrap().is_loading);

    let last_done = last.into_iter().next().unwrap().send().await;
    let first_done = first.into_iter().next().unwrap().send().await;
    assistant.complete(last_done);
    assistant.complete(first_done);

    for position in ["1", "4"] {
        let step = assistant.state().resolve_step(position).unwrap();
        assert!(step.is_expanded, "step {position} should be open");
        assert!(!step.is_loading);
        assert_eq!(step.sub_steps.as_ref().map(Vec::len), Some(3));
    }
}

#[tokio::test]
async fn test_completion_after_reset_is_ignored() {
    let client = Arc::new(ScriptedClient::ok(&[STRATEGIES]));
    let mut assistant = assistant(&client);

    let calls = assistant.begin_generate_strategies(&goal()).unwrap();
    let completion = calls.into_iter().next().unwrap().send().await;
    assistant.reset().await;

    assert!(assistant.complete(completion).is_empty());
    assert_eq!(assistant.state().view, View::Input);
    assert!(assistant.state().strategies.is_empty());
}

#[test]
fn test_build_without_key_or_client_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{}").unwrap();

    let builder = AssistantBuilder::new().with_config_file(Some(&path));
    if crate::config::api_key_from_env().is_none() {
        let err = builder.build().err().unwrap();
        assert!(matches!(err, AssistantError::Configuration { .. }));
    }
}
