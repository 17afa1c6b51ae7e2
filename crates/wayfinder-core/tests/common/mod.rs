use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tempfile::TempDir;
use wayfinder_core::{
    Assistant, AssistantBuilder, AssistantError, GenerationRequest, Language, ModelClient, RequestKind, Result,
};

pub const STRATEGIES: &str = r#"[
    {"title": "Sourdough", "description": "Grow a starter and bake weekly"},
    {"title": "Yeasted", "description": "Start with instant yeast"},
    {"title": "Class", "description": "Take a weekend baking class"}
]"#;

pub const PLAN: &str = r#"[
    {"type": "single", "instruction": "Buy [bread flour] and a [kitchen scale]", "resources": ["bread flour", "kitchen scale"]},
    {"type": "parallel", "steps": [
        {"instruction": "Feed the starter", "resources": []},
        {"instruction": "Preheat the [Dutch oven]"}
    ]},
    {"type": "single", "instruction": "Bake and cool on a [wire rack]", "resources": ["Wire Rack"]}
]"#;

pub const SUB_STEPS: &str = r#"[
    {"instruction": "Mix equal parts flour and water", "resources": []},
    {"instruction": "Cover with a [tea towel]", "resources": ["tea towel"]},
    {"instruction": "Leave for 12 hours", "resources": []}
]"#;

pub const ACQUIRE: &str = r#"[
    {"instruction": "Compare mills online", "resources": []},
    {"instruction": "Buy a 5kg bag", "resources": []},
    {"instruction": "Store in an airtight tub", "resources": []}
]"#;

/// Answers each request kind from its own queue and records every request.
#[derive(Default)]
pub struct ScriptedClient {
    answers: Mutex<HashMap<RequestKind, VecDeque<String>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a payload for the next request of `kind`.
    pub fn answer(self, kind: RequestKind, payload: &str) -> Self {
        self.answers
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push_back(payload.to_string());
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, kind: RequestKind) -> usize {
        self.requests().iter().filter(|r| r.kind == kind).count()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.answers
            .lock()
            .unwrap()
            .get_mut(&request.kind)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| AssistantError::request(format!("No scripted answer for {}", request.kind.as_str())).build())
    }
}

/// A client answering one full session: strategies, plan, one expansion and
/// one resource.
pub fn full_session_client() -> Arc<ScriptedClient> {
    Arc::new(
        ScriptedClient::new()
            .answer(RequestKind::Strategies, STRATEGIES)
            .answer(RequestKind::Plan, PLAN)
            .answer(RequestKind::ExpandStep, SUB_STEPS)
            .answer(RequestKind::AcquireResource, ACQUIRE),
    )
}

/// Helper function to create a test assistant backed by `client`, with an
/// empty config file so the host's config never leaks in.
pub fn create_test_assistant(client: Arc<ScriptedClient>) -> (TempDir, Assistant) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.json");
    std::fs::write(&config_path, "{}").expect("Failed to write config");

    let assistant = AssistantBuilder::new()
        .with_config_file(Some(&config_path))
        .with_language(Some(Language::English))
        .with_client(client)
        .with_id_seed("it")
        .build()
        .expect("Failed to create assistant");
    (temp_dir, assistant)
}
