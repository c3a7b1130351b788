//! Integration tests for the DD-Agent engine
//!
//! These exercise the assemble → complete → normalize → persist pipeline
//! end to end against scripted completion clients.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Notify;

use ddagent::config::GatingConfig;
use ddagent::domain::QuestionnaireSnapshot;
use ddagent::engine::{Engine, GenerationOutcome, GenerationPhase};
use ddagent::llm::{CompletionClient, CompletionError, ConversationTurn};
use ddagent::prompt::PromptLoader;
use ddagent::session::SessionState;

const BLUEPRINT_JSON: &str = r#"{"sleep_optimization":"sleep more","exercise_protocol":"lift things","nutrition_plan":"eat plants","personal_recommendations":"walk daily"}"#;

/// What a scripted client should answer with
enum Script {
    Text(String),
    Provider { status: u16, message: String },
    Transport(String),
}

/// Client that always answers with the same scripted payload
struct ScriptedClient {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _messages: &[ConversationTurn]) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Text(text) => Ok(text.clone()),
            Script::Provider { status, message } => Err(CompletionError::Provider {
                status: *status,
                message: message.clone(),
            }),
            Script::Transport(detail) => Err(CompletionError::Transport(detail.clone())),
        }
    }
}

/// Client that records the request then blocks until released
///
/// Lets tests control resolution ordering for the in-flight invariant.
struct BlockingClient {
    started: Arc<Notify>,
    release: Arc<Notify>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl CompletionClient for BlockingClient {
    async fn complete(&self, _messages: &[ConversationTurn]) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        Ok(BLUEPRINT_JSON.to_string())
    }
}

fn complete_snapshot() -> QuestionnaireSnapshot {
    let mut snapshot = QuestionnaireSnapshot::default();
    snapshot.set_field("age", "42").unwrap();
    snapshot.set_field("biologicalSex", "Female").unwrap();
    snapshot.set_field("height", "170").unwrap();
    snapshot.set_field("weight", "65").unwrap();
    snapshot.set_field("primaryGoal", "Longevity").unwrap();
    snapshot.set_field("goals", "Improve Sleep, Extend Lifespan").unwrap();
    snapshot
}

fn engine_over(temp: &TempDir, client: Arc<dyn CompletionClient>) -> Engine {
    Engine::new(
        client,
        PromptLoader::embedded_only(),
        SessionState::open(temp.path()).expect("session opens"),
        GatingConfig::default(),
    )
}

// =============================================================================
// Blueprint pipeline
// =============================================================================

#[tokio::test]
async fn test_pipeline_json_reply_end_to_end() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(Script::Text(BLUEPRINT_JSON.to_string()));
    let engine = engine_over(&temp, client.clone());
    engine.session().save_snapshot(&complete_snapshot()).unwrap();

    let outcome = engine.generate_blueprint().await.unwrap();
    let GenerationOutcome::Completed(result) = outcome else {
        panic!("expected Completed");
    };

    assert_eq!(result.sleep_optimization, "sleep more");
    assert_eq!(result.exercise_protocol, "lift things");
    assert_eq!(result.nutrition_plan, "eat plants");
    assert_eq!(result.personal_recommendations, "walk daily");
    assert!(!result.is_error());
    assert_eq!(engine.phase(), GenerationPhase::Ready);

    // The normalized result fully replaced the result slot
    let stored = engine.session().result().unwrap();
    assert_eq!(stored, result);
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_pipeline_fenced_json_reply() {
    let temp = TempDir::new().unwrap();
    let fenced = format!("```json\n{}\n```", BLUEPRINT_JSON);
    let client = ScriptedClient::new(Script::Text(fenced));
    let engine = engine_over(&temp, client);
    engine.session().save_snapshot(&complete_snapshot()).unwrap();

    let GenerationOutcome::Completed(result) = engine.generate_blueprint().await.unwrap() else {
        panic!("expected Completed");
    };
    assert_eq!(result.sleep_optimization, "sleep more");
}

#[tokio::test]
async fn test_pipeline_markdown_reply_falls_back() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(Script::Text("## A plan\n\nJust **markdown** here.".to_string()));
    let engine = engine_over(&temp, client);
    engine.session().save_snapshot(&complete_snapshot()).unwrap();

    let GenerationOutcome::Completed(result) = engine.generate_blueprint().await.unwrap() else {
        panic!("expected Completed");
    };

    assert!(result.sleep_optimization.starts_with("## Sleep Optimization\n\n"));
    assert!(result.personal_recommendations.contains("Just **markdown** here."));
    assert!(!result.is_error());
    assert_eq!(engine.phase(), GenerationPhase::Ready);
}

#[tokio::test]
async fn test_pipeline_provider_error_end_to_end() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(Script::Provider {
        status: 500,
        message: "model unavailable".to_string(),
    });
    let engine = engine_over(&temp, client);
    engine.session().save_snapshot(&complete_snapshot()).unwrap();

    let GenerationOutcome::Completed(result) = engine.generate_blueprint().await.unwrap() else {
        panic!("expected Completed");
    };

    assert!(result.is_error());
    assert!(result.message.as_deref().unwrap_or_default().contains("model unavailable"));
    assert_eq!(engine.phase(), GenerationPhase::ReadyWithError);

    // The error-shaped result is persisted and renders four sections
    let stored = engine.session().result().unwrap();
    for section in [
        &stored.sleep_optimization,
        &stored.exercise_protocol,
        &stored.nutrition_plan,
        &stored.personal_recommendations,
    ] {
        assert!(section.contains("Error") || section.contains("error"));
    }
}

#[tokio::test]
async fn test_pipeline_transport_error_sections_distinct() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(Script::Transport("connection reset".to_string()));
    let engine = engine_over(&temp, client);
    engine.session().save_snapshot(&complete_snapshot()).unwrap();

    let GenerationOutcome::Completed(result) = engine.generate_blueprint().await.unwrap() else {
        panic!("expected Completed");
    };

    assert_ne!(result.sleep_optimization, result.exercise_protocol);
    assert_ne!(result.exercise_protocol, result.nutrition_plan);
    assert!(!result.error.as_deref().unwrap_or_default().is_empty());
}

// =============================================================================
// Gating
// =============================================================================

#[tokio::test]
async fn test_gate_blocks_generation_and_makes_no_request() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(Script::Text(BLUEPRINT_JSON.to_string()));
    let engine = engine_over(&temp, client.clone());

    let mut incomplete = complete_snapshot();
    incomplete.set_field("age", "").unwrap();
    engine.session().save_snapshot(&incomplete).unwrap();

    assert_eq!(engine.generate_blueprint().await.unwrap(), GenerationOutcome::NotReady);
    assert!(engine.session().result().is_none());
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_auto_generate_gate_on_load() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(Script::Text(BLUEPRINT_JSON.to_string()));

    // Incomplete answers never auto-trigger, regardless of other fields
    {
        let engine = engine_over(&temp, client.clone());
        let mut incomplete = complete_snapshot();
        incomplete.set_field("age", "").unwrap();
        engine.session().save_snapshot(&incomplete).unwrap();
        assert!(engine.maybe_auto_generate().await.unwrap().is_none());
    }

    // Complete answers with an empty result slot do
    {
        let engine = engine_over(&temp, client.clone());
        engine.session().save_snapshot(&complete_snapshot()).unwrap();
        assert!(engine.maybe_auto_generate().await.unwrap().is_some());
    }

    // A fresh engine over the same session sees the stored result and skips
    {
        let engine = engine_over(&temp, client.clone());
        assert_eq!(engine.phase(), GenerationPhase::Ready);
        assert!(engine.maybe_auto_generate().await.unwrap().is_none());
    }

    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_single_in_flight_generation() {
    let temp = TempDir::new().unwrap();
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let client = Arc::new(BlockingClient {
        started: started.clone(),
        release: release.clone(),
        calls: calls.clone(),
    });
    let engine = Arc::new(engine_over(&temp, client));
    engine.session().save_snapshot(&complete_snapshot()).unwrap();

    let first = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.generate_blueprint().await.unwrap() })
    };

    // Wait until the first trigger is inside the completion call
    tokio::time::timeout(Duration::from_secs(5), started.notified())
        .await
        .expect("first generation should reach the client");
    assert_eq!(engine.phase(), GenerationPhase::Generating);

    // A second trigger while the first is in flight is rejected, writes nothing
    assert_eq!(engine.generate_blueprint().await.unwrap(), GenerationOutcome::InFlight);
    assert!(engine.session().result().is_none());

    // Release the first trigger; it completes and owns the only write
    release.notify_one();
    let outcome = tokio::time::timeout(Duration::from_secs(5), first)
        .await
        .expect("first generation should finish")
        .expect("task should not panic");
    assert!(matches!(outcome, GenerationOutcome::Completed(_)));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(engine.session().result().unwrap().sleep_optimization, "sleep more");
    assert_eq!(engine.phase(), GenerationPhase::Ready);
}

// =============================================================================
// Chat flow
// =============================================================================

#[tokio::test]
async fn test_chat_flow_end_to_end() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(Script::Text("Aim for 7-8 hours.".to_string()));
    let engine = engine_over(&temp, client);
    engine.session().save_snapshot(&complete_snapshot()).unwrap();

    let history = vec![
        ConversationTurn::assistant("Hello!"),
        ConversationTurn::user("How much should I sleep?"),
    ];

    let reply = engine.reply(&history).await;
    assert_eq!(reply, "Aim for 7-8 hours.");
}

#[tokio::test]
async fn test_chat_flow_surfaces_errors_as_text() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(Script::Provider {
        status: 429,
        message: "too many requests".to_string(),
    });
    let engine = engine_over(&temp, client);

    let reply = engine.reply(&[ConversationTurn::user("hi")]).await;
    assert!(reply.starts_with("I'm sorry"));
    assert!(reply.contains("too many requests"));
}
