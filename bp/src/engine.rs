//! Generation engine
//!
//! Orchestrates the assemble → complete → normalize → persist pipeline for
//! the blueprint and chat flows, and owns the blueprint state machine:
//! `idle -> generating -> {ready, ready-with-error}`. There is no cancelled
//! state - an in-flight generation cannot be aborted.

use std::sync::Arc;

use eyre::Result;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::GatingConfig;
use crate::domain::{BlueprintResult, QuestionnaireSnapshot};
use crate::llm::{CompletionClient, ConversationTurn};
use crate::normalize::{chat_error_text, normalize_blueprint, normalize_chat_reply};
use crate::prompt::{PromptLoader, PromptTask, assemble};
use crate::session::SessionState;

/// Observable phase of the blueprint state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    /// No blueprint generated yet
    Idle,
    /// A generation request is in flight
    Generating,
    /// A blueprint is stored
    Ready,
    /// An error-shaped blueprint is stored
    ReadyWithError,
}

impl std::fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationPhase::Idle => write!(f, "idle"),
            GenerationPhase::Generating => write!(f, "generating"),
            GenerationPhase::Ready => write!(f, "ready"),
            GenerationPhase::ReadyWithError => write!(f, "ready-with-error"),
        }
    }
}

/// Outcome of a generation trigger
#[derive(Debug, PartialEq)]
pub enum GenerationOutcome {
    /// The pipeline ran; the result (error-shaped or not) was persisted
    Completed(BlueprintResult),
    /// The mandatory-field gate is not satisfied; nothing was written
    NotReady,
    /// Another generation holds the slot; nothing was written
    InFlight,
}

/// The orchestration core behind every user-triggered completion
pub struct Engine {
    llm: Arc<dyn CompletionClient>,
    prompts: PromptLoader,
    session: SessionState,
    gating: GatingConfig,
    /// Phase of the blueprint state machine; the lock doubles as the
    /// single-in-flight guard for the result slot
    generation: Mutex<GenerationPhase>,
}

impl Engine {
    /// Create an engine over an opened session
    pub fn new(
        llm: Arc<dyn CompletionClient>,
        prompts: PromptLoader,
        session: SessionState,
        gating: GatingConfig,
    ) -> Self {
        let initial = phase_for_stored(&session);
        debug!(phase = %initial, "new: called");
        Self {
            llm,
            prompts,
            session,
            gating,
            generation: Mutex::new(initial),
        }
    }

    /// The session this engine reads and writes
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Current phase of the blueprint state machine
    pub fn phase(&self) -> GenerationPhase {
        match self.generation.try_lock() {
            Ok(phase) => *phase,
            // The guard is held exactly while a generation runs
            Err(_) => GenerationPhase::Generating,
        }
    }

    /// Run the blueprint pipeline against the stored snapshot
    ///
    /// The snapshot is frozen at this moment and travels as the single user
    /// turn. Concurrent triggers are serialized by rejection: while one
    /// generation holds the slot, further triggers return `InFlight` and
    /// write nothing, so a late arrival can never clobber a newer result.
    pub async fn generate_blueprint(&self) -> Result<GenerationOutcome> {
        let mut phase = match self.generation.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("generate_blueprint: a generation is already in flight");
                return Ok(GenerationOutcome::InFlight);
            }
        };

        let Some(snapshot) = self.session.snapshot() else {
            debug!("generate_blueprint: no stored answers");
            return Ok(GenerationOutcome::NotReady);
        };

        if !self.gating.is_satisfied(&snapshot) {
            debug!("generate_blueprint: mandatory-field gate not satisfied");
            return Ok(GenerationOutcome::NotReady);
        }

        *phase = GenerationPhase::Generating;
        info!("generate_blueprint: starting generation");

        match self.run_blueprint_pipeline(&snapshot).await {
            Ok(result) => {
                *phase = if result.is_error() {
                    GenerationPhase::ReadyWithError
                } else {
                    GenerationPhase::Ready
                };
                info!(phase = %*phase, "generate_blueprint: finished");
                Ok(GenerationOutcome::Completed(result))
            }
            Err(e) => {
                // Assembly or persistence failed before a result existed;
                // fall back to whatever the session still holds
                *phase = phase_for_stored(&self.session);
                Err(e)
            }
        }
    }

    async fn run_blueprint_pipeline(&self, snapshot: &QuestionnaireSnapshot) -> Result<BlueprintResult> {
        let task = PromptTask::blueprint(&self.prompts)?;
        let frozen = serde_json::to_string_pretty(snapshot)?;
        let history = vec![ConversationTurn::user(frozen)];

        let messages = assemble(&history, &task, None)?;
        let raw = self.llm.complete(&messages).await;
        if let Err(ref e) = raw {
            warn!(kind = %e.kind(), "run_blueprint_pipeline: completion failed");
        }

        let result = normalize_blueprint(raw);
        self.session.save_result(&result)?;
        Ok(result)
    }

    /// Trigger generation at load time when the gating rule holds
    ///
    /// Returns the fresh result when a generation ran, `None` otherwise.
    pub async fn maybe_auto_generate(&self) -> Result<Option<BlueprintResult>> {
        if !self.session.should_auto_generate(&self.gating) {
            debug!("maybe_auto_generate: gating rule not satisfied, skipping");
            return Ok(None);
        }

        info!("maybe_auto_generate: stored answers are complete, generating blueprint");
        match self.generate_blueprint().await? {
            GenerationOutcome::Completed(result) => Ok(Some(result)),
            _ => Ok(None),
        }
    }

    /// Produce the assistant's reply for the chat flow
    ///
    /// Total: every failure - assembly or completion - comes back as
    /// renderable text.
    pub async fn reply(&self, history: &[ConversationTurn]) -> String {
        debug!(history_len = %history.len(), "reply: called");
        let snapshot = self.session.snapshot();

        let assembled =
            PromptTask::chat(&self.prompts).and_then(|task| assemble(history, &task, snapshot.as_ref()));

        match assembled {
            Ok(messages) => normalize_chat_reply(self.llm.complete(&messages).await),
            Err(e) => {
                warn!(error = %e, "reply: prompt assembly failed");
                chat_error_text(&e.to_string())
            }
        }
    }
}

fn phase_for_stored(session: &SessionState) -> GenerationPhase {
    match session.result() {
        Some(result) if result.is_error() => GenerationPhase::ReadyWithError,
        Some(_) => GenerationPhase::Ready,
        None => GenerationPhase::Idle,
    }
}
