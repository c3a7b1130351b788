//! Response normalization
//!
//! The single place completion results and errors become user-renderable
//! values. Both entry points are total: any error becomes readable text or
//! an error-shaped result, never a panic, so the worst case downstream is a
//! rendered error message.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::domain::BlueprintResult;
use crate::llm::CompletionError;

/// Fence markers the model sometimes wraps JSON replies in
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```(?:json)?").expect("fence pattern compiles"));

/// Normalize a chat completion into user-facing text
///
/// Success passes through unchanged - the rendering layer interprets the
/// Markdown. Any error becomes a single apologetic sentence embedding the
/// error's message text.
pub fn normalize_chat_reply(raw: Result<String, CompletionError>) -> String {
    match raw {
        Ok(text) => text,
        Err(e) => {
            debug!(kind = %e.kind(), "normalize_chat_reply: completion failed");
            chat_error_text(&e.to_string())
        }
    }
}

/// The chat-facing rendering of an error message
pub fn chat_error_text(detail: &str) -> String {
    format!(
        "I'm sorry, I encountered an error processing your request: {}. Please try again later.",
        detail
    )
}

/// Normalize a blueprint completion into a renderable result
///
/// Accepts both reply shapes the model is allowed to produce - the
/// requested JSON envelope (possibly fence-wrapped) and pure Markdown -
/// and collapses them into one `BlueprintResult`. Errors become a result
/// whose four sections each carry their own readable error text.
pub fn normalize_blueprint(raw: Result<String, CompletionError>) -> BlueprintResult {
    let text = match raw {
        Ok(text) => text,
        Err(e) => {
            debug!(kind = %e.kind(), "normalize_blueprint: completion failed");
            return error_result(&e);
        }
    };

    match classify_reply(&text) {
        ModelReply::Parsed(result) => {
            debug!(soft_error = %result.is_error(), "normalize_blueprint: parsed JSON reply");
            result
        }
        ModelReply::Unstructured(markdown) => {
            // Parse fallback: not a user-facing failure, the content is preserved
            warn!("normalize_blueprint: reply was not JSON, preserving raw markdown");
            BlueprintResult {
                sleep_optimization: format!("## Sleep Optimization\n\n{}", markdown),
                exercise_protocol: String::new(),
                nutrition_plan: String::new(),
                personal_recommendations: markdown,
                error: None,
                message: None,
            }
        }
    }
}

/// A blueprint reply in one of the two accepted shapes
#[derive(Debug)]
enum ModelReply {
    /// The requested JSON envelope
    Parsed(BlueprintResult),
    /// Anything else; treated as Markdown
    Unstructured(String),
}

/// Strip code-fence markers and surrounding whitespace
fn strip_fences(text: &str) -> String {
    FENCE_RE.replace_all(text, "").trim().to_string()
}

fn classify_reply(text: &str) -> ModelReply {
    let stripped = strip_fences(text);

    match serde_json::from_str::<serde_json::Value>(&stripped) {
        Ok(serde_json::Value::Object(object)) => {
            let field = |key: &str| {
                object
                    .get(key)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string()
            };
            // A soft error reported by the model is preserved alongside
            // whatever sections it did produce
            let optional = |key: &str| object.get(key).and_then(|v| v.as_str()).map(str::to_string);

            ModelReply::Parsed(BlueprintResult {
                sleep_optimization: field("sleep_optimization"),
                exercise_protocol: field("exercise_protocol"),
                nutrition_plan: field("nutrition_plan"),
                personal_recommendations: field("personal_recommendations"),
                error: optional("error"),
                message: optional("message"),
            })
        }
        _ => ModelReply::Unstructured(stripped),
    }
}

/// Build the error-shaped result for a failed generation
///
/// Each section gets its own text so the rendered cards are distinguishable.
fn error_result(e: &CompletionError) -> BlueprintResult {
    BlueprintResult {
        sleep_optimization: "## Sleep Optimization\n\nError: unable to generate sleep recommendations.".to_string(),
        exercise_protocol: "## Exercise Protocol\n\nError: unable to generate exercise recommendations.".to_string(),
        nutrition_plan: "## Nutrition Plan\n\nError: unable to generate nutrition recommendations.".to_string(),
        personal_recommendations: format!(
            "## Personal Recommendations\n\nWe encountered an error while generating your personalized blueprint: {}. Please try again later.",
            e
        ),
        error: Some(format!("Failed to generate blueprint ({})", e.kind())),
        message: Some(e.to_string()),
    }
}
