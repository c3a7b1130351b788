//! Prompt orchestration module
//!
//! Task prompt templates, the override-aware loader, and the message-list
//! assembler that turns history + task + profile into the ordered list
//! actually sent to the model.

use eyre::Result;

mod assembler;
pub mod embedded;
mod loader;

pub use assembler::{MAX_HISTORY_TURNS, assemble};
pub use loader::PromptLoader;

/// A system-level task prompt framing one flow
///
/// `personalization` is an explicit flag - set by the flow that builds the
/// task, not sniffed out of the prompt text - controlling whether the
/// assembler appends the profile-grounding reminder after the history.
#[derive(Debug, Clone)]
pub struct PromptTask {
    /// Template name, for loader lookup and logs
    pub name: &'static str,
    /// Task template text; may contain the profile placeholder
    pub text: String,
    /// Append the personalization reminder after the history
    pub personalization: bool,
}

impl PromptTask {
    /// The conversational-assistant task, grounded in the profile snapshot
    pub fn chat(loader: &PromptLoader) -> Result<Self> {
        Ok(Self {
            name: "chat",
            text: loader.load("chat")?,
            personalization: true,
        })
    }

    /// The structured blueprint-generation task
    ///
    /// The snapshot travels as the user turn in this flow, so there is no
    /// placeholder and no reminder.
    pub fn blueprint(loader: &PromptLoader) -> Result<Self> {
        Ok(Self {
            name: "blueprint",
            text: loader.load("blueprint")?,
            personalization: false,
        })
    }
}
