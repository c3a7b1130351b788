//! Message-list assembly
//!
//! Builds the ordered message list actually sent to the model: the task
//! prompt (with the profile placeholder substituted), the fixed style
//! directive, the coerced conversation history, and - for personalized
//! flows - a grounding reminder at the end. Pure: the same inputs always
//! produce the same list.

use eyre::{Result, eyre};
use handlebars::Handlebars;
use tracing::debug;

use super::{PromptTask, embedded};
use crate::domain::QuestionnaireSnapshot;
use crate::llm::ConversationTurn;

/// Placeholder substituted with the serialized profile snapshot
const PROFILE_PLACEHOLDER: &str = "{{{profile}}}";

/// Most recent history turns forwarded per request
///
/// The cap applies to the history only; synthesized system turns are never
/// dropped.
pub const MAX_HISTORY_TURNS: usize = 48;

/// Construct the message list for one completion request
///
/// The output always begins with exactly one system turn carrying the task
/// text, followed by the style directive. History entries are forwarded
/// verbatim except that roles are coerced to `user`/`assistant`; the system
/// turns are synthesized fresh each call, never pulled from history. When
/// the task is personalized, a grounding reminder is appended once, after
/// the history.
pub fn assemble(
    history: &[ConversationTurn],
    task: &PromptTask,
    snapshot: Option<&QuestionnaireSnapshot>,
) -> Result<Vec<ConversationTurn>> {
    debug!(task = %task.name, history_len = %history.len(), "assemble: called");

    let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    if start > 0 {
        debug!(dropped = %start, "assemble: capping history to most recent turns");
    }

    let mut messages = Vec::with_capacity(history.len() - start + 3);
    messages.push(ConversationTurn::system(render_task(&task.text, snapshot)?));
    messages.push(ConversationTurn::system(embedded::STYLE_DIRECTIVE));

    for turn in &history[start..] {
        let mut turn = turn.clone();
        turn.role = turn.role.coerce_conversational();
        messages.push(turn);
    }

    if task.personalization {
        debug!("assemble: appending personalization reminder");
        messages.push(ConversationTurn::system(embedded::PERSONALIZATION_REMINDER));
    }

    Ok(messages)
}

/// Substitute the profile placeholder in a task template
///
/// Templates without the placeholder pass through untouched. The snapshot
/// serialization is pretty-printed JSON and contains no timestamps, so the
/// rendered text is deterministic.
fn render_task(text: &str, snapshot: Option<&QuestionnaireSnapshot>) -> Result<String> {
    if !text.contains(PROFILE_PLACEHOLDER) {
        return Ok(text.to_string());
    }

    let profile = match snapshot {
        Some(snapshot) => serde_json::to_string_pretty(snapshot)?,
        None => embedded::MISSING_PROFILE_NOTE.to_string(),
    };

    Handlebars::new()
        .render_template(text, &serde_json::json!({ "profile": profile }))
        .map_err(|e| eyre!("Failed to render task template: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;
    use crate::prompt::PromptLoader;

    fn chat_task() -> PromptTask {
        PromptTask::chat(&PromptLoader::embedded_only()).unwrap()
    }

    fn sample_snapshot() -> QuestionnaireSnapshot {
        let mut snapshot = QuestionnaireSnapshot::default();
        snapshot.age = "42".to_string();
        snapshot.biological_sex = "Male".to_string();
        snapshot.goals = vec!["Improve Sleep".to_string()];
        snapshot
    }

    #[test]
    fn test_first_turn_is_task_with_substituted_profile() {
        let snapshot = sample_snapshot();
        let messages = assemble(&[], &chat_task(), Some(&snapshot)).unwrap();

        let first = &messages[0];
        assert_eq!(first.role, Role::System);
        // The placeholder is gone and the snapshot's exact serialization is embedded
        assert!(!first.content.contains(PROFILE_PLACEHOLDER));
        let serialized = serde_json::to_string_pretty(&snapshot).unwrap();
        assert!(first.content.contains(&serialized));
    }

    #[test]
    fn test_style_directive_is_second() {
        let messages = assemble(&[], &chat_task(), None).unwrap();
        assert_eq!(messages[1].role, Role::System);
        assert_eq!(messages[1].content, embedded::STYLE_DIRECTIVE);
    }

    #[test]
    fn test_reminder_is_last_iff_personalized() {
        let history = vec![ConversationTurn::user("How do I sleep better?")];

        let messages = assemble(&history, &chat_task(), Some(&sample_snapshot())).unwrap();
        let last = messages.last().unwrap();
        assert_eq!(last.role, Role::System);
        assert_eq!(last.content, embedded::PERSONALIZATION_REMINDER);

        let blueprint = PromptTask::blueprint(&PromptLoader::embedded_only()).unwrap();
        let messages = assemble(&history, &blueprint, None).unwrap();
        let last = messages.last().unwrap();
        assert_eq!(last.role, Role::User);
    }

    #[test]
    fn test_history_roles_coerced_and_order_preserved() {
        let history = vec![
            ConversationTurn::user("one"),
            ConversationTurn::assistant("two"),
            ConversationTurn::system("three"),
            ConversationTurn::user("four"),
        ];

        let messages = assemble(&history, &chat_task(), None).unwrap();
        let forwarded = &messages[2..messages.len() - 1];

        let roles: Vec<Role> = forwarded.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Assistant, Role::User]);

        let contents: Vec<&str> = forwarded.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn test_missing_snapshot_renders_note() {
        let messages = assemble(&[], &chat_task(), None).unwrap();
        assert!(messages[0].content.contains("No user data has been provided yet"));
    }

    #[test]
    fn test_cap_keeps_most_recent_turns_and_system_turns() {
        let history: Vec<ConversationTurn> = (0..MAX_HISTORY_TURNS + 10)
            .map(|i| ConversationTurn::user(format!("turn {}", i)))
            .collect();

        let messages = assemble(&history, &chat_task(), None).unwrap();

        // 2 leading system turns + capped history + reminder
        assert_eq!(messages.len(), 2 + MAX_HISTORY_TURNS + 1);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[2].content, format!("turn {}", 10));
        assert_eq!(
            messages[messages.len() - 2].content,
            format!("turn {}", MAX_HISTORY_TURNS + 9)
        );
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let history = vec![ConversationTurn::user("hello"), ConversationTurn::assistant("hi")];
        let snapshot = sample_snapshot();

        let a = assemble(&history, &chat_task(), Some(&snapshot)).unwrap();
        let b = assemble(&history, &chat_task(), Some(&snapshot)).unwrap();
        assert_eq!(a, b);
    }
}
