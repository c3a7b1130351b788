//! Interactive chat REPL
//!
//! Presentation glue over the engine: reads user turns, renders whatever
//! the normalizer returns. The conversation lives in memory for the
//! duration of the session, matching the source behavior.

use std::sync::Arc;

use chrono::Utc;
use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use uuid::Uuid;

use crate::engine::Engine;
use crate::llm::{ConversationTurn, Role};

/// Opening message shown (and carried in history) at session start
const GREETING: &str = "Hello! I'm your AI health assistant based on the Don't Die Blueprint. \
     How can I help optimize your longevity today?";

/// Interactive chat session
pub struct ChatRepl {
    engine: Arc<Engine>,
    conversation: Vec<ConversationTurn>,
}

impl ChatRepl {
    /// Create a new chat session with the standard greeting
    pub fn new(engine: Arc<Engine>) -> Self {
        let conversation = vec![stamped(ConversationTurn::assistant(GREETING))];
        Self { engine, conversation }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self, initial_message: Option<String>) -> Result<()> {
        self.print_welcome();

        // If an initial message was provided, process it first
        if let Some(message) = initial_message {
            println!("{} {}", ">".bright_green(), message);
            self.process_user_input(&message).await;
        }

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.process_user_input(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show a new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Print welcome message
    fn print_welcome(&self) {
        println!();
        println!("{}", "DD-Agent Health Assistant".bright_cyan().bold());
        println!("{}", GREETING);
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    /// Handle slash commands
    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/clear" | "/c" => {
                self.conversation.clear();
                self.conversation.push(stamped(ConversationTurn::assistant(GREETING)));
                println!("{}", "Conversation cleared.".dimmed());
                SlashResult::Continue
            }
            "/history" => {
                self.print_history();
                SlashResult::Continue
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    /// Print help message
    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Exit the chat", "/quit".yellow());
        println!("  {:14} Clear conversation history", "/clear".yellow());
        println!("  {:14} Show conversation history", "/history".yellow());
        println!();
        println!("Answers are grounded in your questionnaire profile when one is stored.");
        println!();
    }

    /// Print conversation history
    fn print_history(&self) {
        if self.conversation.is_empty() {
            println!("{}", "No conversation history.".dimmed());
            return;
        }

        println!();
        println!("{}", "Conversation History:".bright_cyan());
        for (i, turn) in self.conversation.iter().enumerate() {
            let role = match turn.role {
                Role::User => "User".bright_green(),
                Role::Assistant => "Assistant".bright_blue(),
                Role::System => "System".dimmed(),
            };
            let preview: String = turn.content.chars().take(50).collect();
            let preview = if turn.content.chars().count() > 50 {
                format!("{}...", preview)
            } else {
                preview
            };
            println!("  {}. {}: {}", i + 1, role, preview);
        }
        println!();
    }

    /// Process user input and print the assistant's reply
    async fn process_user_input(&mut self, input: &str) {
        self.conversation.push(stamped(ConversationTurn::user(input)));

        let reply = self.engine.reply(&self.conversation).await;

        println!();
        println!("{}", reply);
        println!();

        self.conversation.push(stamped(ConversationTurn::assistant(reply)));
    }
}

/// Attach an id and timestamp to an interactive turn
fn stamped(turn: ConversationTurn) -> ConversationTurn {
    turn.with_id(Uuid::now_v7().to_string()).with_timestamp(Utc::now())
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}
