//! DD-Agent CLI entry point

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use ddagent::cli::{BlueprintCommand, Cli, Command, OutputFormat, ProfileCommand};
use ddagent::config::Config;
use ddagent::domain::{BlueprintResult, QuestionnaireSnapshot};
use ddagent::engine::{Engine, GenerationOutcome};
use ddagent::llm::create_client;
use ddagent::prompt::PromptLoader;
use ddagent::repl::ChatRepl;
use ddagent::session::SessionState;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    // Logs go to a file so the interactive surfaces stay clean
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ddagent")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = match cli_log_level.map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("dda.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level.as_deref())?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("dda starting");

    match cli.command {
        Command::Chat { message } => {
            config.validate()?;
            let engine = build_engine(&config)?;

            if let Some(result) = engine.maybe_auto_generate().await? {
                announce_generated(&result);
            }

            let mut repl = ChatRepl::new(engine);
            repl.run(message).await
        }
        Command::Profile { command } => run_profile(&config, command),
        Command::Blueprint { command } => run_blueprint(&config, command).await,
        Command::Status => run_status(&config),
        Command::Theme { theme } => {
            let session = open_session(&config)?;
            match theme {
                Some(theme) => {
                    session.set_theme(theme)?;
                    println!("{} Theme set to {}", "✓".green(), theme);
                }
                None => println!("{}", session.theme()),
            }
            Ok(())
        }
    }
}

fn open_session(config: &Config) -> Result<SessionState> {
    SessionState::open(&config.storage.session_dir).context("Failed to open session store")
}

fn build_engine(config: &Config) -> Result<Arc<Engine>> {
    let client = create_client(&config.llm)?;
    let session = open_session(config)?;
    let prompts = PromptLoader::new();

    Ok(Arc::new(Engine::new(client, prompts, session, config.gating.clone())))
}

fn announce_generated(result: &BlueprintResult) {
    if result.is_error() {
        println!(
            "{} Tried to generate your blueprint from stored answers, but it finished with errors. See 'dda blueprint show'.",
            "!".red()
        );
    } else {
        println!(
            "{} Your blueprint was generated from stored answers. See 'dda blueprint show'.",
            "✓".green()
        );
    }
}

fn run_profile(config: &Config, command: ProfileCommand) -> Result<()> {
    let session = open_session(config)?;

    match command {
        ProfileCommand::Show => match session.snapshot() {
            Some(snapshot) => {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                if config.gating.is_satisfied(&snapshot) {
                    println!("{} Profile is complete enough for blueprint generation", "✓".green());
                } else {
                    println!("{} Mandatory fields are still unanswered", "…".yellow());
                }
            }
            None => println!("No answers stored yet. Use 'dda profile set <field> <value>'."),
        },
        ProfileCommand::Set { field, value } => {
            let mut snapshot = session.snapshot().unwrap_or_default();
            snapshot.set_field(&field, &value)?;

            if field == "goals" {
                for goal in &snapshot.goals {
                    if !config.goals.is_known(goal) {
                        return Err(eyre::eyre!(
                            "Unknown goal '{}'. Known goals: {}",
                            goal,
                            config.goals.vocabulary.join(", ")
                        ));
                    }
                }
            }

            session.save_snapshot(&snapshot)?;
            println!("{} Set {}", "✓".green(), field.cyan());
        }
        ProfileCommand::Import { file } => {
            let content = fs::read_to_string(&file).context(format!("Failed to read {}", file.display()))?;
            let snapshot: QuestionnaireSnapshot =
                serde_json::from_str(&content).context("File is not a valid formData document")?;

            session.save_snapshot(&snapshot)?;
            println!("{} Imported profile from {}", "✓".green(), file.display());
        }
        ProfileCommand::Clear => {
            session.clear_snapshot()?;
            println!("{} Cleared stored answers", "✓".green());
        }
    }

    Ok(())
}

async fn run_blueprint(config: &Config, command: BlueprintCommand) -> Result<()> {
    match command {
        BlueprintCommand::Generate => {
            config.validate()?;
            let engine = build_engine(config)?;

            match engine.generate_blueprint().await? {
                GenerationOutcome::Completed(result) => {
                    if result.is_error() {
                        println!("{} Generation finished with errors:", "!".red());
                    }
                    println!("{}", result.to_markdown());
                }
                GenerationOutcome::NotReady => {
                    println!("Your questionnaire is missing mandatory answers. Run 'dda profile show' to see what is stored.");
                }
                GenerationOutcome::InFlight => {
                    println!("A generation is already in flight.");
                }
            }
        }
        BlueprintCommand::Show { format } => {
            let engine = build_engine(config)?;

            if let Some(result) = engine.maybe_auto_generate().await? {
                announce_generated(&result);
            }

            match engine.session().result() {
                Some(result) => match format {
                    OutputFormat::Text => println!("{}", result.to_markdown()),
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                },
                None => println!("No blueprint yet. Run 'dda blueprint generate'."),
            }
        }
        BlueprintCommand::Export { path } => {
            let session = open_session(config)?;
            match session.result() {
                Some(result) => {
                    fs::write(&path, result.to_markdown()).context(format!("Failed to write {}", path.display()))?;
                    println!("{} Exported blueprint to {}", "✓".green(), path.display());
                }
                None => println!("No blueprint yet. Run 'dda blueprint generate'."),
            }
        }
        BlueprintCommand::Clear => {
            let session = open_session(config)?;
            session.clear_result()?;
            println!("{} Cleared stored blueprint", "✓".green());
        }
    }

    Ok(())
}

fn run_status(config: &Config) -> Result<()> {
    let session = open_session(config)?;
    let loaded = session.load();

    println!("Session: {}", config.storage.session_dir);

    match &loaded.snapshot {
        Some(snapshot) => {
            let gate = if config.gating.is_satisfied(snapshot) {
                "complete".green()
            } else {
                "incomplete".yellow()
            };
            println!("  Profile: stored ({})", gate);
        }
        None => println!("  Profile: none"),
    }

    match &loaded.result {
        Some(result) if result.is_error() => println!("  Blueprint: {}", "ready-with-error".red()),
        Some(_) => println!("  Blueprint: {}", "ready".green()),
        None => println!("  Blueprint: none"),
    }

    println!("  Theme: {}", session.theme());

    if session.should_auto_generate(&config.gating) {
        println!("  A blueprint will be generated on the next 'chat' or 'blueprint show'.");
    }

    Ok(())
}
