//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::session::Theme;

/// DD-Agent - AI health blueprint assistant
#[derive(Parser)]
#[command(
    name = "dda",
    about = "AI health blueprint assistant based on the Don't Die Blueprint",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Chat with the health assistant
    Chat {
        /// Optional first message to send
        message: Option<String>,
    },

    /// Manage the questionnaire profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// Manage the generated blueprint
    Blueprint {
        #[command(subcommand)]
        command: BlueprintCommand,
    },

    /// Show session status
    Status,

    /// Get or set the UI theme
    Theme {
        /// Theme to switch to; prints the current theme when omitted
        theme: Option<Theme>,
    },
}

/// Questionnaire profile subcommands
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the stored answers
    Show,

    /// Set one field by its camelCase name
    Set {
        /// Field name (e.g. age, biologicalSex, goals)
        field: String,

        /// Value; list fields take comma-separated values
        value: String,
    },

    /// Import answers from a JSON file
    Import {
        /// Path to a JSON file in the formData layout
        file: PathBuf,
    },

    /// Delete the stored answers
    Clear,
}

/// Blueprint subcommands
#[derive(Debug, Subcommand)]
pub enum BlueprintCommand {
    /// Generate (or regenerate) the blueprint from the stored answers
    Generate,

    /// Show the stored blueprint
    Show {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Write the blueprint as a Markdown document
    Export {
        /// Destination file
        path: PathBuf,
    },

    /// Delete the stored blueprint
    Clear,
}

/// Output format for blueprint display
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
