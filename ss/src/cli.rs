//! CLI argument parsing for sessionstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ss")]
#[command(author, version, about = "File-backed JSON slot store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the store directory
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a slot's contents
    Get {
        /// Slot name
        #[arg(required = true)]
        slot: String,
    },

    /// Write a slot from a JSON string
    Set {
        /// Slot name
        #[arg(required = true)]
        slot: String,

        /// JSON value to store
        #[arg(required = true)]
        json: String,
    },

    /// Delete a slot
    Del {
        /// Slot name
        #[arg(required = true)]
        slot: String,
    },

    /// List all populated slots
    List,

    /// Delete every slot in the store
    Clear,
}
