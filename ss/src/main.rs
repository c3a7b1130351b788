use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use sessionstore::SlotStore;
use sessionstore::cli::Cli;
use sessionstore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store_path = cli.store.unwrap_or(config.store_path);

    info!("sessionstore starting");

    match cli.command {
        sessionstore::cli::Command::Get { slot } => {
            let store = SlotStore::open(&store_path)?;
            match store.get_raw(&slot)? {
                Some(content) => println!("{}", content),
                None => println!("{} Slot '{}' is empty", "∅".dimmed(), slot),
            }
        }
        sessionstore::cli::Command::Set { slot, json } => {
            let store = SlotStore::open(&store_path)?;
            let value: serde_json::Value = serde_json::from_str(&json).context("Value is not valid JSON")?;
            store.put(&slot, &value)?;
            println!("{} Wrote slot: {}", "✓".green(), slot.cyan());
        }
        sessionstore::cli::Command::Del { slot } => {
            let store = SlotStore::open(&store_path)?;
            if store.delete(&slot)? {
                println!("{} Deleted slot: {}", "✓".green(), slot);
            } else {
                println!("Slot '{}' was not present", slot);
            }
        }
        sessionstore::cli::Command::List => {
            let store = SlotStore::open(&store_path)?;
            let slots = store.list()?;
            if slots.is_empty() {
                println!("No slots found");
            } else {
                for slot in slots {
                    println!("{}", slot);
                }
            }
        }
        sessionstore::cli::Command::Clear => {
            let store = SlotStore::open(&store_path)?;
            store.clear()?;
            println!("{} Cleared all slots", "✓".green());
        }
    }

    Ok(())
}
